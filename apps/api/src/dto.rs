mod common;
mod roles;

pub use common::{FieldResponse, HealthResponse, ServiceInfoResponse};
pub use roles::{
    PermissionResponse, PermissionSummaryResponse, RoleListParams, RolePageResponse, RoleRequest,
    RoleResponse,
};
