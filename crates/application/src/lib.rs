//! Application services and ports.

#![forbid(unsafe_code)]

mod role_ports;
mod role_service;

pub use role_ports::{
    DEFAULT_ROLE_PAGE_LIMIT, MAX_ROLE_PAGE_LIMIT, PermissionRepository, PopulatedRole, RoleInput,
    RoleListQuery, RoleListing, RolePage, RoleRepository, RoleSeed, RoleSeedSource, RoleSettings,
    parse_role_seed_list,
};
pub use role_service::RoleService;
