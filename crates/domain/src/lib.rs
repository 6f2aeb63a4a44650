//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod permission;
mod role;
mod role_field;

pub use permission::{Permission, PermissionId};
pub use role::{DEFAULT_ADMINISTRATOR_ROLE_NAME, Role, RoleChanges, RoleId, abbreviate};
pub use role_field::RoleField;
