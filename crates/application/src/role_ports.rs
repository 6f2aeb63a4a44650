mod inputs;
mod repositories;
mod settings;
mod views;

pub use inputs::{
    DEFAULT_ROLE_PAGE_LIMIT, MAX_ROLE_PAGE_LIMIT, RoleInput, RoleListQuery, RoleListing,
    RolePage, RoleSeed,
};
pub use repositories::{PermissionRepository, RoleRepository, RoleSeedSource};
pub use settings::{RoleSettings, parse_role_seed_list};
pub use views::PopulatedRole;
