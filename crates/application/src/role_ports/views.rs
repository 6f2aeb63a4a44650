use emis_role_domain::{Permission, Role};

/// A role with its permission references resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulatedRole {
    /// The stored role.
    pub role: Role,
    /// Referenced permissions in the role's own order.
    pub permissions: Vec<Permission>,
}
