use async_trait::async_trait;

use emis_role_core::AppResult;
use emis_role_domain::{Permission, PermissionId, Role, RoleId};

use super::inputs::{RoleListQuery, RoleListing, RoleSeed};

/// Repository port for role persistence.
///
/// Implementations must enforce uniqueness of role names and identifiers and
/// report violations as `AppError::Conflict`.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Finds a role by identifier.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Finds a role by its exact, case-sensitive name.
    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// Inserts a new role.
    async fn insert_role(&self, role: Role) -> AppResult<Role>;

    /// Replaces a stored role; fails with `NotFound` when it does not exist.
    async fn update_role(&self, role: Role) -> AppResult<Role>;

    /// Removes a role and returns it, or `None` when it does not exist.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Lists roles in name order for the requested window.
    async fn list_roles(&self, query: &RoleListQuery) -> AppResult<RoleListing>;
}

/// Read port over the permission catalog referenced by roles.
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Lists all known permissions.
    async fn list_permissions(&self) -> AppResult<Vec<Permission>>;

    /// Lists identifiers of all known permissions.
    async fn list_permission_ids(&self) -> AppResult<Vec<PermissionId>>;

    /// Returns the permissions among `permission_ids` that exist.
    ///
    /// Unknown identifiers are skipped; the result order is unspecified.
    async fn find_permissions(
        &self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<Permission>>;

    /// Returns the subset of `permission_ids` that does not exist.
    async fn find_missing_permissions(
        &self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<PermissionId>>;
}

/// Source of externally maintained role seeds.
#[async_trait]
pub trait RoleSeedSource: Send + Sync {
    /// Loads seeds; returns an empty list when no seed document exists.
    async fn load_role_seeds(&self) -> AppResult<Vec<RoleSeed>>;
}
