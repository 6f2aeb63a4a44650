use async_trait::async_trait;
use tokio::sync::RwLock;

use emis_role_application::PermissionRepository;
use emis_role_core::{AppError, AppResult};
use emis_role_domain::{Permission, PermissionId};

/// In-memory permission catalog, kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryPermissionRepository {
    permissions: RwLock<Vec<Permission>>,
}

impl InMemoryPermissionRepository {
    /// Creates a catalog holding the provided permissions.
    #[must_use]
    pub fn with_permissions(permissions: Vec<Permission>) -> Self {
        Self {
            permissions: RwLock::new(permissions),
        }
    }

    /// Adds a permission to the catalog.
    pub async fn insert_permission(&self, permission: Permission) -> AppResult<()> {
        let mut permissions = self.permissions.write().await;

        if permissions.iter().any(|stored| {
            stored.id() == permission.id() || stored.wildcard() == permission.wildcard()
        }) {
            return Err(AppError::Conflict(format!(
                "permission '{}' already exists",
                permission.wildcard()
            )));
        }

        permissions.push(permission);
        Ok(())
    }
}

#[async_trait]
impl PermissionRepository for InMemoryPermissionRepository {
    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        Ok(self.permissions.read().await.clone())
    }

    async fn list_permission_ids(&self) -> AppResult<Vec<PermissionId>> {
        Ok(self
            .permissions
            .read()
            .await
            .iter()
            .map(Permission::id)
            .collect())
    }

    async fn find_permissions(
        &self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<Permission>> {
        Ok(self
            .permissions
            .read()
            .await
            .iter()
            .filter(|permission| permission_ids.contains(&permission.id()))
            .cloned()
            .collect())
    }

    async fn find_missing_permissions(
        &self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<PermissionId>> {
        let permissions = self.permissions.read().await;

        Ok(permission_ids
            .iter()
            .filter(|permission_id| {
                !permissions
                    .iter()
                    .any(|permission| permission.id() == **permission_id)
            })
            .copied()
            .collect())
    }
}
