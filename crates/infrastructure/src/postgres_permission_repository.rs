use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use emis_role_application::PermissionRepository;
use emis_role_core::{AppError, AppResult};
use emis_role_domain::{Permission, PermissionId};

/// PostgreSQL-backed read model over the permission catalog.
#[derive(Clone)]
pub struct PostgresPermissionRepository {
    pool: PgPool,
}

impl PostgresPermissionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    id: uuid::Uuid,
    resource: String,
    action: String,
    description: Option<String>,
}

impl PermissionRow {
    fn into_permission(self) -> AppResult<Permission> {
        let id = self.id;
        Permission::new(
            PermissionId::from_uuid(id),
            self.resource,
            self.action,
            self.description,
        )
        .map_err(|error| AppError::Internal(format!("invalid stored permission '{id}': {error}")))
    }
}

#[async_trait]
impl PermissionRepository for PostgresPermissionRepository {
    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, resource, action, description
            FROM permissions
            ORDER BY resource, action
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?;

        rows.into_iter().map(PermissionRow::into_permission).collect()
    }

    async fn list_permission_ids(&self) -> AppResult<Vec<PermissionId>> {
        let ids = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT id
            FROM permissions
            ORDER BY resource, action
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list permission ids: {error}"))
        })?;

        Ok(ids.into_iter().map(PermissionId::from_uuid).collect())
    }

    async fn find_permissions(
        &self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<Permission>> {
        if permission_ids.is_empty() {
            return Ok(Vec::new());
        }

        let requested = permission_ids
            .iter()
            .map(PermissionId::as_uuid)
            .collect::<Vec<_>>();
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, resource, action, description
            FROM permissions
            WHERE id = ANY($1)
            "#,
        )
        .bind(requested)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve permissions: {error}")))?;

        rows.into_iter().map(PermissionRow::into_permission).collect()
    }

    async fn find_missing_permissions(
        &self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<PermissionId>> {
        if permission_ids.is_empty() {
            return Ok(Vec::new());
        }

        let requested = permission_ids
            .iter()
            .map(PermissionId::as_uuid)
            .collect::<Vec<_>>();
        let existing = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT id
            FROM permissions
            WHERE id = ANY($1)
            "#,
        )
        .bind(requested)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve permissions: {error}")))?
        .into_iter()
        .collect::<HashSet<_>>();

        Ok(permission_ids
            .iter()
            .filter(|permission_id| !existing.contains(&permission_id.as_uuid()))
            .copied()
            .collect())
    }
}
