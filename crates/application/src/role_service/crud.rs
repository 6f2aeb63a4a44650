use chrono::Utc;

use emis_role_core::{AppError, AppResult};
use emis_role_domain::{Permission, Role, RoleId};

use super::RoleService;
use crate::role_ports::{RoleInput, RoleListQuery, RolePage};

impl RoleService {
    /// Creates a new role; fails with `Conflict` when the name is taken.
    pub async fn create(&self, input: RoleInput) -> AppResult<Role> {
        let role = Role::create(input.id.unwrap_or_default(), input.changes(), Utc::now())?;
        self.ensure_permissions_exist(&role).await?;
        self.repository.insert_role(role).await
    }

    /// Returns a role by identifier.
    pub async fn find(&self, role_id: RoleId) -> AppResult<Role> {
        self.repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| role_not_found(role_id))
    }

    /// Lists roles with pagination metadata.
    pub async fn list(&self, query: RoleListQuery) -> AppResult<RolePage> {
        let query = query.normalized();
        let listing = self.repository.list_roles(&query).await?;
        Ok(RolePage::from_listing(listing, &query))
    }

    /// Applies the provided fields to an existing role.
    pub async fn patch(&self, role_id: RoleId, input: RoleInput) -> AppResult<Role> {
        let existing = self.find(role_id).await?;
        let role = existing.merged(input.changes(), Utc::now())?;
        self.ensure_permissions_exist(&role).await?;
        self.repository.update_role(role).await
    }

    /// Replaces the mutable fields of an existing role.
    pub async fn put(&self, role_id: RoleId, input: RoleInput) -> AppResult<Role> {
        let existing = self.find(role_id).await?;
        let role = existing.replaced(input.changes(), Utc::now())?;
        self.ensure_permissions_exist(&role).await?;
        self.repository.update_role(role).await
    }

    /// Deletes a role and returns the removed record.
    pub async fn delete(&self, role_id: RoleId) -> AppResult<Role> {
        self.repository
            .delete_role(role_id)
            .await?
            .ok_or_else(|| role_not_found(role_id))
    }

    /// Lists the permission catalog roles may reference.
    pub async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.permission_repository.list_permissions().await
    }
}

fn role_not_found(role_id: RoleId) -> AppError {
    AppError::NotFound(format!("role '{role_id}' was not found"))
}
