use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use emis_role_application::{RoleListQuery, RoleListing, RoleRepository};
use emis_role_core::{AppError, AppResult};
use emis_role_domain::{Role, RoleField, RoleId};

#[cfg(test)]
mod tests;

/// In-memory role repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryRoleRepository {
    roles: RwLock<HashMap<RoleId, Role>>,
}

impl InMemoryRoleRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            roles: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.roles.read().await.get(&role_id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .read()
            .await
            .values()
            .find(|role| role.name() == name)
            .cloned())
    }

    async fn insert_role(&self, role: Role) -> AppResult<Role> {
        let mut roles = self.roles.write().await;

        if roles.contains_key(&role.id()) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.id()
            )));
        }

        if roles.values().any(|stored| stored.name() == role.name()) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.name()
            )));
        }

        roles.insert(role.id(), role.clone());
        Ok(role)
    }

    async fn update_role(&self, role: Role) -> AppResult<Role> {
        let mut roles = self.roles.write().await;

        if !roles.contains_key(&role.id()) {
            return Err(AppError::NotFound(format!(
                "role '{}' was not found",
                role.id()
            )));
        }

        if roles
            .values()
            .any(|stored| stored.id() != role.id() && stored.name() == role.name())
        {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.name()
            )));
        }

        roles.insert(role.id(), role.clone());
        Ok(role)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.roles.write().await.remove(&role_id))
    }

    async fn list_roles(&self, query: &RoleListQuery) -> AppResult<RoleListing> {
        let roles = self.roles.read().await;
        let search = query.search.as_deref().map(str::to_lowercase);

        let mut matching: Vec<&Role> = roles
            .values()
            .filter(|role| {
                search
                    .as_deref()
                    .is_none_or(|search| role_matches(role, search))
            })
            .collect();
        matching.sort_by(|left, right| left.name().cmp(right.name()));

        Ok(RoleListing {
            total: matching.len() as u64,
            last_modified: matching.iter().map(|role| role.updated_at()).max(),
            roles: matching
                .into_iter()
                .skip(query.skip)
                .take(query.limit)
                .cloned()
                .collect(),
        })
    }
}

fn role_matches(role: &Role, search: &str) -> bool {
    RoleField::searchable()
        .filter_map(|field| field_text(role, field))
        .any(|value| value.to_lowercase().contains(search))
}

fn field_text(role: &Role, field: RoleField) -> Option<&str> {
    match field {
        RoleField::Name => Some(role.name()),
        RoleField::Abbreviation => Some(role.abbreviation()),
        RoleField::Description => Some(role.description()),
        RoleField::Permissions => None,
    }
}
