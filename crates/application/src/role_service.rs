//! Role application service.
//!
//! Owns the idempotent upsert and seeding workflows plus the generic
//! create/read/update/delete operations exposed over HTTP.

use std::sync::Arc;

use emis_role_core::{AppError, AppResult};
use emis_role_domain::Role;

use crate::role_ports::{PermissionRepository, RoleRepository, RoleSeedSource, RoleSettings};

mod crud;
mod populate;
mod seed;
mod upsert;


/// Application service for role workflows.
#[derive(Clone)]
pub struct RoleService {
    repository: Arc<dyn RoleRepository>,
    permission_repository: Arc<dyn PermissionRepository>,
    seed_source: Arc<dyn RoleSeedSource>,
    settings: Arc<RoleSettings>,
}

impl RoleService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RoleRepository>,
        permission_repository: Arc<dyn PermissionRepository>,
        seed_source: Arc<dyn RoleSeedSource>,
        settings: RoleSettings,
    ) -> Self {
        Self {
            repository,
            permission_repository,
            seed_source,
            settings: Arc::new(settings),
        }
    }

    /// Returns the settings this service was built with.
    #[must_use]
    pub fn settings(&self) -> &RoleSettings {
        self.settings.as_ref()
    }

    async fn ensure_permissions_exist(&self, role: &Role) -> AppResult<()> {
        let Some(permission_ids) = role.permissions() else {
            return Ok(());
        };

        let missing = self
            .permission_repository
            .find_missing_permissions(permission_ids)
            .await?;

        if missing.is_empty() {
            return Ok(());
        }

        let missing = missing
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        Err(AppError::Validation(format!(
            "role '{}' references unknown permissions: {missing}",
            role.name()
        )))
    }
}
