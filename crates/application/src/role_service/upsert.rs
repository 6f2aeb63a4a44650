use chrono::Utc;
use tracing::debug;

use emis_role_core::AppResult;
use emis_role_domain::Role;

use super::RoleService;
use crate::role_ports::RoleInput;

impl RoleService {
    /// Creates the role described by `input` or merges it into the matching one.
    ///
    /// Matching uses `input.id` when present and the trimmed name otherwise.
    /// A concurrent create for the same name surfaces as `AppError::Conflict`.
    /// When the resulting role is the administrator role it is re-saved with
    /// every known permission.
    pub async fn upsert(&self, input: RoleInput) -> AppResult<Role> {
        let existing = match (input.id, input.trimmed_name()) {
            (Some(role_id), _) => self.repository.find_role(role_id).await?,
            (None, Some(name)) => self.repository.find_role_by_name(name).await?,
            (None, None) => None,
        };

        let now = Utc::now();
        let saved = match existing {
            Some(existing) => {
                let role = existing.merged(input.changes(), now)?;
                self.ensure_permissions_exist(&role).await?;
                debug!(role = role.name(), "updating role");
                self.repository.update_role(role).await?
            }
            None => {
                let role = Role::create(input.id.unwrap_or_default(), input.changes(), now)?;
                self.ensure_permissions_exist(&role).await?;
                debug!(role = role.name(), "creating role");
                self.repository.insert_role(role).await?
            }
        };

        if !self.settings.is_administrator(saved.name()) {
            return Ok(saved);
        }

        let permission_ids = self.permission_repository.list_permission_ids().await?;
        debug!(
            role = saved.name(),
            permissions = permission_ids.len(),
            "granting all permissions to administrator role"
        );

        self.repository
            .update_role(saved.with_permissions(permission_ids, now))
            .await
    }
}
