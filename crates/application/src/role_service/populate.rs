use std::collections::HashMap;

use emis_role_core::AppResult;
use emis_role_domain::{Permission, PermissionId, Role};

use super::RoleService;
use crate::role_ports::PopulatedRole;

impl RoleService {
    /// Resolves the permission references of `roles` in one catalog lookup.
    ///
    /// Each role keeps its own permission order. References that no longer
    /// resolve are left out.
    pub async fn populate(&self, roles: Vec<Role>) -> AppResult<Vec<PopulatedRole>> {
        let catalog = self.referenced_permissions(&roles).await?;
        Ok(roles
            .into_iter()
            .map(|role| attach_permissions(role, &catalog))
            .collect())
    }

    /// Resolves the permission references of a single role.
    pub async fn populate_one(&self, role: Role) -> AppResult<PopulatedRole> {
        let catalog = self
            .referenced_permissions(std::slice::from_ref(&role))
            .await?;
        Ok(attach_permissions(role, &catalog))
    }

    async fn referenced_permissions(
        &self,
        roles: &[Role],
    ) -> AppResult<HashMap<PermissionId, Permission>> {
        let mut referenced: Vec<PermissionId> = Vec::new();
        for permission_id in roles.iter().filter_map(Role::permissions).flatten() {
            if !referenced.contains(permission_id) {
                referenced.push(*permission_id);
            }
        }

        if referenced.is_empty() {
            return Ok(HashMap::new());
        }

        Ok(self
            .permission_repository
            .find_permissions(&referenced)
            .await?
            .into_iter()
            .map(|permission| (permission.id(), permission))
            .collect())
    }
}

fn attach_permissions(role: Role, catalog: &HashMap<PermissionId, Permission>) -> PopulatedRole {
    let permissions = role
        .permissions()
        .unwrap_or_default()
        .iter()
        .filter_map(|permission_id| catalog.get(permission_id).cloned())
        .collect();

    PopulatedRole { role, permissions }
}
