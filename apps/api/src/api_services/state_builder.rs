use std::sync::Arc;

use emis_role_application::{RoleService, RoleSettings};
use emis_role_infrastructure::{
    JsonFileRoleSeedSource, PostgresPermissionRepository, PostgresRoleRepository,
};
use sqlx::PgPool;

use crate::state::AppState;

pub fn build_app_state(pool: PgPool, role_settings: RoleSettings) -> AppState {
    let seed_source = JsonFileRoleSeedSource::new(role_settings.seed_file_path());
    let role_service = RoleService::new(
        Arc::new(PostgresRoleRepository::new(pool.clone())),
        Arc::new(PostgresPermissionRepository::new(pool)),
        Arc::new(seed_source),
        role_settings,
    );

    AppState { role_service }
}
