use emis_role_application::RoleService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub role_service: RoleService,
}
