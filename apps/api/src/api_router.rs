use axum::Router;
use axum::routing::get;
use emis_role_core::AppError;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

mod cors;

/// Version segment exposed in the URL prefix and the service info payload.
pub const API_VERSION: &str = "1";

const API_PREFIX: &str = "/v1";

pub fn build_router(app_state: AppState, frontend_url: Option<&str>) -> Result<Router, AppError> {
    let api_routes = Router::new()
        .route(
            "/roles",
            get(handlers::roles::list_roles_handler).post(handlers::roles::create_role_handler),
        )
        .route(
            "/roles/{role_id}",
            get(handlers::roles::get_role_handler)
                .patch(handlers::roles::patch_role_handler)
                .put(handlers::roles::put_role_handler)
                .delete(handlers::roles::delete_role_handler),
        )
        .route(
            "/permissions",
            get(handlers::permissions::list_permissions_handler),
        );

    let router = Router::new()
        .route("/", get(handlers::health::service_info_handler))
        .route("/health", get(handlers::health::health_handler))
        .nest(API_PREFIX, api_routes)
        .layer(TraceLayer::new_for_http());

    let router = match frontend_url {
        Some(frontend_url) => router.layer(cors::build_cors_layer(frontend_url)?),
        None => router,
    };

    Ok(router.with_state(app_state))
}
