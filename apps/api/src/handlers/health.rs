use axum::Json;
use axum::extract::State;
use emis_role_domain::RoleField;

use crate::api_router::API_VERSION;
use crate::dto::{FieldResponse, HealthResponse, ServiceInfoResponse};
use crate::state::AppState;

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn service_info_handler(State(state): State<AppState>) -> Json<ServiceInfoResponse> {
    let settings = state.role_service.settings();

    Json(ServiceInfoResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        api_version: API_VERSION,
        model_name: settings.model_name.clone(),
        collection_name: settings.collection_name.clone(),
        searchable_fields: RoleField::searchable().map(RoleField::as_str).collect(),
        taggable_fields: RoleField::taggable().map(RoleField::as_str).collect(),
        fields: RoleField::ALL.into_iter().map(FieldResponse::from).collect(),
    })
}
