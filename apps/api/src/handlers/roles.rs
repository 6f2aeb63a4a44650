use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use emis_role_domain::RoleId;

use crate::dto::{RoleListParams, RolePageResponse, RoleRequest, RoleResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Query(params): Query<RoleListParams>,
) -> ApiResult<Json<RolePageResponse>> {
    let mut page = state.role_service.list(params.into()).await?;
    let roles = state
        .role_service
        .populate(std::mem::take(&mut page.data))
        .await?;
    Ok(Json(RolePageResponse::new(page, roles)))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Json(payload): Json<RoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state.role_service.create(payload.try_into()?).await?;
    let role = state.role_service.populate_one(role).await?;
    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state.role_service.find(role_id.parse::<RoleId>()?).await?;
    let role = state.role_service.populate_one(role).await?;
    Ok(Json(RoleResponse::from(role)))
}

pub async fn patch_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
    Json(payload): Json<RoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .patch(role_id.parse::<RoleId>()?, payload.try_into()?)
        .await?;
    let role = state.role_service.populate_one(role).await?;
    Ok(Json(RoleResponse::from(role)))
}

pub async fn put_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
    Json(payload): Json<RoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .put(role_id.parse::<RoleId>()?, payload.try_into()?)
        .await?;
    let role = state.role_service.populate_one(role).await?;
    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .delete(role_id.parse::<RoleId>()?)
        .await?;
    let role = state.role_service.populate_one(role).await?;
    Ok(Json(RoleResponse::from(role)))
}
