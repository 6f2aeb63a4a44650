use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use emis_role_application::{RoleService, RoleSettings};
use emis_role_domain::{Permission, PermissionId, RoleId};
use emis_role_infrastructure::{
    InMemoryPermissionRepository, InMemoryRoleRepository, JsonFileRoleSeedSource,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::api_router::build_router;
use crate::state::AppState;

struct TestApp {
    router: Router,
    role_service: RoleService,
    permission_ids: Vec<PermissionId>,
}

fn test_app() -> TestApp {
    let permissions = ["Role", "Permission"]
        .into_iter()
        .map(|resource| {
            Permission::new(PermissionId::new(), resource, "manage", None)
                .unwrap_or_else(|_| unreachable!())
        })
        .collect::<Vec<_>>();
    let permission_ids = permissions.iter().map(Permission::id).collect();

    let role_service = RoleService::new(
        Arc::new(InMemoryRoleRepository::new()),
        Arc::new(InMemoryPermissionRepository::with_permissions(permissions)),
        Arc::new(JsonFileRoleSeedSource::new("does-not-exist/roles.json")),
        RoleSettings::default(),
    );

    let router = build_router(
        AppState {
            role_service: role_service.clone(),
        },
        None,
    )
    .unwrap_or_else(|_| unreachable!());

    TestApp {
        router,
        role_service,
        permission_ids,
    }
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap_or_else(|_| unreachable!());

    let response = router
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|_| unreachable!());
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .unwrap_or_default();

    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn create(router: &Router, body: Value) -> Value {
    let (status, role) = send(router, Method::POST, "/v1/roles", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    role
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app();

    let (status, body) = send(&app.router, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn root_describes_the_service() {
    let app = test_app();

    let (status, body) = send(&app.router, Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["apiVersion"], "1");
    assert_eq!(body["modelName"], "Role");
    assert_eq!(body["collectionName"], "roles");
    assert_eq!(
        body["searchableFields"],
        json!(["name", "abbreviation", "description"])
    );
    assert_eq!(body["taggableFields"], json!(["name", "abbreviation"]));
    assert_eq!(
        body["fields"][3],
        json!({
            "name": "permissions",
            "searchable": false,
            "taggable": false,
            "exportable": false,
            "autopopulate": true,
        })
    );
}

#[tokio::test]
async fn create_returns_role_with_derived_fields() {
    let app = test_app();

    let role = create(&app.router, json!({ "name": "  IT Officer " })).await;

    assert!(role["_id"].is_string());
    assert_eq!(role["name"], "IT Officer");
    assert_eq!(role["abbreviation"], "IO");
    assert_eq!(role["description"], "IT Officer");
    assert_eq!(role["permissions"], json!([]));
    assert!(role["createdAt"].is_string());
    assert_eq!(role["createdAt"], role["updatedAt"]);
}

#[tokio::test]
async fn create_rejects_duplicates_and_blank_names() {
    let app = test_app();
    create(&app.router, json!({ "name": "Clerk" })).await;

    let (duplicate, body) = send(
        &app.router,
        Method::POST,
        "/v1/roles",
        Some(json!({ "name": "Clerk" })),
    )
    .await;
    let (blank, _) = send(
        &app.router,
        Method::POST,
        "/v1/roles",
        Some(json!({ "name": "   " })),
    )
    .await;

    assert_eq!(duplicate, StatusCode::CONFLICT);
    assert!(body["message"].as_str().is_some_and(|message| message.contains("Clerk")));
    assert_eq!(blank, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_validates_permission_references() {
    let app = test_app();

    let (unknown, _) = send(
        &app.router,
        Method::POST,
        "/v1/roles",
        Some(json!({ "name": "Clerk", "permissions": [PermissionId::new().to_string()] })),
    )
    .await;
    let known = create(
        &app.router,
        json!({ "name": "Dispatcher", "permissions": [app.permission_ids[0].to_string()] }),
    )
    .await;

    assert_eq!(unknown, StatusCode::BAD_REQUEST);
    assert_eq!(
        known["permissions"],
        json!([{
            "_id": app.permission_ids[0].to_string(),
            "name": "Role:manage",
            "description": null,
        }])
    );
}

#[tokio::test]
async fn missing_and_malformed_ids_are_rejected() {
    let app = test_app();
    let missing = format!("/v1/roles/{}", RoleId::new());

    let (not_found, _) = send(&app.router, Method::GET, &missing, None).await;
    let (patch_missing, _) = send(
        &app.router,
        Method::PATCH,
        &missing,
        Some(json!({ "description": "x" })),
    )
    .await;
    let (delete_missing, _) = send(&app.router, Method::DELETE, &missing, None).await;
    let (malformed, _) = send(&app.router, Method::GET, "/v1/roles/not-a-uuid", None).await;

    assert_eq!(not_found, StatusCode::NOT_FOUND);
    assert_eq!(patch_missing, StatusCode::NOT_FOUND);
    assert_eq!(delete_missing, StatusCode::NOT_FOUND);
    assert_eq!(malformed, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_changes_only_provided_fields() {
    let app = test_app();
    let created = create(
        &app.router,
        json!({ "name": "Billing Officer", "abbreviation": "BILL" }),
    )
    .await;
    let uri = format!("/v1/roles/{}", created["_id"].as_str().unwrap_or_default());

    let (status, patched) = send(
        &app.router,
        Method::PATCH,
        &uri,
        Some(json!({ "description": "Approves invoices" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["_id"], created["_id"]);
    assert_eq!(patched["name"], "Billing Officer");
    assert_eq!(patched["abbreviation"], "BILL");
    assert_eq!(patched["description"], "Approves invoices");
    assert_eq!(patched["createdAt"], created["createdAt"]);
}

#[tokio::test]
async fn put_rederives_omitted_fields() {
    let app = test_app();
    let created = create(
        &app.router,
        json!({ "name": "Billing Officer", "abbreviation": "BILL", "description": "Old" }),
    )
    .await;
    let uri = format!("/v1/roles/{}", created["_id"].as_str().unwrap_or_default());

    let (status, replaced) = send(
        &app.router,
        Method::PUT,
        &uri,
        Some(json!({ "name": "Finance Officer" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["name"], "Finance Officer");
    assert_eq!(replaced["abbreviation"], "FO");
    assert_eq!(replaced["description"], "Finance Officer");
}

#[tokio::test]
async fn delete_returns_removed_role() {
    let app = test_app();
    let created = create(&app.router, json!({ "name": "Temporary" })).await;
    let uri = format!("/v1/roles/{}", created["_id"].as_str().unwrap_or_default());

    let (deleted, body) = send(&app.router, Method::DELETE, &uri, None).await;
    let (fetched, _) = send(&app.router, Method::GET, &uri, None).await;

    assert_eq!(deleted, StatusCode::OK);
    assert_eq!(body["_id"], created["_id"]);
    assert_eq!(body["permissions"], json!([]));
    assert_eq!(fetched, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_returns_pagination_envelope() {
    let app = test_app();
    for name in ["Clerk", "Dispatcher", "Supervisor"] {
        create(&app.router, json!({ "name": name })).await;
    }

    let (status, page) = send(&app.router, Method::GET, "/v1/roles?limit=2&page=2", None).await;
    let (_, searched) = send(&app.router, Method::GET, "/v1/roles?q=disp", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 3);
    assert_eq!(page["limit"], 2);
    assert_eq!(page["skip"], 2);
    assert_eq!(page["page"], 2);
    assert_eq!(page["pages"], 2);
    assert_eq!(page["data"][0]["name"], "Supervisor");
    assert!(page["lastModified"].is_string());
    assert_eq!(searched["total"], 1);
    assert_eq!(searched["data"][0]["name"], "Dispatcher");
}

#[tokio::test]
async fn fetched_role_embeds_permission_summaries() {
    let app = test_app();
    let created = create(
        &app.router,
        json!({
            "name": "Dispatcher",
            "permissions": [
                app.permission_ids[1].to_string(),
                app.permission_ids[0].to_string(),
            ],
        }),
    )
    .await;
    let uri = format!("/v1/roles/{}", created["_id"].as_str().unwrap_or_default());

    let (status, fetched) = send(&app.router, Method::GET, &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["permissions"][0]["name"], "Permission:manage");
    assert_eq!(fetched["permissions"][1]["name"], "Role:manage");
    assert_eq!(
        fetched["permissions"][1]["_id"],
        app.permission_ids[0].to_string()
    );
}

#[tokio::test]
async fn permissions_are_listed() {
    let app = test_app();

    let (status, body) = send(&app.router, Method::GET, "/v1/permissions", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[0]["wildcard"], "Role:manage");
    assert_eq!(body[0]["_id"], app.permission_ids[0].to_string());
}

#[tokio::test]
async fn seeded_administrator_is_listed_with_every_permission() {
    let app = test_app();
    assert!(app.role_service.seed(["Clerk"]).await.is_ok());

    let (status, page) = send(&app.router, Method::GET, "/v1/roles", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 2);
    assert_eq!(page["data"][0]["name"], "Administrator");
    let embedded = page["data"][0]["permissions"]
        .as_array()
        .map(|permissions| {
            permissions
                .iter()
                .map(|permission| permission["_id"].clone())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    assert_eq!(
        embedded,
        app.permission_ids
            .iter()
            .map(|permission_id| json!(permission_id.to_string()))
            .collect::<Vec<_>>()
    );
    assert_eq!(page["data"][0]["permissions"][1]["name"], "Permission:manage");
    assert_eq!(page["data"][1]["name"], "Clerk");
}
