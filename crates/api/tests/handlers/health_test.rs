use axum::http::{Method, StatusCode};
use bookslot_db::mock::MockStore;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{build_app, send};

#[tokio::test]
async fn test_health_check() {
    let (status, json) = send(build_app(MockStore::new()), Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_version() {
    let (status, json) = send(build_app(MockStore::new()), Method::GET, "/version", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], json!("bookslot-api"));
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (status, _) = send(build_app(MockStore::new()), Method::GET, "/api/nowhere", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
