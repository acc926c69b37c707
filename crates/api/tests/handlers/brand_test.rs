use axum::http::{Method, StatusCode};
use bookslot_db::mock::MockStore;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{build_app, send, BRAND};

#[tokio::test]
async fn test_update_working_hours() {
    let mut store = MockStore::new();
    store
        .expect_upsert_working_hours()
        .times(2)
        .returning(|hours| Ok(hours.clone()));

    let body = json!({
        "working_hours": [
            { "day_of_week": 1, "open_time": "09:00", "close_time": "18:00" },
            { "day_of_week": 0, "is_closed": true }
        ]
    });
    let (status, json) = send(
        build_app(store),
        Method::PUT,
        &format!("/api/brands/{BRAND}/working-hours"),
        Some(body),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["brand_id"], json!(BRAND));
    assert_eq!(json["working_hours"][0]["open_time"], json!("09:00"));
    assert_eq!(json["working_hours"][0]["close_time"], json!("18:00"));
    assert_eq!(json["working_hours"][1]["is_closed"], json!(true));
    assert_eq!(json["working_hours"][1]["open_time"], json!(null));
}

#[tokio::test]
async fn test_inverted_hours_are_rejected() {
    let mut store = MockStore::new();
    store.expect_upsert_working_hours().times(0);

    let body = json!({
        "working_hours": [{ "day_of_week": 3, "open_time": "18:00", "close_time": "09:00" }]
    });
    let (status, json) = send(
        build_app(store),
        Method::PUT,
        &format!("/api/brands/{BRAND}/working-hours"),
        Some(body),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        json!("Validation error: open_time must be before close_time on day 3")
    );
}

#[tokio::test]
async fn test_day_out_of_range_is_rejected() {
    let body = json!({
        "working_hours": [{ "day_of_week": 7, "is_closed": true }]
    });
    let (status, _) = send(
        build_app(MockStore::new()),
        Method::PUT,
        &format!("/api/brands/{BRAND}/working-hours"),
        Some(body),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
