use axum::http::{Method, StatusCode};
use bookslot_core::models::booking::{Booking, NewBooking};
use bookslot_db::mock::MockStore;
use chrono::{Duration, TimeZone, Utc};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::{build_app, send, service, stored, tuesday_hours, BRAND, PROVIDER};

fn timeslot_uri(service_id: Uuid, date: &str) -> String {
    format!("/api/timeslots?brand_id={BRAND}&date={date}&service_id={service_id}&provider_id={PROVIDER}")
}

/// A 30 minute booking at 10:00 with a 15 minute buffer.
fn ten_oclock_booking() -> Booking {
    let start = Utc.with_ymd_and_hms(2099, 3, 3, 10, 0, 0).unwrap();
    let row = NewBooking {
        brand_id: BRAND,
        provider_id: PROVIDER,
        customer_id: 20,
        service_id: Uuid::new_v4(),
        start_time: start,
        end_time: start + Duration::minutes(30),
        provider_name: "Maria Ivanova".to_string(),
        customer_name: "Georgi Petrov".to_string(),
        service_name: "Haircut".to_string(),
        cost: "25.00".to_string(),
        buffer_time: 15,
        comment: None,
    };
    stored(1, &row)
}

#[tokio::test]
async fn test_timeslots_for_open_day() {
    let service_id = Uuid::new_v4();
    let mut store = MockStore::new();
    store
        .expect_get_service()
        .with(eq(service_id))
        .returning(|id| Ok(Some(service(id))));
    store
        .expect_get_working_hours()
        .with(eq(BRAND))
        .returning(|_| Ok(vec![tuesday_hours()]));
    store
        .expect_list_provider_bookings()
        .returning(|_, _| Ok(Vec::new()));

    let (status, json) = send(build_app(store), Method::GET, &timeslot_uri(service_id, "2099-03-03"), None).await;

    // 30 minutes of work plus 15 of buffer: last start is 16:15.
    let timeslots = json["timeslots"].as_array().unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(timeslots.len(), 30);
    assert_eq!(timeslots[0], json!("09:00"));
    assert_eq!(timeslots[29], json!("16:15"));
}

#[tokio::test]
async fn test_existing_booking_removes_slots() {
    let service_id = Uuid::new_v4();
    let mut store = MockStore::new();
    store
        .expect_get_service()
        .returning(|id| Ok(Some(service(id))));
    store
        .expect_get_working_hours()
        .returning(|_| Ok(vec![tuesday_hours()]));
    store
        .expect_list_provider_bookings()
        .returning(|_, _| Ok(vec![ten_oclock_booking()]));

    let (_, json) = send(build_app(store), Method::GET, &timeslot_uri(service_id, "2099-03-03"), None).await;
    let timeslots: Vec<String> = serde_json::from_value(json["timeslots"].clone()).unwrap();

    // Busy 10:00 to 10:45; a candidate needs 45 clear minutes.
    assert!(timeslots.contains(&"09:15".to_string()));
    assert!(!timeslots.contains(&"09:30".to_string()));
    assert!(!timeslots.contains(&"10:30".to_string()));
    assert!(timeslots.contains(&"10:45".to_string()));
}

#[tokio::test]
async fn test_closed_day_has_no_timeslots() {
    let service_id = Uuid::new_v4();
    let mut store = MockStore::new();
    store
        .expect_get_service()
        .returning(|id| Ok(Some(service(id))));
    store.expect_get_working_hours().returning(|_| {
        let mut hours = tuesday_hours();
        hours.is_closed = true;
        Ok(vec![hours])
    });
    store
        .expect_list_provider_bookings()
        .returning(|_, _| Ok(Vec::new()));

    let (status, json) = send(build_app(store), Method::GET, &timeslot_uri(service_id, "2099-03-03"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "timeslots": [] }));
}

#[tokio::test]
async fn test_past_date_is_rejected() {
    let (status, json) = send(
        build_app(MockStore::new()),
        Method::GET,
        &timeslot_uri(Uuid::new_v4(), "2020-01-07"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], json!("Validation error: Date must not be in the past"));
}

#[tokio::test]
async fn test_unknown_service_is_not_found() {
    let mut store = MockStore::new();
    store.expect_get_service().returning(|_| Ok(None));

    let (status, _) = send(build_app(store), Method::GET, &timeslot_uri(Uuid::new_v4(), "2099-03-03"), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_query_parameter_is_bad_request() {
    let (status, _) = send(
        build_app(MockStore::new()),
        Method::GET,
        "/api/timeslots?brand_id=1&date=2099-03-03",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
