#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use bookslot_api::ApiState;
use bookslot_core::coordinator::{BookingCoordinator, CoordinatorSettings};
use bookslot_core::models::{
    booking::{Booking, BookingStatus, NewBooking},
    profile::{Customer, Provider},
    service::Service,
    working_hours::WorkingHours,
};
use bookslot_db::mock::MockStore;
use chrono::{NaiveTime, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const BRAND: i32 = 1;
pub const PROVIDER: i64 = 10;
pub const CUSTOMER: i64 = 20;

/// Router backed by `store`, rendering slots in UTC.
pub fn build_app(store: MockStore) -> Router {
    let settings = CoordinatorSettings {
        zone: chrono_tz::UTC,
        lookup_timeout: Duration::from_secs(1),
    };
    let coordinator = BookingCoordinator::new(Arc::new(store), None, settings);
    bookslot_api::app(Arc::new(ApiState { coordinator }))
}

/// Sends one request and returns the status and the decoded JSON body
/// (`Value::Null` when the body is not JSON).
pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub fn provider() -> Provider {
    Provider {
        id: PROVIDER,
        name: "Maria Ivanova".to_string(),
        email: "maria@example.com".to_string(),
        brand_id: Some(BRAND),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn customer() -> Customer {
    Customer {
        id: CUSTOMER,
        name: "Georgi Petrov".to_string(),
        email: None,
        phone_number: Some("+359888000111".to_string()),
        brand_id: BRAND,
        is_guest: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn service(id: Uuid) -> Service {
    Service {
        id,
        title: "Haircut".to_string(),
        description: None,
        duration: 30,
        buffer_time: Some(15),
        cost: "25.00".to_string(),
        is_visible: true,
        brand_id: BRAND,
        provider_ids: vec![PROVIDER],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn tuesday_hours() -> WorkingHours {
    WorkingHours {
        brand_id: BRAND,
        day_of_week: 2,
        open_time: NaiveTime::from_hms_opt(9, 0, 0),
        close_time: NaiveTime::from_hms_opt(17, 0, 0),
        is_closed: false,
    }
}

/// What the store would hand back after writing `row` under `id`.
pub fn stored(id: i64, row: &NewBooking) -> Booking {
    Booking {
        id,
        brand_id: row.brand_id,
        provider_id: row.provider_id,
        customer_id: row.customer_id,
        service_id: row.service_id,
        start_time: row.start_time,
        end_time: row.end_time,
        status: BookingStatus::Confirmed,
        provider_name: row.provider_name.clone(),
        customer_name: row.customer_name.clone(),
        service_name: row.service_name.clone(),
        cost: row.cost.clone(),
        buffer_time: row.buffer_time,
        comment: row.comment.clone(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Store mock that resolves the standard provider, customer and service.
pub fn resolving_store(service_id: Uuid) -> MockStore {
    let mut store = MockStore::new();
    store
        .expect_get_user_by_id()
        .returning(|id| Ok((id == PROVIDER).then(provider)));
    store
        .expect_get_customer_by_id()
        .returning(|id| Ok((id == CUSTOMER).then(customer)));
    store
        .expect_get_service()
        .returning(move |id| Ok((id == service_id).then(|| service(id))));
    store
}
