use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use bookslot_core::models::booking::{Booking, BookingOrigin, BookingRangeQuery, BookingRequest};
use serde::Deserialize;

use crate::{middleware::error_handling::AppError, ApiState};

/// Brand context for single-booking lookups.
#[derive(Debug, Deserialize)]
pub struct BrandQuery {
    pub brand_id: i32,
}

/// Creates a booking on behalf of staff; past start times are allowed.
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = state
        .coordinator
        .create_booking(payload, BookingOrigin::Admin)
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// Creates a booking placed by the customer; the start must be in the future.
#[axum::debug_handler]
pub async fn create_customer_booking(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = state
        .coordinator
        .create_booking(payload, BookingOrigin::SelfService)
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

#[axum::debug_handler]
pub async fn update_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
    Json(payload): Json<BookingRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .coordinator
        .update_booking(id, payload, BookingOrigin::Admin)
        .await?;

    Ok(Json(booking))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
    Query(query): Query<BrandQuery>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.coordinator.get_booking(query.brand_id, id).await?;

    Ok(Json(booking))
}

#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<BookingRangeQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = state.coordinator.list_bookings(&query).await?;

    Ok(Json(bookings))
}
