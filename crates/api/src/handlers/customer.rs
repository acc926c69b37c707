use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use bookslot_core::models::profile::{
    CreateGuestCustomerRequest, Customer, GuestCustomerResponse, UpdateCustomerRequest,
};

use crate::{middleware::error_handling::AppError, ApiState};

/// Returns the brand's guest with this name and phone, creating it if needed.
/// Responds 201 for a new guest and 200 for an existing one.
#[axum::debug_handler]
pub async fn create_guest_customer(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateGuestCustomerRequest>,
) -> Result<(StatusCode, Json<GuestCustomerResponse>), AppError> {
    let response = state.coordinator.create_guest_customer(&payload).await?;
    let status = if response.existed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((status, Json(response)))
}

#[axum::debug_handler]
pub async fn update_customer(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> Result<Json<Customer>, AppError> {
    let customer = state
        .coordinator
        .update_customer_profile(id, &payload)
        .await?;

    Ok(Json(customer))
}
