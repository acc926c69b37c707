use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/bookings",
            post(handlers::booking::create_booking).get(handlers::booking::list_bookings),
        )
        .route(
            "/api/bookings/:id",
            get(handlers::booking::get_booking).put(handlers::booking::update_booking),
        )
        .route(
            "/api/customers/bookings",
            post(handlers::booking::create_customer_booking),
        )
}
