use axum::{
    routing::{post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/customers/guest",
            post(handlers::customer::create_guest_customer),
        )
        .route("/api/customers/:id", put(handlers::customer::update_customer))
}
