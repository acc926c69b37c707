use axum::{routing::put, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/brands/:brand_id/working-hours",
        put(handlers::brand::update_working_hours),
    )
}
