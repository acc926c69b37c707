use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use bookslot_core::models::booking::{TimeslotQuery, TimeslotsResponse};
use tracing::debug;

use crate::{middleware::error_handling::AppError, ApiState};

/// Lists bookable start times for one provider, service and day.
#[axum::debug_handler]
pub async fn get_timeslots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<TimeslotQuery>,
) -> Result<Json<TimeslotsResponse>, AppError> {
    let timeslots = state.coordinator.available_slots(&query).await?;
    debug!(
        brand_id = query.brand_id,
        provider_id = query.provider_id,
        date = %query.date,
        count = timeslots.len(),
        "generated timeslots"
    );

    Ok(Json(TimeslotsResponse { timeslots }))
}
