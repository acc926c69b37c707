use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use bookslot_core::models::working_hours::{UpdateWorkingHoursRequest, WorkingHoursResponse};

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn update_working_hours(
    State(state): State<Arc<ApiState>>,
    Path(brand_id): Path<i32>,
    Json(payload): Json<UpdateWorkingHoursRequest>,
) -> Result<Json<WorkingHoursResponse>, AppError> {
    let working_hours = state
        .coordinator
        .set_working_hours(brand_id, &payload.working_hours)
        .await?;

    Ok(Json(WorkingHoursResponse {
        brand_id,
        working_hours,
    }))
}
