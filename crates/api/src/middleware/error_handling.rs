//! # Error Handling Middleware
//!
//! Maps [`BookingError`] to HTTP status codes and a JSON body of the form
//! `{"error": message}`, so every handler fails the same way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookslot_core::errors::BookingError;
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use bookslot_api::middleware::error_handling::AppError;
/// use bookslot_core::errors::{BookingError, EntityKind};
///
/// async fn handler(found: bool) -> Result<Json<u32>, AppError> {
///     if !found {
///         return Err(AppError(BookingError::NotFound(EntityKind::Booking)));
///     }
///     Ok(Json(1))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::TimeslotConflict => StatusCode::CONFLICT,
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let BookingError::Database(report) = &self.0 {
            error!(error = ?report, "request failed on infrastructure error");
        }

        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Allows `?` on `BookingResult` inside handlers.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}
