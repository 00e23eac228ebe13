//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

/// The only two failure kinds that reach a caller. Absent artifacts and an
/// absent dataset are degraded successes, not errors, and remote advisory
/// failures are absorbed by the fallback path.
#[derive(Debug)]
pub enum AppError {
    /// Malformed request shape, rejected before any business logic runs
    Validation(String),

    /// Failure inside the prediction pipeline despite artifacts being
    /// present; carries the underlying message
    PredictionFailed(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.as_str()),
            AppError::PredictionFailed(msg) => {
                tracing::error!("Prediction failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.as_str())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
