//! Prediction handler

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::engine;
use crate::models::{PredictionRequest, PredictionResponse};
use crate::{AppError, AppResult, AppState};

/// A payload missing any required field is rejected here, before the
/// engine runs; pipeline failures surface as server errors with the
/// underlying message.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let response = engine::predict(state.artifacts.as_deref(), &request)
        .map_err(|e| AppError::PredictionFailed(e.to_string()))?;

    Ok(Json(response))
}
