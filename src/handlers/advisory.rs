//! Advisory handler

use axum::extract::State;
use axum::Json;

use crate::models::{AdvisoryRequest, AdvisoryResponse};
use crate::AppState;

/// Always answers 200; remote failures resolve to the fallback advisory
/// inside the service.
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<AdvisoryRequest>,
) -> Json<AdvisoryResponse> {
    Json(state.advisory.advise(&request).await)
}
