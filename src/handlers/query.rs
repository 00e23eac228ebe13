//! Read endpoints over the Historical Dataset Index
//!
//! Every handler degrades to an empty payload with HTTP 200 when the index
//! is absent; a missing dataset is never an error to the caller.

use axum::extract::{Query, State};
use axum::Json;

use crate::models::{
    GlobeResponse, HistoryQuery, HistoryResponse, MetadataResponse, SimilarQuery, SimilarResponse,
};
use crate::AppState;

/// Country and region id-to-name mappings
pub async fn metadata(State(state): State<AppState>) -> Json<MetadataResponse> {
    Json(
        state
            .dataset
            .as_ref()
            .map(|index| index.metadata())
            .unwrap_or_default(),
    )
}

/// Aggregated country data for the 3D visualization
pub async fn globe_data(State(state): State<AppState>) -> Json<GlobeResponse> {
    Json(
        state
            .dataset
            .as_ref()
            .map(|index| index.globe())
            .unwrap_or_default(),
    )
}

/// Yearly incident counts for a country
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    Json(
        state
            .dataset
            .as_ref()
            .map(|index| index.history(query.country_id))
            .unwrap_or_default(),
    )
}

/// Top incidents matching region and attack type, for mapping
pub async fn similar(
    State(state): State<AppState>,
    Query(query): Query<SimilarQuery>,
) -> Json<SimilarResponse> {
    Json(
        state
            .dataset
            .as_ref()
            .map(|index| index.similar(query.region, &query.attack_type))
            .unwrap_or_default(),
    )
}
