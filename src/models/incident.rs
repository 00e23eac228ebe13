//! Incident model and read-endpoint payloads

use serde::{Deserialize, Serialize};

/// One historical event, narrowed from the source file's wide schema.
/// Immutable once loaded; the whole set is shared read-only state.
#[derive(Debug, Clone)]
pub struct IncidentRecord {
    pub year: i32,
    pub country_id: i32,
    pub country_name: String,
    pub region_id: i32,
    pub region_name: String,
    /// 0.0 means the coordinate is unknown
    pub latitude: f32,
    pub longitude: f32,
    pub attack_type: String,
    pub killed: f32,
    pub city: String,
    pub summary: String,
}

/// Per-country summary derived once at load time. Field names are the wire
/// contract of `/globe_data`.
#[derive(Debug, Clone, Serialize)]
pub struct CountryAggregate {
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub fatalities: f64,
    pub incidents: u64,
    pub country_id: i32,
}

/// `/similar` row projection. Wire names follow the training-time schema
/// the dashboard is keyed on.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarIncident {
    pub iyear: i32,
    pub latitude: f32,
    pub longitude: f32,
    pub city: String,
    pub country: i32,
    pub country_txt: String,
    pub nkill: f32,
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub country_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    pub region: i32,
    pub attack_type: String,
}

#[derive(Debug, Default, Serialize)]
pub struct MetadataResponse {
    pub countries: serde_json::Map<String, serde_json::Value>,
    pub regions: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Default, Serialize)]
pub struct HistoryResponse {
    pub years: Vec<i32>,
    pub counts: Vec<u32>,
    pub total_incidents: u64,
}

#[derive(Debug, Default, Serialize)]
pub struct SimilarResponse {
    pub incidents: Vec<SimilarIncident>,
}

#[derive(Debug, Default, Serialize)]
pub struct GlobeResponse {
    pub stats: Vec<CountryAggregate>,
}
