//! Prediction request/response payloads

use serde::{Deserialize, Serialize};

/// Hypothetical-incident request. Field names match the training-time
/// schema; all eight fields are required, so a payload missing any of them
/// is rejected during deserialization, before the engine runs.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionRequest {
    pub iyear: i32,
    pub imonth: i32,
    pub iday: i32,
    pub country: i32,
    pub region: i32,
    pub attacktype1_txt: String,
    pub targtype1_txt: String,
    pub weaptype1_txt: String,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub predicted_fatalities: f64,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PredictionResponse {
    pub fn success(value: f64) -> Self {
        Self {
            predicted_fatalities: value,
            status: "success",
            message: None,
        }
    }

    /// Degraded response when no artifact bundle is loaded. Always a 200.
    pub fn model_not_loaded() -> Self {
        Self {
            predicted_fatalities: 0.0,
            status: "warning",
            message: Some("Model not loaded.".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_payload_deserializes() {
        let payload = serde_json::json!({
            "iyear": 2017,
            "imonth": 1,
            "iday": 1,
            "country": 4,
            "region": 6,
            "attacktype1_txt": "Bombing/Explosion",
            "targtype1_txt": "Military",
            "weaptype1_txt": "Explosives"
        });

        let request: PredictionRequest = serde_json::from_value(payload).unwrap();
        assert_eq!(request.iyear, 2017);
        assert_eq!(request.country, 4);
        assert_eq!(request.weaptype1_txt, "Explosives");
    }

    #[test]
    fn test_missing_fields_rejected() {
        // Only iyear present; the other seven required fields are missing.
        let payload = serde_json::json!({ "iyear": 2017 });

        let result = serde_json::from_value::<PredictionRequest>(payload);
        assert!(result.is_err());
    }
}
