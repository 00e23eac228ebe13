//! Advisory request/response payloads

use serde::{Deserialize, Serialize};

/// Context for a generated advisory. Every field is optional on the wire;
/// absent values fall back to the same placeholders the dashboard shows.
#[derive(Debug, Clone, Deserialize)]
pub struct AdvisoryRequest {
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub summary_text: String,
    #[serde(default)]
    pub attack_type: Option<String>,
}

fn default_country() -> String {
    "Unknown Country".to_string()
}

#[derive(Debug, Serialize)]
pub struct AdvisoryResponse {
    pub advisory: String,
    /// "primary" when the remote service answered, "fallback" otherwise
    pub source: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_gets_defaults() {
        let request: AdvisoryRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(request.country, "Unknown Country");
        assert!(request.year.is_none());
        assert!(request.summary_text.is_empty());
        assert!(request.attack_type.is_none());
    }
}
