//! Configuration module

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Directory holding the model, scaler and encoder artifacts
    pub models_dir: String,

    /// Path to the historical incident dataset (CSV)
    pub data_path: String,

    /// Credential for the generative advisory service; absent means the
    /// advisory endpoint runs in fallback mode
    pub gemini_api_key: Option<String>,

    /// Generative model identifier
    pub genai_model: String,

    /// Timeout for the generative call, in seconds
    pub genai_timeout_seconds: u64,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            models_dir: env::var("MODELS_DIR")
                .unwrap_or_else(|_| "models".to_string()),

            data_path: env::var("DATA_PATH")
                .unwrap_or_else(|_| "gt.csv".to_string()),

            gemini_api_key: env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),

            genai_model: env::var("GENAI_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash-lite".to_string()),

            genai_timeout_seconds: env::var("GENAI_TIMEOUT_SECONDS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(30),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }
}
