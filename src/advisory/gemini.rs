//! Google Generative Language REST client

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{AdvisoryError, TextGenerator};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    http_client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GeminiClient {
    /// The timeout bounds the whole call; a slow remote degrades to the
    /// caller's fallback instead of hanging the request.
    pub fn new(api_key: String, model: String, timeout_seconds: u64) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key,
            model,
            http_client,
        }
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
        let url = format!("{}/models/{}:generateContent", API_BASE, self.model);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AdvisoryError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AdvisoryError::Status(response.status().as_u16()));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AdvisoryError::Parse(e.to_string()))?;

        let text = body
            .candidates
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(AdvisoryError::Parse("response carried no text".to_string()));
        }

        Ok(text)
    }
}
