//! Advisory Generator
//!
//! Non-essential enrichment with an explicit graceful-degradation boundary:
//! when a credential is configured, one remote text-generation attempt is
//! made; a missing credential or any remote failure resolves to a
//! deterministic templated advisory. This path never returns an error.

mod gemini;

pub use gemini::GeminiClient;

use std::future::Future;

use crate::config::Config;
use crate::models::{AdvisoryRequest, AdvisoryResponse};

#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    #[error("network error: {0}")]
    Network(String),
    #[error("remote service returned status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Parse(String),
}

/// Capability interface over a remote text-generation service, so the
/// fallback composition is independent of which provider is wired in.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, AdvisoryError>> + Send;
}

#[derive(Clone)]
pub struct AdvisoryService {
    generator: Option<GeminiClient>,
}

impl AdvisoryService {
    pub fn from_config(config: &Config) -> Self {
        let generator = config.gemini_api_key.as_ref().map(|key| {
            GeminiClient::new(
                key.clone(),
                config.genai_model.clone(),
                config.genai_timeout_seconds,
            )
        });

        if generator.is_none() {
            tracing::warn!("no generative API credential configured; advisories run in fallback mode");
        }

        Self { generator }
    }

    pub async fn advise(&self, request: &AdvisoryRequest) -> AdvisoryResponse {
        advise_with(self.generator.as_ref(), request).await
    }
}

/// One remote attempt when a generator is wired in, the deterministic
/// template otherwise or on any failure.
async fn advise_with<G: TextGenerator>(
    generator: Option<&G>,
    request: &AdvisoryRequest,
) -> AdvisoryResponse {
    if let Some(generator) = generator {
        match generator.generate(&build_prompt(request)).await {
            Ok(text) => {
                return AdvisoryResponse {
                    advisory: text,
                    source: "primary",
                }
            }
            Err(e) => tracing::warn!("advisory generation failed, using fallback: {e}"),
        }
    }

    AdvisoryResponse {
        advisory: fallback_advisory(request),
        source: "fallback",
    }
}

fn year_label(request: &AdvisoryRequest) -> String {
    request
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "Unknown Year".to_string())
}

fn build_prompt(request: &AdvisoryRequest) -> String {
    format!(
        "You are a global security analyst. Based on the following recent incident data in {} (circa {}), \
provide a concise 3-bullet point travel safety advisory for civilians.\n\n\
Incident Context: \"{}\"\n\n\
Format:\n\
- Threat Level: [Low/Medium/High]\n\
- Key Risk: [One sentence]\n\
- Advice: [One sentence]",
        request.country,
        year_label(request),
        request.summary_text
    )
}

fn fallback_advisory(request: &AdvisoryRequest) -> String {
    let risk = request.attack_type.as_deref().unwrap_or("violent");
    format!(
        "Simulated Security Advisory for {} (circa {})\n\n\
- Threat Level: High (Simulated)\n\
- Key Risk: Potential for {} incidents in public areas.\n\
- Advice: Avoid large gatherings and monitor local news outlets.",
        request.country,
        year_label(request),
        risk
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticGenerator(String);

    impl TextGenerator for StaticGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, AdvisoryError> {
            Ok(self.0.clone())
        }
    }

    struct FailingGenerator;

    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, AdvisoryError> {
            Err(AdvisoryError::Status(503))
        }
    }

    fn request() -> AdvisoryRequest {
        AdvisoryRequest {
            country: "Afghanistan".to_string(),
            year: Some(2021),
            summary_text: "Roadside device near a checkpoint".to_string(),
            attack_type: Some("Bombing/Explosion".to_string()),
        }
    }

    #[tokio::test]
    async fn test_no_generator_uses_fallback() {
        let response = advise_with(None::<&StaticGenerator>, &request()).await;
        assert_eq!(response.source, "fallback");
        assert!(!response.advisory.is_empty());
        assert!(response.advisory.contains("Afghanistan"));
        assert!(response.advisory.contains("Bombing/Explosion"));
    }

    #[tokio::test]
    async fn test_generator_success_is_primary() {
        let generator = StaticGenerator("- Threat Level: Low".to_string());
        let response = advise_with(Some(&generator), &request()).await;
        assert_eq!(response.source, "primary");
        assert_eq!(response.advisory, "- Threat Level: Low");
    }

    #[tokio::test]
    async fn test_generator_failure_degrades_to_fallback() {
        let response = advise_with(Some(&FailingGenerator), &request()).await;
        assert_eq!(response.source, "fallback");
        assert!(response.advisory.contains("Afghanistan"));
    }

    #[test]
    fn test_prompt_embeds_context() {
        let prompt = build_prompt(&request());
        assert!(prompt.contains("Afghanistan"));
        assert!(prompt.contains("2021"));
        assert!(prompt.contains("Roadside device near a checkpoint"));
    }

    #[test]
    fn test_missing_year_labelled_unknown() {
        let mut req = request();
        req.year = None;
        req.attack_type = None;

        let advisory = fallback_advisory(&req);
        assert!(advisory.contains("Unknown Year"));
        assert!(advisory.contains("violent incidents"));
    }
}
