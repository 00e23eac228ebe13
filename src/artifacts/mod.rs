//! Artifact Store
//!
//! Holds the pre-trained regression model, the per-column categorical
//! encoders and the feature scaler as one all-or-nothing bundle. The bundle
//! is loaded once at startup; when it is absent the prediction endpoint
//! degrades to a "Model not loaded" response while every read endpoint
//! keeps working.

pub mod encoders;
pub mod scaler;
pub mod session;

pub use encoders::Encoders;
pub use scaler::FeatureScaler;
pub use session::{ModelError, ModelSession};

use std::path::Path;

/// Number of model input features
pub const FEATURE_COUNT: usize = 8;

/// Categorical columns re-encoded through the training vocabularies
pub const ENCODED_COLUMNS: [&str; 3] = ["attacktype1_txt", "targtype1_txt", "weaptype1_txt"];

pub struct ArtifactBundle {
    pub model: ModelSession,
    pub scaler: FeatureScaler,
    pub encoders: Encoders,
}

impl ArtifactBundle {
    /// Load the model, scaler and encoders from `models_dir`. A missing
    /// model file means prediction is unavailable, not that startup failed;
    /// the same holds for any load error. No partial bundle is ever
    /// returned.
    pub fn load(models_dir: &Path) -> Option<Self> {
        let model_path = models_dir.join("model.onnx");
        if !model_path.exists() {
            tracing::warn!(
                "model artifact not found at {}; prediction disabled",
                model_path.display()
            );
            return None;
        }

        match Self::load_inner(models_dir, &model_path) {
            Ok(bundle) => {
                tracing::info!("model artifacts loaded from {}", models_dir.display());
                Some(bundle)
            }
            Err(e) => {
                tracing::error!("failed to load model artifacts: {e:#}");
                None
            }
        }
    }

    fn load_inner(models_dir: &Path, model_path: &Path) -> anyhow::Result<Self> {
        let model = ModelSession::open(model_path)?;
        let scaler = FeatureScaler::load(&models_dir.join("scaler.json"))?;
        let encoders = Encoders::load(&models_dir.join("encoders.json"))?;

        anyhow::ensure!(
            scaler.len() == FEATURE_COUNT,
            "scaler covers {} features, expected {}",
            scaler.len(),
            FEATURE_COUNT
        );
        for column in ENCODED_COLUMNS {
            anyhow::ensure!(
                encoders.contains_column(column),
                "encoder vocabulary missing for column {column}"
            );
        }

        Ok(Self { model, scaler, encoders })
    }
}
