//! Feature scaler artifact

use std::path::Path;

use serde::Deserialize;

/// Standard-score parameters exported by the training pipeline as
/// `{"mean": [...], "scale": [...]}`, one entry per feature.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureScaler {
    mean: Vec<f32>,
    scale: Vec<f32>,
}

impl FeatureScaler {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let scaler: Self = serde_json::from_str(&raw)?;
        anyhow::ensure!(
            scaler.mean.len() == scaler.scale.len(),
            "scaler mean/scale length mismatch"
        );
        Ok(scaler)
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    /// Transform a raw feature row with the training-time parameters.
    pub fn transform(&self, features: &[f32]) -> Vec<f32> {
        features
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let mean = self.mean.get(i).copied().unwrap_or(0.0);
                let scale = self.scale.get(i).copied().unwrap_or(1.0).max(1e-8);
                (value - mean) / scale
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_standard_score() {
        let scaler = FeatureScaler {
            mean: vec![10.0, 0.0],
            scale: vec![2.0, 4.0],
        };

        let scaled = scaler.transform(&[14.0, -8.0]);
        assert_eq!(scaled, vec![2.0, -2.0]);
    }

    #[test]
    fn test_zero_scale_does_not_blow_up() {
        let scaler = FeatureScaler {
            mean: vec![1.0],
            scale: vec![0.0],
        };

        let scaled = scaler.transform(&[3.0]);
        assert!(scaled[0].is_finite());
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaler.json");
        std::fs::write(&path, r#"{"mean": [1.0, 2.0], "scale": [1.0]}"#).unwrap();

        assert!(FeatureScaler::load(&path).is_err());
    }
}
