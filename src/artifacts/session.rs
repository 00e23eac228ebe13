//! ONNX model session

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ModelError(String);

/// Loaded regression model. `ort` runs take `&mut Session`, so the session
/// sits behind a mutex and predictions execute one at a time.
pub struct ModelSession {
    session: Mutex<Session>,
}

impl ModelSession {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        // ort's builder errors carry the builder for recovery (`Error<R>`),
        // which is not Send + Sync, so they can't flow through `?` into
        // anyhow directly; convert via their Display message.
        let session = Session::builder()
            .map_err(|e| anyhow::anyhow!("{e}"))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| anyhow::anyhow!("{e}"))?
            .commit_from_file(path)
            .map_err(|e| anyhow::anyhow!("{e}"))?;

        Ok(Self {
            session: Mutex::new(session),
        })
    }

    /// Run the model on one scaled feature row and return its single
    /// output value.
    pub fn predict(&self, features: &[f32]) -> Result<f32, ModelError> {
        let input_array = Array2::<f32>::from_shape_vec((1, features.len()), features.to_vec())
            .map_err(|e| ModelError(format!("failed to create input array: {e}")))?;

        let mut session = self.session.lock();

        // Get output name before run to avoid a borrow conflict
        let output_name = session
            .outputs()
            .first()
            .map(|o| o.name().to_string())
            .ok_or_else(|| ModelError("model defines no output".to_string()))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| ModelError(format!("failed to create tensor: {e}")))?;

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| ModelError(format!("inference failed: {e}")))?;

        let output = outputs
            .get(&output_name)
            .ok_or_else(|| ModelError("no output from model".to_string()))?;

        let output_tensor = output
            .try_extract_tensor::<f32>()
            .map_err(|e| ModelError(format!("failed to extract output: {e}")))?;

        let data = output_tensor.1;
        data.first()
            .copied()
            .ok_or_else(|| ModelError("model returned an empty output".to_string()))
    }
}
