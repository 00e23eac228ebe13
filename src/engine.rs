//! Prediction Service
//!
//! Turns a validated request into a fatality estimate: re-encode the
//! categorical fields through the training vocabularies, assemble the
//! feature row in training order, scale, run the model, then clamp and
//! round the output.

use crate::artifacts::{ArtifactBundle, Encoders, ModelError, ENCODED_COLUMNS, FEATURE_COUNT};
use crate::models::{PredictionRequest, PredictionResponse};

/// Run the prediction pipeline. An absent bundle is a degraded success;
/// any failure past that point surfaces to the caller as a request error,
/// since it indicates an artifact/schema mismatch rather than missing data.
pub fn predict(
    bundle: Option<&ArtifactBundle>,
    request: &PredictionRequest,
) -> Result<PredictionResponse, ModelError> {
    let Some(bundle) = bundle else {
        return Ok(PredictionResponse::model_not_loaded());
    };

    let features = feature_vector(&bundle.encoders, request);
    let scaled = bundle.scaler.transform(&features);
    let raw = bundle.model.predict(&scaled)?;

    Ok(PredictionResponse::success(shape_output(raw)))
}

/// Model input in training order:
/// `[iyear, imonth, iday, country, region, attack, target, weapon]`.
fn feature_vector(encoders: &Encoders, request: &PredictionRequest) -> [f32; FEATURE_COUNT] {
    let [attack_col, target_col, weapon_col] = ENCODED_COLUMNS;

    [
        request.iyear as f32,
        request.imonth as f32,
        request.iday as f32,
        request.country as f32,
        request.region as f32,
        encoders.code_or_default(attack_col, &request.attacktype1_txt) as f32,
        encoders.code_or_default(target_col, &request.targtype1_txt) as f32,
        encoders.code_or_default(weapon_col, &request.weaptype1_txt) as f32,
    ]
}

/// Fatalities cannot be negative; round to two decimals for the wire.
fn shape_output(raw: f32) -> f64 {
    (f64::from(raw).max(0.0) * 100.0).round() / 100.0
}
