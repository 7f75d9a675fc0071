use serde::{Deserialize, Serialize};

use crate::features::{FEATURE_COUNT, FeatureVector};
use crate::modelsource::ModelSource;
use crate::GestureError;

/// Per-feature standardization fitted alongside a trained model:
/// `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl FeatureScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, GestureError> {
        for len in [mean.len(), scale.len()] {
            if len != FEATURE_COUNT {
                return Err(GestureError::FeatureLength {
                    expected: FEATURE_COUNT,
                    got: len,
                });
            }
        }
        Ok(Self { mean, scale })
    }

    /// Scaler that leaves features unchanged.
    pub fn identity() -> Self {
        Self {
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
        }
    }

    /// Load a JSON artifact of the form `{"mean": [...], "scale": [...]}`.
    pub fn from_source(source: ModelSource) -> Result<Self, GestureError> {
        let bytes = source.load()?;
        let raw: FeatureScaler = serde_json::from_slice(&bytes)
            .map_err(|e| GestureError::ModelLoad(format!("invalid scaler artifact: {e}")))?;
        Self::new(raw.mean, raw.scale)
    }

    pub fn transform(&self, features: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_COUNT];
        for (i, slot) in out.iter_mut().enumerate() {
            // zero-variance features were constant in training
            let scale = if self.scale[i] == 0.0 { 1.0 } else { self.scale[i] };
            *slot = (features[i] - self.mean[i]) / scale;
        }
        out
    }
}
