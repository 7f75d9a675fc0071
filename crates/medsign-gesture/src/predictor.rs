//! Interchangeable per-frame gesture predictors.
//!
//! The stabilizer only sees `Prediction`s, so it does not care whether the
//! geometric rules or a trained model produced them.

use std::collections::HashMap;

use crate::catalog::GestureKind;
use crate::confidence::ConfidenceScorer;
use crate::features::{FeatureVector, extract_features};
use crate::landmark::{HAND_LANDMARK_COUNT, Landmark};
use crate::rules;
use crate::scaler::FeatureScaler;
use crate::GestureError;

/// One frame's candidate gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub gesture: GestureKind,
    /// In [0, 1].
    pub confidence: f64,
}

pub trait GesturePredictor: Send {
    fn name(&self) -> &str;

    /// Predict a gesture for one landmark set.
    ///
    /// `Ok(None)` means nothing recognizable; `Err` means the predictor could
    /// not run at all.
    fn predict(&mut self, landmarks: &[Landmark]) -> Result<Option<Prediction>, GestureError>;
}

/// Finger-state rules scored by the geometric confidence scorer.
#[derive(Debug, Clone, Default)]
pub struct RulePredictor {
    scorer: ConfidenceScorer,
}

impl RulePredictor {
    pub fn new(scorer: ConfidenceScorer) -> Self {
        Self { scorer }
    }
}

impl GesturePredictor for RulePredictor {
    fn name(&self) -> &str {
        "rules"
    }

    fn predict(&mut self, landmarks: &[Landmark]) -> Result<Option<Prediction>, GestureError> {
        Ok(rules::classify(landmarks).map(|gesture| Prediction {
            gesture,
            confidence: self.scorer.score(landmarks),
        }))
    }
}

/// Raw output of a trained classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    pub gesture: GestureKind,
    /// One probability per gesture, in `GestureKind::ALL` order.
    pub probabilities: Vec<f64>,
}

/// A trained statistical classifier over scaled feature vectors.
pub trait GestureModel: Send {
    fn predict(&mut self, features: &FeatureVector) -> Result<ModelOutput, GestureError>;
}

/// Default minimum class probability for a model prediction to count.
pub const DEFAULT_MIN_PROBABILITY: f64 = 0.7;

/// Features, then scaler, then trained model. The confidence is the top class probability.
pub struct ModelPredictor {
    model: Box<dyn GestureModel>,
    scaler: FeatureScaler,
    min_probability: f64,
}

impl ModelPredictor {
    pub fn new(model: Box<dyn GestureModel>, scaler: FeatureScaler) -> Self {
        Self {
            model,
            scaler,
            min_probability: DEFAULT_MIN_PROBABILITY,
        }
    }

    /// Set the minimum top-class probability (builder pattern)
    pub fn with_min_probability(mut self, min_probability: f64) -> Self {
        self.min_probability = min_probability;
        self
    }

    pub fn min_probability(&self) -> f64 {
        self.min_probability
    }
}

impl GesturePredictor for ModelPredictor {
    fn name(&self) -> &str {
        "model"
    }

    fn predict(&mut self, landmarks: &[Landmark]) -> Result<Option<Prediction>, GestureError> {
        if landmarks.len() != HAND_LANDMARK_COUNT {
            return Ok(None);
        }

        let features = self.scaler.transform(&extract_features(landmarks));
        let output = self.model.predict(&features)?;

        if output.probabilities.len() != GestureKind::ALL.len() {
            return Err(GestureError::Model(format!(
                "expected {} class probabilities, got {}",
                GestureKind::ALL.len(),
                output.probabilities.len()
            )));
        }

        let confidence = output
            .probabilities
            .iter()
            .copied()
            .fold(0.0_f64, f64::max)
            .clamp(0.0, 1.0);

        if confidence < self.min_probability {
            log::debug!(
                "model prediction {} below minimum probability ({confidence:.3} < {:.3})",
                output.gesture,
                self.min_probability
            );
            return Ok(None);
        }

        Ok(Some(Prediction {
            gesture: output.gesture,
            confidence,
        }))
    }
}

/// Named predictors. The rule predictor is always present.
pub struct PredictorRegistry {
    predictors: HashMap<String, Box<dyn GesturePredictor>>,
}

impl PredictorRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            predictors: HashMap::new(),
        };
        registry.register(Box::new(RulePredictor::default()));
        registry
    }

    /// Register a predictor under its own name, replacing any previous one.
    pub fn register(&mut self, predictor: Box<dyn GesturePredictor>) {
        let name = predictor.name().to_string();
        self.predictors.insert(name, predictor);
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn GesturePredictor + 'static)> {
        self.predictors.get_mut(name).map(|p| &mut **p)
    }

    /// Take a predictor out of the registry.
    pub fn take(&mut self, name: &str) -> Option<Box<dyn GesturePredictor>> {
        self.predictors.remove(name)
    }

    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.predictors.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for PredictorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
