pub mod catalog;
pub mod confidence;
pub mod error;
pub mod features;
pub mod landmark;
pub mod modelsource;
pub mod pipeline;
pub mod predictor;
pub mod quality;
pub mod result;
pub mod rules;
pub mod scaler;
pub mod smoothing;
pub mod stabilizer;

pub use catalog::{GestureCatalog, GestureDefinition, GestureKind, Priority};
pub use confidence::{ConfidenceScorer, ScoringWeights};
pub use error::GestureError;
pub use features::{extract_features, FeatureVector, FEATURE_COUNT};
pub use landmark::{Finger, HandFrame, HandLandmark, Landmark, HAND_LANDMARK_COUNT};
pub use modelsource::ModelSource;
pub use pipeline::{GesturePipeline, PipelineConfig, PipelineStats};
pub use predictor::{
    GestureModel, GesturePredictor, ModelOutput, ModelPredictor, Prediction, PredictorRegistry,
    RulePredictor, DEFAULT_MIN_PROBABILITY,
};
pub use quality::{FrameQuality, DEFAULT_QUALITY_FLOOR};
pub use result::MedicalGestureResult;
pub use rules::{classify, finger_states, FingerStates};
pub use scaler::FeatureScaler;
pub use smoothing::{LandmarkSmoother, SmootherConfig};
pub use stabilizer::{
    GestureObservation, GestureStabilizer, StabilizerConfig, StabilizerState, StableGesture,
};
