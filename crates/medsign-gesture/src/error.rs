use std::fmt;

#[derive(Debug)]
pub enum GestureError {
    /// The landmark detector could not process the frame.
    Detector(String),
    /// The trained classifier failed while predicting.
    Model(String),
    /// A model or scaler artifact could not be read or parsed.
    ModelLoad(String),
    FeatureLength { expected: usize, got: usize },
    /// A hand-built gesture table is incomplete or out of range.
    Catalog(String),
    InvalidImage(String),
    Io(String),
    Json(String),
}

impl fmt::Display for GestureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestureError::Detector(msg) => write!(f, "detector error: {msg}"),
            GestureError::Model(msg) => write!(f, "model error: {msg}"),
            GestureError::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            GestureError::FeatureLength { expected, got } => {
                write!(f, "feature length mismatch: expected {expected}, got {got}")
            }
            GestureError::Catalog(msg) => write!(f, "catalog error: {msg}"),
            GestureError::InvalidImage(msg) => write!(f, "invalid image: {msg}"),
            GestureError::Io(msg) => write!(f, "io error: {msg}"),
            GestureError::Json(msg) => write!(f, "json error: {msg}"),
        }
    }
}

impl std::error::Error for GestureError {}

impl GestureError {
    /// True for failures of an external collaborator (detector or model), as
    /// opposed to bad artifacts or bad input data.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, GestureError::Detector(_) | GestureError::Model(_))
    }
}

impl From<std::io::Error> for GestureError {
    fn from(err: std::io::Error) -> Self {
        GestureError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for GestureError {
    fn from(err: serde_json::Error) -> Self {
        GestureError::Json(err.to_string())
    }
}

impl From<medsign_base::TensorError> for GestureError {
    fn from(err: medsign_base::TensorError) -> Self {
        GestureError::InvalidImage(err.to_string())
    }
}
