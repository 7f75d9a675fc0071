use serde::{Deserialize, Serialize};

use crate::catalog::{GestureCatalog, GestureKind, Priority};
use crate::landmark::HandFrame;
use crate::stabilizer::StableGesture;
use crate::GestureError;

/// A stabilized, prioritized gesture ready to hand to the API or display layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalGestureResult {
    pub gesture: GestureKind,
    pub confidence: f64,
    #[serde(rename = "medical_priority")]
    pub priority: Priority,
    pub urgency_score: u8,
    pub description: String,
    /// `[x, y, z]` of the frame that confirmed the gesture.
    pub landmarks: Vec<[f64; 3]>,
    pub timestamp: f64,
}

impl MedicalGestureResult {
    /// Attach priority, urgency and description from the catalog.
    ///
    /// # Panics
    /// If the catalog has no entry for the stable gesture.
    pub fn from_stable(
        catalog: &GestureCatalog,
        stable: &StableGesture,
        frame: &HandFrame,
        timestamp: f64,
    ) -> Self {
        let def = catalog.definition(stable.gesture);
        Self {
            gesture: stable.gesture,
            confidence: stable.confidence,
            priority: def.priority,
            urgency_score: def.urgency_score,
            description: def.description.clone(),
            landmarks: frame.to_points(),
            timestamp,
        }
    }

    pub fn to_json(&self) -> Result<String, GestureError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, GestureError> {
        Ok(serde_json::from_str(json)?)
    }
}
