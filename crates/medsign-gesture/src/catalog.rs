//! The medical gesture table: one immutable definition per gesture, shared by
//! the stabilizer (confidence thresholds) and the priority mapper.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::GestureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    Emergency,
    Help,
    Pain,
    Medicine,
    Water,
    Yes,
    No,
}

impl GestureKind {
    pub const ALL: [GestureKind; 7] = [
        GestureKind::Emergency,
        GestureKind::Help,
        GestureKind::Pain,
        GestureKind::Medicine,
        GestureKind::Water,
        GestureKind::Yes,
        GestureKind::No,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GestureKind::Emergency => "emergency",
            GestureKind::Help => "help",
            GestureKind::Pain => "pain",
            GestureKind::Medicine => "medicine",
            GestureKind::Water => "water",
            GestureKind::Yes => "yes",
            GestureKind::No => "no",
        }
    }

    /// Position in `ALL`, which is also the class order of model probability vectors.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GestureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GestureKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown gesture label: {s}"))
    }
}

/// Medical priority tier, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GestureDefinition {
    pub priority: Priority,
    /// 0 (informational) to 10 (life-threatening).
    pub urgency_score: u8,
    pub description: String,
    /// Minimum average confidence in the voting window for the gesture to become stable.
    pub confidence_threshold: f64,
}

impl GestureDefinition {
    pub fn new(priority: Priority, urgency_score: u8, description: &str, threshold: f64) -> Self {
        Self {
            priority,
            urgency_score,
            description: description.to_string(),
            confidence_threshold: threshold,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GestureCatalog {
    definitions: HashMap<GestureKind, GestureDefinition>,
}

impl GestureCatalog {
    /// Build a catalog from explicit entries. Every `GestureKind` must be
    /// present and every value in range.
    pub fn new(
        entries: impl IntoIterator<Item = (GestureKind, GestureDefinition)>,
    ) -> Result<Self, GestureError> {
        let definitions: HashMap<_, _> = entries.into_iter().collect();

        for kind in GestureKind::ALL {
            let def = definitions
                .get(&kind)
                .ok_or_else(|| GestureError::Catalog(format!("missing definition for {kind}")))?;
            if def.urgency_score > 10 {
                return Err(GestureError::Catalog(format!(
                    "urgency score {} for {kind} exceeds 10",
                    def.urgency_score
                )));
            }
            if !(0.0..=1.0).contains(&def.confidence_threshold) {
                return Err(GestureError::Catalog(format!(
                    "confidence threshold {} for {kind} outside [0, 1]",
                    def.confidence_threshold
                )));
            }
        }

        Ok(Self { definitions })
    }

    /// The built-in medical gesture table.
    pub fn medical() -> Self {
        use GestureKind::*;
        use Priority::*;

        let definitions = HashMap::from([
            (Emergency, GestureDefinition::new(Critical, 10, "Closed fist held steady", 0.8)),
            (Help, GestureDefinition::new(Critical, 9, "Open hand, all fingers extended", 0.75)),
            (Pain, GestureDefinition::new(High, 7, "Two fingers pointing (index + middle)", 0.7)),
            (Medicine, GestureDefinition::new(High, 5, "Thumb and pinky extended", 0.7)),
            (Water, GestureDefinition::new(Medium, 4, "Three fingers (thumb + index + middle)", 0.65)),
            (Yes, GestureDefinition::new(Low, 2, "Thumbs up", 0.6)),
            (No, GestureDefinition::new(Low, 2, "Point downward", 0.6)),
        ]);

        Self { definitions }
    }

    /// Definition for `kind`.
    ///
    /// # Panics
    /// If the table has no entry for `kind`. Every label the classifiers can
    /// emit must be in the table.
    pub fn definition(&self, kind: GestureKind) -> &GestureDefinition {
        match self.definitions.get(&kind) {
            Some(def) => def,
            None => panic!("gesture catalog has no entry for '{kind}'"),
        }
    }

    pub fn priority(&self, kind: GestureKind) -> Priority {
        self.definition(kind).priority
    }

    pub fn urgency_score(&self, kind: GestureKind) -> u8 {
        self.definition(kind).urgency_score
    }

    pub fn threshold(&self, kind: GestureKind) -> f64 {
        self.definition(kind).confidence_threshold
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for GestureCatalog {
    fn default() -> Self {
        Self::medical()
    }
}
