use medsign_gesture::{FrameQuality, GestureError, Landmark};
use serde::Deserialize;

/// One line of a recorded session.
#[derive(Debug, Deserialize)]
pub struct ReplayRecord {
    pub stream: String,
    pub timestamp: f64,
    /// Empty when the detector found no hand.
    #[serde(default)]
    pub landmarks: Vec<[f64; 3]>,
    #[serde(default)]
    pub visibility: Option<Vec<f64>>,
    /// Overall frame quality in [0, 1], when the recorder measured it.
    #[serde(default)]
    pub quality: Option<f64>,
    /// Set when the detector failed on this frame.
    #[serde(default)]
    pub error: Option<String>,
}

impl ReplayRecord {
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    pub fn to_landmarks(&self) -> Vec<Landmark> {
        let visibility = self.visibility.as_deref().unwrap_or(&[]);
        self.landmarks
            .iter()
            .enumerate()
            .map(|(i, &point)| {
                let lm = Landmark::from(point);
                match visibility.get(i) {
                    Some(&v) => lm.with_visibility(v),
                    None => lm,
                }
            })
            .collect()
    }

    /// The detector outcome this record describes.
    pub fn detection(&self) -> Result<Vec<Vec<Landmark>>, GestureError> {
        if let Some(msg) = &self.error {
            return Err(GestureError::Detector(msg.clone()));
        }
        if self.landmarks.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![self.to_landmarks()])
    }

    pub fn frame_quality(&self) -> Option<FrameQuality> {
        self.quality.map(FrameQuality::from_overall)
    }

    /// Worker index for this record's stream. Streams never move between workers.
    pub fn worker(&self, workers: usize) -> usize {
        // FNV-1a, stable across runs
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in self.stream.bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        (hash % workers.max(1) as u64) as usize
    }
}
