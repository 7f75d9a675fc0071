//! Fixed-length feature vectors for statistical gesture models.

use crate::landmark::{Finger, HAND_LANDMARK_COUNT, HandLandmark, Landmark};

/// Length of every feature vector: 21 landmarks x 3 coordinates + 4 derived values.
pub const FEATURE_COUNT: usize = 67;

pub type FeatureVector = [f64; FEATURE_COUNT];

/// Extract the model feature vector from a landmark set.
///
/// Layout:
/// - `0..63`: `x, y, z` of each landmark in index order
/// - `63`: hand openness, the mean fingertip-to-wrist distance
/// - `64`: hand stability, `1 - stddev` of those distances
/// - `65`: landmark count / 21
/// - `66`: reserved, always 0
///
/// Inputs with other than 21 landmarks still produce 67 values: the derived
/// slots are zero when fewer than 21 landmarks exist, and the whole sequence
/// is zero-padded or truncated to length.
pub fn extract_features(landmarks: &[Landmark]) -> FeatureVector {
    let mut values = Vec::with_capacity(landmarks.len() * 3 + 4);
    for lm in landmarks {
        values.extend_from_slice(&lm.position.to_array());
    }

    if landmarks.len() >= HAND_LANDMARK_COUNT {
        let wrist = landmarks[usize::from(HandLandmark::Wrist)].position;
        let distances: Vec<f64> = Finger::ALL
            .iter()
            .map(|finger| landmarks[finger.tip()].position.distance(wrist))
            .collect();
        let (mean, std) = mean_and_std(&distances);
        values.push(mean);
        values.push(1.0 - std);
    } else {
        values.extend([0.0, 0.0]);
    }

    values.push(landmarks.len() as f64 / HAND_LANDMARK_COUNT as f64);
    values.push(0.0);

    let mut features = [0.0; FEATURE_COUNT];
    for (slot, value) in features.iter_mut().zip(values) {
        *slot = value;
    }
    features
}

fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}
