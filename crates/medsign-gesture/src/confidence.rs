use crate::landmark::{Finger, Landmark};

/// Weights and limits of the confidence scorer.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoringWeights {
    /// Weight of the visible-landmark fraction.
    pub visibility: f64,
    /// Weight of depth consistency.
    pub stability: f64,
    /// Weight of plausible joint-segment lengths.
    pub anatomy: f64,
    /// A landmark counts as visible above this detector visibility.
    pub visibility_cutoff: f64,
    /// Stability is `1 - stddev(z) * depth_spread_scale`, floored at 0.
    pub depth_spread_scale: f64,
    /// Plausible 2D segment length range, inclusive.
    pub min_segment: f64,
    pub max_segment: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            visibility: 0.4,
            stability: 0.3,
            anatomy: 0.3,
            visibility_cutoff: 0.5,
            depth_spread_scale: 10.0,
            min_segment: 0.02,
            max_segment: 0.15,
        }
    }
}

/// Scores how trustworthy a single hand pose looks, in [0, 1].
///
/// Pure: the score depends only on the landmarks passed in. Frame quality
/// weighting is left to the caller.
#[derive(Clone, Debug, Default)]
pub struct ConfidenceScorer {
    weights: ScoringWeights,
}

impl ConfidenceScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Weighted sum of visibility, stability and anatomy, clamped to [0, 1].
    /// Empty input scores 0.
    pub fn score(&self, landmarks: &[Landmark]) -> f64 {
        if landmarks.is_empty() {
            return 0.0;
        }
        let w = &self.weights;
        let combined = self.visibility_score(landmarks) * w.visibility
            + self.stability_score(landmarks) * w.stability
            + self.anatomy_score(landmarks) * w.anatomy;
        combined.clamp(0.0, 1.0)
    }

    /// Fraction of landmarks above the visibility cutoff. Landmarks without
    /// visibility metadata count as visible.
    pub fn visibility_score(&self, landmarks: &[Landmark]) -> f64 {
        if landmarks.is_empty() {
            return 0.0;
        }
        let visible = landmarks
            .iter()
            .filter(|lm| lm.visibility.is_none_or(|v| v > self.weights.visibility_cutoff))
            .count();
        visible as f64 / landmarks.len() as f64
    }

    /// Depth consistency: `max(0, 1 - stddev(z) * scale)`.
    pub fn stability_score(&self, landmarks: &[Landmark]) -> f64 {
        if landmarks.is_empty() {
            return 0.0;
        }
        let n = landmarks.len() as f64;
        let mean = landmarks.iter().map(Landmark::z).sum::<f64>() / n;
        let var = landmarks.iter().map(|lm| (lm.z() - mean).powi(2)).sum::<f64>() / n;
        (1.0 - var.sqrt() * self.weights.depth_spread_scale).max(0.0)
    }

    /// Fraction of the 20 wrist-to-tip segments whose 2D length lies within
    /// `[min_segment, max_segment]`. Needs all 21 landmarks; otherwise 0.
    pub fn anatomy_score(&self, landmarks: &[Landmark]) -> f64 {
        if landmarks.len() < crate::landmark::HAND_LANDMARK_COUNT {
            return 0.0;
        }
        let range = self.weights.min_segment..=self.weights.max_segment;

        let mut plausible = 0usize;
        let mut checks = 0usize;
        for finger in Finger::ALL {
            for pair in finger.chain().windows(2) {
                let a = landmarks[pair[0]].position;
                let b = landmarks[pair[1]].position;
                if range.contains(&a.distance_xy(b)) {
                    plausible += 1;
                }
                checks += 1;
            }
        }
        plausible as f64 / checks as f64
    }
}
