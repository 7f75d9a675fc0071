//! Temporal debouncing of per-frame gesture observations.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::catalog::{GestureCatalog, GestureKind};

/// One frame's classification, as fed to the stabilizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureObservation {
    pub gesture: GestureKind,
    pub confidence: f64,
    /// Seconds, on any monotonic clock shared by the stream.
    pub timestamp: f64,
}

impl GestureObservation {
    pub fn new(gesture: GestureKind, confidence: f64, timestamp: f64) -> Self {
        Self {
            gesture,
            confidence,
            timestamp,
        }
    }
}

/// Configuration for the temporal stabilizer.
#[derive(Clone, Debug)]
pub struct StabilizerConfig {
    age_window: f64,
    buffer_size: usize,
    agreement_ratio: f64,
    min_observations: usize,
    max_history: usize,
    confidence_history_len: usize,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            age_window: 3.0,
            buffer_size: 5,
            agreement_ratio: 0.6,
            min_observations: 3,
            max_history: 30,
            confidence_history_len: 10,
        }
    }
}

impl StabilizerConfig {
    /// Set how long (seconds) an observation stays eligible for voting.
    pub fn with_age_window(mut self, seconds: f64) -> Self {
        self.age_window = seconds;
        self
    }

    /// Set K, the number of most recent observations that vote.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Set the fraction of the voting window a gesture must exceed.
    pub fn with_agreement_ratio(mut self, ratio: f64) -> Self {
        self.agreement_ratio = ratio;
        self
    }

    /// Set the minimum voting-window size before anything can become stable.
    pub fn with_min_observations(mut self, count: usize) -> Self {
        self.min_observations = count;
        self
    }

    /// Set the count bound of the age-bounded observation log.
    pub fn with_max_history(mut self, count: usize) -> Self {
        self.max_history = count.max(1);
        self
    }

    /// Set how many confidences are kept per gesture for diagnostics.
    pub fn with_confidence_history_len(mut self, len: usize) -> Self {
        self.confidence_history_len = len;
        self
    }

    pub fn age_window(&self) -> f64 {
        self.age_window
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn agreement_ratio(&self) -> f64 {
        self.agreement_ratio
    }

    pub fn min_observations(&self) -> usize {
        self.min_observations
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    pub fn confidence_history_len(&self) -> usize {
        self.confidence_history_len
    }
}

/// A gesture that won the vote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StableGesture {
    pub gesture: GestureKind,
    /// Average confidence of the gesture inside the voting window.
    pub confidence: f64,
    /// Votes for the gesture.
    pub count: usize,
    /// Size of the voting window.
    pub window_len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilizerState {
    Empty,
    Accumulating,
    Stable(GestureKind),
}

struct Tally {
    gesture: GestureKind,
    count: usize,
    total_confidence: f64,
    first_seen: f64,
}

impl Tally {
    fn average(&self) -> f64 {
        self.total_confidence / self.count as f64
    }

    fn score(&self) -> f64 {
        self.count as f64 * self.average()
    }
}

/// Sliding-window vote over one stream's observations.
///
/// A gesture is stable when, among the last `buffer_size` observations that
/// are also younger than `age_window`, it holds more than `agreement_ratio` of
/// the votes and its average confidence reaches the catalog threshold. With
/// the defaults that means 4 of 5, so a 3-2 split never confirms a gesture.
pub struct GestureStabilizer {
    config: StabilizerConfig,
    catalog: Arc<GestureCatalog>,
    history: VecDeque<GestureObservation>,
    confidence_history: HashMap<GestureKind, VecDeque<f64>>,
    latest: Option<f64>,
    last_stable: Option<GestureKind>,
}

impl GestureStabilizer {
    pub fn new(config: StabilizerConfig, catalog: Arc<GestureCatalog>) -> Self {
        Self {
            history: VecDeque::with_capacity(config.max_history + 1),
            config,
            catalog,
            confidence_history: HashMap::new(),
            latest: None,
            last_stable: None,
        }
    }

    pub fn config(&self) -> &StabilizerConfig {
        &self.config
    }

    /// Add an observation and return the stable gesture, if any.
    pub fn observe(&mut self, observation: GestureObservation) -> Option<StableGesture> {
        let kept = self.insert(observation);

        let now = self.latest.map_or(observation.timestamp, |t| t.max(observation.timestamp));
        self.latest = Some(now);
        self.evict_older_than(now);

        // stale out-of-order observations leave no trace
        if kept && observation.timestamp > now - self.config.age_window {
            self.record_confidence(observation.gesture, observation.confidence);
        }

        self.evaluate()
    }

    /// Age out observations as of `now` without adding one, then re-vote.
    pub fn advance_to(&mut self, now: f64) -> Option<StableGesture> {
        if self.latest.is_none_or(|t| now > t) {
            self.latest = Some(now);
        }
        self.evict_older_than(now);
        self.evaluate()
    }

    /// Current vote result without changing any state.
    pub fn stable_gesture(&self) -> Option<StableGesture> {
        let window_start = self.history.len().saturating_sub(self.config.buffer_size);
        let window: Vec<&GestureObservation> = self.history.range(window_start..).collect();
        if window.is_empty() || window.len() < self.config.min_observations {
            return None;
        }

        let mut tallies: Vec<Tally> = Vec::new();
        for obs in &window {
            match tallies.iter_mut().find(|t| t.gesture == obs.gesture) {
                Some(tally) => {
                    tally.count += 1;
                    tally.total_confidence += obs.confidence;
                }
                None => tallies.push(Tally {
                    gesture: obs.gesture,
                    count: 1,
                    total_confidence: obs.confidence,
                    first_seen: obs.timestamp,
                }),
            }
        }

        let required = self.config.agreement_ratio * window.len() as f64;
        tallies
            .into_iter()
            .filter(|t| t.count as f64 > required)
            .filter(|t| t.average() >= self.catalog.threshold(t.gesture))
            .max_by(|a, b| {
                a.score()
                    .total_cmp(&b.score())
                    .then(a.average().total_cmp(&b.average()))
                    // earlier first sighting wins
                    .then(b.first_seen.total_cmp(&a.first_seen))
            })
            .map(|t| StableGesture {
                gesture: t.gesture,
                confidence: t.average(),
                count: t.count,
                window_len: window.len(),
            })
    }

    pub fn state(&self) -> StabilizerState {
        if self.history.is_empty() {
            return StabilizerState::Empty;
        }
        match self.stable_gesture() {
            Some(stable) => StabilizerState::Stable(stable.gesture),
            None => StabilizerState::Accumulating,
        }
    }

    /// Recent confidences recorded for `gesture`, oldest first.
    pub fn confidence_history(&self, gesture: GestureKind) -> Vec<f64> {
        self.confidence_history
            .get(&gesture)
            .map(|values| values.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Observations currently retained (age- and count-bounded).
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.confidence_history.clear();
        self.latest = None;
        self.last_stable = None;
    }

    /// Insert in timestamp order. Returns false if the count bound dropped
    /// the observation straight away.
    fn insert(&mut self, observation: GestureObservation) -> bool {
        let in_order = self
            .history
            .back()
            .is_none_or(|last| last.timestamp <= observation.timestamp);

        let pos = if in_order {
            self.history.push_back(observation);
            self.history.len() - 1
        } else {
            log::warn!(
                "out-of-order observation at t={:.3}, re-sorting into history",
                observation.timestamp
            );
            let pos = self
                .history
                .partition_point(|o| o.timestamp <= observation.timestamp);
            self.history.insert(pos, observation);
            pos
        };

        let excess = self.history.len().saturating_sub(self.config.max_history);
        self.history.drain(..excess);
        pos >= excess
    }

    fn record_confidence(&mut self, gesture: GestureKind, confidence: f64) {
        let limit = self.config.confidence_history_len;
        let values = self.confidence_history.entry(gesture).or_default();
        values.push_back(confidence);
        while values.len() > limit {
            values.pop_front();
        }
    }

    fn evict_older_than(&mut self, now: f64) {
        let cutoff = now - self.config.age_window;
        self.history.retain(|o| o.timestamp > cutoff);
    }

    fn evaluate(&mut self) -> Option<StableGesture> {
        let stable = self.stable_gesture();
        let current = stable.map(|s| s.gesture);
        if current != self.last_stable {
            match stable {
                Some(s) => log::info!(
                    "stable gesture {} ({} of {} votes, confidence {:.3})",
                    s.gesture,
                    s.count,
                    s.window_len,
                    s.confidence
                ),
                None => log::debug!("stable gesture cleared"),
            }
            self.last_stable = current;
        }
        stable
    }
}
