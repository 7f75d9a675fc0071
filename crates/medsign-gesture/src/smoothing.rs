use std::collections::VecDeque;

use crate::landmark::{HandFrame, Landmark};

/// Configuration for per-stream landmark smoothing.
#[derive(Clone, Debug)]
pub struct SmootherConfig {
    history_capacity: usize,
    window: usize,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            history_capacity: 10,
            window: 3,
        }
    }
}

impl SmootherConfig {
    /// Set how many accepted frames are retained (oldest evicted first).
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity.max(1);
        self
    }

    /// Set the number of recent frames the median is taken over.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }

    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

/// Median filter over the most recent frames of one stream.
///
/// Each landmark coordinate is replaced with the per-axis median across the
/// last `window` previously accepted frames. The incoming frame is recorded
/// afterwards, so it only influences later output. Until `window` earlier
/// frames have been seen, frames pass through unchanged.
#[derive(Debug, Clone)]
pub struct LandmarkSmoother {
    config: SmootherConfig,
    history: VecDeque<HandFrame>,
}

impl LandmarkSmoother {
    pub fn new(config: SmootherConfig) -> Self {
        let history = VecDeque::with_capacity(config.history_capacity + 1);
        Self { config, history }
    }

    /// Return the smoothed version of `frame`, then record it.
    pub fn smooth(&mut self, frame: &HandFrame) -> HandFrame {
        let smoothed = if self.history.len() >= self.config.window {
            self.median_of_recent(frame)
        } else {
            frame.clone()
        };

        self.history.push_back(frame.clone());
        while self.history.len() > self.config.history_capacity.max(self.config.window) {
            self.history.pop_front();
        }
        smoothed
    }

    /// `frame` with positions replaced by the median of the buffered frames.
    /// Visibility stays the incoming frame's.
    fn median_of_recent(&self, frame: &HandFrame) -> HandFrame {
        let recent: Vec<&HandFrame> = self.history.iter().rev().take(self.config.window).collect();

        let mut smoothed = frame.clone();
        for (i, out) in smoothed.landmarks.iter_mut().enumerate() {
            let axis = |f: fn(&Landmark) -> f64| {
                median(recent.iter().map(|frame| f(&frame.landmarks[i])).collect())
            };
            out.position.x = axis(Landmark::x);
            out.position.y = axis(Landmark::y);
            out.position.z = axis(Landmark::z);
        }
        smoothed
    }

    /// Number of frames currently retained.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}

impl Default for LandmarkSmoother {
    fn default() -> Self {
        Self::new(SmootherConfig::default())
    }
}

/// Median of `values`; the mean of the two middle values for even lengths.
fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
