//! Per-stream orchestration: quality gate, smoothing, prediction,
//! stabilization and priority mapping.

use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::GestureCatalog;
use crate::landmark::{HAND_LANDMARK_COUNT, HandFrame, Landmark};
use crate::predictor::GesturePredictor;
use crate::quality::{DEFAULT_QUALITY_FLOOR, FrameQuality};
use crate::result::MedicalGestureResult;
use crate::smoothing::{LandmarkSmoother, SmootherConfig};
use crate::stabilizer::{GestureObservation, GestureStabilizer, StabilizerConfig, StabilizerState};
use crate::GestureError;

/// Configuration for a `GesturePipeline`.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    quality_floor: f64,
    stream_grace: f64,
    smoother: SmootherConfig,
    stabilizer: StabilizerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let stabilizer = StabilizerConfig::default();
        Self {
            quality_floor: DEFAULT_QUALITY_FLOOR,
            stream_grace: stabilizer.age_window(),
            smoother: SmootherConfig::default(),
            stabilizer,
        }
    }
}

impl PipelineConfig {
    /// Set the overall quality below which frames are skipped.
    pub fn with_quality_floor(mut self, floor: f64) -> Self {
        self.quality_floor = floor;
        self
    }

    /// Set how long (seconds) a stream may go without a valid frame before
    /// its state is discarded.
    pub fn with_stream_grace(mut self, seconds: f64) -> Self {
        self.stream_grace = seconds;
        self
    }

    pub fn with_smoother(mut self, smoother: SmootherConfig) -> Self {
        self.smoother = smoother;
        self
    }

    pub fn with_stabilizer(mut self, stabilizer: StabilizerConfig) -> Self {
        self.stabilizer = stabilizer;
        self
    }

    pub fn quality_floor(&self) -> f64 {
        self.quality_floor
    }

    pub fn stream_grace(&self) -> f64 {
        self.stream_grace
    }

    pub fn smoother(&self) -> &SmootherConfig {
        &self.smoother
    }

    pub fn stabilizer(&self) -> &StabilizerConfig {
        &self.stabilizer
    }
}

/// Outcome counters. Every call to `process` or `process_detection` bumps
/// `frames` and exactly one of the other counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub frames: u64,
    pub skipped_low_quality: u64,
    pub invalid_landmarks: u64,
    pub no_gesture: u64,
    /// Observation recorded, no consensus yet.
    pub pending: u64,
    pub stable_results: u64,
    pub predictor_errors: u64,
    pub detector_errors: u64,
}

struct StreamState {
    smoother: LandmarkSmoother,
    stabilizer: GestureStabilizer,
    last_seen: f64,
}

impl StreamState {
    fn new(config: &PipelineConfig, catalog: &Arc<GestureCatalog>, timestamp: f64) -> Self {
        Self {
            smoother: LandmarkSmoother::new(config.smoother.clone()),
            stabilizer: GestureStabilizer::new(config.stabilizer.clone(), Arc::clone(catalog)),
            last_seen: timestamp,
        }
    }
}

/// The public entry point: one frame in, at most one medical gesture out.
pub struct GesturePipeline {
    config: PipelineConfig,
    catalog: Arc<GestureCatalog>,
    predictor: Box<dyn GesturePredictor>,
    streams: HashMap<String, StreamState>,
    stats: PipelineStats,
}

impl GesturePipeline {
    /// Pipeline over the built-in medical catalog.
    pub fn new(config: PipelineConfig, predictor: Box<dyn GesturePredictor>) -> Self {
        Self::with_catalog(config, predictor, Arc::new(GestureCatalog::medical()))
    }

    pub fn with_catalog(
        config: PipelineConfig,
        predictor: Box<dyn GesturePredictor>,
        catalog: Arc<GestureCatalog>,
    ) -> Self {
        log::info!("gesture pipeline using predictor '{}'", predictor.name());
        Self {
            config,
            catalog,
            predictor,
            streams: HashMap::new(),
            stats: PipelineStats::default(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<GestureCatalog> {
        &self.catalog
    }

    pub fn predictor_name(&self) -> &str {
        self.predictor.name()
    }

    /// Run one frame of `stream` through the pipeline.
    ///
    /// Returns `Ok(None)` for a skipped frame, a frame without a recognizable
    /// gesture, or while no gesture has consensus. Returns `Err` only when the
    /// predictor itself fails.
    pub fn process(
        &mut self,
        stream: &str,
        timestamp: f64,
        landmarks: &[Landmark],
        quality: Option<&FrameQuality>,
    ) -> Result<Option<MedicalGestureResult>, GestureError> {
        self.stats.frames += 1;
        self.run_frame(stream, timestamp, landmarks, quality)
    }

    /// Run the raw output of a landmark detector for one frame of `stream`.
    ///
    /// A detector failure is counted and returned as `Err`, so callers can
    /// tell "cannot determine anything" apart from "nothing to report". The
    /// first detected hand is classified; a frame with no hand is treated like
    /// an empty landmark set.
    pub fn process_detection(
        &mut self,
        stream: &str,
        timestamp: f64,
        detection: Result<Vec<Vec<Landmark>>, GestureError>,
        quality: Option<&FrameQuality>,
    ) -> Result<Option<MedicalGestureResult>, GestureError> {
        self.stats.frames += 1;
        let hands = match detection {
            Ok(hands) => hands,
            Err(e) => {
                log::warn!("stream '{stream}': detector failed at t={timestamp:.3}: {e}");
                self.stats.detector_errors += 1;
                return Err(e);
            }
        };
        if hands.len() > 1 {
            log::debug!("stream '{stream}': {} hands detected, using the first", hands.len());
        }
        let landmarks = hands.first().map_or(&[][..], Vec::as_slice);
        self.run_frame(stream, timestamp, landmarks, quality)
    }

    fn run_frame(
        &mut self,
        stream: &str,
        timestamp: f64,
        landmarks: &[Landmark],
        quality: Option<&FrameQuality>,
    ) -> Result<Option<MedicalGestureResult>, GestureError> {
        self.evict_idle(timestamp);

        if let Some(q) = quality.filter(|q| !q.is_acceptable(self.config.quality_floor)) {
            log::warn!(
                "stream '{stream}': skipping frame at t={timestamp:.3}, quality {:.3} below {:.3}",
                q.overall_quality,
                self.config.quality_floor
            );
            self.stats.skipped_low_quality += 1;
            return Ok(None);
        }

        let frame = match HandFrame::try_from(landmarks) {
            Ok(frame) => frame,
            Err(_) => {
                log::debug!(
                    "stream '{stream}': {} landmarks, expected {HAND_LANDMARK_COUNT}",
                    landmarks.len()
                );
                self.stats.invalid_landmarks += 1;
                return Ok(None);
            }
        };

        let state = self.streams.entry(stream.to_string()).or_insert_with(|| {
            log::info!("stream '{stream}' started at t={timestamp:.3}");
            StreamState::new(&self.config, &self.catalog, timestamp)
        });
        state.last_seen = state.last_seen.max(timestamp);
        let smoothed = state.smoother.smooth(&frame);

        let prediction = match self.predictor.predict(smoothed.as_slice()) {
            Ok(prediction) => prediction,
            Err(e) => {
                self.stats.predictor_errors += 1;
                return Err(e);
            }
        };

        let Some(prediction) = prediction else {
            log::debug!("stream '{stream}': no gesture at t={timestamp:.3}");
            state.stabilizer.advance_to(timestamp);
            self.stats.no_gesture += 1;
            return Ok(None);
        };

        let confidence = match quality {
            Some(q) => prediction.confidence * q.overall_quality,
            None => prediction.confidence,
        };
        let observation = GestureObservation::new(prediction.gesture, confidence, timestamp);

        match state.stabilizer.observe(observation) {
            Some(stable) => {
                self.stats.stable_results += 1;
                Ok(Some(MedicalGestureResult::from_stable(
                    &self.catalog,
                    &stable,
                    &smoothed,
                    timestamp,
                )))
            }
            None => {
                self.stats.pending += 1;
                Ok(None)
            }
        }
    }

    /// Discard every stream whose last valid frame is `stream_grace` or more
    /// seconds older than `now`. Returns the number of streams evicted.
    pub fn evict_idle(&mut self, now: f64) -> usize {
        let cutoff = now - self.config.stream_grace;
        let before = self.streams.len();
        self.streams.retain(|id, state| {
            let keep = state.last_seen > cutoff;
            if !keep {
                log::info!("stream '{id}' idle since t={:.3}, discarding", state.last_seen);
            }
            keep
        });
        before - self.streams.len()
    }

    /// Discard a stream's state immediately. Returns whether it existed.
    pub fn end_stream(&mut self, stream: &str) -> bool {
        let existed = self.streams.remove(stream).is_some();
        if existed {
            log::info!("stream '{stream}' ended");
        }
        existed
    }

    /// Stabilizer state of `stream`, or `None` if the stream is not tracked.
    pub fn stream_state(&self, stream: &str) -> Option<StabilizerState> {
        self.streams.get(stream).map(|s| s.stabilizer.state())
    }

    /// The stabilizer of `stream`, for diagnostics.
    pub fn stabilizer(&self, stream: &str) -> Option<&GestureStabilizer> {
        self.streams.get(stream).map(|s| &s.stabilizer)
    }

    pub fn active_streams(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.streams.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }
}
