mod common;

use common::{gesture_hand, hand};
use medsign_gesture::{
    FrameQuality, GestureError, GestureKind, GesturePipeline, GesturePredictor, Landmark,
    PipelineConfig, Prediction, Priority, RulePredictor, StabilizerState,
};

fn pipeline() -> GesturePipeline {
    GesturePipeline::new(PipelineConfig::default(), Box::new(RulePredictor::default()))
}

struct Unavailable;

impl GesturePredictor for Unavailable {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn predict(&mut self, _landmarks: &[Landmark]) -> Result<Option<Prediction>, GestureError> {
        Err(GestureError::Detector("camera disconnected".to_string()))
    }
}

#[test]
fn test_default_config() {
    let config = PipelineConfig::default();
    assert_eq!(config.quality_floor(), 0.3);
    assert_eq!(config.stream_grace(), 3.0);
    assert_eq!(config.stabilizer().buffer_size(), 5);
    assert_eq!(config.smoother().window(), 3);
}

#[test]
fn test_steady_fist_becomes_emergency() {
    let mut p = pipeline();
    let fist = gesture_hand(GestureKind::Emergency);

    assert!(p.process("left", 0.0, &fist, None).unwrap().is_none());
    assert!(p.process("left", 0.1, &fist, None).unwrap().is_none());
    let result = p
        .process("left", 0.2, &fist, None)
        .unwrap()
        .expect("three agreeing frames");

    assert_eq!(result.gesture, GestureKind::Emergency);
    assert_eq!(result.priority, Priority::Critical);
    assert_eq!(result.urgency_score, 10);
    assert_eq!(result.description, "Closed fist held steady");
    assert_eq!(result.landmarks.len(), 21);
    assert_eq!(result.timestamp, 0.2);
    assert!(result.confidence >= 0.8);
    assert_eq!(
        p.stream_state("left"),
        Some(StabilizerState::Stable(GestureKind::Emergency))
    );
}

#[test]
fn test_low_quality_frames_are_skipped() {
    let mut p = pipeline();
    let fist = gesture_hand(GestureKind::Emergency);
    let blurry = FrameQuality::from_overall(0.1);

    for i in 0..5 {
        assert!(p.process("left", i as f64 * 0.1, &fist, Some(&blurry)).unwrap().is_none());
    }
    assert_eq!(p.stats().skipped_low_quality, 5);
    assert_eq!(p.stream_state("left"), None);
}

#[test]
fn test_confidence_is_weighted_by_quality() {
    let mut p = pipeline();
    let fist = gesture_hand(GestureKind::Emergency);
    let dim = FrameQuality::from_overall(0.5);

    for i in 0..5 {
        assert!(p.process("left", i as f64 * 0.1, &fist, Some(&dim)).unwrap().is_none());
    }
    assert_eq!(p.stats().pending, 5);
    let history = p.stabilizer("left").unwrap().confidence_history(GestureKind::Emergency);
    assert!(history.iter().all(|&c| c <= 0.5));
}

#[test]
fn test_wrong_landmark_count_is_not_an_error() {
    let mut p = pipeline();
    let fist = gesture_hand(GestureKind::Emergency);

    assert!(p.process("left", 0.0, &fist[..20], None).unwrap().is_none());
    assert!(p.process("left", 0.1, &[], None).unwrap().is_none());
    assert_eq!(p.stats().invalid_landmarks, 2);
    assert_eq!(p.stream_state("left"), None);
}

#[test]
fn test_unrecognized_pose_is_no_gesture() {
    let mut p = pipeline();
    let unmatched = hand([false, true, false, true, false]);
    assert!(p.process("left", 0.0, &unmatched, None).unwrap().is_none());
    assert_eq!(p.stats().no_gesture, 1);
    assert_eq!(p.stream_state("left"), Some(StabilizerState::Empty));
}

#[test]
fn test_streams_are_independent() {
    let mut p = pipeline();
    let fist = gesture_hand(GestureKind::Emergency);
    let open = gesture_hand(GestureKind::Help);

    let mut left = None;
    let mut right = None;
    for i in 0..4 {
        let t = i as f64 * 0.1;
        left = p.process("left", t, &fist, None).unwrap();
        right = p.process("right", t, &open, None).unwrap();
    }
    assert_eq!(left.map(|r| r.gesture), Some(GestureKind::Emergency));
    assert_eq!(right.map(|r| r.gesture), Some(GestureKind::Help));
    assert_eq!(p.active_streams(), vec!["left", "right"]);
}

#[test]
fn test_single_glitch_frame_is_smoothed_away() {
    let mut p = pipeline();
    let open = gesture_hand(GestureKind::Help);
    let fist = gesture_hand(GestureKind::Emergency);

    for i in 0..4 {
        p.process("left", i as f64 * 0.1, &open, None).unwrap();
    }
    let result = p.process("left", 0.4, &fist, None).unwrap();
    assert_eq!(result.map(|r| r.gesture), Some(GestureKind::Help));
}

#[test]
fn test_idle_streams_are_evicted() {
    let mut p = pipeline();
    let fist = gesture_hand(GestureKind::Emergency);

    p.process("left", 0.0, &fist, None).unwrap();
    p.process("right", 1.0, &fist, None).unwrap();
    assert_eq!(p.active_streams(), vec!["left", "right"]);

    p.process("right", 3.5, &fist, None).unwrap();
    assert_eq!(p.active_streams(), vec!["right"]);

    assert_eq!(p.evict_idle(10.0), 1);
    assert!(p.active_streams().is_empty());
}

#[test]
fn test_stream_restarts_after_grace_period() {
    let mut p = pipeline();
    let fist = gesture_hand(GestureKind::Emergency);

    for i in 0..3 {
        p.process("left", i as f64 * 0.1, &fist, None).unwrap();
    }
    assert_eq!(
        p.stream_state("left"),
        Some(StabilizerState::Stable(GestureKind::Emergency))
    );

    // the hand was gone for longer than the grace period
    assert!(p.process("left", 5.0, &fist, None).unwrap().is_none());
    assert_eq!(p.stream_state("left"), Some(StabilizerState::Accumulating));
}

#[test]
fn test_end_stream() {
    let mut p = pipeline();
    p.process("left", 0.0, &gesture_hand(GestureKind::Yes), None).unwrap();
    assert!(p.end_stream("left"));
    assert!(!p.end_stream("left"));
    assert_eq!(p.stream_state("left"), None);
}

#[test]
fn test_predictor_failure_is_distinct_from_no_gesture() {
    let mut p = GesturePipeline::new(PipelineConfig::default(), Box::new(Unavailable));
    assert_eq!(p.predictor_name(), "unavailable");

    let err = p
        .process("left", 0.0, &gesture_hand(GestureKind::Help), None)
        .unwrap_err();
    assert!(err.is_collaborator_failure());
    assert_eq!(p.stats().predictor_errors, 1);
}

#[test]
fn test_detector_failure_is_distinct_from_no_hand() {
    let mut p = pipeline();

    let err = p
        .process_detection("left", 0.0, Err(GestureError::Detector("camera disconnected".to_string())), None)
        .unwrap_err();
    assert!(matches!(err, GestureError::Detector(_)));
    assert!(err.is_collaborator_failure());
    assert_eq!(p.stats().detector_errors, 1);
    assert_eq!(p.stream_state("left"), None);

    assert!(p.process_detection("left", 0.1, Ok(Vec::new()), None).unwrap().is_none());
    let stats = p.stats();
    assert_eq!(stats.frames, 2);
    assert_eq!(stats.detector_errors, 1);
    assert_eq!(stats.invalid_landmarks, 1);
}

#[test]
fn test_detection_uses_first_hand() {
    let mut p = pipeline();
    let fist = gesture_hand(GestureKind::Emergency);
    let open = gesture_hand(GestureKind::Help);

    let mut last = None;
    for i in 0..3 {
        let hands = vec![fist.clone(), open.clone()];
        last = p.process_detection("left", i as f64 * 0.1, Ok(hands), None).unwrap();
    }
    assert_eq!(last.map(|r| r.gesture), Some(GestureKind::Emergency));
    assert_eq!(p.stats().stable_results, 1);
}

#[test]
fn test_every_frame_has_one_outcome() {
    let mut p = pipeline();
    let fist = gesture_hand(GestureKind::Emergency);
    let unmatched = hand([false, true, false, true, false]);
    let blurry = FrameQuality::from_overall(0.0);

    p.process("left", 0.0, &fist, None).unwrap();
    p.process("left", 0.1, &fist, Some(&blurry)).unwrap();
    p.process("left", 0.2, &fist[..3], None).unwrap();
    p.process("right", 0.3, &unmatched, None).unwrap();
    p.process("left", 0.4, &fist, None).unwrap();
    p.process("left", 0.5, &fist, None).unwrap();
    p.process_detection("left", 0.6, Err(GestureError::Detector("lost".to_string())), None)
        .unwrap_err();

    let stats = p.stats();
    assert_eq!(stats.frames, 7);
    assert_eq!(stats.detector_errors, 1);
    assert_eq!(stats.skipped_low_quality, 1);
    assert_eq!(stats.invalid_landmarks, 1);
    assert_eq!(stats.no_gesture, 1);
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.stable_results, 1);
    assert_eq!(
        stats.skipped_low_quality
            + stats.invalid_landmarks
            + stats.no_gesture
            + stats.pending
            + stats.stable_results
            + stats.predictor_errors
            + stats.detector_errors,
        stats.frames
    );
}
