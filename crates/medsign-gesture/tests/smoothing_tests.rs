mod common;

use common::{approx_eq, hand};
use medsign_gesture::{HandFrame, HandLandmark, LandmarkSmoother, SmootherConfig};

fn frame(states: [bool; 5]) -> HandFrame {
    HandFrame::try_from(hand(states)).unwrap()
}

fn shifted(base: &HandFrame, dx: f64) -> HandFrame {
    let mut out = base.clone();
    for lm in out.landmarks.iter_mut() {
        lm.position.x += dx;
    }
    out
}

#[test]
fn test_default_config() {
    let config = SmootherConfig::default();
    assert_eq!(config.history_capacity(), 10);
    assert_eq!(config.window(), 3);
}

#[test]
fn test_passes_through_until_three_prior_frames() {
    let mut smoother = LandmarkSmoother::default();
    let base = frame([true; 5]);
    for i in 0..3 {
        let input = shifted(&base, i as f64 * 0.01);
        assert_eq!(smoother.smooth(&input), input);
    }
    assert_eq!(smoother.len(), 3);
}

#[test]
fn test_single_outlier_is_rejected() {
    let mut smoother = LandmarkSmoother::default();
    let base = frame([true; 5]);
    for _ in 0..3 {
        smoother.smooth(&base);
    }
    let out = smoother.smooth(&shifted(&base, 0.3));
    assert_eq!(out, base);
}

#[test]
fn test_median_per_axis() {
    let mut smoother = LandmarkSmoother::default();
    let base = frame([false; 5]);
    smoother.smooth(&base);
    smoother.smooth(&shifted(&base, 0.05));
    smoother.smooth(&shifted(&base, 0.01));
    let out = smoother.smooth(&shifted(&base, 0.03));

    // median of the three buffered frames: +0.0, +0.05, +0.01
    let wrist = HandLandmark::Wrist;
    assert!(approx_eq(out.landmark(wrist).x(), base.landmark(wrist).x() + 0.01));
    assert!(approx_eq(out.landmark(wrist).y(), base.landmark(wrist).y()));
}

#[test]
fn test_keeps_tracking_sustained_motion() {
    let mut smoother = LandmarkSmoother::default();
    let base = frame([true; 5]);
    let mut out = base.clone();
    for i in 0..8 {
        out = smoother.smooth(&shifted(&base, i as f64 * 0.01));
    }
    // median of frames 4, 5 and 6: lags by two frames, never freezes
    let wrist = HandLandmark::Wrist;
    assert!(approx_eq(out.landmark(wrist).x(), base.landmark(wrist).x() + 0.05));
}

#[test]
fn test_current_frame_is_not_in_its_own_median() {
    let mut smoother = LandmarkSmoother::default();
    let base = frame([true; 5]);
    for _ in 0..3 {
        smoother.smooth(&base);
    }
    // two consecutive jumps: the first is hidden entirely, the second only
    // sees one moved frame among the buffered three
    let moved = shifted(&base, 0.1);
    assert_eq!(smoother.smooth(&moved), base);
    assert_eq!(smoother.smooth(&moved), base);
    assert_eq!(smoother.smooth(&moved), moved);
}

#[test]
fn test_history_is_bounded() {
    let mut smoother = LandmarkSmoother::new(SmootherConfig::default().with_history_capacity(4));
    let base = frame([true; 5]);
    for _ in 0..20 {
        smoother.smooth(&base);
    }
    assert_eq!(smoother.len(), 4);
}

#[test]
fn test_reset() {
    let mut smoother = LandmarkSmoother::default();
    let base = frame([true; 5]);
    for _ in 0..5 {
        smoother.smooth(&base);
    }
    smoother.reset();
    assert!(smoother.is_empty());

    let moved = shifted(&base, 0.2);
    assert_eq!(smoother.smooth(&moved), moved);
}

#[test]
fn test_visibility_is_kept() {
    let mut smoother = LandmarkSmoother::default();
    let mut base = frame([true; 5]);
    base.landmarks[0] = base.landmarks[0].with_visibility(0.4);
    for _ in 0..4 {
        let out = smoother.smooth(&base);
        assert_eq!(out.landmarks[0].visibility, Some(0.4));
    }
}
