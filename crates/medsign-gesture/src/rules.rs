//! Geometry-only gesture classification from finger extension states.

use crate::catalog::GestureKind;
use crate::landmark::{Finger, HAND_LANDMARK_COUNT, Landmark};

/// Extended (`true`) or retracted per finger: thumb, index, middle, ring, pinky.
pub type FingerStates = [bool; 5];

/// Per-finger requirement of a rule; `None` means the finger is ignored.
type Pattern = [Option<bool>; 5];

const T: Option<bool> = Some(true);
const F: Option<bool> = Some(false);
const ANY: Option<bool> = None;

/// Checked top to bottom, first match wins. Patterns overlap, so order is
/// precedence: thumb+index+middle matches `Pain` before `Water` is reached.
const RULES: [(Pattern, GestureKind); 7] = [
    ([F, F, F, F, F], GestureKind::Emergency),
    ([T, T, T, T, T], GestureKind::Help),
    ([ANY, T, T, F, F], GestureKind::Pain),
    ([T, F, F, F, T], GestureKind::Medicine),
    ([T, T, T, F, F], GestureKind::Water),
    ([T, F, F, F, F], GestureKind::Yes),
    // labelled "point downward" in the catalog, but matches a raised middle finger
    ([ANY, F, T, F, F], GestureKind::No),
];

/// Finger states of a 21-landmark hand, or `None` for any other count.
///
/// The thumb abducts sideways, so it counts as extended when its tip lies to
/// the right of the IP joint (`tip.x > ip.x`). The other fingers curl, so they
/// count as extended when the tip is above the PIP joint (`tip.y < pip.y`).
pub fn finger_states(landmarks: &[Landmark]) -> Option<FingerStates> {
    if landmarks.len() != HAND_LANDMARK_COUNT {
        return None;
    }

    let mut states = [false; 5];
    for (state, finger) in states.iter_mut().zip(Finger::ALL) {
        let tip = &landmarks[finger.tip()];
        let pip = &landmarks[finger.pip()];
        *state = match finger {
            Finger::Thumb => tip.x() > pip.x(),
            _ => tip.y() < pip.y(),
        };
    }
    Some(states)
}

/// Map finger states to a gesture using the ordered rule table.
pub fn match_states(states: &FingerStates) -> Option<GestureKind> {
    RULES
        .iter()
        .find(|(pattern, _)| {
            pattern
                .iter()
                .zip(states)
                .all(|(want, &got)| want.is_none_or(|w| w == got))
        })
        .map(|(_, kind)| *kind)
}

/// Classify a landmark set. Wrong landmark counts yield `None`.
pub fn classify(landmarks: &[Landmark]) -> Option<GestureKind> {
    finger_states(landmarks).and_then(|states| match_states(&states))
}
