#![allow(dead_code)]

use medsign_gesture::{GestureKind, Landmark};

pub const WRIST: [f64; 2] = [0.5, 0.8];

/// MCP (CMC for the thumb) position of each finger.
const BASES: [[f64; 2]; 5] = [
    [0.55, 0.75],
    [0.45, 0.68],
    [0.50, 0.67],
    [0.55, 0.68],
    [0.60, 0.70],
];

/// A right hand, palm to camera, with every joint segment between 0.02 and
/// 0.15 long and a shallow depth spread. `states` is thumb, index, middle,
/// ring, pinky; `true` means extended.
pub fn hand(states: [bool; 5]) -> Vec<Landmark> {
    let mut points = vec![[WRIST[0], WRIST[1]]];

    let [bx, by] = BASES[0];
    points.push([bx, by]);
    points.push([bx + 0.04, by - 0.03]);
    points.push([bx + 0.07, by - 0.06]);
    if states[0] {
        points.push([bx + 0.11, by - 0.09]);
    } else {
        points.push([bx + 0.04, by - 0.08]);
    }

    for (finger, &[bx, by]) in BASES.iter().enumerate().skip(1) {
        points.push([bx, by]);
        points.push([bx, by - 0.04]);
        if states[finger] {
            points.push([bx, by - 0.08]);
            points.push([bx, by - 0.12]);
        } else {
            points.push([bx + 0.02, by - 0.02]);
            points.push([bx + 0.02, by + 0.01]);
        }
    }

    points
        .into_iter()
        .enumerate()
        .map(|(i, [x, y])| Landmark::new(x, y, -0.001 * (i % 4) as f64))
        .collect()
}

/// Finger states that the rule table maps to `kind` (water is shadowed by pain).
pub fn states_for(kind: GestureKind) -> [bool; 5] {
    match kind {
        GestureKind::Emergency => [false, false, false, false, false],
        GestureKind::Help => [true, true, true, true, true],
        GestureKind::Pain => [false, true, true, false, false],
        GestureKind::Medicine => [true, false, false, false, true],
        GestureKind::Water => [true, true, true, false, false],
        GestureKind::Yes => [true, false, false, false, false],
        GestureKind::No => [false, false, true, false, false],
    }
}

pub fn gesture_hand(kind: GestureKind) -> Vec<Landmark> {
    hand(states_for(kind))
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
