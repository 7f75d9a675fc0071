use medsign_base::Vec3;

/// Number of landmarks in a hand frame.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// A single hand landmark in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    /// `x`, `y` in [0, 1] image space; `z` is depth relative to the wrist.
    pub position: Vec3<f64>,
    /// Detector-reported visibility in [0, 1], when the detector provides one.
    pub visibility: Option<f64>,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn z(&self) -> f64 {
        self.position.z
    }
}

impl From<[f64; 3]> for Landmark {
    fn from(point: [f64; 3]) -> Self {
        Self {
            position: point.into(),
            visibility: None,
        }
    }
}

/// Hand landmark indices, wrist first, then four joints per finger from base to tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl From<HandLandmark> for usize {
    fn from(index: HandLandmark) -> usize {
        index as usize
    }
}

/// Fingers in finger-state order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// Landmark index of the fingertip.
    pub fn tip(self) -> usize {
        self.base() + 3
    }

    /// Landmark index of the joint compared against the tip: IP for the
    /// thumb, PIP for the other fingers.
    pub fn pip(self) -> usize {
        match self {
            Finger::Thumb => HandLandmark::ThumbIp as usize,
            _ => self.base() + 1,
        }
    }

    /// Wrist followed by the finger's four joints, base to tip.
    pub fn chain(self) -> [usize; 5] {
        let b = self.base();
        [HandLandmark::Wrist as usize, b, b + 1, b + 2, b + 3]
    }

    fn base(self) -> usize {
        match self {
            Finger::Thumb => HandLandmark::ThumbCmc as usize,
            Finger::Index => HandLandmark::IndexMcp as usize,
            Finger::Middle => HandLandmark::MiddleMcp as usize,
            Finger::Ring => HandLandmark::RingMcp as usize,
            Finger::Pinky => HandLandmark::PinkyMcp as usize,
        }
    }
}

/// Exactly 21 landmarks of one detected hand.
#[derive(Debug, Clone, PartialEq)]
pub struct HandFrame {
    pub landmarks: [Landmark; HAND_LANDMARK_COUNT],
}

impl HandFrame {
    pub fn new(landmarks: [Landmark; HAND_LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    /// Build a frame from `[x, y, z]` triples. Returns `None` unless there are exactly 21.
    pub fn from_points(points: &[[f64; 3]]) -> Option<Self> {
        let landmarks: Vec<Landmark> = points.iter().copied().map(Landmark::from).collect();
        Self::try_from(landmarks).ok()
    }

    pub fn landmark(&self, index: HandLandmark) -> &Landmark {
        &self.landmarks[usize::from(index)]
    }

    pub fn as_slice(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// `[x, y, z]` per landmark, index order.
    pub fn to_points(&self) -> Vec<[f64; 3]> {
        self.landmarks.iter().map(|lm| lm.position.to_array()).collect()
    }
}

impl TryFrom<Vec<Landmark>> for HandFrame {
    type Error = String;

    fn try_from(value: Vec<Landmark>) -> Result<Self, Self::Error> {
        let count = value.len();
        let landmarks: [Landmark; HAND_LANDMARK_COUNT] = value.try_into().map_err(|_| {
            format!(
                "Invalid hand frame: {} landmarks, expected {}.",
                count, HAND_LANDMARK_COUNT
            )
        })?;
        Ok(Self { landmarks })
    }
}

impl TryFrom<&[Landmark]> for HandFrame {
    type Error = String;

    fn try_from(value: &[Landmark]) -> Result<Self, Self::Error> {
        Self::try_from(value.to_vec())
    }
}
