//! The hand tracker and finger-extension classification.
//!
//! `HandTracker` owns a [`LandmarkProvider`], converts each detection to
//! pixel space, and remembers the last non-empty landmark set so callers can
//! keep pointing through a frame or two of missed detections.

use crate::error::Result;
use crate::frame::{DetectionParams, Frame, LandmarkProvider};
use crate::gesture::Gesture;
use crate::landmarks::{landmarks_to_pixels, LandmarkSet, Point, TIP_IDS};

// ════════════════════════════════════════════════════════════════════════════
// FingerState
// ════════════════════════════════════════════════════════════════════════════

/// Fingers in finger-state order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finger {
    Thumb  = 0,
    Index  = 1,
    Middle = 2,
    Ring   = 3,
    Pinky  = 4,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Finger::Thumb  => "Thumb",
            Finger::Index  => "Index",
            Finger::Middle => "Middle",
            Finger::Ring   => "Ring",
            Finger::Pinky  => "Pinky",
        }
    }
}

/// Extended/curled classification of all five fingers of one hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerState(pub [bool; 5]);

impl FingerState {
    pub fn is_extended(&self, finger: Finger) -> bool {
        self.0[finger as usize]
    }

    /// Number of extended fingers, always in `0..=5`.
    pub fn count(&self) -> u8 {
        self.0.iter().filter(|&&up| up).count() as u8
    }

    pub fn as_array(&self) -> [bool; 5] {
        self.0
    }
}

/// Classify each finger as extended or not.
///
/// * Thumb: extended when its tip lies left of the joint below it
///   (`tip.x < ip.x`). The thumb folds sideways, so this is a horizontal
///   test; it assumes a mirrored frame and a right hand.
/// * Other fingers: extended when the tip is above the joint two below it
///   (`tip.y < pip.y`).
///
/// Returns `None` for partial landmark sets.
pub fn classify_fingers(landmarks: &LandmarkSet) -> Option<FingerState> {
    if !landmarks.is_complete() {
        return None;
    }
    let p = landmarks.points();

    let mut state = [false; 5];
    let thumb_tip = TIP_IDS[0];
    state[0] = p[thumb_tip].x < p[thumb_tip - 1].x;

    for (slot, &tip) in TIP_IDS.iter().enumerate().skip(1) {
        state[slot] = p[tip].y < p[tip - 2].y;
    }
    Some(FingerState(state))
}

// ════════════════════════════════════════════════════════════════════════════
// HandTracker
// ════════════════════════════════════════════════════════════════════════════

pub struct HandTracker {
    provider:   Box<dyn LandmarkProvider>,
    params:     DetectionParams,
    /// Hands detected in the most recent frame, pixel space.
    hands:      Vec<LandmarkSet>,
    /// Last non-empty set for hand 0; overwritten on every new detection.
    last_known: Option<LandmarkSet>,
    /// Pixel space for landmarks; `None` uses each frame's own size.
    resolution: Option<(u32, u32)>,
}

impl HandTracker {
    pub fn new(provider: Box<dyn LandmarkProvider>, params: DetectionParams) -> Self {
        HandTracker {
            provider,
            params,
            hands: Vec::new(),
            last_known: None,
            resolution: None,
        }
    }

    /// Convert landmarks into a fixed `width` × `height` pixel space instead
    /// of the size each frame reports.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.resolution = Some((width, height));
        self
    }

    pub fn resolution(&self) -> Option<(u32, u32)> {
        self.resolution
    }

    pub fn params(&self) -> &DetectionParams {
        &self.params
    }

    /// Run detection on `frame` and convert every hand to pixel space.
    pub fn detect(&mut self, frame: &Frame) -> Result<&[LandmarkSet]> {
        let mut raw = self.provider.detect(frame, &self.params)?;
        raw.truncate(self.params.max_hands);

        let (width, height) = self.resolution.unwrap_or((frame.width, frame.height));
        self.hands = raw
            .iter()
            .map(|hand| landmarks_to_pixels(hand, width, height))
            .collect();

        if let Some(first) = self.hands.first().filter(|h| !h.is_empty()) {
            self.last_known = Some(first.clone());
        }
        Ok(&self.hands)
    }

    /// Hands from the most recent [`detect`](Self::detect) call.
    pub fn hands(&self) -> &[LandmarkSet] {
        &self.hands
    }

    pub fn hand(&self, hand_no: usize) -> Option<&LandmarkSet> {
        self.hands.get(hand_no)
    }

    pub fn last_known(&self) -> Option<&LandmarkSet> {
        self.last_known.as_ref()
    }

    /// Index fingertip from the last non-empty detection, however old.
    pub fn last_known_fingertip(&self) -> Option<Point> {
        self.last_known.as_ref().and_then(LandmarkSet::fingertip)
    }

    pub fn fingers_up(&self, hand_no: usize) -> Option<FingerState> {
        self.hand(hand_no).and_then(classify_fingers)
    }

    /// Gesture of the first hand in the current frame.
    pub fn gesture(&self) -> Gesture {
        self.hand(0).map(Gesture::from_landmarks).unwrap_or_default()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
