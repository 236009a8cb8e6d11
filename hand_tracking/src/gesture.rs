//! Gesture interpretation: the three signals games read each frame.

use crate::landmarks::{LandmarkSet, Point};
use crate::tracker::{classify_fingers, FingerState};

/// What one hand is doing in one frame.
///
/// `Gesture::default()` is "no hand": no finger state, no fingertip,
/// a count of zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Gesture {
    fingers:   Option<FingerState>,
    fingertip: Option<Point>,
}

impl Gesture {
    /// Interpret a pixel-space landmark set. Partial sets give no gesture.
    pub fn from_landmarks(landmarks: &LandmarkSet) -> Self {
        match classify_fingers(landmarks) {
            Some(fingers) => Gesture {
                fingers:   Some(fingers),
                fingertip: landmarks.fingertip(),
            },
            None => Gesture::default(),
        }
    }

    /// Build a gesture directly, mostly for tests and replays.
    pub fn new(fingers: FingerState, fingertip: Point) -> Self {
        Gesture { fingers: Some(fingers), fingertip: Some(fingertip) }
    }

    pub fn has_hand(&self) -> bool {
        self.fingers.is_some()
    }

    pub fn fingers(&self) -> Option<&FingerState> {
        self.fingers.as_ref()
    }

    /// Extended fingers in `0..=5`; zero when no hand is visible.
    pub fn count_extended(&self) -> u8 {
        self.fingers.map(|f| f.count()).unwrap_or(0)
    }

    /// Index fingertip, whether or not the index finger counts as extended.
    pub fn fingertip_position(&self) -> Option<Point> {
        self.fingertip
    }

    /// Exactly one finger up: draw. Anything else: move the pen freely.
    pub fn is_drawing_mode(&self) -> bool {
        self.count_extended() == 1
    }

    /// Fingertip, but only while at least one finger is extended.
    pub fn pointer(&self) -> Option<Point> {
        if self.count_extended() >= 1 {
            self.fingertip
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimHand;

    #[test]
    fn no_hand_is_no_gesture() {
        let g = Gesture::default();
        assert!(!g.has_hand());
        assert_eq!(g.count_extended(), 0);
        assert_eq!(g.fingertip_position(), None);
        assert!(!g.is_drawing_mode());
    }

    #[test]
    fn one_finger_is_drawing_mode() {
        let g = Gesture::from_landmarks(&SimHand::with_fingers(1).pixel_landmarks(640, 480));
        assert_eq!(g.count_extended(), 1);
        assert!(g.is_drawing_mode());
    }

    #[test]
    fn two_fingers_is_not_drawing_mode() {
        let g = Gesture::from_landmarks(&SimHand::with_fingers(2).pixel_landmarks(640, 480));
        assert_eq!(g.count_extended(), 2);
        assert!(!g.is_drawing_mode());
    }

    #[test]
    fn fingertip_reported_even_when_curled() {
        let g = Gesture::from_landmarks(&SimHand::with_fingers(0).at(0.5, 0.5).pixel_landmarks(640, 480));
        assert_eq!(g.count_extended(), 0);
        assert_eq!(g.fingertip_position(), Some(Point::new(320, 240)));
        assert_eq!(g.pointer(), None);
    }

    #[test]
    fn partial_landmarks_give_no_gesture() {
        let full = SimHand::with_fingers(3).pixel_landmarks(640, 480);
        let partial = LandmarkSet::new(full.points()[..12].to_vec());
        assert_eq!(Gesture::from_landmarks(&partial), Gesture::default());
    }
}
