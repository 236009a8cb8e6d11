//! Simulated hand: mouse and keyboard stand in for the camera.
//!
//! The visualizer window translates raw input into [`SimInput`] events and
//! sends them over an `mpsc` channel; [`SimProvider`] drains the channel on
//! every detection and synthesises an upright, camera-facing hand whose
//! index fingertip sits under the mouse. Consumers can't tell the difference
//! from a real detection, which is the point.
//!
//! | Input | Effect |
//! |---|---|
//! | mouse move | index fingertip follows the cursor |
//! | `0`–`5` | number of extended fingers |
//! | `H` | hide / show the hand |

use std::sync::mpsc::{Receiver, TryRecvError};

use crate::error::Result;
use crate::frame::{DetectionParams, Frame, FrameSource, LandmarkProvider};
use crate::landmarks::{landmarks_to_pixels, LandmarkSet, NormalizedHand, NormalizedPoint};
use crate::tracker::{Finger, FingerState};

// ════════════════════════════════════════════════════════════════════════════
// SimInput
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Cursor position as a fraction of the window size.
    Pointer { x: f32, y: f32 },
    /// Number of fingers to hold up (clamped to 5).
    Fingers(u8),
    /// Hide or show the hand.
    ToggleHand,
}

// ════════════════════════════════════════════════════════════════════════════
// Hand geometry
// ════════════════════════════════════════════════════════════════════════════
//
// Offsets from the wrist in pixels for a 480-px-tall frame; scaled with the
// frame height. Each finger has four points, knuckle outward, in an
// extended and a curled pose.

type Pose = [(f32, f32); 4];

const THUMB_UP:    Pose = [(-30.0, -20.0), (-50.0, -40.0), (-65.0, -60.0), (-85.0, -75.0)];
const THUMB_DOWN:  Pose = [(-30.0, -20.0), (-50.0, -40.0), (-65.0, -60.0), (-45.0, -70.0)];
const INDEX_UP:    Pose = [(-20.0, -80.0), (-20.0, -115.0), (-20.0, -140.0), (-20.0, -165.0)];
const INDEX_DOWN:  Pose = [(-20.0, -80.0), (-20.0, -115.0), (-20.0, -100.0), (-20.0, -90.0)];
const MIDDLE_UP:   Pose = [(0.0, -85.0), (0.0, -122.0), (0.0, -150.0), (0.0, -178.0)];
const MIDDLE_DOWN: Pose = [(0.0, -85.0), (0.0, -122.0), (0.0, -105.0), (0.0, -95.0)];
const RING_UP:     Pose = [(20.0, -80.0), (20.0, -113.0), (20.0, -138.0), (20.0, -162.0)];
const RING_DOWN:   Pose = [(20.0, -80.0), (20.0, -113.0), (20.0, -98.0), (20.0, -88.0)];
const PINKY_UP:    Pose = [(38.0, -70.0), (38.0, -98.0), (38.0, -118.0), (38.0, -138.0)];
const PINKY_DOWN:  Pose = [(38.0, -70.0), (38.0, -98.0), (38.0, -85.0), (38.0, -78.0)];

const POSES: [(Pose, Pose); 5] = [
    (THUMB_UP, THUMB_DOWN),
    (INDEX_UP, INDEX_DOWN),
    (MIDDLE_UP, MIDDLE_DOWN),
    (RING_UP, RING_DOWN),
    (PINKY_UP, PINKY_DOWN),
];

/// Order in which fingers are raised as the count goes from 1 to 5.
const RAISE_ORDER: [Finger; 5] = [
    Finger::Index,
    Finger::Middle,
    Finger::Ring,
    Finger::Pinky,
    Finger::Thumb,
];

const REFERENCE_HEIGHT: f32 = 480.0;

// ════════════════════════════════════════════════════════════════════════════
// SimHand
// ════════════════════════════════════════════════════════════════════════════

/// State of the simulated hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimHand {
    /// Index fingertip, normalized.
    pub pointer: NormalizedPoint,
    pub fingers: u8,
    pub visible: bool,
}

impl Default for SimHand {
    fn default() -> Self {
        SimHand {
            pointer: NormalizedPoint::new(0.5, 0.5),
            fingers: 0,
            visible: true,
        }
    }
}

impl SimHand {
    pub fn with_fingers(fingers: u8) -> Self {
        SimHand { fingers: fingers.min(5), ..SimHand::default() }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.pointer = NormalizedPoint::new(x, y);
        self
    }

    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Pointer { x, y } => {
                self.pointer = NormalizedPoint::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0));
            }
            SimInput::Fingers(n) => self.fingers = n.min(5),
            SimInput::ToggleHand => self.visible = !self.visible,
        }
    }

    /// Finger state this hand is posed to produce.
    pub fn intended(&self) -> FingerState {
        let mut state = [false; 5];
        for finger in RAISE_ORDER.iter().take(self.fingers as usize) {
            state[*finger as usize] = true;
        }
        FingerState(state)
    }

    /// The 21 normalized landmarks for a `width` × `height` frame.
    pub fn landmarks(&self, width: u32, height: u32) -> NormalizedHand {
        let intended = self.intended();
        let scale = height as f32 / REFERENCE_HEIGHT;
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);

        let pose = |finger: Finger| -> Pose {
            let (up, down) = POSES[finger as usize];
            if intended.is_extended(finger) { up } else { down }
        };

        // Anchor the wrist so the index tip lands exactly on the pointer.
        let tip = pose(Finger::Index)[3];
        let to_norm = |(dx, dy): (f32, f32)| {
            NormalizedPoint::new(
                self.pointer.x + (dx - tip.0) * scale / w,
                self.pointer.y + (dy - tip.1) * scale / h,
            )
        };

        let mut landmarks = Vec::with_capacity(21);
        landmarks.push(to_norm((0.0, 0.0)));
        for finger in Finger::ALL {
            landmarks.extend(pose(finger).iter().copied().map(to_norm));
        }
        NormalizedHand::new(landmarks)
    }

    pub fn pixel_landmarks(&self, width: u32, height: u32) -> LandmarkSet {
        landmarks_to_pixels(&self.landmarks(width, height), width, height)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimProvider / SimCamera
// ════════════════════════════════════════════════════════════════════════════

/// Landmark provider driven by [`SimInput`] events from the window.
pub struct SimProvider {
    rx:   Receiver<SimInput>,
    hand: SimHand,
}

impl SimProvider {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimProvider { rx, hand: SimHand::default() }
    }

    pub fn hand(&self) -> &SimHand {
        &self.hand
    }
}

impl LandmarkProvider for SimProvider {
    fn detect(&mut self, frame: &Frame, _params: &DetectionParams) -> Result<Vec<NormalizedHand>> {
        loop {
            match self.rx.try_recv() {
                Ok(input) => self.hand.apply(input),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if self.hand.visible {
            Ok(vec![self.hand.landmarks(frame.width, frame.height)])
        } else {
            Ok(Vec::new())
        }
    }
}

/// Frame source that produces plain frames at a fixed size.
///
/// Used with the simulated hand and with LeapMotion, neither of which has a
/// picture to show.
pub struct SimCamera {
    pub width:      u32,
    pub height:     u32,
    pub background: u32,
}

impl SimCamera {
    pub fn new(width: u32, height: u32, background: u32) -> Self {
        SimCamera { width, height, background }
    }
}

impl FrameSource for SimCamera {
    fn read_frame(&mut self) -> Result<Frame> {
        Ok(Frame::filled(self.width, self.height, self.background))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Point;
    use crate::tracker::classify_fingers;
    use std::sync::mpsc;

    #[test]
    fn synthesised_hand_classifies_as_intended() {
        for n in 0..=5 {
            let hand = SimHand::with_fingers(n).at(0.4, 0.6);
            for (w, h) in [(640, 480), (1380, 820), (320, 240)] {
                let state = classify_fingers(&hand.pixel_landmarks(w, h)).unwrap();
                assert_eq!(state, hand.intended(), "{} fingers at {}x{}", n, w, h);
                assert_eq!(state.count(), n);
            }
        }
    }

    #[test]
    fn one_finger_is_the_index() {
        let state = SimHand::with_fingers(1).intended();
        assert!(state.is_extended(Finger::Index));
        assert_eq!(state.count(), 1);
    }

    #[test]
    fn index_tip_sits_on_pointer() {
        let set = SimHand::with_fingers(3).at(0.25, 0.75).pixel_landmarks(800, 600);
        assert_eq!(set.fingertip(), Some(Point::new(200, 450)));
    }

    #[test]
    fn apply_clamps_inputs() {
        let mut hand = SimHand::default();
        hand.apply(SimInput::Fingers(9));
        hand.apply(SimInput::Pointer { x: 1.5, y: -0.2 });
        assert_eq!(hand.fingers, 5);
        assert_eq!(hand.pointer, NormalizedPoint::new(1.0, 0.0));
    }

    #[test]
    fn provider_drains_channel_and_hides_hand() {
        let (tx, rx) = mpsc::channel();
        let mut provider = SimProvider::new(rx);
        let frame = Frame::blank(640, 480);
        let params = DetectionParams::default();

        tx.send(SimInput::Fingers(2)).unwrap();
        assert_eq!(provider.detect(&frame, &params).unwrap().len(), 1);
        assert_eq!(provider.hand().fingers, 2);

        tx.send(SimInput::ToggleHand).unwrap();
        assert!(provider.detect(&frame, &params).unwrap().is_empty());
    }

    #[test]
    fn provider_keeps_working_after_sender_dropped() {
        let (tx, rx) = mpsc::channel();
        let mut provider = SimProvider::new(rx);
        drop(tx);
        let hands = provider.detect(&Frame::blank(10, 10), &DetectionParams::default()).unwrap();
        assert_eq!(hands.len(), 1);
    }

    #[test]
    fn camera_fills_frames() {
        let mut cam = SimCamera::new(8, 6, 0x00202020);
        let frame = cam.read_frame().unwrap();
        assert!(frame.has_image());
        assert!(frame.pixels.iter().all(|&p| p == 0x00202020));
    }
}
