//! # hand_tracking
//!
//! Turns the output of an external hand-landmark model into the small set of
//! signals the gesture games need.
//!
//! ```text
//! FrameSource ──frame──► LandmarkProvider ──normalized hands──► HandTracker
//!                                                                  │
//!                                   pixel LandmarkSet ◄────────────┘
//!                                          │
//!                                          ▼
//!                     Gesture { finger-state vector, index fingertip }
//! ```
//!
//! ## Landmark layout
//!
//! Hands are 21 ordered points in the MediaPipe convention: `0` is the
//! wrist, then four points per finger from the knuckle outward, so the tips
//! are `4` (thumb), `8` (index), `12` (middle), `16` (ring) and `20` (pinky).
//! See [`landmarks::index`].
//!
//! ## Providers
//!
//! | Provider | Frames from | Landmarks from |
//! |---|---|---|
//! | [`sim::SimProvider`] | [`sim::SimCamera`] | mouse + number keys |
//! | [`upstream::UpstreamLandmarks`] | [`upstream::UpstreamSource`] | external helper process (JSON lines) |
//! | `leap::LeapProvider` (feature `leap`) | [`sim::SimCamera`] | LeapMotion controller |
//!
//! ## Known limitation
//!
//! [`classify_fingers`] compares raw image coordinates. It is only correct
//! for an upright hand facing the camera in a mirrored frame; it is not
//! rotation-invariant.

pub mod error;
pub mod landmarks;
pub mod frame;
pub mod tracker;
pub mod gesture;
pub mod sim;
pub mod upstream;
#[cfg(feature = "leap")]
pub mod leap;

pub use error::{Result, TrackingError};
pub use frame::{DetectionParams, Frame, FrameSource, LandmarkProvider};
pub use gesture::Gesture;
pub use landmarks::{landmarks_to_pixels, LandmarkSet, NormalizedHand, NormalizedPoint, Point};
pub use tracker::{classify_fingers, Finger, FingerState, HandTracker};
