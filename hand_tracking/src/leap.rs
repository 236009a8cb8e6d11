//! LeapMotion landmark provider (feature = "leap").
//!
//! Requires the `leap` feature flag and the LeapC shared library installed.
//!
//! # Mapping
//!
//! Leap reports each digit as four bones. The 21-point layout is rebuilt as
//! wrist, then for every digit the proximal, intermediate and distal
//! `prev_joint`s plus the distal `next_joint` (the tip). The wrist is taken
//! from the middle finger's metacarpal base.
//!
//! Leap works in millimetres, y up. Positions are projected onto the
//! image plane through a fixed interaction box above the device, with y
//! flipped so that image rows grow downward.

use leaprs::*;

use crate::error::{Result, TrackingError};
use crate::frame::{DetectionParams, Frame, LandmarkProvider};
use crate::landmarks::{NormalizedHand, NormalizedPoint};

// Interaction box (mm) mapped onto the unit square.
const BOX_X_MIN: f32 = -200.0;
const BOX_X_MAX: f32 =  200.0;
const BOX_Y_MIN: f32 =  100.0;
const BOX_Y_MAX: f32 =  450.0;

/// Poll timeout per detection, in milliseconds.
const POLL_MS: u32 = 5;

pub struct LeapProvider {
    connection: Connection,
    /// Hands from the most recent tracking event; reused between events.
    latest:     Vec<NormalizedHand>,
}

impl LeapProvider {
    pub fn open() -> Result<Self> {
        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|e| TrackingError::Provider(format!("Failed to open LeapC connection: {:?}", e)))?;
        connection
            .open()
            .map_err(|e| TrackingError::Provider(format!("Failed to open LeapMotion device: {:?}", e)))?;
        tracing::info!("LeapMotion connection open");
        Ok(LeapProvider { connection, latest: Vec::new() })
    }
}

impl LandmarkProvider for LeapProvider {
    fn detect(&mut self, _frame: &Frame, params: &DetectionParams) -> Result<Vec<NormalizedHand>> {
        // A failed or non-tracking poll keeps the previous hands.
        if let Ok(msg) = self.connection.poll(POLL_MS) {
            if let Event::Tracking(frame) = msg.event() {
                self.latest = frame
                    .hands()
                    .take(params.max_hands)
                    .map(|hand| hand_landmarks(&hand))
                    .collect();
            }
        }
        Ok(self.latest.clone())
    }
}

fn project(x: f32, y: f32) -> NormalizedPoint {
    let nx = (x - BOX_X_MIN) / (BOX_X_MAX - BOX_X_MIN);
    let ny = (y - BOX_Y_MIN) / (BOX_Y_MAX - BOX_Y_MIN);
    NormalizedPoint::new(nx, 1.0 - ny)
}

macro_rules! joint {
    ($j:expr) => {{
        let v = $j;
        project(v.x, v.y)
    }};
}

fn hand_landmarks(hand: &Hand) -> NormalizedHand {
    let digits: Vec<_> = hand.digits().collect();
    let mut landmarks = Vec::with_capacity(21);

    if let Some(middle) = digits.get(2) {
        landmarks.push(joint!(middle.metacarpal().prev_joint()));
    }
    for digit in &digits {
        landmarks.push(joint!(digit.proximal().prev_joint()));
        landmarks.push(joint!(digit.intermediate().prev_joint()));
        landmarks.push(joint!(digit.distal().prev_joint()));
        landmarks.push(joint!(digit.distal().next_joint()));
    }
    NormalizedHand::new(landmarks)
}
