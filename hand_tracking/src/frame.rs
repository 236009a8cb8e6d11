//! Frames and the two external seams: where frames come from and who finds
//! hands in them.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::landmarks::NormalizedHand;

// ════════════════════════════════════════════════════════════════════════════
// Frame
// ════════════════════════════════════════════════════════════════════════════

/// One captured image.
///
/// `pixels` is packed `0x00RRGGBB`, row-major, `width * height` long, or
/// empty when the producer has no image to show (the renderer then paints
/// its own background). `upstream` carries hands that the frame producer
/// already detected itself, for sources that bundle capture and detection.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub width:    u32,
    pub height:   u32,
    pub pixels:   Vec<u32>,
    pub upstream: Option<Vec<NormalizedHand>>,
}

impl Frame {
    /// A frame with no image data.
    pub fn blank(width: u32, height: u32) -> Self {
        Frame { width, height, pixels: Vec::new(), upstream: None }
    }

    /// A frame filled with one color.
    pub fn filled(width: u32, height: u32, color: u32) -> Self {
        Frame {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
            upstream: None,
        }
    }

    pub fn with_upstream_hands(mut self, hands: Vec<NormalizedHand>) -> Self {
        self.upstream = Some(hands);
        self
    }

    pub fn has_image(&self) -> bool {
        !self.pixels.is_empty() && self.pixels.len() == self.width as usize * self.height as usize
    }
}

// ════════════════════════════════════════════════════════════════════════════
// DetectionParams
// ════════════════════════════════════════════════════════════════════════════

/// Fixed detector configuration, read once at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionParams {
    /// Upper bound on hands returned per frame.
    pub max_hands: usize,
    /// Minimum confidence for a new detection (0.0–1.0).
    pub detection_confidence: f32,
    /// Minimum confidence to keep tracking a hand (0.0–1.0).
    pub tracking_confidence: f32,
}

impl Default for DetectionParams {
    fn default() -> Self {
        DetectionParams {
            max_hands:            1,
            detection_confidence: 0.7,
            tracking_confidence:  0.7,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Seams
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can produce frames, one per call.
///
/// An `Err` means the source is unusable for now; the caller ends its
/// current loop rather than retrying.
pub trait FrameSource {
    fn read_frame(&mut self) -> Result<Frame>;
}

/// The hand-landmark model, treated as an opaque capability.
///
/// Returns zero or more hands; zero is the normal "no gesture" case, not an
/// error. Implementations may return more than `params.max_hands`; the
/// tracker truncates.
pub trait LandmarkProvider {
    fn detect(&mut self, frame: &Frame, params: &DetectionParams) -> Result<Vec<NormalizedHand>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_frame_has_image() {
        let f = Frame::filled(4, 3, 0x00112233);
        assert!(f.has_image());
        assert_eq!(f.pixels.len(), 12);
    }

    #[test]
    fn blank_frame_has_no_image() {
        let f = Frame::blank(640, 480);
        assert!(!f.has_image());
        assert!(f.upstream.is_none());
    }

    #[test]
    fn detection_defaults_match_single_hand_setup() {
        let p = DetectionParams::default();
        assert_eq!(p.max_hands, 1);
        assert_eq!(p.detection_confidence, 0.7);
        assert_eq!(p.tracking_confidence, 0.7);
    }
}
