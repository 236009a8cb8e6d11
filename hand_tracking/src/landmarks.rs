//! Landmark geometry: normalized model output and pixel-space sets.

use serde::{Deserialize, Serialize};

/// Number of landmarks the hand model reports per hand.
pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices (MediaPipe hand landmark convention).
#[allow(dead_code)]
pub mod index {
    pub const WRIST:      usize = 0;
    pub const THUMB_CMC:  usize = 1;
    pub const THUMB_MCP:  usize = 2;
    pub const THUMB_IP:   usize = 3;
    pub const THUMB_TIP:  usize = 4;
    pub const INDEX_MCP:  usize = 5;
    pub const INDEX_PIP:  usize = 6;
    pub const INDEX_DIP:  usize = 7;
    pub const INDEX_TIP:  usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP:   usize = 13;
    pub const RING_PIP:   usize = 14;
    pub const RING_DIP:   usize = 15;
    pub const RING_TIP:   usize = 16;
    pub const PINKY_MCP:  usize = 17;
    pub const PINKY_PIP:  usize = 18;
    pub const PINKY_DIP:  usize = 19;
    pub const PINKY_TIP:  usize = 20;
}

/// Fingertip landmark ids in finger-state order: thumb, index, middle, ring, pinky.
pub const TIP_IDS: [usize; 5] = [
    index::THUMB_TIP,
    index::INDEX_TIP,
    index::MIDDLE_TIP,
    index::RING_TIP,
    index::PINKY_TIP,
];

// ════════════════════════════════════════════════════════════════════════════
// Point: integer pixel coordinate
// ════════════════════════════════════════════════════════════════════════════

/// A pixel position. `y` grows downward, as in every image buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to `other`, in pixels.
    pub fn distance(self, other: Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx.hypot(dy)
    }

    pub fn offset(self, dx: i32, dy: i32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Normalized model output
// ════════════════════════════════════════════════════════════════════════════

/// A landmark as the model reports it: fractions of the frame width/height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f32,
    pub y: f32,
}

impl NormalizedPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        NormalizedPoint { x, y }
    }
}

/// One detected hand in normalized coordinates.
///
/// Providers should deliver [`LANDMARK_COUNT`] points, but partial detections
/// are representable; they simply never classify into a gesture.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedHand {
    pub landmarks: Vec<NormalizedPoint>,
}

impl NormalizedHand {
    pub fn new(landmarks: Vec<NormalizedPoint>) -> Self {
        NormalizedHand { landmarks }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSet: one hand, one frame, pixel space
// ════════════════════════════════════════════════════════════════════════════

/// Pixel-space landmarks of one hand in one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LandmarkSet {
    points: Vec<Point>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Point>) -> Self {
        LandmarkSet { points }
    }

    /// Landmark by id, `None` when the detection was partial.
    pub fn get(&self, id: usize) -> Option<Point> {
        self.points.get(id).copied()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when all [`LANDMARK_COUNT`] landmarks are present.
    pub fn is_complete(&self) -> bool {
        self.points.len() >= LANDMARK_COUNT
    }

    /// Index fingertip (landmark 8).
    pub fn fingertip(&self) -> Option<Point> {
        self.get(index::INDEX_TIP)
    }
}

/// Convert one normalized hand to pixel space: `round(value * dimension)`.
pub fn landmarks_to_pixels(hand: &NormalizedHand, width: u32, height: u32) -> LandmarkSet {
    let (w, h) = (width as f32, height as f32);
    let points = hand
        .landmarks
        .iter()
        .map(|lm| Point::new((lm.x * w).round() as i32, (lm.y * h).round() as i32))
        .collect();
    LandmarkSet::new(points)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pixels_are_rounded_products() {
        let hand = NormalizedHand::new(vec![
            NormalizedPoint::new(0.5, 0.5),
            NormalizedPoint::new(0.1234, 0.9876),
            NormalizedPoint::new(0.0, 1.0),
        ]);
        let set = landmarks_to_pixels(&hand, 640, 480);
        assert_eq!(set.get(0), Some(Point::new(320, 240)));
        // 0.1234 * 640 = 78.976, 0.9876 * 480 = 474.048
        assert_eq!(set.get(1), Some(Point::new(79, 474)));
        assert_eq!(set.get(2), Some(Point::new(0, 480)));
    }

    #[test]
    fn pixel_conversion_is_deterministic() {
        let hand = NormalizedHand::new(vec![NormalizedPoint::new(0.37, 0.61); LANDMARK_COUNT]);
        assert_eq!(
            landmarks_to_pixels(&hand, 1380, 820),
            landmarks_to_pixels(&hand, 1380, 820)
        );
    }

    #[test]
    fn partial_set_has_no_fingertip() {
        let set = LandmarkSet::new(vec![Point::new(1, 1); 5]);
        assert!(!set.is_complete());
        assert_eq!(set.fingertip(), None);
        assert_eq!(set.get(20), None);
    }

    #[test]
    fn distance_is_euclidean() {
        assert_relative_eq!(Point::new(0, 0).distance(Point::new(3, 4)), 5.0);
        assert_relative_eq!(Point::new(100, 100).distance(Point::new(110, 100)), 10.0);
    }

    #[test]
    fn tip_ids_follow_finger_order() {
        assert_eq!(TIP_IDS, [4, 8, 12, 16, 20]);
    }
}
