//! Shape Drawing: trace a triangle, circle, square and star. Completion
//! time and hand jitter are tracked per level.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::Rng;

use hand_tracking::Point;

use crate::config::ShapeDrawingConfig;
use crate::drawing::interpolate_per_edge;
use crate::menu::GameId;
use crate::session::Arena;
use crate::sketch::ShapePolicy;

/// Half-size of every shape.
pub const SHAPE_OFFSET: i32 = 150;
pub const SAMPLES_PER_EDGE: usize = 20;

pub struct ShapeDrawing {
    levels: u32,
}

impl ShapeDrawing {
    pub fn new(limits: &ShapeDrawingConfig) -> Self {
        ShapeDrawing { levels: limits.levels }
    }
}

pub fn shape_for_level(level: u32, arena: &Arena, rng: &mut StdRng) -> Vec<Point> {
    let Point { x: cx, y: cy } = arena.center();
    let o = SHAPE_OFFSET;
    match level {
        // Triangle
        1 => vec![Point::new(cx, cy - o), Point::new(cx - o, cy + o), Point::new(cx + o, cy + o)],
        // Circle as ten dots
        2 => (0..10)
            .map(|i| {
                let angle = 2.0 * PI * i as f64 / 10.0;
                Point::new(
                    (cx as f64 + o as f64 * angle.cos()) as i32,
                    (cy as f64 + o as f64 * angle.sin()) as i32,
                )
            })
            .collect(),
        // Square
        3 => vec![
            Point::new(cx - o, cy - o),
            Point::new(cx - o, cy + o),
            Point::new(cx + o, cy + o),
            Point::new(cx + o, cy - o),
        ],
        // Star
        4 => vec![
            Point::new(cx,      cy - o),
            Point::new(cx + 50, cy - 50),
            Point::new(cx + o,  cy),
            Point::new(cx + 50, cy + 50),
            Point::new(cx,      cy + o),
            Point::new(cx - 50, cy + 50),
            Point::new(cx - o,  cy),
            Point::new(cx - 50, cy - 50),
        ],
        _ => (0..3 + level)
            .map(|_| Point::new(cx + rng.random_range(-o..=o), cy + rng.random_range(-o..=o)))
            .collect(),
    }
}

impl ShapePolicy for ShapeDrawing {
    fn id(&self) -> GameId {
        GameId::ShapeDrawing
    }

    fn levels(&self) -> u32 {
        self.levels
    }

    fn target(&self, level: u32, arena: &Arena, rng: &mut StdRng) -> Vec<Point> {
        shape_for_level(level, arena, rng)
    }

    fn ideal_path(&self, target: &[Point]) -> Vec<Point> {
        interpolate_per_edge(target, SAMPLES_PER_EDGE)
    }

    fn timed(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn arena() -> Arena {
        Arena::new(1380, 820)
    }

    #[test]
    fn shapes_have_the_right_corner_counts() {
        let mut rng = StdRng::seed_from_u64(0);
        let counts: Vec<usize> = (1..=4).map(|l| shape_for_level(l, &arena(), &mut rng).len()).collect();
        assert_eq!(counts, vec![3, 10, 4, 8]);
        assert_eq!(shape_for_level(6, &arena(), &mut rng).len(), 9);
    }

    #[test]
    fn circle_points_sit_on_the_radius() {
        let mut rng = StdRng::seed_from_u64(0);
        let center = arena().center();
        for p in shape_for_level(2, &arena(), &mut rng) {
            let r = p.distance(center);
            assert!((147.0..=152.0).contains(&r), "{:?} at {}", p, r);
        }
    }

    #[test]
    fn ideal_path_samples_every_edge() {
        let policy = ShapeDrawing::new(&ShapeDrawingConfig { levels: 4 });
        let mut rng = StdRng::seed_from_u64(0);
        let square = policy.target(3, &arena(), &mut rng);
        let ideal = policy.ideal_path(&square);
        assert_eq!(ideal.len(), 4 * SAMPLES_PER_EDGE);
        assert_eq!(ideal[0], square[0]);
        assert_eq!(ideal[SAMPLES_PER_EDGE - 1], square[1]);
    }

    #[test]
    fn shape_drawing_is_timed() {
        assert!(ShapeDrawing::new(&ShapeDrawingConfig::default()).timed());
    }
}
