//! Connect the Dots: trace a line and two zigzags with one raised finger.

use rand::rngs::StdRng;
use rand::Rng;

use hand_tracking::Point;

use crate::config::DrawingConfig;
use crate::drawing::interpolate_by_step;
use crate::menu::GameId;
use crate::session::Arena;
use crate::sketch::ShapePolicy;

/// Spacing of the ideal path, in pixels.
pub const PATH_STEP: f64 = 5.0;

pub struct ConnectDots {
    levels: u32,
}

impl ConnectDots {
    pub fn new(limits: &DrawingConfig) -> Self {
        ConnectDots { levels: limits.levels }
    }
}

/// Dots for `level`: a line, a W, a seven-point zigzag, then random dots.
pub fn dots_for_level(level: u32, arena: &Arena, rng: &mut StdRng) -> Vec<Point> {
    let Point { x: cx, y: cy } = arena.center();
    let (ox, oy) = (150, 100);
    match level {
        1 => vec![Point::new(cx - ox, cy), Point::new(cx, cy), Point::new(cx + ox, cy)],
        2 => vec![
            Point::new(cx - ox,     cy + oy),
            Point::new(cx - ox / 2, cy - oy),
            Point::new(cx,          cy + oy),
            Point::new(cx + ox / 2, cy - oy),
            Point::new(cx + ox,     cy + oy),
        ],
        3 => (0..7)
            .map(|i| {
                let y = if i % 2 == 0 { cy - 100 } else { cy + 100 };
                Point::new(cx - 180 + i * 60, y)
            })
            .collect(),
        _ => (0..3 + level)
            .map(|_| Point::new(cx + rng.random_range(-150..=150), cy + rng.random_range(-150..=150)))
            .collect(),
    }
}

impl ShapePolicy for ConnectDots {
    fn id(&self) -> GameId {
        GameId::ConnectDots
    }

    fn levels(&self) -> u32 {
        self.levels
    }

    fn target(&self, level: u32, arena: &Arena, rng: &mut StdRng) -> Vec<Point> {
        dots_for_level(level, arena, rng)
    }

    fn ideal_path(&self, target: &[Point]) -> Vec<Point> {
        interpolate_by_step(target, PATH_STEP)
    }

    fn skips_stroke_start(&self) -> bool {
        true
    }
}
