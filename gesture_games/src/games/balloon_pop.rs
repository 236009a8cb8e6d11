//! Balloon Pop: balloons float up from below the frame; touch one with a
//! raised finger to pop it.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;

use hand_tracking::{Gesture, Point};

use crate::config::{Palette, TimedLevels};
use crate::menu::GameId;
use crate::session::{Arena, ArcadePolicy, GameObject, Probe};

pub const BALLOON_RADIUS: i32 = 30;
/// Horizontal spawn spread either side of the center.
pub const SPAWN_MARGIN: i32 = 100;
pub const POINTS_PER_POP: u32 = 10;

pub struct BalloonPop {
    levels:        u32,
    level_seconds: u32,
    colors:        [u32; 5],
}

impl BalloonPop {
    pub fn new(limits: &TimedLevels, palette: &Palette) -> Self {
        BalloonPop {
            levels:        limits.levels,
            level_seconds: limits.level_seconds,
            colors:        palette.game_colors(),
        }
    }

    /// Upward speed range, pixels per frame, at `level`.
    pub fn speed_range(level: u32) -> (i32, i32) {
        let l = level as i32;
        (3 + 2 * l, 5 + 3 * l)
    }
}

impl ArcadePolicy for BalloonPop {
    fn id(&self) -> GameId {
        GameId::BalloonPop
    }

    fn levels(&self) -> u32 {
        self.levels
    }

    fn level_duration(&self) -> Duration {
        Duration::from_secs(self.level_seconds as u64)
    }

    fn spawn_interval(&self, level: u32) -> u64 {
        (20 - 5 * level as i64).max(5) as u64
    }

    fn spawn(&self, level: u32, arena: &Arena, rng: &mut StdRng) -> GameObject {
        let cx = arena.width / 2;
        let x = rng.random_range(cx - SPAWN_MARGIN..=cx + SPAWN_MARGIN);
        let (lo, hi) = Self::speed_range(level);
        let speed = rng.random_range(lo..=hi);
        let color = self.colors[rng.random_range(0..self.colors.len())];
        GameObject::new(Point::new(x, arena.height + BALLOON_RADIUS), (0, -speed), BALLOON_RADIUS, color)
    }

    fn probe(&self, gesture: &Gesture, _arena: &Arena) -> Probe {
        gesture.pointer().map(Probe::Point).unwrap_or_default()
    }

    fn points_per_hit(&self) -> u32 {
        POINTS_PER_POP
    }
}
