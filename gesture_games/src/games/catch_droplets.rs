//! Catch the Droplets: droplets fall from the top; move the bucket with the
//! index fingertip to catch them.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;

use hand_tracking::{Gesture, Point};

use crate::config::{DropletsConfig, Palette};
use crate::menu::GameId;
use crate::session::{Arena, ArcadePolicy, GameObject, Probe, Rect, Scene};

pub const DROPLET_RADIUS: i32 = 15;
/// Horizontal spawn spread either side of the center.
pub const SPAWN_MARGIN: i32 = 200;
/// Gap between the bucket's bottom edge and the bottom of the frame.
pub const BUCKET_FLOOR_GAP: i32 = 30;
pub const POINTS_PER_CATCH: u32 = 5;

pub struct CatchDroplets {
    levels:        u32,
    level_seconds: u32,
    bucket_w:      i32,
    bucket_h:      i32,
    colors:        [u32; 5],
}

impl CatchDroplets {
    pub fn new(limits: &DropletsConfig, palette: &Palette) -> Self {
        CatchDroplets {
            levels:        limits.levels,
            level_seconds: limits.level_seconds,
            bucket_w:      limits.bucket_width as i32,
            bucket_h:      limits.bucket_height as i32,
            colors:        palette.game_colors(),
        }
    }

    /// Downward speed range, pixels per frame, at `level`.
    pub fn speed_range(level: u32) -> (i32, i32) {
        let l = level as i32;
        (3 + l, 6 + l)
    }

    /// Bucket under the fingertip, kept inside the frame; centered when
    /// no hand is seen.
    pub fn bucket(&self, fingertip: Option<Point>, arena: &Arena) -> Rect {
        let y = arena.height - self.bucket_h - BUCKET_FLOOR_GAP;
        let x = match fingertip {
            Some(tip) => (tip.x - self.bucket_w / 2).clamp(0, (arena.width - self.bucket_w).max(0)),
            None => arena.width / 2 - self.bucket_w / 2,
        };
        Rect::new(x, y, self.bucket_w, self.bucket_h)
    }
}

impl ArcadePolicy for CatchDroplets {
    fn id(&self) -> GameId {
        GameId::CatchDroplets
    }

    fn levels(&self) -> u32 {
        self.levels
    }

    fn level_duration(&self) -> Duration {
        Duration::from_secs(self.level_seconds as u64)
    }

    fn spawn_interval(&self, level: u32) -> u64 {
        (25 - 5 * (level as i64 - 1)).max(10) as u64
    }

    fn spawn(&self, level: u32, arena: &Arena, rng: &mut StdRng) -> GameObject {
        let cx = arena.width / 2;
        let x = rng.random_range(cx - SPAWN_MARGIN..=cx + SPAWN_MARGIN);
        let (lo, hi) = Self::speed_range(level);
        let speed = rng.random_range(lo..=hi);
        let color = self.colors[rng.random_range(0..self.colors.len())];
        GameObject::new(Point::new(x, -10), (0, speed), DROPLET_RADIUS, color)
    }

    fn probe(&self, gesture: &Gesture, arena: &Arena) -> Probe {
        Probe::Rect(self.bucket(gesture.fingertip_position(), arena))
    }

    fn points_per_hit(&self) -> u32 {
        POINTS_PER_CATCH
    }

    fn decorate(&self, probe: &Probe, palette: &Palette, scene: &mut Scene) {
        if let Probe::Rect(bucket) = probe {
            scene.rect(*bucket, palette.orange, true);
            scene.rect(*bucket, palette.white, false);
        }
    }
}
