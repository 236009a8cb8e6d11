//! Color Match: touch the dots in the order of a hidden color sequence.
//!
//! Each level lays out twice as many dots as the sequence is long along the
//! horizontal midline. Even slots carry the sequence colors in order; each
//! odd slot is a decoy whose color differs from the dot before it. Touching
//! the next required color with a raised finger consumes that dot.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::Rng;

use hand_tracking::{Gesture, Point};
use score_ledger::tracker::round_to;
use score_ledger::ScoreTracker;

use crate::config::{ColorMatchConfig, Palette};
use crate::menu::GameId;
use crate::session::{draw_hud, draw_pointer, Arena, Game, GameObject, Outcome, Probe, Scene, Signal};

pub const DOT_RADIUS: i32 = 40;
/// Gap between the frame edges and the first/last dot slot.
pub const ROW_MARGIN: i32 = 150;
pub const POINTS_PER_DOT: u32 = 10;

pub struct ColorMatch {
    arena:   Arena,
    palette: Palette,
    colors:  [u32; 5],
    levels:  u32,
    sequence_length: usize,
    score:   ScoreTracker,
    rng:     StdRng,

    sequence: Vec<u32>,
    dots:     Vec<GameObject>,
    /// Index into `sequence` of the next color to touch.
    next:     usize,
    /// When the wait for the next touch began.
    move_started:   Option<Instant>,
    reaction_times: Vec<f64>,
    pointer:  Option<Point>,
}

impl ColorMatch {
    pub fn new(limits: &ColorMatchConfig, arena: Arena, palette: Palette, player: &str, rng: StdRng) -> Self {
        let colors = palette.game_colors();
        let mut game = ColorMatch {
            arena,
            palette,
            colors,
            levels: limits.levels,
            sequence_length: limits.sequence_length as usize,
            score: ScoreTracker::new(player),
            rng,
            sequence: Vec::new(),
            dots: Vec::new(),
            next: 0,
            move_started: None,
            reaction_times: Vec::new(),
            pointer: None,
        };
        game.lay_out();
        game
    }

    /// Draw a new sequence and place the dots for it.
    fn lay_out(&mut self) {
        let n = self.sequence_length;
        self.sequence = (0..n)
            .map(|_| self.colors[self.rng.random_range(0..self.colors.len())])
            .collect();

        let total = (2 * n) as i32;
        let y = self.arena.height / 2;
        let span = self.arena.width - 2 * ROW_MARGIN;
        self.dots = (0..2 * n)
            .map(|i| {
                let x = ROW_MARGIN + i as i32 * span / total;
                let anchor = self.sequence[i / 2];
                let color = if i % 2 == 0 {
                    anchor
                } else {
                    let decoys: Vec<u32> = self.colors.iter().copied().filter(|&c| c != anchor).collect();
                    if decoys.is_empty() {
                        anchor
                    } else {
                        decoys[self.rng.random_range(0..decoys.len())]
                    }
                };
                GameObject::new(Point::new(x, y), (0, 0), DOT_RADIUS, color)
            })
            .collect();
        self.next = 0;
        self.move_started = None;
        tracing::debug!("Color sequence for level {}: {:08X?}", self.score.level(), self.sequence);
    }

    pub fn sequence(&self) -> &[u32] {
        &self.sequence
    }

    pub fn dots(&self) -> &[GameObject] {
        &self.dots
    }

    pub fn next_color(&self) -> Option<u32> {
        self.sequence.get(self.next).copied()
    }

    pub fn reaction_times(&self) -> &[f64] {
        &self.reaction_times
    }
}

impl Game for ColorMatch {
    fn id(&self) -> GameId {
        GameId::ColorMatch
    }

    fn step(&mut self, gesture: &Gesture, signal: Signal, now: Instant) -> Outcome {
        if signal == Signal::Quit {
            return Outcome::Finished;
        }
        let waiting_since = *self.move_started.get_or_insert(now);
        self.pointer = gesture.fingertip_position();

        if let (Some(tip), Some(required)) = (gesture.pointer(), self.next_color()) {
            let probe = Probe::Point(tip);
            if let Some(dot) = self
                .dots
                .iter_mut()
                .find(|d| !d.consumed && d.color == required && d.is_hit_by(&probe))
            {
                dot.consumed = true;
                self.score.add_points(POINTS_PER_DOT);
                self.reaction_times.push(now.saturating_duration_since(waiting_since).as_secs_f64());
                self.move_started = Some(now);
                self.next += 1;
            }
        }

        if self.next < self.sequence.len() {
            return Outcome::Continue;
        }

        let level = self.score.level();
        tracing::info!("Color Match: level {} completed, score {}", level, self.score.score());
        if level >= self.levels {
            return Outcome::Finished;
        }
        self.score.set_level(level + 1);
        self.lay_out();
        Outcome::LevelComplete { next: level + 1 }
    }

    fn scene(&self, _now: Instant) -> Scene {
        let mut scene = Scene::new();
        for dot in self.dots.iter().filter(|d| !d.consumed) {
            scene.circle(dot.pos, dot.radius, dot.color);
        }
        draw_pointer(&mut scene, &self.palette, self.pointer);

        draw_hud(&mut scene, &self.palette, &self.score, self.levels);
        scene.text(30, 90, "Next Dot:", self.palette.yellow, 3);
        if let Some(color) = self.next_color() {
            scene.circle(Point::new(150, 160), 30, color);
        }
        if let Some(last) = self.reaction_times.last() {
            scene.text(30, 200, format!("Last Reaction Time: {:.2}s", last), self.palette.purple, 2);
        }
        scene
    }

    fn score(&self) -> &ScoreTracker {
        &self.score
    }

    /// Mean seconds between touches, three decimals.
    fn avg_reaction_time(&self) -> Option<f64> {
        if self.reaction_times.is_empty() {
            return None;
        }
        let mean = self.reaction_times.iter().sum::<f64>() / self.reaction_times.len() as f64;
        Some(round_to(mean, 3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hand_tracking::tracker::FingerState;
    use rand::SeedableRng;
    use std::time::Duration;

    fn game(levels: u32) -> ColorMatch {
        let limits = ColorMatchConfig { levels, sequence_length: 5 };
        ColorMatch::new(&limits, Arena::new(1380, 820), Palette::default(), "p", StdRng::seed_from_u64(11))
    }

    fn touch(at: Point) -> Gesture {
        Gesture::new(FingerState([false, true, false, false, false]), at)
    }

    /// Position of the first unconsumed dot carrying the next color.
    fn target(g: &ColorMatch) -> Point {
        let color = g.next_color().unwrap();
        g.dots().iter().find(|d| !d.consumed && d.color == color).unwrap().pos
    }

    #[test]
    fn layout_alternates_sequence_and_decoys() {
        let g = game(3);
        let dots = g.dots();
        assert_eq!(dots.len(), 10);
        for (i, dot) in dots.iter().enumerate() {
            assert_eq!(dot.pos, Point::new(150 + i as i32 * 1080 / 10, 410));
            assert_eq!(dot.radius, DOT_RADIUS);
            if i % 2 == 0 {
                assert_eq!(dot.color, g.sequence()[i / 2]);
            } else {
                assert_ne!(dot.color, g.sequence()[i / 2]);
            }
        }
    }

    #[test]
    fn wrong_color_is_ignored() {
        let t0 = Instant::now();
        let mut g = game(3);
        let required = g.next_color().unwrap();
        let wrong = g.dots().iter().find(|d| d.color != required).unwrap().pos;
        g.step(&touch(wrong), Signal::None, t0);
        assert_eq!(g.score().score(), 0);
        assert!(g.reaction_times().is_empty());
    }

    #[test]
    fn touching_in_order_clears_the_level() {
        let t0 = Instant::now();
        let mut g = game(2);
        g.step(&Gesture::default(), Signal::None, t0);

        let mut outcome = Outcome::Continue;
        for k in 1..=5u64 {
            let at = target(&g);
            outcome = g.step(&touch(at), Signal::None, t0 + Duration::from_millis(500 * k));
        }
        assert_eq!(outcome, Outcome::LevelComplete { next: 2 });
        assert_eq!(g.score().score(), 50);
        assert_eq!(g.reaction_times().len(), 5);
        assert_relative_eq!(g.avg_reaction_time().unwrap(), 0.5);
        // Fresh layout for level 2.
        assert!(g.dots().iter().all(|d| !d.consumed));
    }

    #[test]
    fn last_level_finishes_the_game() {
        let t0 = Instant::now();
        let mut g = game(1);
        let mut outcome = Outcome::Continue;
        for _ in 0..5 {
            let at = target(&g);
            outcome = g.step(&touch(at), Signal::None, t0);
        }
        assert_eq!(outcome, Outcome::Finished);
        assert_eq!(g.record(t0).game, "SequenceColorMatch");
    }

    #[test]
    fn fist_does_not_touch() {
        let t0 = Instant::now();
        let mut g = game(3);
        let at = target(&g);
        g.step(&Gesture::new(FingerState([false; 5]), at), Signal::None, t0);
        assert_eq!(g.score().score(), 0);
    }

    #[test]
    fn no_touches_means_no_reaction_time() {
        assert_eq!(game(3).avg_reaction_time(), None);
    }
}
