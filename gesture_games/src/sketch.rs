//! Engine shared by the two drawing games.
//!
//! A level shows a target polygon. While exactly one finger is raised the
//! index fingertip is appended to the drawn path; any other count lifts the
//! pen and ends the stroke. Games may drop the first point of each stroke. Every 20 drawn points the live accuracy is refreshed. Advance
//! (Space / N) resamples the drawing, scores it against the densified
//! target, adds `floor(accuracy)` points and moves to the next shape.

use std::time::Instant;

use rand::rngs::StdRng;

use hand_tracking::{Gesture, Point};
use score_ledger::tracker::round_to;
use score_ledger::ScoreTracker;

use crate::config::Palette;
use crate::drawing::{accuracy, jitter, resample, RESAMPLE_STEP};
use crate::menu::GameId;
use crate::session::{draw_hud, draw_pointer, Arena, Game, Outcome, Rect, Scene, Signal};

/// Drawn points between live accuracy refreshes.
pub const LIVE_ACCURACY_EVERY: usize = 20;
/// Trailing points used for the live jitter readout.
pub const LIVE_JITTER_WINDOW: usize = 10;

/// The per-game rules of a drawing game.
pub trait ShapePolicy {
    fn id(&self) -> GameId;
    fn levels(&self) -> u32;

    /// Target polygon for `level`.
    fn target(&self, level: u32, arena: &Arena, rng: &mut StdRng) -> Vec<Point>;

    /// The target densified into the path a perfect drawing would follow.
    fn ideal_path(&self, target: &[Point]) -> Vec<Point>;

    /// Whether completion time and jitter are tracked per level.
    fn timed(&self) -> bool {
        false
    }

    /// Whether a stroke starts recording on its second pen-down frame.
    fn skips_stroke_start(&self) -> bool {
        false
    }
}

/// Result of one submitted drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelResult {
    pub level:    u32,
    pub accuracy: f64,
    /// Seconds from the level's first frame to Advance.
    pub seconds:  f64,
    pub jitter:   f64,
}

pub struct DrawingSession<S: ShapePolicy> {
    policy:  S,
    arena:   Arena,
    palette: Palette,
    score:   ScoreTracker,
    rng:     StdRng,

    target:  Vec<Point>,
    ideal:   Vec<Point>,
    drawn:   Vec<Point>,
    live_accuracy: f64,
    level_started: Option<Instant>,
    results: Vec<LevelResult>,
    pointer: Option<Point>,
    pen_down: bool,
    /// A stroke is in progress; only a visible hand with another finger
    /// count ends it.
    stroke_open: bool,
}

impl<S: ShapePolicy> DrawingSession<S> {
    pub fn new(policy: S, arena: Arena, palette: Palette, player: &str, mut rng: StdRng) -> Self {
        let target = policy.target(1, &arena, &mut rng);
        let ideal = policy.ideal_path(&target);
        tracing::info!("{}: starting level 1", policy.id().title());
        DrawingSession {
            policy,
            arena,
            palette,
            score: ScoreTracker::new(player),
            rng,
            target,
            ideal,
            drawn: Vec::new(),
            live_accuracy: 0.0,
            level_started: None,
            results: Vec::new(),
            pointer: None,
            pen_down: false,
            stroke_open: false,
        }
    }

    pub fn target(&self) -> &[Point] {
        &self.target
    }

    pub fn ideal(&self) -> &[Point] {
        &self.ideal
    }

    pub fn drawn(&self) -> &[Point] {
        &self.drawn
    }

    pub fn live_accuracy(&self) -> f64 {
        self.live_accuracy
    }

    pub fn results(&self) -> &[LevelResult] {
        &self.results
    }

    pub fn level(&self) -> u32 {
        self.score.level()
    }

    /// Jitter of the last few drawn points.
    pub fn live_jitter(&self) -> f64 {
        let from = self.drawn.len().saturating_sub(LIVE_JITTER_WINDOW);
        jitter(&self.drawn[from..])
    }

    /// Mean jitter over the submitted levels, two decimals.
    pub fn average_jitter(&self) -> Option<f64> {
        if !self.policy.timed() || self.results.is_empty() {
            return None;
        }
        let sum: f64 = self.results.iter().map(|r| r.jitter).sum();
        Some(round_to(sum / self.results.len() as f64, 2))
    }

    fn submit(&mut self, started: Instant, now: Instant) -> Outcome {
        let level = self.score.level();
        let resampled = resample(&self.drawn, RESAMPLE_STEP);
        let acc = accuracy(&resampled, &self.ideal);
        self.score.add_points(acc.floor() as u32);

        let result = LevelResult {
            level,
            accuracy: acc,
            seconds:  now.saturating_duration_since(started).as_secs_f64(),
            jitter:   jitter(&self.drawn),
        };
        if self.policy.timed() {
            tracing::info!(
                "{}: level {} accuracy {}%, {:.2}s, jitter {:.2}px",
                self.policy.id().title(),
                level,
                acc,
                result.seconds,
                result.jitter
            );
        } else {
            tracing::info!("{}: level {} accuracy {}%", self.policy.id().title(), level, acc);
        }
        self.results.push(result);

        if level >= self.policy.levels() {
            if let Some(j) = self.average_jitter() {
                tracing::info!("{}: average jitter per level {:.2}px", self.policy.id().title(), j);
            }
            return Outcome::Finished;
        }

        let next = level + 1;
        self.score.set_level(next);
        self.target = self.policy.target(next, &self.arena, &mut self.rng);
        self.ideal = self.policy.ideal_path(&self.target);
        tracing::debug!("Level {} target: {:?}", next, self.target);
        self.drawn.clear();
        self.live_accuracy = 0.0;
        self.level_started = None;
        self.pen_down = false;
        self.stroke_open = false;
        Outcome::LevelComplete { next }
    }
}

impl<S: ShapePolicy> Game for DrawingSession<S> {
    fn id(&self) -> GameId {
        self.policy.id()
    }

    fn step(&mut self, gesture: &Gesture, signal: Signal, now: Instant) -> Outcome {
        let started = *self.level_started.get_or_insert(now);
        match signal {
            Signal::Quit => return Outcome::Finished,
            Signal::Advance => return self.submit(started, now),
            Signal::None => {}
        }

        self.pointer = gesture.fingertip_position();
        self.pen_down = gesture.is_drawing_mode();
        match self.pointer {
            Some(tip) if self.pen_down => {
                if self.stroke_open || !self.policy.skips_stroke_start() {
                    self.drawn.push(tip);
                }
                self.stroke_open = true;
            }
            Some(_) => self.stroke_open = false,
            None => {}
        }

        if !self.drawn.is_empty() && self.drawn.len() % LIVE_ACCURACY_EVERY == 0 {
            self.live_accuracy = accuracy(&self.drawn, &self.ideal);
        }
        Outcome::Continue
    }

    fn scene(&self, _now: Instant) -> Scene {
        let mut scene = Scene::new();
        scene.polygon(&self.target, self.palette.blue, 2);
        for &p in &self.target {
            scene.circle(p, 10, self.palette.red);
        }
        scene.polyline(&self.drawn, self.palette.green, 3);
        draw_pointer(&mut scene, &self.palette, self.pointer);

        draw_hud(&mut scene, &self.palette, &self.score, self.policy.levels());

        let meter = Rect::new(30, self.arena.height - 60, 300, 25);
        let color = if self.live_accuracy > 80.0 {
            self.palette.green
        } else if self.live_accuracy > 50.0 {
            self.palette.yellow
        } else {
            self.palette.red
        };
        scene.meter(meter, self.live_accuracy / 100.0, color, self.palette.white);
        scene.text(40, self.arena.height - 85, format!("Accuracy: {:.1}%", self.live_accuracy), self.palette.white, 2);

        if self.policy.timed() {
            scene.text(30, 90, format!("Jitter: {:.2}px", self.live_jitter()), self.palette.orange, 3);
        }
        let hint = if self.pen_down { "Drawing" } else { "Raise one finger to draw, Space to submit" };
        scene.text(30, 130, hint, self.palette.text, 2);
        scene
    }

    fn score(&self) -> &ScoreTracker {
        &self.score
    }

    /// Mean completion time per submitted level, two decimals. Only timed
    /// games report one.
    fn avg_reaction_time(&self) -> Option<f64> {
        if !self.policy.timed() || self.results.is_empty() {
            return None;
        }
        let sum: f64 = self.results.iter().map(|r| r.seconds).sum();
        Some(round_to(sum / self.results.len() as f64, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::interpolate_by_step;
    use approx::assert_relative_eq;
    use hand_tracking::tracker::FingerState;
    use rand::SeedableRng;
    use std::time::Duration;

    /// A horizontal segment at y = 100 every level.
    struct Segment {
        timed: bool,
        skip_start: bool,
    }

    impl ShapePolicy for Segment {
        fn id(&self) -> GameId { GameId::ShapeDrawing }
        fn levels(&self) -> u32 { 2 }
        fn target(&self, _level: u32, _arena: &Arena, _rng: &mut StdRng) -> Vec<Point> {
            vec![Point::new(100, 100), Point::new(300, 100)]
        }
        fn ideal_path(&self, target: &[Point]) -> Vec<Point> {
            interpolate_by_step(target, 5.0)
        }
        fn timed(&self) -> bool { self.timed }
        fn skips_stroke_start(&self) -> bool { self.skip_start }
    }

    fn session(timed: bool) -> DrawingSession<Segment> {
        DrawingSession::new(Segment { timed, skip_start: false }, Arena::new(640, 480), Palette::default(), "p", StdRng::seed_from_u64(5))
    }

    fn one_finger(x: i32, y: i32) -> Gesture {
        Gesture::new(FingerState([false, true, false, false, false]), Point::new(x, y))
    }

    fn two_fingers(x: i32, y: i32) -> Gesture {
        Gesture::new(FingerState([false, true, true, false, false]), Point::new(x, y))
    }

    #[test]
    fn only_one_finger_draws() {
        let t0 = Instant::now();
        let mut s = session(false);
        s.step(&one_finger(100, 100), Signal::None, t0);
        s.step(&two_fingers(110, 100), Signal::None, t0);
        s.step(&Gesture::default(), Signal::None, t0);
        s.step(&one_finger(120, 100), Signal::None, t0);
        assert_eq!(s.drawn(), &[Point::new(100, 100), Point::new(120, 100)]);
    }

    #[test]
    fn stroke_start_can_be_skipped() {
        let t0 = Instant::now();
        let segment = Segment { timed: false, skip_start: true };
        let mut s = DrawingSession::new(segment, Arena::new(640, 480), Palette::default(), "p", StdRng::seed_from_u64(5));
        s.step(&one_finger(100, 100), Signal::None, t0);
        s.step(&two_fingers(110, 100), Signal::None, t0);
        s.step(&one_finger(120, 100), Signal::None, t0);
        s.step(&one_finger(130, 100), Signal::None, t0);
        // Losing the hand does not end the stroke.
        s.step(&Gesture::default(), Signal::None, t0);
        s.step(&one_finger(140, 100), Signal::None, t0);
        assert_eq!(s.drawn(), &[Point::new(130, 100), Point::new(140, 100)]);

        s.step(&Gesture::default(), Signal::Advance, t0);
        s.step(&one_finger(150, 100), Signal::None, t0);
        assert!(s.drawn().is_empty());
    }

    #[test]
    fn live_accuracy_refreshes_every_twenty_points() {
        let t0 = Instant::now();
        let mut s = session(false);
        for i in 0..19 {
            s.step(&one_finger(100 + i * 5, 100), Signal::None, t0);
        }
        assert_eq!(s.live_accuracy(), 0.0);
        s.step(&one_finger(195, 100), Signal::None, t0);
        assert_relative_eq!(s.live_accuracy(), 100.0);
    }

    #[test]
    fn advance_scores_floor_of_accuracy() {
        let t0 = Instant::now();
        let mut s = session(false);
        // 25 px off the line: every point scores 0.5.
        for i in 0..10 {
            s.step(&one_finger(100 + i * 20, 125), Signal::None, t0);
        }
        let outcome = s.step(&Gesture::default(), Signal::Advance, t0);
        assert_eq!(outcome, Outcome::LevelComplete { next: 2 });
        assert_eq!(s.score().score(), 50);
        assert!(s.drawn().is_empty());
        assert_eq!(s.level(), 2);
    }

    #[test]
    fn empty_submission_scores_zero() {
        let t0 = Instant::now();
        let mut s = session(false);
        s.step(&Gesture::default(), Signal::Advance, t0);
        assert_eq!(s.score().score(), 0);
        assert_eq!(s.results()[0].accuracy, 0.0);
    }

    #[test]
    fn advancing_past_the_last_level_finishes() {
        let t0 = Instant::now();
        let mut s = session(false);
        assert_eq!(s.step(&Gesture::default(), Signal::Advance, t0), Outcome::LevelComplete { next: 2 });
        assert_eq!(s.step(&Gesture::default(), Signal::Advance, t0), Outcome::Finished);
        assert_eq!(s.avg_reaction_time(), None);
        assert_eq!(s.record(t0).avg_reaction_time, None);
    }

    #[test]
    fn timed_games_average_completion_time() {
        let t0 = Instant::now();
        let mut s = session(true);
        s.step(&one_finger(100, 100), Signal::None, t0);
        s.step(&one_finger(103, 104), Signal::None, t0);
        s.step(&Gesture::default(), Signal::Advance, t0 + Duration::from_secs(4));

        let t1 = t0 + Duration::from_secs(10);
        s.step(&Gesture::default(), Signal::None, t1);
        s.step(&Gesture::default(), Signal::Advance, t1 + Duration::from_secs(3));

        assert_relative_eq!(s.avg_reaction_time().unwrap(), 3.5);
        assert_relative_eq!(s.results()[0].jitter, 5.0);
        assert_relative_eq!(s.average_jitter().unwrap(), 2.5);
    }

    #[test]
    fn quit_finishes_immediately() {
        let t0 = Instant::now();
        let mut s = session(false);
        s.step(&one_finger(100, 100), Signal::None, t0);
        assert_eq!(s.step(&one_finger(100, 100), Signal::Quit, t0), Outcome::Finished);
        assert_eq!(s.drawn().len(), 1);
    }
}
