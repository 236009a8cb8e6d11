//! Game sessions.
//!
//! Every game is a [`Game`]: stepped once per frame with the current
//! [`Gesture`] and keyboard [`Signal`], and asked for a [`Scene`] to draw.
//!
//! The two object games (balloons, droplets) share one engine,
//! [`ArcadeSession`], parameterized by an [`ArcadePolicy`] that decides
//! spawn cadence, spawn placement, the hit probe and the points per hit.
//! Per frame the engine:
//!
//! 1. advances every object by its velocity,
//! 2. hit-tests every unconsumed object against the probe,
//! 3. drops consumed objects and objects fully outside the arena,
//! 4. spawns on the level's frame cadence,
//! 5. ends the level when its timer runs out.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;

use hand_tracking::{Gesture, Point};
use score_ledger::{LedgerRecord, ScoreTracker, SessionSummary};

use crate::config::Palette;
use crate::menu::GameId;

// ════════════════════════════════════════════════════════════════════════════
// Per-frame I/O
// ════════════════════════════════════════════════════════════════════════════

/// Keyboard signal for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Signal {
    #[default]
    None,
    /// Esc / Q: end the session, keeping the score.
    Quit,
    /// Space / N: submit the current drawing.
    Advance,
}

/// What a step did to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// A level ended; `next` is about to start.
    LevelComplete { next: u32 },
    /// The session is over. Further steps are not expected.
    Finished,
}

// ════════════════════════════════════════════════════════════════════════════
// Geometry
// ════════════════════════════════════════════════════════════════════════════

/// The playing field, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arena {
    pub width:  i32,
    pub height: i32,
}

impl Arena {
    pub fn new(width: u32, height: u32) -> Self {
        Arena { width: width as i32, height: height as i32 }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2, self.height / 2)
    }

    /// True when a circle at `pos` lies entirely beyond some edge.
    pub fn is_fully_outside(&self, pos: Point, radius: i32) -> bool {
        pos.x + radius < 0
            || pos.x - radius > self.width
            || pos.y + radius < 0
            || pos.y - radius > self.height
    }
}

/// Axis-aligned rectangle; `(x, y)` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    /// Strictly inside; points on the border are out.
    pub fn contains(&self, p: Point) -> bool {
        self.x < p.x && p.x < self.x + self.w && self.y < p.y && p.y < self.y + self.h
    }
}

/// What the hand is hitting with this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Probe {
    #[default]
    None,
    Point(Point),
    Rect(Rect),
}

/// A balloon, droplet or color dot.
#[derive(Clone, Debug, PartialEq)]
pub struct GameObject {
    pub pos:      Point,
    /// Pixels per frame.
    pub velocity: (i32, i32),
    pub radius:   i32,
    pub color:    u32,
    pub consumed: bool,
}

impl GameObject {
    pub fn new(pos: Point, velocity: (i32, i32), radius: i32, color: u32) -> Self {
        GameObject { pos, velocity, radius, color, consumed: false }
    }

    pub fn advance(&mut self) {
        self.pos = self.pos.offset(self.velocity.0, self.velocity.1);
    }

    /// Point probes hit when strictly closer than the radius; rectangle
    /// probes when the center is strictly inside.
    pub fn is_hit_by(&self, probe: &Probe) -> bool {
        match probe {
            Probe::None     => false,
            Probe::Point(p) => p.distance(self.pos) < self.radius as f64,
            Probe::Rect(r)  => r.contains(self.pos),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Scene
// ════════════════════════════════════════════════════════════════════════════

/// Drawing primitives, in paint order.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle { center: Point, radius: i32, color: u32, filled: bool },
    Line   { from: Point, to: Point, color: u32, thickness: i32 },
    Rect   { rect: Rect, color: u32, filled: bool },
    /// `scale` multiplies the 3×5 glyph size.
    Text   { pos: Point, text: String, color: u32, scale: usize },
}

/// Everything a game wants drawn this frame, over the camera image.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub shapes: Vec<Shape>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circle(&mut self, center: Point, radius: i32, color: u32) {
        self.shapes.push(Shape::Circle { center, radius, color, filled: true });
    }

    pub fn ring(&mut self, center: Point, radius: i32, color: u32) {
        self.shapes.push(Shape::Circle { center, radius, color, filled: false });
    }

    pub fn line(&mut self, from: Point, to: Point, color: u32, thickness: i32) {
        self.shapes.push(Shape::Line { from, to, color, thickness });
    }

    /// Open polyline through `points`.
    pub fn polyline(&mut self, points: &[Point], color: u32, thickness: i32) {
        for w in points.windows(2) {
            self.line(w[0], w[1], color, thickness);
        }
    }

    /// Closed polygon through `points`.
    pub fn polygon(&mut self, points: &[Point], color: u32, thickness: i32) {
        self.polyline(points, color, thickness);
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if points.len() > 2 {
                self.line(last, first, color, thickness);
            }
        }
    }

    pub fn rect(&mut self, rect: Rect, color: u32, filled: bool) {
        self.shapes.push(Shape::Rect { rect, color, filled });
    }

    pub fn text(&mut self, x: i32, y: i32, text: impl Into<String>, color: u32, scale: usize) {
        self.shapes.push(Shape::Text { pos: Point::new(x, y), text: text.into(), color, scale });
    }

    /// Horizontal meter filled to `fraction`.
    pub fn meter(&mut self, rect: Rect, fraction: f64, color: u32, frame: u32) {
        let fill = (rect.w as f64 * fraction.clamp(0.0, 1.0)) as i32;
        self.rect(Rect::new(rect.x, rect.y, fill, rect.h), color, true);
        self.rect(rect, frame, false);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Game
// ════════════════════════════════════════════════════════════════════════════

/// One running game.
pub trait Game {
    fn id(&self) -> GameId;

    /// Advance one frame.
    fn step(&mut self, gesture: &Gesture, signal: Signal, now: Instant) -> Outcome;

    /// What to draw for the most recent step.
    fn scene(&self, now: Instant) -> Scene;

    fn score(&self) -> &ScoreTracker;

    /// Mean seconds per scored action, for games that time them.
    fn avg_reaction_time(&self) -> Option<f64> {
        None
    }

    fn summary(&self) -> SessionSummary {
        self.score().summary()
    }

    /// Ledger record for the session as it stands at `now`.
    fn record(&self, now: Instant) -> LedgerRecord {
        self.score().record_at(self.id().ledger_name(), self.avg_reaction_time(), now)
    }
}

/// Score, level and pointer lines shared by every game's HUD.
pub(crate) fn draw_hud(scene: &mut Scene, palette: &Palette, score: &ScoreTracker, levels: u32) {
    scene.text(30, 30, format!("Score: {}", score.score()), palette.blue, 3);
    scene.text(30, 60, format!("Level: {}/{}", score.level(), levels), palette.green, 3);
}

pub(crate) fn draw_pointer(scene: &mut Scene, palette: &Palette, pointer: Option<Point>) {
    if let Some(tip) = pointer {
        scene.circle(tip, 8, palette.purple);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ArcadeSession
// ════════════════════════════════════════════════════════════════════════════

/// The per-game rules of an object game.
pub trait ArcadePolicy {
    fn id(&self) -> GameId;
    fn levels(&self) -> u32;
    fn level_duration(&self) -> Duration;

    /// Frames between spawns at `level`; at least 1.
    fn spawn_interval(&self, level: u32) -> u64;

    fn spawn(&self, level: u32, arena: &Arena, rng: &mut StdRng) -> GameObject;

    /// Where the hand hits this frame.
    fn probe(&self, gesture: &Gesture, arena: &Arena) -> Probe;

    fn points_per_hit(&self) -> u32;

    /// Extra drawing on top of the objects (a bucket, say).
    fn decorate(&self, _probe: &Probe, _palette: &Palette, _scene: &mut Scene) {}
}

/// Generic timed-level object game.
pub struct ArcadeSession<P: ArcadePolicy> {
    policy:  P,
    arena:   Arena,
    palette: Palette,
    score:   ScoreTracker,
    rng:     StdRng,
    objects: Vec<GameObject>,
    /// Frames stepped in the current level.
    frame:   u64,
    level_started: Option<Instant>,
    probe:   Probe,
    pointer: Option<Point>,
}

impl<P: ArcadePolicy> ArcadeSession<P> {
    pub fn new(policy: P, arena: Arena, palette: Palette, player: &str, rng: StdRng) -> Self {
        tracing::info!("{}: starting level 1", policy.id().title());
        ArcadeSession {
            policy,
            arena,
            palette,
            score: ScoreTracker::new(player),
            rng,
            objects: Vec::new(),
            frame: 0,
            level_started: None,
            probe: Probe::None,
            pointer: None,
        }
    }

    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    /// Place an object directly, bypassing the spawner.
    pub fn push_object(&mut self, object: GameObject) {
        self.objects.push(object);
    }

    pub fn level(&self) -> u32 {
        self.score.level()
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Time left in the current level.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.level_started {
            Some(start) => self.policy.level_duration().saturating_sub(now.saturating_duration_since(start)),
            None => self.policy.level_duration(),
        }
    }

    fn hit_objects(&mut self) {
        let points = self.policy.points_per_hit();
        for obj in self.objects.iter_mut().filter(|o| !o.consumed) {
            if obj.is_hit_by(&self.probe) {
                obj.consumed = true;
                self.score.add_points(points);
            }
        }
    }
}

impl<P: ArcadePolicy> Game for ArcadeSession<P> {
    fn id(&self) -> GameId {
        self.policy.id()
    }

    fn step(&mut self, gesture: &Gesture, signal: Signal, now: Instant) -> Outcome {
        if signal == Signal::Quit {
            return Outcome::Finished;
        }
        let started = *self.level_started.get_or_insert(now);
        let level = self.score.level();

        for obj in &mut self.objects {
            obj.advance();
        }

        self.pointer = gesture.fingertip_position();
        self.probe = self.policy.probe(gesture, &self.arena);
        self.hit_objects();

        let arena = self.arena;
        self.objects.retain(|o| !o.consumed && !arena.is_fully_outside(o.pos, o.radius));

        self.frame += 1;
        if self.frame % self.policy.spawn_interval(level).max(1) == 0 {
            let obj = self.policy.spawn(level, &self.arena, &mut self.rng);
            self.objects.push(obj);
        }

        if now.saturating_duration_since(started) < self.policy.level_duration() {
            return Outcome::Continue;
        }

        tracing::info!(
            "{}: level {} finished, score {}",
            self.policy.id().title(),
            level,
            self.score.score()
        );
        if level >= self.policy.levels() {
            return Outcome::Finished;
        }

        let next = level + 1;
        self.score.set_level(next);
        self.objects.clear();
        self.frame = 0;
        self.level_started = None;
        tracing::debug!("Spawn interval at level {}: {} frames", next, self.policy.spawn_interval(next));
        Outcome::LevelComplete { next }
    }

    fn scene(&self, now: Instant) -> Scene {
        let mut scene = Scene::new();
        for obj in self.objects.iter().filter(|o| !o.consumed) {
            scene.circle(obj.pos, obj.radius, obj.color);
        }
        self.policy.decorate(&self.probe, &self.palette, &mut scene);
        draw_pointer(&mut scene, &self.palette, self.pointer);

        draw_hud(&mut scene, &self.palette, &self.score, self.policy.levels());
        let remaining = self.remaining(now).as_secs_f64().ceil() as u64;
        scene.text(self.arena.width - 260, 30, format!("Time: {}s", remaining), self.palette.red, 3);
        scene
    }

    fn score(&self) -> &ScoreTracker {
        &self.score
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_tracking::tracker::FingerState;
    use rand::SeedableRng;

    /// Objects fall straight down from the top at a fixed x; a point probe
    /// when any finger is up.
    struct Fixed;

    impl ArcadePolicy for Fixed {
        fn id(&self) -> GameId { GameId::BalloonPop }
        fn levels(&self) -> u32 { 2 }
        fn level_duration(&self) -> Duration { Duration::from_secs(10) }
        fn spawn_interval(&self, _level: u32) -> u64 { 1000 }
        fn spawn(&self, _level: u32, _arena: &Arena, _rng: &mut StdRng) -> GameObject {
            GameObject::new(Point::new(100, 0), (0, 10), 15, 0xFFFFFFFF)
        }
        fn probe(&self, gesture: &Gesture, _arena: &Arena) -> Probe {
            gesture.pointer().map(Probe::Point).unwrap_or_default()
        }
        fn points_per_hit(&self) -> u32 { 10 }
    }

    fn session() -> ArcadeSession<Fixed> {
        ArcadeSession::new(Fixed, Arena::new(640, 480), Palette::default(), "p", StdRng::seed_from_u64(1))
    }

    fn pointing_at(x: i32, y: i32) -> Gesture {
        Gesture::new(FingerState([false, true, false, false, false]), Point::new(x, y))
    }

    #[test]
    fn hit_test_is_strict_distance() {
        let obj = GameObject::new(Point::new(110, 100), (0, 0), 15, 0);
        assert!(obj.is_hit_by(&Probe::Point(Point::new(100, 100))));

        let far = GameObject::new(Point::new(120, 100), (0, 0), 15, 0);
        assert!(!far.is_hit_by(&Probe::Point(Point::new(100, 100))));

        let edge = GameObject::new(Point::new(115, 100), (0, 0), 15, 0);
        assert!(!edge.is_hit_by(&Probe::Point(Point::new(100, 100))));
        assert!(!obj.is_hit_by(&Probe::None));
    }

    #[test]
    fn rect_probe_needs_center_strictly_inside() {
        let rect = Rect::new(0, 0, 100, 50);
        let inside = GameObject::new(Point::new(50, 25), (0, 0), 15, 0);
        let border = GameObject::new(Point::new(100, 25), (0, 0), 15, 0);
        assert!(inside.is_hit_by(&Probe::Rect(rect)));
        assert!(!border.is_hit_by(&Probe::Rect(rect)));
    }

    #[test]
    fn consumed_objects_never_come_back() {
        let t0 = Instant::now();
        let mut s = session();
        s.push_object(GameObject::new(Point::new(100, 90), (0, 10), 15, 0));

        assert_eq!(s.step(&pointing_at(100, 100), Signal::None, t0), Outcome::Continue);
        assert_eq!(s.score().score(), 10);
        assert!(s.objects().is_empty());

        for i in 1..20 {
            s.step(&pointing_at(100, 100 + i * 10), Signal::None, t0 + Duration::from_millis(i as u64 * 30));
            assert!(s.objects().iter().all(|o| !o.consumed));
        }
        assert_eq!(s.score().score(), 10);
    }

    #[test]
    fn out_of_bounds_objects_go_within_one_frame() {
        let t0 = Instant::now();
        let mut s = session();
        // Moves from fully inside to fully below the arena in one step.
        s.push_object(GameObject::new(Point::new(300, 470), (0, 40), 15, 0));
        // Spawned just past the top edge but overlapping it: kept.
        s.push_object(GameObject::new(Point::new(300, -20), (0, 0), 30, 0));

        s.step(&Gesture::default(), Signal::None, t0);
        assert_eq!(s.objects().len(), 1);
        assert_eq!(s.objects()[0].pos, Point::new(300, -20));
    }

    #[test]
    fn spawns_on_cadence() {
        struct EveryThird;
        impl ArcadePolicy for EveryThird {
            fn id(&self) -> GameId { GameId::BalloonPop }
            fn levels(&self) -> u32 { 1 }
            fn level_duration(&self) -> Duration { Duration::from_secs(10) }
            fn spawn_interval(&self, _level: u32) -> u64 { 3 }
            fn spawn(&self, _level: u32, arena: &Arena, _rng: &mut StdRng) -> GameObject {
                GameObject::new(arena.center(), (0, 0), 10, 0)
            }
            fn probe(&self, _gesture: &Gesture, _arena: &Arena) -> Probe { Probe::None }
            fn points_per_hit(&self) -> u32 { 1 }
        }

        let t0 = Instant::now();
        let mut s = ArcadeSession::new(EveryThird, Arena::new(640, 480), Palette::default(), "p", StdRng::seed_from_u64(7));
        for _ in 0..9 {
            s.step(&Gesture::default(), Signal::None, t0);
        }
        assert_eq!(s.objects().len(), 3);
    }

    #[test]
    fn levels_advance_on_the_timer_then_finish() {
        let t0 = Instant::now();
        let mut s = session();
        let g = Gesture::default();

        assert_eq!(s.step(&g, Signal::None, t0), Outcome::Continue);
        assert_eq!(s.step(&g, Signal::None, t0 + Duration::from_secs(10)), Outcome::LevelComplete { next: 2 });
        assert_eq!(s.level(), 2);

        // The level-2 timer starts on its first step.
        let t1 = t0 + Duration::from_secs(12);
        assert_eq!(s.step(&g, Signal::None, t1), Outcome::Continue);
        assert_eq!(s.step(&g, Signal::None, t1 + Duration::from_secs(9)), Outcome::Continue);
        assert_eq!(s.step(&g, Signal::None, t1 + Duration::from_secs(10)), Outcome::Finished);
        assert_eq!(s.level(), 2);
    }

    #[test]
    fn quit_finishes_and_keeps_score() {
        let t0 = Instant::now();
        let mut s = session();
        s.push_object(GameObject::new(Point::new(100, 90), (0, 10), 15, 0));
        s.step(&pointing_at(100, 100), Signal::None, t0);
        assert_eq!(s.step(&Gesture::default(), Signal::Quit, t0), Outcome::Finished);
        let record = s.record(t0);
        assert_eq!(record.score, 10);
        assert_eq!(record.game, "BalloonPop");
    }

    #[test]
    fn no_fingers_no_hits() {
        let t0 = Instant::now();
        let mut s = session();
        s.push_object(GameObject::new(Point::new(100, 90), (0, 10), 15, 0));
        let fist = Gesture::new(FingerState([false; 5]), Point::new(100, 100));
        s.step(&fist, Signal::None, t0);
        assert_eq!(s.score().score(), 0);
        assert_eq!(s.objects().len(), 1);
    }

    #[test]
    fn scene_lists_live_objects() {
        let t0 = Instant::now();
        let mut s = session();
        s.push_object(GameObject::new(Point::new(200, 200), (0, 0), 15, 0xFF123456));
        s.step(&Gesture::default(), Signal::None, t0);
        let scene = s.scene(t0);
        assert!(scene.shapes.iter().any(|shape| matches!(
            shape,
            Shape::Circle { color: 0xFF123456, filled: true, .. }
        )));
    }
}
