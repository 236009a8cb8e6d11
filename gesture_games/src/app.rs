//! Top-level application loop.
//!
//! `App` owns the display, the frame source, the hand tracker and the
//! ledger. It alternates between the finger-count menu and one game
//! session at a time:
//!
//! ```text
//!   menu ──Confirmed(game)──► session ──Finished / quit / frame failure──► ledger append
//!    ▲                                                                         │
//!    └──────────────────────────── game-over banner ◄──────────────────────────┘
//! ```
//!
//! A session's score is appended to the ledger exactly once, however the
//! session ends. Ledger write failures are logged and play continues.

use std::sync::mpsc::{self, Sender};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use hand_tracking::sim::{SimCamera, SimInput, SimProvider};
use hand_tracking::upstream::{UpstreamLandmarks, UpstreamSource};
use hand_tracking::{Frame, FrameSource, Gesture, HandTracker, LandmarkProvider, Point};
use score_ledger::{Ledger, LedgerRecord};

use crate::config::{Config, InputSource};
use crate::error::GameError;
use crate::games;
use crate::menu::{GameId, MenuDispatcher};
use crate::session::{draw_pointer, Game, Outcome, Rect, Scene, Signal};
use crate::visualizer::{Screen, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// Input wiring
// ════════════════════════════════════════════════════════════════════════════

/// Frame source and tracker for the configured input, plus the sender the
/// window uses to drive the simulated hand.
pub struct Input {
    pub source:  Box<dyn FrameSource>,
    pub tracker: HandTracker,
    pub sim_tx:  Option<Sender<SimInput>>,
}

pub fn build_input(config: &Config) -> Result<Input, GameError> {
    let (w, h) = (config.window.width, config.window.height);

    match config.input.source {
        InputSource::Sim => {
            let (tx, rx) = mpsc::channel::<SimInput>();
            Ok(Input {
                source:  Box::new(SimCamera::new(w, h, config.palette.background)),
                tracker: window_tracker(Box::new(SimProvider::new(rx)), config),
                sim_tx:  Some(tx),
            })
        }
        InputSource::Upstream => {
            let source = UpstreamSource::spawn(
                &config.input.upstream_command,
                &config.input.upstream_args,
                &config.tracker,
                (w, h),
            )?;
            Ok(Input {
                source:  Box::new(source),
                tracker: window_tracker(Box::new(UpstreamLandmarks), config),
                sim_tx:  None,
            })
        }
        InputSource::Leap => {
            let provider = leap_provider()?;
            Ok(Input {
                source:  Box::new(SimCamera::new(w, h, config.palette.background)),
                tracker: window_tracker(provider, config),
                sim_tx:  None,
            })
        }
    }
}

/// Tracker whose landmarks land in window pixels whatever size the source
/// captures at.
pub fn window_tracker(provider: Box<dyn LandmarkProvider>, config: &Config) -> HandTracker {
    HandTracker::new(provider, config.tracker.clone()).with_resolution(config.window.width, config.window.height)
}

#[cfg(feature = "leap")]
fn leap_provider() -> Result<Box<dyn LandmarkProvider>, GameError> {
    Ok(Box::new(hand_tracking::leap::LeapProvider::open()?))
}

#[cfg(not(feature = "leap"))]
fn leap_provider() -> Result<Box<dyn LandmarkProvider>, GameError> {
    Err(crate::error::ConfigError::InvalidValue {
        field:   "input.source".to_string(),
        message: "built without the `leap` feature".to_string(),
    }
    .into())
}

// ════════════════════════════════════════════════════════════════════════════
// Banner timing
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BannerTimes {
    pub level_start: Duration,
    pub game_over:   Duration,
}

impl Default for BannerTimes {
    fn default() -> Self {
        BannerTimes {
            level_start: Duration::from_millis(1000),
            game_over:   Duration::from_millis(2500),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// App
// ════════════════════════════════════════════════════════════════════════════

pub struct App<S: Screen> {
    config:     Config,
    screen:     S,
    source:     Box<dyn FrameSource>,
    tracker:    HandTracker,
    ledger:     Ledger,
    banners:    BannerTimes,
    last_frame: Frame,
}

impl<S: Screen> App<S> {
    pub fn new(config: Config, screen: S, source: Box<dyn FrameSource>, tracker: HandTracker) -> Self {
        let ledger = Ledger::new(&config.ledger.path);
        let last_frame = Frame::blank(config.window.width, config.window.height);
        App {
            config,
            screen,
            source,
            tracker,
            ledger,
            banners: BannerTimes::default(),
            last_frame,
        }
    }

    pub fn with_banner_times(mut self, banners: BannerTimes) -> Self {
        self.banners = banners;
        self
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    /// Menu, game, menu, game... until the window closes or the menu is
    /// quit. `first` skips the menu for the first game.
    pub fn run(&mut self, first: Option<GameId>) -> Result<(), GameError> {
        let mut next = first;
        loop {
            let game = match next.take() {
                Some(game) => game,
                None => match self.choose_game()? {
                    Some(game) => game,
                    None => return Ok(()),
                },
            };
            self.play(game, StdRng::from_os_rng());
            if !self.screen.is_open() {
                return Ok(());
            }
        }
    }

    /// One menu invocation. `None` when the player quits or closes the
    /// window. A frame failure here has no score to save and is returned.
    pub fn choose_game(&mut self) -> Result<Option<GameId>, GameError> {
        let mut menu = MenuDispatcher::new();
        let best = self.ledger.best_per_game();
        tracing::info!("Main menu: hold up 1-5 fingers for {:.0}s to pick a game", crate::menu::HOLD_DURATION.as_secs_f32());

        while self.screen.is_open() {
            if self.screen.poll_input() == Signal::Quit {
                return Ok(None);
            }
            let frame = self.source.read_frame()?;
            let gesture = self.detect(&frame);
            let now = Instant::now();
            let count = gesture.count_extended();

            if let Some(game) = menu.update(count, now) {
                return Ok(Some(game));
            }

            let pointer = self.tracker.last_known_fingertip();
            let scene = menu_scene(&self.config, count, menu.hold_progress(now), &best, pointer);
            self.screen.render(&frame, self.tracker.hand(0), &scene);
            self.last_frame = frame;
        }
        Ok(None)
    }

    /// Play one session of `game` to the end and save its score.
    pub fn play(&mut self, game: GameId, rng: StdRng) -> LedgerRecord {
        let mut session = games::new_session(game, &self.config, rng);
        self.play_session(session.as_mut())
    }

    /// Drive `session` until it finishes, the player quits, the window
    /// closes or a frame can't be read; then append its record once.
    pub fn play_session(&mut self, session: &mut dyn Game) -> LedgerRecord {
        let title = session.id().title();
        let white = self.config.palette.white;
        let green = self.config.palette.green;
        tracing::info!("Starting {}", title);
        self.banner(&[(title, green), ("Starting Level 1", white)], self.banners.level_start);

        while self.screen.is_open() {
            let signal = self.screen.poll_input();
            let frame = match self.source.read_frame() {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::warn!("Frame read failed, ending {}: {}", title, e);
                    break;
                }
            };
            let gesture = self.detect(&frame);
            let now = Instant::now();

            let outcome = session.step(&gesture, signal, now);
            self.screen.render(&frame, self.tracker.hand(0), &session.scene(now));
            self.last_frame = frame;

            match outcome {
                Outcome::Continue => {}
                Outcome::LevelComplete { next } => {
                    let text = format!("Starting Level {}", next);
                    self.banner(&[(text.as_str(), white)], self.banners.level_start);
                }
                Outcome::Finished => break,
            }
        }

        let record = session.record(Instant::now());
        if let Err(e) = self.ledger.append(&record) {
            tracing::warn!("Could not save score for {}: {}", title, e);
        }

        let summary = session.summary();
        tracing::info!(
            "Final summary: player={} score={} level={} time={}s",
            summary.player,
            summary.score,
            summary.level,
            summary.time_elapsed
        );
        if let Some(avg) = record.avg_reaction_time {
            tracing::info!("Average reaction time: {:.2}s", avg);
        }

        let final_score = format!("Final Score: {}", record.score);
        let red = self.config.palette.red;
        self.banner(
            &[("Game Over!", red), (final_score.as_str(), green), ("Returning to Main Menu...", white)],
            self.banners.game_over,
        );
        record
    }

    /// Gesture for `frame`; a provider error counts as no hand.
    fn detect(&mut self, frame: &Frame) -> Gesture {
        match self.tracker.detect(frame) {
            Ok(_) => self.tracker.gesture(),
            Err(e) => {
                tracing::warn!("Hand detection failed: {}", e);
                Gesture::default()
            }
        }
    }

    /// Show `lines` for `duration`. Keys pressed meanwhile are ignored.
    fn banner(&mut self, lines: &[(&str, u32)], duration: Duration) {
        let start = Instant::now();
        loop {
            if !self.screen.is_open() {
                return;
            }
            self.screen.render_banner(&self.last_frame, lines);
            if start.elapsed() >= duration {
                return;
            }
        }
    }
}

/// The menu screen: game list, current finger count and hold progress.
/// `pointer` is the last known fingertip, so the marker stays put through
/// frames where the hand drops out.
pub fn menu_scene(config: &Config, count: u8, progress: f32, best: &[LedgerRecord], pointer: Option<Point>) -> Scene {
    let p = &config.palette;
    let mut scene = Scene::new();
    scene.text(60, 50, "Gesture Games", p.yellow, 6);
    scene.text(60, 110, "Hold up fingers to choose a game", p.text, 3);

    for (i, game) in GameId::ALL.iter().enumerate() {
        let y = 180 + i as i32 * 60;
        let color = if game.finger_count() == count { p.green } else { p.white };
        let fingers = if game.finger_count() == 1 { "finger " } else { "fingers" };
        let line = format!("{} {}  {}", game.finger_count(), fingers, game.title());
        scene.text(80, y, line, color, 4);

        if let Some(record) = best.iter().find(|r| r.game == game.ledger_name()) {
            scene.text(760, y + 5, format!("best {}", record.score), p.orange, 3);
        }
    }

    let meter_y = 180 + 5 * 60 + 20;
    scene.text(80, meter_y, format!("Fingers: {}", count), p.blue, 3);
    scene.meter(Rect::new(80, meter_y + 30, 400, 25), progress as f64, p.green, p.white);
    draw_pointer(&mut scene, p, pointer);
    scene
}

/// Build the window and input from `config` and run until the player is
/// done.
pub fn run(config: Config, first: Option<GameId>) -> Result<(), GameError> {
    let input = build_input(&config)?;
    let screen = Visualizer::new(&config, input.sim_tx)?;
    let mut app = App::new(config, screen, input.source, input.tracker);
    app.run(first)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
