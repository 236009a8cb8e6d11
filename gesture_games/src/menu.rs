//! Main menu: pick a game by holding up a number of fingers.
//!
//! ```text
//!            valid n                 same n, held ≥ HOLD_DURATION
//!   Idle ─────────────► Holding(n) ───────────────────────────────► Confirmed(game)
//!    ▲                   │     ▲
//!    └── invalid count ──┘     └── different valid m: restart as Holding(m)
//! ```

use std::time::{Duration, Instant};

/// How long a finger count must be held to confirm a choice.
pub const HOLD_DURATION: Duration = Duration::from_secs(2);

// ════════════════════════════════════════════════════════════════════════════
// GameId
// ════════════════════════════════════════════════════════════════════════════

/// The five games, in menu order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameId {
    ConnectDots,
    CatchDroplets,
    ShapeDrawing,
    BalloonPop,
    ColorMatch,
}

impl GameId {
    pub const ALL: [GameId; 5] = [
        GameId::ConnectDots,
        GameId::CatchDroplets,
        GameId::ShapeDrawing,
        GameId::BalloonPop,
        GameId::ColorMatch,
    ];

    /// Game selected by holding up `count` fingers.
    pub fn from_finger_count(count: u8) -> Option<GameId> {
        match count {
            1 => Some(GameId::ConnectDots),
            2 => Some(GameId::CatchDroplets),
            3 => Some(GameId::ShapeDrawing),
            4 => Some(GameId::BalloonPop),
            5 => Some(GameId::ColorMatch),
            _ => None,
        }
    }

    pub fn finger_count(self) -> u8 {
        match self {
            GameId::ConnectDots   => 1,
            GameId::CatchDroplets => 2,
            GameId::ShapeDrawing  => 3,
            GameId::BalloonPop    => 4,
            GameId::ColorMatch    => 5,
        }
    }

    /// Identifier written to the score ledger.
    pub fn ledger_name(self) -> &'static str {
        match self {
            GameId::ConnectDots   => "ConnectDots",
            GameId::CatchDroplets => "CatchDroplets",
            GameId::ShapeDrawing  => "ShapeDrawing",
            GameId::BalloonPop    => "BalloonPop",
            GameId::ColorMatch    => "SequenceColorMatch",
        }
    }

    /// Human-readable name for the menu and banners.
    pub fn title(self) -> &'static str {
        match self {
            GameId::ConnectDots   => "Connect the Dots",
            GameId::CatchDroplets => "Catch the Droplets",
            GameId::ShapeDrawing  => "Shape Drawing",
            GameId::BalloonPop    => "Balloon Pop",
            GameId::ColorMatch    => "Color Match",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MenuDispatcher
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuState {
    Idle,
    Holding { count: u8, since: Instant },
    /// Terminal for this menu invocation.
    Confirmed(GameId),
}

/// Debounces the finger count into a game choice.
///
/// Build a fresh dispatcher for every visit to the menu; once confirmed it
/// ignores further input.
#[derive(Clone, Debug)]
pub struct MenuDispatcher {
    state: MenuState,
}

impl Default for MenuDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuDispatcher {
    pub fn new() -> Self {
        MenuDispatcher { state: MenuState::Idle }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Feed one frame's finger count. Returns the game once confirmed.
    pub fn update(&mut self, count: u8, now: Instant) -> Option<GameId> {
        let valid = GameId::from_finger_count(count).is_some();

        self.state = match self.state {
            MenuState::Confirmed(game) => MenuState::Confirmed(game),

            MenuState::Idle if valid => MenuState::Holding { count, since: now },
            MenuState::Idle => MenuState::Idle,

            MenuState::Holding { count: held, since } if held == count => {
                if now.saturating_duration_since(since) >= HOLD_DURATION {
                    match GameId::from_finger_count(count) {
                        Some(game) => {
                            tracing::info!("Menu: {} fingers held, starting {}", count, game.title());
                            MenuState::Confirmed(game)
                        }
                        None => MenuState::Idle,
                    }
                } else {
                    MenuState::Holding { count, since }
                }
            }
            MenuState::Holding { .. } if valid => MenuState::Holding { count, since: now },
            MenuState::Holding { .. } => MenuState::Idle,
        };

        self.confirmed()
    }

    pub fn confirmed(&self) -> Option<GameId> {
        match self.state {
            MenuState::Confirmed(game) => Some(game),
            _ => None,
        }
    }

    /// Fraction of the hold completed, in `[0, 1]`.
    pub fn hold_progress(&self, now: Instant) -> f32 {
        match self.state {
            MenuState::Idle => 0.0,
            MenuState::Holding { since, .. } => {
                let held = now.saturating_duration_since(since).as_secs_f32();
                (held / HOLD_DURATION.as_secs_f32()).min(1.0)
            }
            MenuState::Confirmed(_) => 1.0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed `(count, seconds since t0)` pairs, return the final choice.
    fn run(frames: &[(u8, f32)]) -> Option<GameId> {
        let t0 = Instant::now();
        let mut menu = MenuDispatcher::new();
        let mut result = None;
        for &(count, secs) in frames {
            result = menu.update(count, t0 + Duration::from_secs_f32(secs));
        }
        result
    }

    #[test]
    fn steady_three_confirms_shape_drawing() {
        let frames = [(3, 0.0), (3, 0.5), (3, 1.0), (3, 1.5), (3, 2.0)];
        assert_eq!(run(&frames), Some(GameId::ShapeDrawing));
    }

    #[test]
    fn change_of_count_restarts_the_hold() {
        let frames = [(3, 0.0), (3, 0.5), (4, 1.0), (4, 2.0), (4, 3.0)];
        assert_eq!(run(&frames), Some(GameId::BalloonPop));
    }

    #[test]
    fn short_hold_does_not_confirm() {
        let frames = [(3, 0.0), (3, 1.0), (4, 1.5), (4, 3.0)];
        assert_eq!(run(&frames), None);
    }

    #[test]
    fn zero_fingers_resets_to_idle() {
        let t0 = Instant::now();
        let mut menu = MenuDispatcher::new();
        menu.update(2, t0);
        menu.update(0, t0 + Duration::from_secs(1));
        assert_eq!(menu.state(), MenuState::Idle);
        assert_eq!(menu.update(2, t0 + Duration::from_secs(3)), None);
    }

    #[test]
    fn confirmed_is_terminal() {
        let t0 = Instant::now();
        let mut menu = MenuDispatcher::new();
        menu.update(1, t0);
        assert_eq!(menu.update(1, t0 + HOLD_DURATION), Some(GameId::ConnectDots));
        assert_eq!(menu.update(5, t0 + Duration::from_secs(10)), Some(GameId::ConnectDots));
        assert_eq!(menu.update(0, t0 + Duration::from_secs(11)), Some(GameId::ConnectDots));
    }

    #[test]
    fn progress_fills_over_the_hold() {
        let t0 = Instant::now();
        let mut menu = MenuDispatcher::new();
        assert_eq!(menu.hold_progress(t0), 0.0);
        menu.update(4, t0);
        let half = menu.hold_progress(t0 + Duration::from_secs(1));
        assert!((half - 0.5).abs() < 1e-3);
    }

    #[test]
    fn finger_counts_map_to_games() {
        for game in GameId::ALL {
            assert_eq!(GameId::from_finger_count(game.finger_count()), Some(game));
        }
        assert_eq!(GameId::from_finger_count(0), None);
        assert_eq!(GameId::from_finger_count(6), None);
        assert_eq!(GameId::ColorMatch.ledger_name(), "SequenceColorMatch");
    }
}
