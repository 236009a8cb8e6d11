//! # gesture_games
//!
//! Five webcam minigames controlled by hand gestures, chosen from a menu by
//! holding up a number of fingers.
//!
//! ## Menu
//!
//! Hold the same finger count steady for two seconds:
//!
//! | Fingers | Game | Ledger name |
//! |---|---|---|
//! | 1 | Connect the Dots | `ConnectDots` |
//! | 2 | Catch the Droplets | `CatchDroplets` |
//! | 3 | Shape Drawing | `ShapeDrawing` |
//! | 4 | Balloon Pop | `BalloonPop` |
//! | 5 | Color Match | `SequenceColorMatch` |
//!
//! Each session's score is appended to a JSON ledger when it ends, however
//! it ends, and play returns to the menu.
//!
//! ## Input sources
//!
//! * `sim` (default): the window drives a synthetic hand.
//! * `upstream`: landmarks arrive as JSON lines from a helper process.
//! * `leap` (cargo feature `leap`): a LeapMotion controller via LeapC.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Action |
//! |---|---|
//! | mouse | Move the index fingertip |
//! | `0`..`5` | Number of extended fingers |
//! | `H` | Hide / show the hand |
//! | `Space` / `N` | Submit a drawing |
//! | `Esc` / `Q` | Quit the game (score is saved) |

pub mod config;
pub mod error;
pub mod menu;
pub mod session;
pub mod drawing;
pub mod sketch;
pub mod games;
pub mod visualizer;
pub mod app;

pub use config::Config;
pub use error::{ConfigError, GameError};
pub use menu::{GameId, MenuDispatcher};
