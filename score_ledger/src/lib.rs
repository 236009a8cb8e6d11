//! # score_ledger
//!
//! Score keeping for gesture game sessions.
//!
//! * [`ScoreTracker`]: points, level and wall-clock time of one running
//!   session. Owned by exactly one session.
//! * [`Ledger`]: the shared score history, a JSON array on disk, appended
//!   to once per finished session.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use score_ledger::{Ledger, ScoreTracker};
//!
//! let mut score = ScoreTracker::new("Player1");
//! score.add_points(10);
//! score.set_level(2);
//!
//! let ledger = Ledger::new("utils/scores.json");
//! ledger.append(&score.record("BalloonPop", None)).unwrap();
//! assert!(!ledger.records().is_empty());
//! ```
//!
//! The ledger file is rewritten in full on every append. A missing or
//! corrupt file reads as an empty ledger and is overwritten by the next
//! append; there is no locking between processes.

pub mod error;
pub mod tracker;
pub mod ledger;

pub use error::LedgerError;
pub use ledger::{Ledger, LedgerRecord};
pub use tracker::{ScoreTracker, SessionSummary};
