//! `ScoreTracker`: the running score of one session.

use std::time::{Duration, Instant};

use crate::ledger::LedgerRecord;

/// Snapshot of a session, as shown on the game-over screen.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub player:       String,
    pub score:        u32,
    pub level:        u32,
    /// Seconds since the session started, two decimals.
    pub time_elapsed: f64,
}

/// Points, level and start time of one session.
///
/// The score never goes below zero; [`deduct_points`](Self::deduct_points)
/// saturates.
#[derive(Clone, Debug)]
pub struct ScoreTracker {
    player:  String,
    score:   u32,
    level:   u32,
    started: Instant,
}

impl ScoreTracker {
    pub fn new(player: &str) -> Self {
        Self::started_at(player, Instant::now())
    }

    /// Tracker whose clock started at `started`.
    pub fn started_at(player: &str, started: Instant) -> Self {
        ScoreTracker {
            player: player.to_string(),
            score: 0,
            level: 1,
            started,
        }
    }

    pub fn add_points(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn deduct_points(&mut self, points: u32) {
        self.score = self.score.saturating_sub(points);
    }

    pub fn score(&self)  -> u32  { self.score }
    pub fn level(&self)  -> u32  { self.level }
    pub fn player(&self) -> &str { &self.player }

    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    /// Seconds since start, rounded to two decimals.
    pub fn time_elapsed_at(&self, now: Instant) -> f64 {
        round_to(self.elapsed_at(now).as_secs_f64(), 2)
    }

    pub fn time_elapsed(&self) -> f64 {
        self.time_elapsed_at(Instant::now())
    }

    /// Back to zero points, level 1, clock restarted.
    pub fn reset(&mut self) {
        self.score = 0;
        self.level = 1;
        self.started = Instant::now();
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            player:       self.player.clone(),
            score:        self.score,
            level:        self.level,
            time_elapsed: self.time_elapsed(),
        }
    }

    /// Ledger record for this session, timed now.
    pub fn record(&self, game: &str, avg_reaction_time: Option<f64>) -> LedgerRecord {
        self.record_at(game, avg_reaction_time, Instant::now())
    }

    pub fn record_at(&self, game: &str, avg_reaction_time: Option<f64>, now: Instant) -> LedgerRecord {
        LedgerRecord {
            game:   game.to_string(),
            player: self.player.clone(),
            score:  self.score,
            level:  self.level,
            avg_reaction_time,
            time_elapsed: self.time_elapsed_at(now),
        }
    }
}

/// Round `value` to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn points_accumulate() {
        let mut s = ScoreTracker::new("p");
        s.add_points(10);
        s.add_points(5);
        assert_eq!(s.score(), 15);
    }

    #[test]
    fn deduction_saturates_at_zero() {
        let mut s = ScoreTracker::new("p");
        s.add_points(3);
        s.deduct_points(10);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn starts_at_level_one() {
        assert_eq!(ScoreTracker::new("p").level(), 1);
    }

    #[test]
    fn elapsed_is_rounded_to_centiseconds() {
        let t0 = Instant::now();
        let s = ScoreTracker::started_at("p", t0);
        let t = s.time_elapsed_at(t0 + Duration::from_millis(12_346));
        assert_relative_eq!(t, 12.35, epsilon = 1e-9);
    }

    #[test]
    fn record_carries_session_fields() {
        let t0 = Instant::now();
        let mut s = ScoreTracker::started_at("Ana", t0);
        s.add_points(40);
        s.set_level(3);
        let r = s.record_at("BalloonPop", None, t0 + Duration::from_secs(30));
        assert_eq!(r.player, "Ana");
        assert_eq!(r.game, "BalloonPop");
        assert_eq!(r.score, 40);
        assert_eq!(r.level, 3);
        assert_eq!(r.avg_reaction_time, None);
        assert_relative_eq!(r.time_elapsed, 30.0);
    }

    #[test]
    fn reset_clears_score_and_level() {
        let mut s = ScoreTracker::new("p");
        s.add_points(7);
        s.set_level(4);
        s.reset();
        assert_eq!((s.score(), s.level()), (0, 1));
    }

    #[test]
    fn round_to_places() {
        assert_relative_eq!(round_to(0.12345, 3), 0.123);
        assert_relative_eq!(round_to(2.005, 0), 2.0);
    }
}
