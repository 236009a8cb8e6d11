//! Configuration parsing and validation.
//!
//! One immutable [`Config`] is loaded at start-up and handed by reference to
//! every constructor that needs window size, palette or thresholds.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use hand_tracking::DetectionParams;

use crate::error::ConfigError;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window:  WindowConfig,
    pub player:  PlayerConfig,
    pub ledger:  LedgerConfig,
    pub tracker: DetectionParams,
    pub input:   InputConfig,
    pub palette: Palette,
    pub games:   GamesConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from `explicit` if given, else from the first default path that
    /// exists, else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            tracing::info!("Loading config from: {}", path.display());
            return Self::from_file(path);
        }

        let paths = [
            PathBuf::from("gesture_games.toml"),
            PathBuf::from("config/gesture_games.toml"),
        ];
        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid("window", "Window dimensions must be greater than 0"));
        }
        if self.tracker.max_hands == 0 {
            return Err(invalid("tracker.max_hands", "At least one hand must be tracked"));
        }
        for (field, value) in [
            ("tracker.detection_confidence", self.tracker.detection_confidence),
            ("tracker.tracking_confidence",  self.tracker.tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "Confidence must be between 0.0 and 1.0"));
            }
        }
        if self.player.name.trim().is_empty() {
            return Err(invalid("player.name", "Player name must not be empty"));
        }
        if self.input.source == InputSource::Upstream && self.input.upstream_command.trim().is_empty() {
            return Err(invalid("input.upstream_command", "Upstream source needs a command"));
        }

        let g = &self.games;
        for (field, value) in [
            ("games.balloon_pop.levels",        g.balloon_pop.levels),
            ("games.balloon_pop.level_seconds", g.balloon_pop.level_seconds),
            ("games.catch_droplets.levels",        g.catch_droplets.levels),
            ("games.catch_droplets.level_seconds", g.catch_droplets.level_seconds),
            ("games.catch_droplets.bucket_width",  g.catch_droplets.bucket_width),
            ("games.catch_droplets.bucket_height", g.catch_droplets.bucket_height),
            ("games.color_match.levels",          g.color_match.levels),
            ("games.color_match.sequence_length", g.color_match.sequence_length),
            ("games.connect_dots.levels",  g.connect_dots.levels),
            ("games.shape_drawing.levels", g.shape_drawing.levels),
        ] {
            if value == 0 {
                return Err(invalid(field, "Must be greater than 0"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field:   field.to_string(),
        message: message.to_string(),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Sections
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width:  u32,
    pub height: u32,
    /// Pause between frames; also the keyboard poll interval.
    pub frame_delay_ms: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { width: 1380, height: 820, frame_delay_ms: 30 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub name: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self { name: "Player1".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("utils/scores.json") }
    }
}

/// Where hands come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    /// Mouse and number keys in the game window.
    #[default]
    Sim,
    /// External helper process printing JSON landmark lines.
    Upstream,
    /// LeapMotion controller (needs the `leap` feature).
    Leap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub source: InputSource,
    pub upstream_command: String,
    pub upstream_args:    Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            source: InputSource::Sim,
            upstream_command: "python3".to_string(),
            upstream_args: vec!["tools/hand_landmarks.py".to_string()],
        }
    }
}

/// ARGB colors used by the renderer and the games.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: u32,
    pub text:       u32,
    pub white:      u32,
    pub red:        u32,
    pub green:      u32,
    pub blue:       u32,
    pub yellow:     u32,
    pub purple:     u32,
    pub orange:     u32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: 0xFF1A1A2E,
            text:       0xFFEEEEEE,
            white:      0xFFFFFFFF,
            red:        0xFFFF0000,
            green:      0xFF00FF00,
            blue:       0xFF0000FF,
            yellow:     0xFFFFFF00,
            purple:     0xFFFF00FF,
            orange:     0xFFFFA500,
        }
    }
}

impl Palette {
    /// The five colors balloons and color dots are drawn from.
    pub fn game_colors(&self) -> [u32; 5] {
        [self.red, self.green, self.blue, self.yellow, self.purple]
    }
}

// ── Per-game limits ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GamesConfig {
    pub balloon_pop:    TimedLevels,
    pub catch_droplets: DropletsConfig,
    pub color_match:    ColorMatchConfig,
    pub connect_dots:   DrawingConfig,
    pub shape_drawing:  ShapeDrawingConfig,
}

/// Levels that end on a timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimedLevels {
    pub levels:        u32,
    pub level_seconds: u32,
}

impl Default for TimedLevels {
    fn default() -> Self {
        Self { levels: 3, level_seconds: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DropletsConfig {
    pub levels:        u32,
    pub level_seconds: u32,
    pub bucket_width:  u32,
    pub bucket_height: u32,
}

impl Default for DropletsConfig {
    fn default() -> Self {
        Self { levels: 3, level_seconds: 10, bucket_width: 150, bucket_height: 60 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorMatchConfig {
    pub levels:          u32,
    pub sequence_length: u32,
}

impl Default for ColorMatchConfig {
    fn default() -> Self {
        Self { levels: 3, sequence_length: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingConfig {
    pub levels: u32,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self { levels: 3 }
    }
}

/// Four levels by default, the last one being the star.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeDrawingConfig {
    pub levels: u32,
}

impl Default for ShapeDrawingConfig {
    fn default() -> Self {
        Self { levels: 4 }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!((cfg.window.width, cfg.window.height), (1380, 820));
        assert_eq!(cfg.player.name, "Player1");
        assert_eq!(cfg.tracker.max_hands, 1);
        assert_eq!(cfg.games.shape_drawing.levels, 4);
        assert_eq!(cfg.games.connect_dots.levels, 3);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = Config::from_toml(
            r#"
            [window]
            width = 640

            [input]
            source = "upstream"
            upstream_command = "./helper"

            [games.shape_drawing]
            levels = 6
            "#,
        )
        .unwrap();
        assert_eq!(cfg.window.width, 640);
        assert_eq!(cfg.window.height, 820);
        assert_eq!(cfg.input.source, InputSource::Upstream);
        assert_eq!(cfg.games.shape_drawing.levels, 6);
        assert_eq!(cfg.games.balloon_pop.level_seconds, 10);
    }

    #[test]
    fn shape_drawing_table_without_levels_keeps_four() {
        let cfg = Config::from_toml(
            r#"
            [games.connect_dots]
            [games.shape_drawing]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.games.shape_drawing.levels, 4);
        assert_eq!(cfg.games.connect_dots.levels, 3);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        assert!(matches!(Config::from_toml("[window"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Config::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile(_)));
    }

    #[test]
    fn out_of_range_confidence_is_rejected() {
        let mut cfg = Config::default();
        cfg.tracker.detection_confidence = 1.5;
        match cfg.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => {
                assert_eq!(field, "tracker.detection_confidence")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn zero_limits_are_rejected() {
        let mut cfg = Config::default();
        cfg.games.color_match.sequence_length = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.window.height = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.tracker.max_hands = 0;
        assert!(cfg.validate().is_err());
    }
}
