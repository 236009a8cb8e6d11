//! Error types for the game shell

use thiserror::Error;

use hand_tracking::TrackingError;

/// Top-level error for the game shell.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Window error: {0}")]
    Window(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tracking error: {0}")]
    Tracking(#[from] TrackingError),
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
