//! Error types for hand tracking

use thiserror::Error;

/// Errors raised while reading frames or detecting landmarks.
///
/// None of these are fatal to the process: a failed frame ends the current
/// game loop and the caller goes back to the menu.
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Frame read failed: {0}")]
    FrameRead(String),

    #[error("Landmark provider error: {0}")]
    Provider(String),

    #[error("Upstream protocol error: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for tracking operations
pub type Result<T> = std::result::Result<T, TrackingError>;
