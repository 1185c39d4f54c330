//! Error types for the face tracking pipeline.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Landmark set has the wrong length or non-finite coordinates
    #[error("Invalid landmarks: {0}")]
    InvalidLandmarks(String),

    /// Pose could not be recovered for this frame
    #[error("No pose: {0}")]
    NoPose(String),

    /// The landmark source failed to deliver a frame
    #[error("Frame acquisition error: {0}")]
    FrameAcquisition(String),

    /// The landmark source could not be opened at all
    #[error("Landmark source unavailable: {0}")]
    SourceUnavailable(String),

    /// Sending to or closing the outbound transport failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Whether the frame loop may skip this error and keep going
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoPose(_) | Self::FrameAcquisition(_) | Self::InvalidLandmarks(_) | Self::Transport(_)
        )
    }
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
