//! Error types and handling
//!
//! Common error types used across the crate.

use thiserror::Error;

use crate::capture::CaptureError;
use crate::sink::SinkError;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("a recording session is already active")]
    SessionActive,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using RecorderError
pub type RecorderResult<T> = Result<T, RecorderError>;
