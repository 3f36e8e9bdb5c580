//! Capture trait definitions
//!
//! Platform-agnostic boundary to the host capture subsystem. A backend
//! grants or denies access to the display, microphone, and webcam, and
//! returns live [`MediaTrack`] handles on success.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::track::MediaTrack;

/// Video resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Request for display (screen) capture
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRequest {
    /// Ideal capture resolution
    pub resolution: Resolution,

    /// Whether to also capture system audio
    pub capture_audio: bool,
}

/// Request for user-device capture (microphone and/or webcam).
///
/// Both devices are requested in one call so the platform can prompt the
/// user once; the result is split into separate track handles by kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMediaRequest {
    /// Whether to capture microphone audio
    pub audio: bool,

    /// Ideal webcam resolution, if webcam video is wanted
    pub video: Option<Resolution>,
}

/// Result of a display capture request
#[derive(Debug)]
pub struct DisplayMedia {
    pub video: MediaTrack,

    /// Present only when requested and the platform supports loopback
    pub system_audio: Option<MediaTrack>,
}

/// Result of a user-device capture request
#[derive(Debug)]
pub struct UserMedia {
    pub audio: Option<MediaTrack>,
    pub video: Option<MediaTrack>,
}

/// Errors surfaced by a capture backend
#[derive(Error, Debug, Clone)]
pub enum CaptureError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),
}

/// Boundary to the platform capture subsystem
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Request display capture, optionally with system audio
    async fn acquire_display(&self, request: DisplayRequest) -> Result<DisplayMedia, CaptureError>;

    /// Request microphone and/or webcam capture in a single combined prompt
    async fn acquire_user_media(&self, request: UserMediaRequest)
        -> Result<UserMedia, CaptureError>;
}
