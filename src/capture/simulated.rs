//! Simulated capture backend
//!
//! Deterministic in-process implementation of [`CaptureBackend`] used by
//! tests and demos. Supports failure injection (denied display, denied
//! user media, missing system-audio loopback) and exposes the created
//! screen track so a test can revoke sharing mid-session.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::track::{MediaTrack, TrackKind};
use super::traits::{
    CaptureBackend, CaptureError, DisplayMedia, DisplayRequest, UserMedia, UserMediaRequest,
};

/// Failure-injection knobs for [`SimulatedCapture`]
#[derive(Debug, Clone)]
pub struct SimulatedCaptureConfig {
    /// Deny display capture (permission error)
    pub deny_display: bool,

    /// Deny the combined microphone/webcam request (device error)
    pub deny_user_media: bool,

    /// Whether system-audio loopback is available
    pub system_audio_available: bool,
}

impl Default for SimulatedCaptureConfig {
    fn default() -> Self {
        Self {
            deny_display: false,
            deny_user_media: false,
            system_audio_available: true,
        }
    }
}

/// In-process capture backend with deterministic behavior
pub struct SimulatedCapture {
    config: SimulatedCaptureConfig,
    screen_video: Mutex<Option<MediaTrack>>,
    user_media_requests: AtomicUsize,
}

impl SimulatedCapture {
    pub fn new() -> Self {
        Self::with_config(SimulatedCaptureConfig::default())
    }

    pub fn with_config(config: SimulatedCaptureConfig) -> Self {
        Self {
            config,
            screen_video: Mutex::new(None),
            user_media_requests: AtomicUsize::new(0),
        }
    }

    /// The most recently granted screen video track
    pub fn screen_track(&self) -> Option<MediaTrack> {
        self.screen_video.lock().clone()
    }

    /// Simulate the user revoking screen sharing via the OS control.
    /// Returns false if no display capture has been granted.
    pub fn end_screen_share(&self) -> bool {
        match self.screen_video.lock().as_ref() {
            Some(track) => {
                track.terminate();
                true
            }
            None => false,
        }
    }

    /// Number of combined user-media requests seen so far
    pub fn user_media_requests(&self) -> usize {
        self.user_media_requests.load(Ordering::Relaxed)
    }
}

impl Default for SimulatedCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureBackend for SimulatedCapture {
    async fn acquire_display(&self, request: DisplayRequest) -> Result<DisplayMedia, CaptureError> {
        if self.config.deny_display {
            return Err(CaptureError::PermissionDenied(
                "screen capture denied".into(),
            ));
        }

        let video = MediaTrack::new(
            TrackKind::Video,
            format!(
                "display-{}x{}",
                request.resolution.width, request.resolution.height
            ),
        );
        *self.screen_video.lock() = Some(video.clone());

        let system_audio = (request.capture_audio && self.config.system_audio_available)
            .then(|| MediaTrack::new(TrackKind::Audio, "system-audio"));

        Ok(DisplayMedia {
            video,
            system_audio,
        })
    }

    async fn acquire_user_media(
        &self,
        request: UserMediaRequest,
    ) -> Result<UserMedia, CaptureError> {
        self.user_media_requests.fetch_add(1, Ordering::Relaxed);

        if self.config.deny_user_media {
            return Err(CaptureError::DeviceUnavailable(
                "microphone/webcam unavailable".into(),
            ));
        }

        Ok(UserMedia {
            audio: request
                .audio
                .then(|| MediaTrack::new(TrackKind::Audio, "microphone")),
            video: request
                .video
                .map(|_| MediaTrack::new(TrackKind::Video, "webcam")),
        })
    }
}
