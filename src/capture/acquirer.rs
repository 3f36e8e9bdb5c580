//! Stream acquisition policy
//!
//! Turns a [`RecorderSettings`] into live tracks. Screen acquisition failure
//! is fatal to the session and propagates to the caller; microphone/webcam
//! failure degrades the session to whatever subset succeeded.

use std::sync::Arc;

use super::track::MediaTrack;
use super::traits::{
    CaptureBackend, CaptureError, DisplayRequest, Resolution, UserMediaRequest,
};
use crate::recorder::settings::RecorderSettings;

/// Ideal webcam overlay resolution
const WEBCAM_RESOLUTION: Resolution = Resolution {
    width: 320,
    height: 240,
};

/// Everything acquired for one session
#[derive(Debug)]
pub struct AcquiredMedia {
    pub screen_video: MediaTrack,
    pub system_audio: Option<MediaTrack>,
    pub microphone: Option<MediaTrack>,
    pub webcam: Option<MediaTrack>,
}

impl AcquiredMedia {
    /// All live track handles, for release tracking
    pub fn tracks(&self) -> Vec<MediaTrack> {
        let mut tracks = vec![self.screen_video.clone()];
        tracks.extend(self.system_audio.clone());
        tracks.extend(self.microphone.clone());
        tracks.extend(self.webcam.clone());
        tracks
    }
}

/// Acquires media sources from a capture backend per session settings
pub struct StreamAcquirer {
    backend: Arc<dyn CaptureBackend>,
}

impl StreamAcquirer {
    pub fn new(backend: Arc<dyn CaptureBackend>) -> Self {
        Self { backend }
    }

    /// Acquire all sources the settings call for.
    ///
    /// Screen capture comes first; if it fails the error propagates.
    /// Microphone/webcam are requested together in one combined call and
    /// any failure there is logged and swallowed.
    pub async fn acquire(&self, settings: &RecorderSettings) -> Result<AcquiredMedia, CaptureError> {
        let display_media = self
            .backend
            .acquire_display(DisplayRequest {
                resolution: settings.quality.resolution(),
                capture_audio: settings.audio.wants_system(),
            })
            .await?;

        let mut microphone = None;
        let mut webcam = None;

        let wants_mic = settings.audio.wants_microphone();
        if wants_mic || settings.webcam {
            let request = UserMediaRequest {
                audio: wants_mic,
                video: settings.webcam.then_some(WEBCAM_RESOLUTION),
            };
            match self.backend.acquire_user_media(request).await {
                Ok(media) => {
                    microphone = media.audio;
                    webcam = media.video;
                }
                Err(e) => {
                    tracing::warn!("could not acquire mic/webcam, continuing without: {e}");
                }
            }
        }

        tracing::info!(
            system_audio = display_media.system_audio.is_some(),
            microphone = microphone.is_some(),
            webcam = webcam.is_some(),
            "media acquired"
        );

        Ok(AcquiredMedia {
            screen_video: display_media.video,
            system_audio: display_media.system_audio,
            microphone,
            webcam,
        })
    }
}
