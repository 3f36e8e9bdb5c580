//! Session settings
//!
//! Supplied once at session start and never mutated during a session.

use serde::{Deserialize, Serialize};

use crate::capture::Resolution;

/// Capture quality for the screen video track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoQuality {
    #[serde(rename = "720p")]
    Hd720,
    #[serde(rename = "1080p")]
    Hd1080,
}

impl VideoQuality {
    /// Ideal capture resolution requested from the platform
    pub fn resolution(&self) -> Resolution {
        match self {
            VideoQuality::Hd720 => Resolution {
                width: 1280,
                height: 720,
            },
            VideoQuality::Hd1080 => Resolution {
                width: 1920,
                height: 1080,
            },
        }
    }
}

/// Which audio sources feed the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioSource {
    None,
    Mic,
    System,
    Both,
}

impl AudioSource {
    pub fn wants_microphone(&self) -> bool {
        matches!(self, AudioSource::Mic | AudioSource::Both)
    }

    pub fn wants_system(&self) -> bool {
        matches!(self, AudioSource::System | AudioSource::Both)
    }

    /// Whether the audio mixer is needed at all
    pub fn captures_audio(&self) -> bool {
        !matches!(self, AudioSource::None)
    }
}

/// Immutable per-session configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderSettings {
    pub quality: VideoQuality,
    pub audio: AudioSource,
    pub webcam: bool,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            quality: VideoQuality::Hd720,
            audio: AudioSource::None,
            webcam: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_maps_to_ideal_resolution() {
        assert_eq!(VideoQuality::Hd720.resolution().width, 1280);
        assert_eq!(VideoQuality::Hd1080.resolution().height, 1080);
    }

    #[test]
    fn serializes_with_frontend_naming() {
        let settings = RecorderSettings {
            quality: VideoQuality::Hd1080,
            audio: AudioSource::Both,
            webcam: true,
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["quality"], "1080p");
        assert_eq!(json["audio"], "both");
        assert_eq!(json["webcam"], true);
    }
}
