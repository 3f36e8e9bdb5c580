//! Session state types
//!
//! Defines the session status enum, the observable event stream, and the
//! snapshot the presentation layer polls.

use serde::{Deserialize, Serialize};

use crate::sink::ArtifactInfo;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// No session in progress
    Idle,
    /// Media acquired, counting down before recording starts
    Countdown,
    /// Actively recording
    Recording,
    /// Recording suspended, resumable
    Paused,
    /// Finalized artifact available for review
    Preview,
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self::Idle
    }
}

/// Events broadcast while a session runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Countdown display value changed (3, 2, 1)
    CountdownTick(u8),
    /// Recording began
    Started,
    /// Recording paused
    Paused,
    /// Recording resumed
    Resumed,
    /// One more second of recording elapsed
    Progress { elapsed_seconds: u64 },
    /// Artifact finalized, session in preview
    Finalized,
    /// Session discarded, back to idle
    Reset,
}

/// Point-in-time view of the session for the presentation layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub countdown: u8,
    pub elapsed_seconds: u64,
    pub accumulated_bytes: u64,
    pub output: Option<ArtifactInfo>,
    pub webcam_live: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(SessionStatus::Countdown).unwrap(),
            "countdown"
        );
    }

    #[test]
    fn snapshot_uses_camel_case() {
        let snapshot = SessionSnapshot {
            status: SessionStatus::Recording,
            countdown: 3,
            elapsed_seconds: 12,
            accumulated_bytes: 4096,
            output: None,
            webcam_live: true,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["elapsedSeconds"], 12);
        assert_eq!(json["accumulatedBytes"], 4096);
        assert_eq!(json["webcamLive"], true);
    }
}
