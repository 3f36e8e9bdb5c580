//! Live media track handles
//!
//! A `MediaTrack` is an opaque, cloneable handle to one live audio or video
//! capture track. Clones share liveness: stopping any handle stops the
//! underlying track. Tracks can also end externally (e.g. the user closes the
//! OS "stop sharing" control), which is observable through [`MediaTrack::ended`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

/// Kind of media a track carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Audio,
    Video,
}

#[derive(Debug)]
struct TrackShared {
    live: AtomicBool,
    ended_tx: watch::Sender<bool>,
}

/// Handle to one live capture track
#[derive(Debug, Clone)]
pub struct MediaTrack {
    id: Uuid,
    kind: TrackKind,
    label: Arc<str>,
    shared: Arc<TrackShared>,
}

impl MediaTrack {
    /// Create a new live track
    pub fn new(kind: TrackKind, label: impl Into<String>) -> Self {
        let (ended_tx, _) = watch::channel(false);
        Self {
            id: Uuid::new_v4(),
            kind,
            label: label.into().into(),
            shared: Arc::new(TrackShared {
                live: AtomicBool::new(true),
                ended_tx,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the underlying capture is still running
    pub fn is_live(&self) -> bool {
        self.shared.live.load(Ordering::Relaxed)
    }

    /// Stop the track from our side. Idempotent; does not fire the
    /// ended notification (mirrors platform track semantics, where a
    /// locally-stopped track does not raise its own termination event).
    pub fn stop(&self) {
        if self.shared.live.swap(false, Ordering::Relaxed) {
            tracing::debug!(track = %self.id, label = %self.label, "track stopped");
        }
    }

    /// Terminate the track from the outside, as when the user revokes
    /// screen sharing. Marks the track dead and notifies `ended` watchers.
    pub fn terminate(&self) {
        if self.shared.live.swap(false, Ordering::Relaxed) {
            tracing::info!(track = %self.id, label = %self.label, "track ended externally");
        }
        self.shared.ended_tx.send_replace(true);
    }

    /// Subscribe to external termination of this track
    pub fn ended(&self) -> watch::Receiver<bool> {
        self.shared.ended_tx.subscribe()
    }
}
