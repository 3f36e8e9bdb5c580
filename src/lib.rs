//! screenreel - screen recording session engine.
//!
//! Acquires screen, microphone, and webcam media, mixes audio into a single
//! track, composes one recordable stream, and drives it through a
//! countdown/record/pause/preview lifecycle with incremental chunk
//! accumulation and deterministic resource reclamation. Platform capture and
//! encoding are pluggable boundaries; simulated implementations ship for
//! tests and demos.

pub mod capture;
pub mod mixer;
pub mod recorder;
pub mod sink;
pub mod stream;
pub mod utils;

pub use capture::{CaptureBackend, MediaTrack, SimulatedCapture, TrackKind};
pub use recorder::{
    AudioSource, Recorder, RecorderSettings, SessionEvent, SessionSnapshot, SessionStatus,
    VideoQuality,
};
pub use sink::{Artifact, ArtifactInfo, MediaEncoder, SimulatedEncoder};
pub use utils::error::{RecorderError, RecorderResult};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging for binaries embedding the engine
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "screenreel=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
