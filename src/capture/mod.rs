//! Media capture layer
//!
//! This module defines the boundary to the platform capture subsystem:
//! - `CaptureBackend` trait for acquiring display and user-device media
//! - `MediaTrack` handles for live hardware tracks
//! - `StreamAcquirer` which applies the session's acquisition policy
//! - `SimulatedCapture`, a deterministic in-process backend

pub mod acquirer;
pub mod simulated;
pub mod track;
pub mod traits;

pub use acquirer::{AcquiredMedia, StreamAcquirer};
pub use simulated::{SimulatedCapture, SimulatedCaptureConfig};
pub use track::{MediaTrack, TrackKind};
pub use traits::{
    CaptureBackend, CaptureError, DisplayMedia, DisplayRequest, Resolution, UserMedia,
    UserMediaRequest,
};
