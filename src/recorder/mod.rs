//! Recording session engine
//!
//! This module implements the session lifecycle:
//! - `RecorderSettings` captured once at session start
//! - the session state machine (idle → countdown → recording ⇄ paused →
//!   preview → idle) behind the `Recorder` facade
//! - `SessionResources` for deterministic reclamation on every exit path

pub mod resources;
pub mod session;
pub mod settings;
pub mod state;

pub use resources::SessionResources;
pub use session::Recorder;
pub use settings::{AudioSource, RecorderSettings, VideoQuality};
pub use state::{SessionEvent, SessionSnapshot, SessionStatus};
