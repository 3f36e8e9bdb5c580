//! Session state machine
//!
//! Drives the recording lifecycle: idle → countdown → recording ⇄ paused →
//! preview → idle. All state mutation happens inside `SessionController`
//! under one lock; timers, the chunk pump, and the track-ended watcher feed
//! back into it, guarded by a per-session epoch so nothing from a discarded
//! session is processed after reclamation has begun.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;

use super::resources::SessionResources;
use super::settings::RecorderSettings;
use super::state::{SessionEvent, SessionSnapshot, SessionStatus};
use crate::capture::{CaptureBackend, MediaTrack, StreamAcquirer};
use crate::mixer::AudioGraph;
use crate::sink::{Artifact, MediaEncoder, RecordingSink};
use crate::stream::{compose, ComposedStream};
use crate::utils::error::{RecorderError, RecorderResult};

/// Countdown display starts here and decrements once per second
pub const COUNTDOWN_START: u8 = 3;

const EVENT_CHANNEL_CAPACITY: usize = 256;

struct SessionController {
    status: SessionStatus,
    /// Bumped on every start and reset; events carrying a stale epoch are
    /// dropped.
    epoch: u64,
    countdown: u8,
    elapsed: Arc<AtomicU64>,
    /// Byte total carried into preview after the sink is consumed
    final_bytes: u64,
    resources: SessionResources,
    stream: Option<ComposedStream>,
    screen_ended: Option<watch::Receiver<bool>>,
    sink: Option<RecordingSink>,
    output: Option<Arc<Artifact>>,
    ticker: Option<JoinHandle<()>>,
    watcher: Option<JoinHandle<()>>,
    cancel: Option<watch::Sender<bool>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionController {
    fn new(events: broadcast::Sender<SessionEvent>) -> Self {
        Self {
            status: SessionStatus::Idle,
            epoch: 0,
            countdown: COUNTDOWN_START,
            elapsed: Arc::new(AtomicU64::new(0)),
            final_bytes: 0,
            resources: SessionResources::default(),
            stream: None,
            screen_ended: None,
            sink: None,
            output: None,
            ticker: None,
            watcher: None,
            cancel: None,
            events,
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            countdown: self.countdown,
            elapsed_seconds: self.elapsed.load(Ordering::Relaxed),
            accumulated_bytes: self
                .sink
                .as_ref()
                .map(|s| s.accumulated_bytes())
                .unwrap_or(self.final_bytes),
            output: self.output.as_ref().map(|a| a.info()),
            webcam_live: self
                .resources
                .webcam()
                .map(|t| t.is_live())
                .unwrap_or(false),
        }
    }

    /// Stop the per-session tasks. The watcher is signalled rather than
    /// aborted because this may be running on the watcher itself.
    fn stop_tasks(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        if let Some(cancel) = self.cancel.take() {
            cancel.send_replace(true);
        }
        self.watcher = None;
    }

    /// Shared finalize path for explicit stop and external interruption:
    /// consume the sink into an artifact, reclaim everything, enter preview.
    async fn finalize_into_preview(&mut self) {
        self.stop_tasks();

        if let Some(sink) = self.sink.take() {
            match sink.stop().await {
                Ok(artifact) => {
                    self.final_bytes = artifact.size_bytes();
                    self.output = Some(Arc::new(artifact));
                }
                Err(e) => {
                    tracing::error!("failed to finalize recording: {e}");
                }
            }
        }

        self.stream = None;
        self.screen_ended = None;
        self.resources.reclaim();
        self.status = SessionStatus::Preview;
        let _ = self.events.send(SessionEvent::Finalized);
        tracing::info!(bytes = self.final_bytes, "session finalized, entering preview");
    }

    /// Discard the session from any state and return to idle.
    async fn reset_to_idle(&mut self) {
        self.epoch += 1;
        self.stop_tasks();

        if let Some(sink) = self.sink.take() {
            sink.abort().await;
        }

        self.output = None;
        self.final_bytes = 0;
        self.elapsed.store(0, Ordering::Relaxed);
        self.countdown = COUNTDOWN_START;
        self.stream = None;
        self.screen_ended = None;
        self.resources.reclaim();
        self.status = SessionStatus::Idle;
        let _ = self.events.send(SessionEvent::Reset);
    }
}

/// Recording session facade.
///
/// Owns the capture and encoder boundaries and exactly one session at a
/// time. All lifecycle operations besides [`Recorder::start`] are silent
/// no-ops when called out of state.
pub struct Recorder {
    capture: Arc<dyn CaptureBackend>,
    encoder: Arc<dyn MediaEncoder>,
    inner: Arc<Mutex<SessionController>>,
    events: broadcast::Sender<SessionEvent>,
}

impl Recorder {
    pub fn new(capture: Arc<dyn CaptureBackend>, encoder: Arc<dyn MediaEncoder>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            capture,
            encoder,
            inner: Arc::new(Mutex::new(SessionController::new(events.clone()))),
            events,
        }
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Current session state for the presentation layer
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().await.snapshot()
    }

    pub async fn status(&self) -> SessionStatus {
        self.inner.lock().await.status
    }

    /// Live webcam track for the overlay, while one is held
    pub async fn webcam_track(&self) -> Option<MediaTrack> {
        self.inner.lock().await.resources.webcam().cloned()
    }

    /// The finalized artifact, once the session reached preview
    pub async fn output(&self) -> Option<Arc<Artifact>> {
        self.inner.lock().await.output.clone()
    }

    /// Start a new session: acquire media, mix audio, compose the stream,
    /// run the countdown, then begin recording.
    ///
    /// Only valid from idle. Screen-acquisition failure is fatal and leaves
    /// the session idle; microphone/webcam failures degrade silently.
    pub async fn start(&self, settings: RecorderSettings) -> RecorderResult<()> {
        let epoch = {
            let mut inner = self.inner.lock().await;
            if inner.status != SessionStatus::Idle {
                return Err(RecorderError::SessionActive);
            }
            tracing::info!(?settings, "starting session");

            let acquirer = StreamAcquirer::new(self.capture.clone());
            let acquired = acquirer.acquire(&settings).await?;

            inner.screen_ended = Some(acquired.screen_video.ended());
            if let Some(webcam) = &acquired.webcam {
                inner.resources.set_webcam(webcam.clone());
            }

            let mixed = if settings.audio.captures_audio() {
                let inputs: Vec<&MediaTrack> = acquired
                    .system_audio
                    .iter()
                    .chain(acquired.microphone.iter())
                    .collect();
                let graph = AudioGraph::mix(inputs);
                let output = graph.output();
                inner.resources.set_audio_graph(graph);
                Some(output)
            } else {
                None
            };

            inner.stream = Some(compose(acquired.screen_video.clone(), mixed));
            inner.resources.register_tracks(acquired.tracks());

            inner.epoch += 1;
            inner.status = SessionStatus::Countdown;
            inner.countdown = COUNTDOWN_START;
            inner.epoch
        };

        // Countdown runs without the lock so reset stays reachable.
        for value in (1..=COUNTDOWN_START).rev() {
            {
                let mut inner = self.inner.lock().await;
                if inner.epoch != epoch || inner.status != SessionStatus::Countdown {
                    return Ok(());
                }
                inner.countdown = value;
                let _ = self.events.send(SessionEvent::CountdownTick(value));
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        let mut inner = self.inner.lock().await;
        if inner.epoch != epoch || inner.status != SessionStatus::Countdown {
            return Ok(());
        }
        let Some(stream) = inner.stream.take() else {
            return Ok(());
        };

        let sink = match RecordingSink::start(self.encoder.as_ref(), &stream).await {
            Ok(sink) => sink,
            Err(e) => {
                tracing::error!("failed to start recording sink: {e}");
                inner.screen_ended = None;
                inner.resources.reclaim();
                inner.status = SessionStatus::Idle;
                return Err(e.into());
            }
        };

        inner.stream = Some(stream);
        inner.elapsed.store(0, Ordering::Relaxed);
        inner.final_bytes = 0;
        inner.sink = Some(sink);
        inner.status = SessionStatus::Recording;

        let (cancel_tx, cancel_rx) = watch::channel(false);
        inner.cancel = Some(cancel_tx);
        inner.ticker = Some(spawn_ticker(inner.elapsed.clone(), self.events.clone()));
        if let Some(ended) = inner.screen_ended.take() {
            inner.watcher = Some(self.spawn_watcher(ended, cancel_rx, epoch));
        }

        let _ = self.events.send(SessionEvent::Started);
        tracing::info!("recording started");
        Ok(())
    }

    /// Pause recording. No-op unless recording.
    pub async fn pause(&self) {
        let mut inner = self.inner.lock().await;
        if inner.status != SessionStatus::Recording {
            return;
        }
        if let Some(sink) = inner.sink.as_mut() {
            sink.pause();
        }
        if let Some(ticker) = inner.ticker.take() {
            ticker.abort();
        }
        inner.status = SessionStatus::Paused;
        let _ = self.events.send(SessionEvent::Paused);
        tracing::info!("recording paused");
    }

    /// Resume recording. No-op unless paused.
    pub async fn resume(&self) {
        let mut inner = self.inner.lock().await;
        if inner.status != SessionStatus::Paused {
            return;
        }
        if let Some(sink) = inner.sink.as_mut() {
            sink.resume();
        }
        inner.ticker = Some(spawn_ticker(inner.elapsed.clone(), self.events.clone()));
        inner.status = SessionStatus::Recording;
        let _ = self.events.send(SessionEvent::Resumed);
        tracing::info!("recording resumed");
    }

    /// Stop recording and finalize the artifact. No-op outside
    /// recording/paused, so repeated stops and stop-during-countdown are
    /// harmless.
    pub async fn stop(&self) {
        Self::finalize_session(self.inner.as_ref(), None).await;
    }

    /// Discard the session from any state: abort the sink without an
    /// artifact, reclaim all resources, zero counters, return to idle.
    /// Idempotent.
    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        inner.reset_to_idle().await;
        tracing::info!("session reset");
    }

    async fn finalize_session(inner: &Mutex<SessionController>, epoch: Option<u64>) {
        let mut inner = inner.lock().await;
        if let Some(expected) = epoch {
            if inner.epoch != expected {
                return;
            }
        }
        if !matches!(
            inner.status,
            SessionStatus::Recording | SessionStatus::Paused
        ) {
            return;
        }
        inner.finalize_into_preview().await;
    }

    /// Watch for external termination of the screen track and funnel it into
    /// the same finalize path as an explicit stop.
    fn spawn_watcher(
        &self,
        mut ended: watch::Receiver<bool>,
        mut cancelled: watch::Receiver<bool>,
        epoch: u64,
    ) -> JoinHandle<()> {
        let inner = self.inner.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = ended.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        if *ended.borrow() {
                            tracing::info!("screen sharing ended externally, finalizing");
                            Recorder::finalize_session(inner.as_ref(), Some(epoch)).await;
                            break;
                        }
                    }
                    _ = cancelled.changed() => break,
                }
            }
        })
    }
}

fn spawn_ticker(
    elapsed: Arc<AtomicU64>,
    events: broadcast::Sender<SessionEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(
            tokio::time::Instant::now() + Duration::from_secs(1),
            Duration::from_secs(1),
        );
        loop {
            interval.tick().await;
            let elapsed_seconds = elapsed.fetch_add(1, Ordering::Relaxed) + 1;
            let _ = events.send(SessionEvent::Progress { elapsed_seconds });
        }
    })
}
