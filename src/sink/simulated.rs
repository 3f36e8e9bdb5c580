//! Simulated encoder backend
//!
//! Deterministic in-process implementation of [`MediaEncoder`]: emits one
//! fixed-size chunk per timeslice while active, honors pause/resume, and
//! flushes a trailing chunk when finished. Supports injecting empty flushes
//! to exercise the sink's skip-empty policy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::encoder::{Chunk, EncoderSession, MediaEncoder, SinkError};
use crate::stream::ComposedStream;

/// In-process encoder with deterministic chunk production
pub struct SimulatedEncoder {
    supported: Vec<String>,
    chunk_bytes: usize,
    empty_every: Option<u64>,
}

impl SimulatedEncoder {
    pub fn new() -> Self {
        Self {
            supported: vec![
                "video/mp4".into(),
                "video/webm;codecs=vp9".into(),
                "video/webm;codecs=vp8".into(),
                "video/webm".into(),
            ],
            chunk_bytes: 256,
            empty_every: None,
        }
    }

    /// Restrict the supported media types
    pub fn with_supported<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            supported: types.into_iter().map(Into::into).collect(),
            ..Self::new()
        }
    }

    /// Size of each produced chunk
    pub fn chunk_bytes(mut self, bytes: usize) -> Self {
        self.chunk_bytes = bytes;
        self
    }

    /// Emit an empty flush every `n`-th timeslice
    pub fn empty_flush_every(mut self, n: u64) -> Self {
        self.empty_every = Some(n);
        self
    }
}

impl Default for SimulatedEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaEncoder for SimulatedEncoder {
    fn is_type_supported(&self, media_type: &str) -> bool {
        self.supported.iter().any(|t| t == media_type)
    }

    async fn start(
        &self,
        stream: &ComposedStream,
        media_type: &str,
        timeslice: Duration,
    ) -> Result<Box<dyn EncoderSession>, SinkError> {
        if !self.is_type_supported(media_type) {
            return Err(SinkError::Encoder(format!(
                "unsupported media type: {media_type}"
            )));
        }

        tracing::debug!(
            stream = %stream.id(),
            media_type,
            audio_tracks = stream.audio_tracks().len(),
            "simulated encode started"
        );

        let (tx, rx) = mpsc::channel(64);
        let paused = Arc::new(AtomicBool::new(false));
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let chunk_bytes = self.chunk_bytes;
        let empty_every = self.empty_every;
        let paused_flag = paused.clone();

        let task = tokio::spawn(async move {
            let payload = |seq: u64| Chunk::new(vec![(seq % 256) as u8; chunk_bytes]);
            let mut seq: u64 = 0;
            loop {
                tokio::select! {
                    _ = stop_rx.changed() => {
                        // Final flush of whatever is buffered, then end-of-stream.
                        seq += 1;
                        let _ = tx.send(payload(seq)).await;
                        break;
                    }
                    _ = tokio::time::sleep(timeslice) => {
                        if paused_flag.load(Ordering::Relaxed) {
                            continue;
                        }
                        seq += 1;
                        let chunk = if empty_every.is_some_and(|n| seq % n == 0) {
                            Chunk::empty()
                        } else {
                            payload(seq)
                        };
                        if tx.send(chunk).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Ok(Box::new(SimulatedSession {
            chunks: Some(rx),
            paused,
            stop_tx,
            task: Some(task),
        }))
    }
}

struct SimulatedSession {
    chunks: Option<mpsc::Receiver<Chunk>>,
    paused: Arc<AtomicBool>,
    stop_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

#[async_trait]
impl EncoderSession for SimulatedSession {
    fn take_chunks(&mut self) -> Option<mpsc::Receiver<Chunk>> {
        self.chunks.take()
    }

    fn pause(&mut self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    fn resume(&mut self) {
        self.paused.store(false, Ordering::Relaxed);
    }

    async fn finish(&mut self) -> Result<(), SinkError> {
        self.stop_tx.send_replace(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        Ok(())
    }
}
