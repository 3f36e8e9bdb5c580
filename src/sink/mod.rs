//! Recording sink
//!
//! Wraps the platform's incremental encoder: picks a container format from a
//! preference order, pumps emitted chunks into an ordered accumulation
//! buffer, and finalizes the buffer into a single artifact on stop.

pub mod artifact;
pub mod encoder;
pub mod simulated;

pub use artifact::{Artifact, ArtifactInfo};
pub use encoder::{Chunk, EncoderSession, MediaEncoder, SinkError};
pub use simulated::SimulatedEncoder;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::stream::ComposedStream;

/// Chunk flush cadence requested from the encoder
pub const CHUNK_TIMESLICE: Duration = Duration::from_secs(1);

/// Container formats in preference order, most universal first, ending in a
/// baseline every encoder is expected to support.
pub const CONTAINER_PREFERENCES: [&str; 4] = [
    "video/mp4",
    "video/webm;codecs=vp9",
    "video/webm;codecs=vp8",
    "video/webm",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SinkState {
    Recording,
    Paused,
}

#[derive(Default)]
struct ChunkBuffer {
    chunks: Vec<Chunk>,
    total_bytes: u64,
}

/// Accumulating recorder over one composite stream.
///
/// Alive from `start` until consumed by [`RecordingSink::stop`] (producing
/// the artifact) or [`RecordingSink::abort`] (discarding everything).
pub struct RecordingSink {
    state: SinkState,
    session: Box<dyn EncoderSession>,
    media_type: String,
    buffer: Arc<Mutex<ChunkBuffer>>,
    pump: Option<JoinHandle<()>>,
}

impl RecordingSink {
    /// Choose a container format and begin encoding the stream.
    pub async fn start(
        encoder: &dyn MediaEncoder,
        stream: &ComposedStream,
    ) -> Result<Self, SinkError> {
        let media_type = CONTAINER_PREFERENCES
            .iter()
            .find(|t| encoder.is_type_supported(t))
            .copied()
            .ok_or(SinkError::NoSupportedFormat)?;

        tracing::info!(media_type, "starting recording sink");

        let mut session = encoder.start(stream, media_type, CHUNK_TIMESLICE).await?;
        let mut chunks = session
            .take_chunks()
            .ok_or_else(|| SinkError::Encoder("chunk channel unavailable".into()))?;

        let buffer = Arc::new(Mutex::new(ChunkBuffer::default()));
        let pump_buffer = buffer.clone();
        let pump = tokio::spawn(async move {
            while let Some(chunk) = chunks.recv().await {
                if chunk.is_empty() {
                    continue;
                }
                let mut buf = pump_buffer.lock();
                buf.total_bytes += chunk.len() as u64;
                buf.chunks.push(chunk);
            }
        });

        Ok(Self {
            state: SinkState::Recording,
            session,
            media_type: media_type.to_string(),
            buffer,
            pump: Some(pump),
        })
    }

    /// Chosen container media type
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Total bytes accumulated so far
    pub fn accumulated_bytes(&self) -> u64 {
        self.buffer.lock().total_bytes
    }

    /// Suspend the encoder. Silent no-op unless actively recording.
    pub fn pause(&mut self) {
        if self.state == SinkState::Recording {
            self.session.pause();
            self.state = SinkState::Paused;
        }
    }

    /// Resume the encoder. Silent no-op unless paused.
    pub fn resume(&mut self) {
        if self.state == SinkState::Paused {
            self.session.resume();
            self.state = SinkState::Recording;
        }
    }

    /// Finalize: flush the encoder, drain the pump, and concatenate all
    /// accumulated chunks, in arrival order, into one artifact.
    pub async fn stop(mut self) -> Result<Artifact, SinkError> {
        self.session.finish().await?;
        if let Some(pump) = self.pump.take() {
            let _ = pump.await;
        }

        let mut buf = self.buffer.lock();
        let chunks = std::mem::take(&mut buf.chunks);
        let total = buf.total_bytes;
        drop(buf);

        let mut data = Vec::with_capacity(total as usize);
        for chunk in chunks {
            data.extend_from_slice(chunk.data());
        }

        tracing::info!(bytes = data.len(), media_type = %self.media_type, "recording finalized");
        Ok(Artifact::new(data, &self.media_type))
    }

    /// Tear down without producing an artifact (session discarded mid-flight).
    pub async fn abort(mut self) {
        if let Err(e) = self.session.finish().await {
            tracing::warn!("encoder teardown during abort failed: {e}");
        }
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{MediaTrack, TrackKind};
    use crate::stream::compose;

    fn test_stream() -> ComposedStream {
        compose(MediaTrack::new(TrackKind::Video, "display"), None)
    }

    #[tokio::test(start_paused = true)]
    async fn prefers_mp4_when_supported() {
        let encoder = SimulatedEncoder::new();
        let sink = RecordingSink::start(&encoder, &test_stream()).await.unwrap();
        assert_eq!(sink.media_type(), "video/mp4");
        sink.abort().await;
    }

    #[tokio::test(start_paused = true)]
    async fn falls_back_through_preference_order() {
        let encoder = SimulatedEncoder::with_supported(["video/webm"]);
        let sink = RecordingSink::start(&encoder, &test_stream()).await.unwrap();
        assert_eq!(sink.media_type(), "video/webm");
        sink.abort().await;
    }

    #[tokio::test(start_paused = true)]
    async fn rejects_encoder_supporting_nothing() {
        let encoder = SimulatedEncoder::with_supported(Vec::<String>::new());
        let result = RecordingSink::start(&encoder, &test_stream()).await;
        assert!(matches!(result, Err(SinkError::NoSupportedFormat)));
    }

    #[tokio::test(start_paused = true)]
    async fn accumulates_chunks_in_order() {
        let encoder = SimulatedEncoder::new().chunk_bytes(4);
        let sink = RecordingSink::start(&encoder, &test_stream()).await.unwrap();

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(sink.accumulated_bytes(), 12);

        let artifact = sink.stop().await.unwrap();
        // Three periodic chunks plus the final flush, in temporal order.
        assert_eq!(artifact.size_bytes(), 16);
        assert_eq!(
            artifact.data(),
            &[1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn empty_flushes_are_ignored() {
        let encoder = SimulatedEncoder::new().chunk_bytes(8).empty_flush_every(2);
        let sink = RecordingSink::start(&encoder, &test_stream()).await.unwrap();

        tokio::time::sleep(Duration::from_millis(4500)).await;
        // Flushes 2 and 4 were empty; only 1 and 3 accumulated.
        assert_eq!(sink.accumulated_bytes(), 16);

        let artifact = sink.stop().await.unwrap();
        assert_eq!(artifact.size_bytes(), 24);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_suspends_chunk_production() {
        let encoder = SimulatedEncoder::new().chunk_bytes(4);
        let mut sink = RecordingSink::start(&encoder, &test_stream()).await.unwrap();

        tokio::time::sleep(Duration::from_millis(2500)).await;
        sink.pause();
        let before = sink.accumulated_bytes();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(sink.accumulated_bytes(), before);

        sink.resume();
        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert!(sink.accumulated_bytes() > before);
        sink.abort().await;
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_state_pause_and_resume_are_no_ops() {
        let encoder = SimulatedEncoder::new().chunk_bytes(4);
        let mut sink = RecordingSink::start(&encoder, &test_stream()).await.unwrap();

        // Resume while recording changes nothing.
        sink.resume();
        assert_eq!(sink.state, SinkState::Recording);

        sink.pause();
        sink.pause();
        assert_eq!(sink.state, SinkState::Paused);
        sink.abort().await;
    }
}
