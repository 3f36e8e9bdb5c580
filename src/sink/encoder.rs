//! Encoder boundary
//!
//! The platform's incremental media-encoding facility, treated as a black
//! box: it accepts a composite stream plus a container-format hint and emits
//! encoded chunks at a fixed cadence.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::stream::ComposedStream;

/// One incremental unit of encoded output data. Immutable once produced;
/// concatenation order equals temporal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    data: Vec<u8>,
}

impl Chunk {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// An empty flush; ignored by the sink, not an error or end-of-stream
    pub fn empty() -> Self {
        Self { data: Vec::new() }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Errors surfaced by the encoding boundary
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("no supported container format among preferences")]
    NoSupportedFormat,

    #[error("encoder error: {0}")]
    Encoder(String),
}

/// Boundary to the platform's incremental encoder
#[async_trait]
pub trait MediaEncoder: Send + Sync {
    /// Whether the encoder can produce the given media type
    fn is_type_supported(&self, media_type: &str) -> bool;

    /// Begin encoding the stream, flushing a chunk every `timeslice`
    async fn start(
        &self,
        stream: &ComposedStream,
        media_type: &str,
        timeslice: Duration,
    ) -> Result<Box<dyn EncoderSession>, SinkError>;
}

/// A running encode of one composite stream
#[async_trait]
pub trait EncoderSession: Send {
    /// Take the chunk channel. Yields `None` on the second call.
    fn take_chunks(&mut self) -> Option<mpsc::Receiver<Chunk>>;

    /// Suspend chunk production; no-op if not actively encoding
    fn pause(&mut self);

    /// Resume chunk production; no-op if not paused
    fn resume(&mut self);

    /// Flush remaining data and end the stream; the chunk channel closes
    /// after the final flush.
    async fn finish(&mut self) -> Result<(), SinkError>;
}
