//! Audio mixing
//!
//! Combines zero, one, or two audio tracks (system audio, microphone) into a
//! single output track through a graph of audio nodes: one source node per
//! input, all connected to one destination node, backed by exactly one
//! audio-processing context per session.

use std::sync::atomic::{AtomicBool, Ordering};

use uuid::Uuid;

use crate::capture::{MediaTrack, TrackKind};

/// One source node in the graph, wrapping an input track
#[derive(Debug)]
struct SourceNode {
    track_id: Uuid,
}

/// Audio-processing graph for one session.
///
/// The graph owns the processing context; [`AudioGraph::close`] releases it
/// and is idempotent. The output track stays the same regardless of how
/// many sources feed the destination.
#[derive(Debug)]
pub struct AudioGraph {
    context_id: Uuid,
    closed: AtomicBool,
    sources: Vec<SourceNode>,
    destination: MediaTrack,
}

impl AudioGraph {
    /// Create a fresh graph with its own processing context
    pub fn new() -> Self {
        let context_id = Uuid::new_v4();
        tracing::debug!(context = %context_id, "audio context created");
        Self {
            context_id,
            closed: AtomicBool::new(false),
            sources: Vec::new(),
            destination: MediaTrack::new(TrackKind::Audio, "mixed-audio"),
        }
    }

    /// Build a graph from the given input tracks
    pub fn mix<'a>(inputs: impl IntoIterator<Item = &'a MediaTrack>) -> Self {
        let mut graph = Self::new();
        for track in inputs {
            graph.connect(track);
        }
        graph
    }

    /// Wrap a track as a source node and connect it to the destination.
    /// Non-audio tracks are rejected with a warning.
    pub fn connect(&mut self, track: &MediaTrack) {
        if track.kind() != TrackKind::Audio {
            tracing::warn!(track = %track.id(), "refusing to connect non-audio track to mixer");
            return;
        }
        self.sources.push(SourceNode {
            track_id: track.id(),
        });
        tracing::debug!(context = %self.context_id, track = %track.id(), "audio source connected");
    }

    /// Number of connected source nodes
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Whether the given track feeds the destination
    pub fn has_source(&self, track: &MediaTrack) -> bool {
        self.sources.iter().any(|s| s.track_id == track.id())
    }

    /// The destination node's single output track
    pub fn output(&self) -> MediaTrack {
        self.destination.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }

    /// Close the processing context. Closing an already-closed context is a
    /// no-op, never an error.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::Relaxed) {
            self.destination.stop();
            tracing::debug!(context = %self.context_id, "audio context closed");
        }
    }
}

impl Default for AudioGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixes_two_sources_into_one_track() {
        let system = MediaTrack::new(TrackKind::Audio, "system-audio");
        let mic = MediaTrack::new(TrackKind::Audio, "microphone");

        let graph = AudioGraph::mix([&system, &mic]);

        assert_eq!(graph.source_count(), 2);
        assert!(graph.has_source(&system));
        assert!(graph.has_source(&mic));
        assert_eq!(graph.output().kind(), TrackKind::Audio);
    }

    #[test]
    fn zero_sources_still_yield_an_output_track() {
        let graph = AudioGraph::mix(Vec::<&MediaTrack>::new());
        assert_eq!(graph.source_count(), 0);
        assert!(graph.output().is_live());
    }

    #[test]
    fn video_tracks_are_not_connected() {
        let video = MediaTrack::new(TrackKind::Video, "display");
        let graph = AudioGraph::mix([&video]);
        assert_eq!(graph.source_count(), 0);
    }

    #[test]
    fn close_is_idempotent() {
        let graph = AudioGraph::new();
        let output = graph.output();

        graph.close();
        graph.close();

        assert!(graph.is_closed());
        assert!(!output.is_live());
    }
}
