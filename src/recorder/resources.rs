//! Session resource ownership and reclamation
//!
//! Every hardware track and the audio-processing graph acquired for a
//! session are registered here, so one `reclaim` call releases them all.
//! Reclamation runs on every terminal path (stop, external interruption,
//! acquisition failure, reset) and never fails.

use crate::capture::MediaTrack;
use crate::mixer::AudioGraph;

/// Owns all live resources of the current session
#[derive(Debug, Default)]
pub struct SessionResources {
    tracks: Vec<MediaTrack>,
    audio_graph: Option<AudioGraph>,
    webcam: Option<MediaTrack>,
}

impl SessionResources {
    /// Register acquired tracks for later release
    pub fn register_tracks(&mut self, tracks: impl IntoIterator<Item = MediaTrack>) {
        self.tracks.extend(tracks);
    }

    /// Take ownership of the session's audio graph
    pub fn set_audio_graph(&mut self, graph: AudioGraph) {
        self.audio_graph = Some(graph);
    }

    /// Keep the webcam track visible to the overlay UI
    pub fn set_webcam(&mut self, track: MediaTrack) {
        self.webcam = Some(track);
    }

    /// The webcam track, while one is held
    pub fn webcam(&self) -> Option<&MediaTrack> {
        self.webcam.as_ref()
    }

    /// Number of registered tracks still live
    pub fn live_track_count(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_live()).count()
    }

    /// Stop every live track, close the audio context, and clear the webcam
    /// reference. Idempotent; swallows nothing because nothing here can fail.
    pub fn reclaim(&mut self) {
        for track in self.tracks.drain(..) {
            track.stop();
        }
        if let Some(graph) = self.audio_graph.take() {
            graph.close();
        }
        if let Some(webcam) = self.webcam.take() {
            webcam.stop();
        }
        tracing::debug!("session resources reclaimed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::TrackKind;

    #[test]
    fn reclaim_stops_tracks_and_closes_graph() {
        let mut resources = SessionResources::default();
        let screen = MediaTrack::new(TrackKind::Video, "display");
        let mic = MediaTrack::new(TrackKind::Audio, "microphone");
        let webcam = MediaTrack::new(TrackKind::Video, "webcam");
        let graph = AudioGraph::mix([&mic]);
        let output = graph.output();

        resources.register_tracks([screen.clone(), mic.clone(), webcam.clone()]);
        resources.set_audio_graph(graph);
        resources.set_webcam(webcam.clone());

        resources.reclaim();

        assert!(!screen.is_live());
        assert!(!mic.is_live());
        assert!(!webcam.is_live());
        assert!(!output.is_live());
        assert!(resources.webcam().is_none());
        assert_eq!(resources.live_track_count(), 0);
    }

    #[test]
    fn reclaim_is_idempotent() {
        let mut resources = SessionResources::default();
        resources.register_tracks([MediaTrack::new(TrackKind::Video, "display")]);

        resources.reclaim();
        resources.reclaim();

        assert_eq!(resources.live_track_count(), 0);
    }
}
