//! Composite stream building
//!
//! Merges the screen video track and the (optional) mixed audio track into
//! one stream suitable for recording. Pure composition, no sample
//! transformation.

use uuid::Uuid;

use crate::capture::MediaTrack;

/// One logical media stream bundling a video track and zero-or-more audio
/// tracks. Constructed fresh each session and never mutated after being
/// handed to the recording sink.
#[derive(Debug)]
pub struct ComposedStream {
    id: Uuid,
    video: MediaTrack,
    audio: Vec<MediaTrack>,
}

impl ComposedStream {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn video(&self) -> &MediaTrack {
        &self.video
    }

    pub fn audio_tracks(&self) -> &[MediaTrack] {
        &self.audio
    }

    pub fn has_audio(&self) -> bool {
        !self.audio.is_empty()
    }
}

/// Build the recordable stream from the screen video track and the mixer's
/// output, when there is one.
pub fn compose(video: MediaTrack, audio: Option<MediaTrack>) -> ComposedStream {
    ComposedStream {
        id: Uuid::new_v4(),
        video,
        audio: audio.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::TrackKind;

    #[test]
    fn composes_video_with_mixed_audio() {
        let video = MediaTrack::new(TrackKind::Video, "display");
        let mixed = MediaTrack::new(TrackKind::Audio, "mixed-audio");

        let stream = compose(video.clone(), Some(mixed));

        assert_eq!(stream.video().id(), video.id());
        assert_eq!(stream.audio_tracks().len(), 1);
    }

    #[test]
    fn composes_video_without_audio() {
        let video = MediaTrack::new(TrackKind::Video, "display");
        let stream = compose(video, None);
        assert!(!stream.has_audio());
    }
}
