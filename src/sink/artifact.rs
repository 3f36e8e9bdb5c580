//! Finalized recording artifacts
//!
//! The concatenation of all accumulated chunks, tagged with the chosen
//! container media type and named `capture-<unix-timestamp-ms>.<ext>`.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A finalized recording: one byte blob plus its media type
#[derive(Debug, Clone)]
pub struct Artifact {
    data: Vec<u8>,
    media_type: String,
    file_name: String,
}

impl Artifact {
    pub(crate) fn new(data: Vec<u8>, media_type: &str) -> Self {
        let file_name = format!(
            "capture-{}.{}",
            Utc::now().timestamp_millis(),
            extension_for(media_type)
        );
        Self {
            data,
            media_type: media_type.to_string(),
            file_name,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Lightweight descriptor for the presentation layer
    pub fn info(&self) -> ArtifactInfo {
        ArtifactInfo {
            file_name: self.file_name.clone(),
            media_type: self.media_type.clone(),
            size_bytes: self.size_bytes(),
        }
    }

    /// Write the artifact into `dir` under its own file name
    pub fn save_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.data)?;
        tracing::info!(path = %path.display(), bytes = self.data.len(), "artifact saved");
        Ok(path)
    }
}

/// Serializable artifact descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactInfo {
    pub file_name: String,
    pub media_type: String,
    pub size_bytes: u64,
}

fn extension_for(media_type: &str) -> &'static str {
    if media_type.starts_with("video/mp4") {
        "mp4"
    } else if media_type.starts_with("video/webm") {
        "webm"
    } else {
        "bin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_follows_capture_pattern() {
        let artifact = Artifact::new(vec![0u8; 8], "video/webm;codecs=vp9");
        assert!(artifact.file_name().starts_with("capture-"));
        assert!(artifact.file_name().ends_with(".webm"));
    }

    #[test]
    fn mp4_extension() {
        let artifact = Artifact::new(Vec::new(), "video/mp4");
        assert!(artifact.file_name().ends_with(".mp4"));
    }

    #[test]
    fn saves_bytes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = Artifact::new(vec![7u8; 16], "video/mp4");

        let path = artifact.save_to(dir.path()).unwrap();

        assert_eq!(std::fs::read(path).unwrap(), vec![7u8; 16]);
    }
}
