//! Local audio files queued for upload.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const SUPPORTED_FORMATS: &str = "wav, mp3, m4a, flac, ogg, opus, aac, mp4, mkv, webm, avi, mov";

/// MIME type for a lowercase file extension, or `None` when unsupported.
pub fn mime_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "wav" => Some("audio/wav"),
        "mp3" => Some("audio/mpeg"),
        "m4a" => Some("audio/mp4"),
        "flac" => Some("audio/flac"),
        "ogg" => Some("audio/ogg"),
        "opus" => Some("audio/opus"),
        "aac" => Some("audio/aac"),
        "mp4" => Some("video/mp4"),
        "mkv" => Some("video/x-matroska"),
        "webm" => Some("video/webm"),
        "avi" => Some("video/x-msvideo"),
        "mov" => Some("video/quicktime"),
        _ => None,
    }
}

/// An audio file that exists and has a supported format.
///
/// Opening only checks metadata; the bytes are streamed at upload time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    path: PathBuf,
    file_name: String,
    mime_type: &'static str,
    len: u64,
}

impl AudioFile {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let metadata = tokio::fs::metadata(path).await.map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if !metadata.is_file() {
            return Err(Error::validation(format!(
                "Not a file: {}",
                path.display()
            )));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let mime_type = mime_type_for_extension(&ext).ok_or_else(|| {
            Error::validation(format!(
                "Unsupported format: .{}\nSupported formats: {}",
                ext, SUPPORTED_FORMATS
            ))
        })?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio")
            .to_string();

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            mime_type,
            len: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
