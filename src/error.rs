//! Error type shared by the client core.
//!
//! Three families matter to callers: validation errors are raised before any
//! request is sent, transport/server errors come from a failed request, and
//! `UploadFailed` reports an upload that failed after its meeting was created.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::MeetingId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server returned {status} for {url}: {message}")]
    Server {
        status: u16,
        url: String,
        message: String,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read audio file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("meeting {meeting_id} was created but the audio upload failed: {source}")]
    UploadFailed {
        meeting_id: MeetingId,
        #[source]
        source: Box<Error>,
    },

    #[error("meeting tracker has been torn down")]
    Disposed,
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True when the server answered 404 for the requested resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Server { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
