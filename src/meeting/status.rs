//! Meeting pipeline status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a meeting is in the server-side pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Uploading,
    Processing,
    Completed,
    Failed,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Uploading => "Waiting for audio",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Only a meeting that is mid-pipeline is worth polling.
    pub fn needs_polling(&self) -> bool {
        *self == Self::Processing
    }

    /// Whether the pipeline can move from `self` to `next`.
    ///
    /// Terminal states only leave through a fresh upload, which the server
    /// reports as `uploading` or straight away as `processing`.
    pub fn can_transition_to(&self, next: MeetingStatus) -> bool {
        use MeetingStatus::*;
        match (*self, next) {
            (a, b) if a == b => true,
            (Uploading, Processing) => true,
            (Processing, Completed) | (Processing, Failed) => true,
            (Completed, Uploading) | (Completed, Processing) => true,
            (Failed, Uploading) | (Failed, Processing) => true,
            _ => false,
        }
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
