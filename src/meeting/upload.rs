//! Create a meeting and optionally attach its recording.

use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::client::{AudioFile, ResourceClient};
use crate::error::{Error, Result};
use crate::models::{Meeting, NewMeeting};

pub struct UploadCoordinator {
    client: Arc<dyn ResourceClient>,
}

impl UploadCoordinator {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self { client }
    }

    /// Create a meeting, then upload `audio` to it when given.
    ///
    /// The title is required after trimming, and the audio file is checked
    /// before anything is sent. The upload starts only once the create has
    /// returned the new meeting's id. If the upload then fails the meeting
    /// still exists, and the error is `Error::UploadFailed` carrying its id.
    pub async fn create_and_maybe_upload(
        &self,
        title: &str,
        description: Option<&str>,
        audio: Option<&Path>,
    ) -> Result<Meeting> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::validation("Meeting title is required"));
        }

        let audio = match audio {
            Some(path) => Some(AudioFile::open(path).await?),
            None => None,
        };

        let new_meeting = NewMeeting {
            title: title.to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            date: None,
        };

        let meeting = self.client.create_meeting(&new_meeting).await?;
        info!("Created meeting {} ({})", meeting.id, meeting.title);

        let Some(audio) = audio else {
            return Ok(meeting);
        };

        info!(
            "Uploading {} ({} bytes) to meeting {}",
            audio.file_name(),
            audio.len(),
            meeting.id
        );

        match self.client.upload_audio(meeting.id, &audio).await {
            Ok(updated) => {
                info!("Upload accepted; meeting {} is {}", updated.id, updated.status);
                Ok(updated)
            }
            Err(e) => {
                warn!("Upload to meeting {} failed: {}", meeting.id, e);
                Err(Error::UploadFailed {
                    meeting_id: meeting.id,
                    source: Box::new(e),
                })
            }
        }
    }
}
