//! Loads the resources a completed meeting produces.
//!
//! Transcript, summary and tasks are fetched concurrently and each lands in
//! its own [`Slot`]. A failed fetch degrades only its slot.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::status::MeetingStatus;
use crate::client::ResourceClient;
use crate::error::Result;
use crate::models::{Meeting, MeetingId, Summary, Task, Transcript};

/// Outcome of one dependent fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    Ready(T),
    /// Not available; carries the reason for display.
    Unavailable(String),
}

impl<T> Slot<T> {
    fn from_result(resource: &str, meeting_id: MeetingId, result: Result<T>) -> Self {
        match result {
            Ok(value) => Slot::Ready(value),
            Err(e) if e.is_not_found() => {
                debug!("Meeting {} has no {} yet", meeting_id, resource);
                Slot::Unavailable(format!("No {} available yet", resource))
            }
            Err(e) => {
                warn!("Failed to load {} for meeting {}: {}", resource, meeting_id, e);
                Slot::Unavailable(e.to_string())
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Slot::Ready(_))
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Slot::Ready(value) => Some(value),
            Slot::Unavailable(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Slot::Ready(_) => None,
            Slot::Unavailable(reason) => Some(reason),
        }
    }
}

/// Everything shown for a completed meeting.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingResources {
    pub meeting_id: MeetingId,
    pub transcript: Slot<Transcript>,
    pub summary: Slot<Summary>,
    pub tasks: Slot<Vec<Task>>,
}

impl MeetingResources {
    pub fn transcript(&self) -> Option<&Transcript> {
        self.transcript.get()
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.get()
    }

    /// Tasks, or an empty list when they could not be loaded.
    pub fn tasks(&self) -> &[Task] {
        self.tasks.get().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn available_count(&self) -> usize {
        [
            self.transcript.is_ready(),
            self.summary.is_ready(),
            self.tasks.is_ready(),
        ]
        .into_iter()
        .filter(|ready| *ready)
        .count()
    }
}

pub struct ResourceAggregator {
    client: Arc<dyn ResourceClient>,
}

impl ResourceAggregator {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self { client }
    }

    /// Fetch transcript, summary and tasks concurrently. Never fails.
    pub async fn load_dependents(&self, meeting_id: MeetingId) -> MeetingResources {
        let (transcript, summary, tasks) = tokio::join!(
            self.client.get_transcript(meeting_id),
            self.client.get_summary(meeting_id),
            self.client.meeting_tasks(meeting_id),
        );

        let resources = MeetingResources {
            meeting_id,
            transcript: Slot::from_result("transcript", meeting_id, transcript),
            summary: Slot::from_result("summary", meeting_id, summary),
            tasks: Slot::from_result("tasks", meeting_id, tasks),
        };

        debug!(
            "Loaded {}/3 resources for meeting {}",
            resources.available_count(),
            meeting_id
        );
        resources
    }

    /// Load dependents only when the pipeline has completed.
    pub async fn load_for(&self, meeting: &Meeting) -> Option<MeetingResources> {
        if meeting.status != MeetingStatus::Completed {
            debug!(
                "Meeting {} is {}; skipping dependent resources",
                meeting.id, meeting.status
            );
            return None;
        }
        Some(self.load_dependents(meeting.id).await)
    }

    pub async fn reload_summary(&self, meeting_id: MeetingId) -> Slot<Summary> {
        let summary = self.client.get_summary(meeting_id).await;
        Slot::from_result("summary", meeting_id, summary)
    }

    /// Ask the service to recompute the summary, then re-fetch it.
    ///
    /// The service recomputes in the background, so the re-fetched value may
    /// still be the previous summary.
    pub async fn regenerate_summary(&self, meeting_id: MeetingId) -> Result<Slot<Summary>> {
        self.client.regenerate_summary(meeting_id).await?;
        info!("Requested summary regeneration for meeting {}", meeting_id);
        Ok(self.reload_summary(meeting_id).await)
    }

    /// Regenerate and replace the cached summary slot. A failed request leaves
    /// the cache untouched.
    pub async fn regenerate_into(&self, resources: &mut MeetingResources) -> Result<()> {
        resources.summary = self.regenerate_summary(resources.meeting_id).await?;
        Ok(())
    }
}
