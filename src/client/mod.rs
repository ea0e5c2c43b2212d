//! Typed access to the meeting service REST surface.
//!
//! `ResourceClient` is the seam the controllers depend on; `HttpResourceClient`
//! is the production implementation. Implementations never retry: a failed
//! request is returned as an error and the caller decides what it means.

pub mod audio;
pub mod http;


use async_trait::async_trait;

use crate::error::Result;
use crate::meeting::MeetingStatus;
use crate::models::{
    Meeting, MeetingId, NewMeeting, Participant, ParticipantId, ParticipantUpdate, ProgressReport,
    ReportId, ReportRequest, Summary, Task, TaskId, TaskStatus, TaskUpdate, Transcript,
};

pub use audio::{mime_type_for_extension, AudioFile};
pub use http::HttpResourceClient;

#[async_trait]
pub trait ResourceClient: Send + Sync {
    async fn create_meeting(&self, meeting: &NewMeeting) -> Result<Meeting>;

    async fn list_meetings(&self) -> Result<Vec<Meeting>>;

    async fn get_meeting(&self, id: MeetingId) -> Result<Meeting>;

    async fn delete_meeting(&self, id: MeetingId) -> Result<()>;

    /// Attach audio to a meeting; the server answers with the meeting, usually
    /// already in `processing`.
    async fn upload_audio(&self, id: MeetingId, audio: &AudioFile) -> Result<Meeting>;

    /// Lightweight status-only probe used while polling.
    async fn meeting_status(&self, id: MeetingId) -> Result<MeetingStatus>;

    async fn list_participants(&self, meeting_id: MeetingId) -> Result<Vec<Participant>>;

    async fn update_participant(
        &self,
        meeting_id: MeetingId,
        participant_id: ParticipantId,
        update: &ParticipantUpdate,
    ) -> Result<Participant>;

    async fn get_transcript(&self, meeting_id: MeetingId) -> Result<Transcript>;

    async fn get_summary(&self, meeting_id: MeetingId) -> Result<Summary>;

    /// Ask the service to recompute the summary. The response carries no summary.
    async fn regenerate_summary(&self, meeting_id: MeetingId) -> Result<()>;

    async fn meeting_tasks(&self, meeting_id: MeetingId) -> Result<Vec<Task>>;

    async fn list_tasks(&self, status: Option<TaskStatus>) -> Result<Vec<Task>>;

    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> Result<Task>;

    async fn list_reports(&self) -> Result<Vec<ProgressReport>>;

    async fn generate_report(&self, request: &ReportRequest) -> Result<()>;

    async fn get_report(&self, id: ReportId) -> Result<ProgressReport>;
}
