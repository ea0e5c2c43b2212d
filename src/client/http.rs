//! HTTP client for the meeting service API.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::io::ReaderStream;
use tracing::debug;

use super::{AudioFile, ResourceClient};
use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::meeting::MeetingStatus;
use crate::models::{
    Meeting, MeetingId, NewMeeting, Participant, ParticipantId, ParticipantUpdate, ProgressReport,
    ReportId, ReportRequest, StatusProbe, Summary, Task, TaskId, TaskStatus, TaskUpdate,
    Transcript,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpResourceClient {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpResourceClient {
    /// Create a new client with the given base URL, e.g. `http://localhost:8000/api`.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|source| Error::Transport {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
        })
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        Self::new(&config.base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the body of a 2xx response.
    async fn execute(&self, request: RequestBuilder, url: &str) -> Result<String> {
        let transport = |source| Error::Transport {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(Error::Server {
                status: status.as_u16(),
                url: url.to_string(),
                message: error_message(status, &body),
            });
        }

        Ok(body)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> Result<T> {
        let body = self.execute(request, url).await?;
        serde_json::from_str(&body).map_err(|source| Error::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!("GET {}", url);
        let request = self.client.get(&url).timeout(self.request_timeout);
        self.fetch(request, &url).await
    }
}

/// Pull FastAPI's `detail` out of an error body, falling back to the raw text.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        match json.get("detail") {
            Some(serde_json::Value::String(detail)) => return detail.clone(),
            Some(detail) => return detail.to_string(),
            None => {}
        }
    }

    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    async fn create_meeting(&self, meeting: &NewMeeting) -> Result<Meeting> {
        let url = self.url("/meetings");
        let request = self
            .client
            .post(&url)
            .timeout(self.request_timeout)
            .json(meeting);
        self.fetch(request, &url).await
    }

    async fn list_meetings(&self) -> Result<Vec<Meeting>> {
        self.get_json("/meetings").await
    }

    async fn get_meeting(&self, id: MeetingId) -> Result<Meeting> {
        self.get_json(&format!("/meetings/{}", id)).await
    }

    async fn delete_meeting(&self, id: MeetingId) -> Result<()> {
        let url = self.url(&format!("/meetings/{}", id));
        let request = self.client.delete(&url).timeout(self.request_timeout);
        self.execute(request, &url).await?;
        Ok(())
    }

    async fn upload_audio(&self, id: MeetingId, audio: &AudioFile) -> Result<Meeting> {
        let url = self.url(&format!("/meetings/{}/upload", id));

        let file = tokio::fs::File::open(audio.path())
            .await
            .map_err(|source| Error::Io {
                path: audio.path().to_path_buf(),
                source,
            })?;

        // Stream from disk so large recordings never sit in memory.
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let part = Part::stream_with_length(body, audio.len())
            .file_name(audio.file_name().to_string())
            .mime_str(audio.mime_type())
            .map_err(|source| Error::Transport {
                url: url.clone(),
                source,
            })?;

        debug!(
            "POST {} ({}, {} bytes)",
            url,
            audio.file_name(),
            audio.len()
        );

        // No request timeout: uploads take as long as the file needs.
        let request = self.client.post(&url).multipart(Form::new().part("file", part));
        self.fetch(request, &url).await
    }

    async fn meeting_status(&self, id: MeetingId) -> Result<MeetingStatus> {
        let probe: StatusProbe = self.get_json(&format!("/meetings/{}/status", id)).await?;
        Ok(probe.status)
    }

    async fn list_participants(&self, meeting_id: MeetingId) -> Result<Vec<Participant>> {
        self.get_json(&format!("/meetings/{}/participants", meeting_id))
            .await
    }

    async fn update_participant(
        &self,
        meeting_id: MeetingId,
        participant_id: ParticipantId,
        update: &ParticipantUpdate,
    ) -> Result<Participant> {
        let url = self.url(&format!(
            "/meetings/{}/participants/{}",
            meeting_id, participant_id
        ));
        let request = self
            .client
            .put(&url)
            .timeout(self.request_timeout)
            .json(update);
        self.fetch(request, &url).await
    }

    async fn get_transcript(&self, meeting_id: MeetingId) -> Result<Transcript> {
        let transcript: Transcript = self
            .get_json(&format!("/meetings/{}/transcript", meeting_id))
            .await?;
        Ok(transcript.normalize())
    }

    async fn get_summary(&self, meeting_id: MeetingId) -> Result<Summary> {
        self.get_json(&format!("/meetings/{}/summary", meeting_id))
            .await
    }

    async fn regenerate_summary(&self, meeting_id: MeetingId) -> Result<()> {
        let url = self.url(&format!("/meetings/{}/summary/regenerate", meeting_id));
        let request = self.client.post(&url).timeout(self.request_timeout);
        self.execute(request, &url).await?;
        Ok(())
    }

    async fn meeting_tasks(&self, meeting_id: MeetingId) -> Result<Vec<Task>> {
        self.get_json(&format!("/meetings/{}/tasks", meeting_id))
            .await
    }

    async fn list_tasks(&self, status: Option<TaskStatus>) -> Result<Vec<Task>> {
        let url = self.url("/tasks");
        let mut request = self.client.get(&url).timeout(self.request_timeout);
        if let Some(status) = status {
            request = request.query(&[("status", status.as_str())]);
        }
        self.fetch(request, &url).await
    }

    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> Result<Task> {
        let url = self.url(&format!("/tasks/{}", id));
        let request = self
            .client
            .put(&url)
            .timeout(self.request_timeout)
            .json(update);
        self.fetch(request, &url).await
    }

    async fn list_reports(&self) -> Result<Vec<ProgressReport>> {
        self.get_json("/reports").await
    }

    async fn generate_report(&self, request_body: &ReportRequest) -> Result<()> {
        let url = self.url("/reports/generate");
        let request = self
            .client
            .post(&url)
            .timeout(self.request_timeout)
            .json(request_body);
        self.execute(request, &url).await?;
        Ok(())
    }

    async fn get_report(&self, id: ReportId) -> Result<ProgressReport> {
        self.get_json(&format!("/reports/{}", id)).await
    }
}
