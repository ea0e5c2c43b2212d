//! In-process fake of the meeting service REST API.
//!
//! Serves the same paths and payload shapes as the real service under `/api`
//! on an ephemeral port, records every request, and lets tests script
//! failures and status probe answers.

#![allow(dead_code)]

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

const TIMESTAMP: &str = "2024-05-02T09:30:00";

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub meeting_id: i64,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
struct ServerState {
    requests: Vec<String>,
    next_meeting_id: i64,
    meetings: HashMap<i64, Value>,
    /// Scripted probe answers: a status string, or an HTTP error code.
    probes: VecDeque<Result<String, u16>>,
    probe_delay: Option<Duration>,
    uploads: Vec<Upload>,
    transcripts: HashMap<i64, Value>,
    summaries: HashMap<i64, Value>,
    tasks: Vec<Value>,
    reports: Vec<Value>,
    fail_task_update: Option<u16>,
    fail_summary: Option<u16>,
}

#[derive(Clone)]
pub struct FakeServer {
    state: Arc<Mutex<ServerState>>,
    base_url: String,
}

type ApiResult = Result<Json<Value>, Response>;

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

pub fn meeting_json(id: i64, title: &str, status: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "date": TIMESTAMP,
        "duration_seconds": null,
        "status": status,
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
        "participants": [],
    })
}

pub fn task_json(id: i64, meeting_id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "meeting_id": meeting_id,
        "assignee_id": null,
        "assignee_name": null,
        "title": format!("Task {}", id),
        "description": null,
        "priority": "high",
        "status": status,
        "due_date": null,
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    })
}

pub fn summary_json(meeting_id: i64, text: &str) -> Value {
    json!({
        "id": meeting_id * 10,
        "meeting_id": meeting_id,
        "full_summary": text,
        "key_points": ["Ship on Friday"],
        "decisions": [],
        "created_at": TIMESTAMP,
    })
}

impl FakeServer {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(ServerState {
            next_meeting_id: 1,
            ..Default::default()
        }));

        let api = Router::new()
            .route("/meetings", get(list_meetings).post(create_meeting))
            .route("/meetings/:id", get(get_meeting).delete(delete_meeting))
            .route("/meetings/:id/upload", post(upload_audio))
            .route("/meetings/:id/status", get(meeting_status))
            .route("/meetings/:id/participants", get(list_participants))
            .route("/meetings/:id/participants/:pid", put(update_participant))
            .route("/meetings/:id/transcript", get(get_transcript))
            .route("/meetings/:id/summary", get(get_summary))
            .route("/meetings/:id/summary/regenerate", post(regenerate_summary))
            .route("/meetings/:id/tasks", get(meeting_tasks))
            .route("/tasks", get(list_tasks))
            .route("/tasks/:id", put(update_task))
            .route("/reports", get(list_reports))
            .route("/reports/generate", post(generate_report))
            .route("/reports/:id", get(get_report))
            .with_state(Arc::clone(&state));

        let app = Router::new().nest("/api", api);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake server");
        let addr = listener.local_addr().expect("fake server address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            state,
            base_url: format!("http://{}/api", addr),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn lock(&self) -> MutexGuard<'_, ServerState> {
        self.state.lock().unwrap()
    }

    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    pub fn count(&self, request: &str) -> usize {
        self.lock().requests.iter().filter(|r| *r == request).count()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.lock().uploads.clone()
    }

    pub fn insert_meeting(&self, meeting: Value) {
        let id = meeting["id"].as_i64().expect("meeting id");
        let mut state = self.lock();
        state.next_meeting_id = state.next_meeting_id.max(id + 1);
        state.meetings.insert(id, meeting);
    }

    pub fn script_probes(&self, statuses: &[&str]) {
        self.lock()
            .probes
            .extend(statuses.iter().map(|s| Ok(s.to_string())));
    }

    pub fn script_probe_failure(&self, status: u16) {
        self.lock().probes.push_back(Err(status));
    }

    /// Hold every status probe response for `delay`.
    pub fn delay_probes(&self, delay: Duration) {
        self.lock().probe_delay = Some(delay);
    }

    pub fn set_transcript(&self, meeting_id: i64, transcript: Value) {
        self.lock().transcripts.insert(meeting_id, transcript);
    }

    pub fn set_summary(&self, meeting_id: i64, summary: Value) {
        self.lock().summaries.insert(meeting_id, summary);
    }

    pub fn set_tasks(&self, tasks: Vec<Value>) {
        self.lock().tasks = tasks;
    }

    pub fn fail_task_update(&self, status: u16) {
        self.lock().fail_task_update = Some(status);
    }

    pub fn fail_summary(&self, status: u16) {
        self.lock().fail_summary = Some(status);
    }
}

type Shared = State<Arc<Mutex<ServerState>>>;

fn record(state: &Arc<Mutex<ServerState>>, request: String) -> MutexGuard<'_, ServerState> {
    let mut guard = state.lock().unwrap();
    guard.requests.push(request);
    guard
}

fn meeting_or_404(state: &ServerState, id: i64) -> Result<Value, Response> {
    state
        .meetings
        .get(&id)
        .cloned()
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Meeting not found"))
}

async fn list_meetings(State(state): Shared) -> ApiResult {
    let state = record(&state, "GET /meetings".to_string());
    let mut meetings: Vec<Value> = state.meetings.values().cloned().collect();
    meetings.sort_by_key(|m| m["id"].as_i64());
    Ok(Json(Value::Array(meetings)))
}

async fn create_meeting(State(state): Shared, Json(body): Json<Value>) -> ApiResult {
    let mut state = record(&state, "POST /meetings".to_string());
    let title = body["title"].as_str().unwrap_or_default().to_string();
    if title.is_empty() {
        return Err(detail(StatusCode::UNPROCESSABLE_ENTITY, "title is required"));
    }

    let id = state.next_meeting_id;
    state.next_meeting_id += 1;
    let mut meeting = meeting_json(id, &title, "uploading");
    meeting["description"] = body["description"].clone();
    state.meetings.insert(id, meeting.clone());
    Ok(Json(meeting))
}

async fn get_meeting(State(state): Shared, Path(id): Path<i64>) -> ApiResult {
    let state = record(&state, format!("GET /meetings/{}", id));
    meeting_or_404(&state, id).map(Json)
}

async fn delete_meeting(State(state): Shared, Path(id): Path<i64>) -> Result<StatusCode, Response> {
    let mut state = record(&state, format!("DELETE /meetings/{}", id));
    state
        .meetings
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Meeting not found"))
}

async fn upload_audio(State(state): Shared, Path(id): Path<i64>, mut multipart: Multipart) -> ApiResult {
    drop(record(&state, format!("POST /meetings/{}/upload", id)));

    let mut upload = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| detail(StatusCode::BAD_REQUEST, &e.to_string()))?;
        upload = Some(Upload {
            meeting_id: id,
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    let upload = upload.ok_or_else(|| detail(StatusCode::UNPROCESSABLE_ENTITY, "file is required"))?;

    let mut state = state.lock().unwrap();
    let mut meeting = meeting_or_404(&state, id)?;
    meeting["status"] = json!("processing");
    state.meetings.insert(id, meeting.clone());
    state.uploads.push(upload);
    Ok(Json(meeting))
}

async fn meeting_status(State(state): Shared, Path(id): Path<i64>) -> ApiResult {
    let delay = record(&state, format!("GET /meetings/{}/status", id)).probe_delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut state = state.lock().unwrap();
    let mut meeting = meeting_or_404(&state, id)?;
    match state.probes.pop_front() {
        Some(Ok(next)) => {
            meeting["status"] = json!(next);
            state.meetings.insert(id, meeting.clone());
        }
        Some(Err(status)) => return Err(detail(code(status), "Status lookup failed")),
        None => {}
    }
    Ok(Json(json!({ "status": meeting["status"] })))
}

async fn list_participants(State(state): Shared, Path(id): Path<i64>) -> ApiResult {
    let state = record(&state, format!("GET /meetings/{}/participants", id));
    let meeting = meeting_or_404(&state, id)?;
    Ok(Json(meeting["participants"].clone()))
}

async fn update_participant(
    State(state): Shared,
    Path((id, pid)): Path<(i64, i64)>,
    Json(body): Json<Value>,
) -> ApiResult {
    let mut state = record(&state, format!("PUT /meetings/{}/participants/{}", id, pid));
    let mut meeting = meeting_or_404(&state, id)?;
    let participants = meeting["participants"]
        .as_array_mut()
        .ok_or_else(|| detail(StatusCode::INTERNAL_SERVER_ERROR, "bad fixture"))?;
    let participant = participants
        .iter_mut()
        .find(|p| p["id"].as_i64() == Some(pid))
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Participant not found"))?;
    for field in ["name", "email"] {
        if let Some(value) = body.get(field) {
            participant[field] = value.clone();
        }
    }
    let updated = participant.clone();
    state.meetings.insert(id, meeting);
    Ok(Json(updated))
}

async fn get_transcript(State(state): Shared, Path(id): Path<i64>) -> ApiResult {
    let state = record(&state, format!("GET /meetings/{}/transcript", id));
    state
        .transcripts
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Transcript not found"))
}

async fn get_summary(State(state): Shared, Path(id): Path<i64>) -> ApiResult {
    let state = record(&state, format!("GET /meetings/{}/summary", id));
    if let Some(status) = state.fail_summary {
        return Err(detail(code(status), "Summary service unavailable"));
    }
    state
        .summaries
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Summary not found"))
}

async fn regenerate_summary(State(state): Shared, Path(id): Path<i64>) -> ApiResult {
    let mut state = record(&state, format!("POST /meetings/{}/summary/regenerate", id));
    meeting_or_404(&state, id)?;
    state
        .summaries
        .insert(id, summary_json(id, "Regenerated summary"));
    Ok(Json(json!({ "message": "Summary regeneration started" })))
}

async fn meeting_tasks(State(state): Shared, Path(id): Path<i64>) -> ApiResult {
    let state = record(&state, format!("GET /meetings/{}/tasks", id));
    let tasks: Vec<Value> = state
        .tasks
        .iter()
        .filter(|t| t["meeting_id"].as_i64() == Some(id))
        .cloned()
        .collect();
    Ok(Json(Value::Array(tasks)))
}

async fn list_tasks(State(state): Shared, Query(query): Query<HashMap<String, String>>) -> ApiResult {
    let request = match query.get("status") {
        Some(status) => format!("GET /tasks?status={}", status),
        None => "GET /tasks".to_string(),
    };
    let state = record(&state, request);
    let tasks: Vec<Value> = state
        .tasks
        .iter()
        .filter(|t| {
            query
                .get("status")
                .map_or(true, |s| t["status"].as_str() == Some(s.as_str()))
        })
        .cloned()
        .collect();
    Ok(Json(Value::Array(tasks)))
}

async fn update_task(State(state): Shared, Path(id): Path<i64>, Json(body): Json<Value>) -> ApiResult {
    let mut state = record(&state, format!("PUT /tasks/{} {}", id, body));
    if let Some(status) = state.fail_task_update {
        return Err(detail(code(status), "Task update rejected"));
    }
    let task = state
        .tasks
        .iter_mut()
        .find(|t| t["id"].as_i64() == Some(id))
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Task not found"))?;
    if let Some(fields) = body.as_object() {
        for (key, value) in fields {
            task[key.as_str()] = value.clone();
        }
    }
    Ok(Json(task.clone()))
}

async fn list_reports(State(state): Shared) -> ApiResult {
    let state = record(&state, "GET /reports".to_string());
    Ok(Json(Value::Array(state.reports.clone())))
}

async fn generate_report(State(state): Shared, Json(body): Json<Value>) -> ApiResult {
    let mut state = record(&state, format!("POST /reports/generate {}", body));
    let id = state.reports.len() as i64 + 1;
    let report = json!({
        "id": id,
        "meeting_id": body.get("meeting_id").cloned().unwrap_or(Value::Null),
        "report_type": body.get("report_type").cloned().unwrap_or(json!("weekly")),
        "content": { "title": format!("Generated report {}", id) },
        "generated_at": TIMESTAMP,
    });
    state.reports.push(report);
    Ok(Json(json!({ "message": "Report generation started" })))
}

async fn get_report(State(state): Shared, Path(id): Path<i64>) -> ApiResult {
    let state = record(&state, format!("GET /reports/{}", id));
    state
        .reports
        .iter()
        .find(|r| r["id"].as_i64() == Some(id))
        .cloned()
        .map(Json)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Report not found"))
}
