//! Task status changes against the server.
//!
//! The server is the only source of truth: after every update attempt the
//! task collection is reloaded, and the update's own response is ignored.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::board::{partition, TaskBoard};
use crate::client::ResourceClient;
use crate::error::Result;
use crate::models::{MeetingId, Task, TaskId, TaskStatus, TaskUpdate};

/// Which collection the controller keeps in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    /// Tasks extracted from one meeting.
    Meeting(MeetingId),
    /// The global board, optionally filtered by status.
    All { status: Option<TaskStatus> },
}

pub struct TaskStatusController {
    client: Arc<dyn ResourceClient>,
    scope: TaskScope,
    tasks: Vec<Task>,
}

impl TaskStatusController {
    pub fn new(client: Arc<dyn ResourceClient>, scope: TaskScope) -> Self {
        Self {
            client,
            scope,
            tasks: Vec::new(),
        }
    }

    pub fn scope(&self) -> TaskScope {
        self.scope
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn board(&self) -> TaskBoard {
        partition(&self.tasks)
    }

    /// Replace the cached collection with the server's current one.
    pub async fn reload(&mut self) -> Result<&[Task]> {
        let tasks = match self.scope {
            TaskScope::Meeting(meeting_id) => self.client.meeting_tasks(meeting_id).await?,
            TaskScope::All { status } => self.client.list_tasks(status).await?,
        };
        debug!("Reloaded {} tasks for {:?}", tasks.len(), self.scope);
        self.tasks = tasks;
        Ok(&self.tasks)
    }

    /// Move a task to `status`.
    ///
    /// When the cached task already has `status` the collection is reloaded
    /// first, and the update is skipped only if the server agrees. Otherwise
    /// the update is sent and the collection reloaded whether or not it
    /// succeeded. An update failure takes precedence over a reload failure.
    pub async fn set_status(&mut self, task_id: TaskId, status: TaskStatus) -> Result<()> {
        if self.task(task_id).is_some_and(|t| !t.status.can_transition_to(status)) {
            self.reload().await?;
            if self.task(task_id).is_some_and(|t| !t.status.can_transition_to(status)) {
                debug!("Task {} is already {}", task_id, status);
                return Ok(());
            }
        }

        let update = self
            .client
            .update_task(task_id, &TaskUpdate::status(status))
            .await;
        if let Err(e) = &update {
            warn!("Failed to set task {} to {}: {}", task_id, status, e);
        }

        let reload = self.reload().await.map(|_| ());
        if let Err(e) = &reload {
            warn!("Failed to reload tasks after updating task {}: {}", task_id, e);
        }

        update?;
        reload?;

        match self.task(task_id) {
            Some(task) => info!("Task {} is now {}", task_id, task.status),
            None => debug!("Task {} is no longer in {:?}", task_id, self.scope),
        }
        Ok(())
    }
}
