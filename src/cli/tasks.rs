//! CLI handler for task commands.

use anyhow::{Context, Result};

use super::args::{TaskCliArgs, TaskCommand};
use super::render;
use super::Session;
use crate::models::{MeetingId, Task, TaskId, TaskStatus};
use crate::tasks::{partition, TaskScope, TaskStatusController};

pub async fn handle_task_command(session: &Session, args: TaskCliArgs) -> Result<()> {
    match args.command {
        TaskCommand::List { meeting, status } => list_tasks(session, meeting, status).await,
        TaskCommand::SetStatus {
            task_id,
            status,
            meeting,
        } => set_status(session, task_id, status, meeting).await,
    }
}

fn scope_for(meeting: Option<MeetingId>, status: Option<TaskStatus>) -> TaskScope {
    match meeting {
        Some(id) => TaskScope::Meeting(id),
        None => TaskScope::All { status },
    }
}

async fn list_tasks(
    session: &Session,
    meeting: Option<MeetingId>,
    status: Option<TaskStatus>,
) -> Result<()> {
    let mut controller = TaskStatusController::new(session.client.clone(), scope_for(meeting, status));
    controller.reload().await.context("Failed to load tasks")?;

    // The per-meeting endpoint has no status filter, so filter here.
    let tasks: Vec<Task> = controller
        .tasks()
        .iter()
        .filter(|t| status.map_or(true, |s| t.status == s))
        .cloned()
        .collect();
    let board = partition(&tasks);

    if board.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    println!("{}", render::task_board(&board));
    Ok(())
}

async fn set_status(
    session: &Session,
    task_id: TaskId,
    status: TaskStatus,
    meeting: Option<MeetingId>,
) -> Result<()> {
    let mut controller = TaskStatusController::new(session.client.clone(), scope_for(meeting, None));
    controller.reload().await.context("Failed to load tasks")?;

    let result = controller.set_status(task_id, status).await;

    // Whatever happened, show what the server holds now.
    match controller.task(task_id) {
        Some(task) => println!("Task #{} {}: {}", task.id, task.title, task.status.label()),
        None => println!("Task #{} is not in the reloaded list", task_id),
    }

    result.with_context(|| format!("Failed to set task #{} to {}", task_id, status))
}
