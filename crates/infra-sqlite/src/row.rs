// SQLite row representations and conversions

use chrono::{DateTime, Utc};
use tracker_core::domain::{Project, Task, TaskStatus};
use tracker_core::error::{AppError, Result};

pub(crate) fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

fn from_millis(column: &str, millis: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| AppError::Database(format!("Timestamp out of range in {}: {}", column, millis)))
}

fn from_optional_millis(column: &str, millis: Option<i64>) -> Result<Option<DateTime<Utc>>> {
    millis.map(|m| from_millis(column, m)).transpose()
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProjectRow {
    id: i64,
    name: String,
    description: String,
    created_at: i64,
}

impl ProjectRow {
    pub(crate) fn into_project(self) -> Result<Project> {
        Ok(Project {
            id: self.id,
            name: self.name,
            description: self.description,
            created_at: from_millis("projects.created_at", self.created_at)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TaskRow {
    id: i64,
    project_id: i64,
    title: String,
    description: String,
    status: String,
    deadline: Option<i64>,
    created_at: i64,
    closed_at: Option<i64>,
}

impl TaskRow {
    pub(crate) fn into_task(self) -> Result<Task> {
        // The CHECK constraint keeps this from failing unless the file was edited by hand
        let status: TaskStatus = self
            .status
            .parse()
            .map_err(|_| AppError::Database(format!("Corrupt status '{}' on task {}", self.status, self.id)))?;

        Ok(Task {
            id: self.id,
            project_id: self.project_id,
            title: self.title,
            description: self.description,
            status,
            deadline: from_optional_millis("tasks.deadline", self.deadline)?,
            created_at: from_millis("tasks.created_at", self.created_at)?,
            closed_at: from_optional_millis("tasks.closed_at", self.closed_at)?,
        })
    }
}

pub(crate) fn into_tasks(rows: Vec<TaskRow>) -> Result<Vec<Task>> {
    rows.into_iter().map(TaskRow::into_task).collect()
}
