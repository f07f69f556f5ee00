//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracker_core::application::AutocloseReport;
use tracker_core::domain::{Project, ProjectId, Task, TaskId, DEADLINE_FORMAT};

/// project.create.v1
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: String,
}

/// project.get.v1 / project.delete.v1
#[derive(Debug, Deserialize)]
pub struct ProjectIdRequest {
    pub id: ProjectId,
}

/// project.update.v1
///
/// Omitted fields keep their current value.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub id: ProjectId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectResponse {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub created_at: String,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            created_at: timestamp(project.created_at),
        }
    }
}

/// task.create.v1
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub project_id: ProjectId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub deadline: Option<String>,
}

/// task.list.v1
#[derive(Debug, Deserialize)]
pub struct ListTasksRequest {
    pub project_id: ProjectId,
}

/// task.get.v1 / task.delete.v1
#[derive(Debug, Deserialize)]
pub struct TaskIdRequest {
    pub id: TaskId,
}

/// task.update.v1
///
/// Omitted fields keep their current value; a blank `deadline` clears it.
/// Every supplied field, `status` included, is validated before anything
/// is written.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub id: TaskId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// task.status.v1
#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub id: TaskId,
    pub status: String,
}

/// task.overdue.v1 / admin.autoclose.v1
///
/// Both default to the server clock when `now` is omitted.
#[derive(Debug, Default, Deserialize)]
pub struct AsOfRequest {
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskResponse {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub title: String,
    pub description: String,
    pub status: String,
    pub deadline: Option<String>,
    pub created_at: String,
    pub closed_at: Option<String>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            project_id: task.project_id,
            title: task.title,
            description: task.description,
            status: task.status.to_string(),
            deadline: task
                .deadline
                .map(|d| d.format(DEADLINE_FORMAT).to_string()),
            created_at: timestamp(task.created_at),
            closed_at: task.closed_at.map(timestamp),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResponse {
    pub id: i64,
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AutocloseResponse {
    pub closed: usize,
    pub failed: Vec<TaskId>,
}

impl From<AutocloseReport> for AutocloseResponse {
    fn from(report: AutocloseReport) -> Self {
        Self {
            closed: report.closed,
            failed: report.failed,
        }
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Reduce a wire deadline to the `YYYY-MM-DD` form the task service parses
///
/// ISO 8601 datetimes, with or without an offset, keep only their calendar
/// date as written. Anything else is passed through for the service to
/// validate.
pub fn normalize_deadline(raw: Option<String>) -> Option<String> {
    raw.map(|value| {
        let trimmed = value.trim();
        let date = DateTime::parse_from_rfc3339(trimmed)
            .map(|at| at.date_naive())
            .or_else(|_| {
                NaiveDateTime::parse_from_str(trimmed, LOCAL_DATETIME_FORMAT).map(|at| at.date())
            });
        match date {
            Ok(date) => date.format(DEADLINE_FORMAT).to_string(),
            Err(_) => value,
        }
    })
}
