// Task Domain Model

use crate::domain::error::{DomainError, Result};
use crate::domain::project::ProjectId;
use crate::domain::text::bounded_text;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Task ID (assigned by the store)
pub type TaskId = i64;

pub const MAX_TASK_TITLE_LENGTH: usize = 30;
pub const MAX_TASK_DESCRIPTION_LENGTH: usize = 150;

/// Date-only format accepted for deadlines
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// Task Status
///
/// Any status may move to any other; only membership is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    Doing,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Doing => "doing",
            TaskStatus::Done => "done",
        }
    }

    /// `closed_at` to persist when a task enters this status at `now`
    pub fn closed_at(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TaskStatus::Done => Some(now),
            TaskStatus::Todo | TaskStatus::Doing => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "todo" => Ok(TaskStatus::Todo),
            "doing" => Ok(TaskStatus::Doing),
            "done" => Ok(TaskStatus::Done),
            other => Err(DomainError::InvalidStatus(other.to_string())),
        }
    }
}

/// Task Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub deadline: Option<DateTime<Utc>>, // always midnight UTC
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Deadline set, already passed, and not done yet
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != TaskStatus::Done && self.deadline.is_some_and(|deadline| deadline < now)
    }
}

/// Validated field set for creating or editing a task.
///
/// Status is not part of a draft: edits never touch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    title: String,
    description: String,
    deadline: Option<DateTime<Utc>>,
}

impl TaskDraft {
    pub fn new(title: &str, description: &str, deadline: Option<&str>) -> Result<Self> {
        let title = bounded_text("Task title", title, MAX_TASK_TITLE_LENGTH)?;
        let description =
            bounded_text("Task description", description, MAX_TASK_DESCRIPTION_LENGTH)?;
        let deadline = match deadline {
            Some(raw) => parse_deadline(raw)?,
            None => None,
        };

        Ok(Self {
            title,
            description,
            deadline,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }
}

/// Parse a `YYYY-MM-DD` deadline into midnight UTC of that day.
///
/// Blank input means "no deadline".
pub fn parse_deadline(raw: &str) -> Result<Option<DateTime<Utc>>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let date = NaiveDate::parse_from_str(raw, DEADLINE_FORMAT)
        .map_err(|_| DomainError::InvalidDeadline(raw.to_string()))?;

    Ok(Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))))
}
