// Task Repository Port (Interface)

use crate::domain::{ProjectId, Task, TaskDraft, TaskId, TaskStatus};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for Task persistence
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Find task by ID (AppError::NotFound if absent)
    async fn get(&self, id: TaskId) -> Result<Task>;

    /// Tasks of one project ordered by id
    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<Task>>;

    /// Number of tasks owned by a project
    async fn count_by_project(&self, project_id: ProjectId) -> Result<i64>;

    /// Insert a new `todo` task
    async fn create(
        &self,
        project_id: ProjectId,
        draft: &TaskDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Task>;

    /// Replace title, description and deadline (status untouched)
    async fn update(&self, id: TaskId, draft: &TaskDraft) -> Result<Task>;

    /// Persist a status together with its closed_at stamp
    async fn update_status(
        &self,
        id: TaskId,
        status: TaskStatus,
        closed_at: Option<DateTime<Utc>>,
    ) -> Result<Task>;

    /// Delete a single task (AppError::NotFound if absent)
    async fn delete(&self, id: TaskId) -> Result<()>;

    /// Tasks with `deadline < now` and status != done, ordered by deadline ascending
    async fn list_overdue_open(&self, now: DateTime<Utc>) -> Result<Vec<Task>>;
}
