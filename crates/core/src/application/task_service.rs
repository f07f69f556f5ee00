// Task Service - task use cases

use crate::application::autoclose::AutocloseReport;
use crate::application::constants::TrackerLimits;
use crate::domain::{ProjectId, Task, TaskDraft, TaskId, TaskStatus};
use crate::error::{AppError, Result};
use crate::port::{ProjectRepository, TaskRepository, TimeProvider};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Enforces task invariants (field bounds, per-project cap, status enum,
/// deadline format, overdue semantics).
///
/// The project store is only read, to check that a task's project exists.
pub struct TaskService {
    task_repo: Arc<dyn TaskRepository>,
    project_repo: Arc<dyn ProjectRepository>,
    time_provider: Arc<dyn TimeProvider>,
    limits: TrackerLimits,
}

impl TaskService {
    pub fn new(
        task_repo: Arc<dyn TaskRepository>,
        project_repo: Arc<dyn ProjectRepository>,
        time_provider: Arc<dyn TimeProvider>,
        limits: TrackerLimits,
    ) -> Self {
        Self {
            task_repo,
            project_repo,
            time_provider,
            limits,
        }
    }

    /// Add a new task to a project
    ///
    /// `deadline` is a `YYYY-MM-DD` date; blank or `None` means no deadline.
    ///
    /// # Errors
    /// - AppError::Validation if the project does not exist
    /// - AppError::BusinessRule if the project already holds the maximum number of tasks
    /// - AppError::Domain if a field is empty, too long, or the deadline is malformed
    pub async fn create_task(
        &self,
        project_id: ProjectId,
        title: &str,
        description: &str,
        deadline: Option<&str>,
    ) -> Result<Task> {
        match self.project_repo.get(project_id).await {
            Ok(_) => {}
            Err(AppError::NotFound { .. }) => {
                return Err(AppError::Validation(format!(
                    "Project with id {} does not exist.",
                    project_id
                )));
            }
            Err(e) => return Err(e),
        }

        // Read-time check only; concurrent creates may overshoot the cap.
        let count = self.task_repo.count_by_project(project_id).await?;
        if count >= self.limits.max_tasks_per_project as i64 {
            return Err(AppError::BusinessRule(format!(
                "Cannot add new task. Maximum limit of {} tasks per project reached.",
                self.limits.max_tasks_per_project
            )));
        }

        let draft = TaskDraft::new(title, description, deadline)?;
        let task = self
            .task_repo
            .create(project_id, &draft, self.time_provider.now())
            .await?;

        info!(
            task_id = task.id,
            project_id = project_id,
            deadline = ?task.deadline,
            "Task created"
        );
        Ok(task)
    }

    /// Tasks of a project ordered by id (empty for unknown projects)
    pub async fn list_project_tasks(&self, project_id: ProjectId) -> Result<Vec<Task>> {
        self.task_repo.list_by_project(project_id).await
    }

    pub async fn get_task(&self, id: TaskId) -> Result<Task> {
        self.task_repo.get(id).await
    }

    /// Replace title, description and deadline; status is left alone
    pub async fn edit_task(
        &self,
        id: TaskId,
        new_title: &str,
        new_description: &str,
        new_deadline: Option<&str>,
    ) -> Result<Task> {
        let draft = TaskDraft::new(new_title, new_description, new_deadline)?;
        let task = self.task_repo.update(id, &draft).await?;

        info!(task_id = id, "Task updated");
        Ok(task)
    }

    pub async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.task_repo.delete(id).await?;
        info!(task_id = id, "Task deleted");
        Ok(())
    }

    /// Change status from its textual form (`todo`, `doing`, `done`)
    ///
    /// The value is validated before the store is touched, so a rejected
    /// status never reaches persistence.
    pub async fn change_task_status(&self, id: TaskId, new_status: &str) -> Result<Task> {
        let status: TaskStatus = new_status.parse()?;
        self.set_task_status(id, status).await
    }

    /// Persist a new status and keep `closed_at` in step with it
    ///
    /// Re-applying the current status is a no-op, so a repeated `done`
    /// keeps the original close time.
    pub async fn set_task_status(&self, id: TaskId, status: TaskStatus) -> Result<Task> {
        self.apply_status(id, status, self.time_provider.now()).await
    }

    async fn apply_status(&self, id: TaskId, status: TaskStatus, at: DateTime<Utc>) -> Result<Task> {
        let task = self.task_repo.get(id).await?;
        if task.status == status {
            debug!(task_id = id, status = %status, "Status unchanged");
            return Ok(task);
        }

        let updated = self
            .task_repo
            .update_status(id, status, status.closed_at(at))
            .await?;

        info!(task_id = id, from = %task.status, to = %status, "Task status changed");
        Ok(updated)
    }

    /// Tasks overdue at `now`, oldest deadline first
    pub async fn list_overdue_open_tasks(&self, now: DateTime<Utc>) -> Result<Vec<Task>> {
        self.task_repo.list_overdue_open(now).await
    }

    /// Close every task overdue at `now`, one at a time
    ///
    /// Closed tasks are stamped with `now`. A failure on one task is
    /// recorded in the report and does not stop the remaining ones.
    pub async fn autoclose_overdue(&self, now: DateTime<Utc>) -> Result<AutocloseReport> {
        let overdue = self.list_overdue_open_tasks(now).await?;
        let mut report = AutocloseReport::default();

        for task in overdue {
            match self.apply_status(task.id, TaskStatus::Done, now).await {
                Ok(_) => report.closed += 1,
                Err(e) => {
                    warn!(task_id = task.id, error = %e, "Failed to close overdue task");
                    report.failed.push(task.id);
                }
            }
        }

        info!(
            closed = report.closed,
            failed = report.failed.len(),
            now = %now,
            "Autoclose run finished"
        );
        Ok(report)
    }
}
