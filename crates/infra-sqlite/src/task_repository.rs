// SQLite TaskRepository Implementation

use crate::error::map_sqlx_error;
use crate::row::{into_tasks, to_millis, TaskRow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracker_core::domain::{ProjectId, Task, TaskDraft, TaskId, TaskStatus};
use tracker_core::error::{AppError, Result};
use tracker_core::port::TaskRepository;

const ENTITY: &str = "Task";

pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn get(&self, id: TaskId) -> Result<Task> {
        let row = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.ok_or_else(|| AppError::not_found(ENTITY, id))?
            .into_task()
    }

    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<Task>> {
        let rows: Vec<TaskRow> =
            sqlx::query_as("SELECT * FROM tasks WHERE project_id = ? ORDER BY id ASC")
                .bind(project_id)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        into_tasks(rows)
    }

    async fn count_by_project(&self, project_id: ProjectId) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE project_id = ?")
            .bind(project_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn create(
        &self,
        project_id: ProjectId,
        draft: &TaskDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Task> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            INSERT INTO tasks (
                project_id, title, description, status,
                deadline, created_at, closed_at
            ) VALUES (?, ?, ?, ?, ?, ?, NULL)
            RETURNING *
            "#,
        )
        .bind(project_id)
        .bind(draft.title())
        .bind(draft.description())
        .bind(TaskStatus::default().as_str())
        .bind(draft.deadline().map(to_millis))
        .bind(to_millis(created_at))
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.into_task()
    }

    async fn update(&self, id: TaskId, draft: &TaskDraft) -> Result<Task> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, deadline = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(draft.title())
        .bind(draft.description())
        .bind(draft.deadline().map(to_millis))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.ok_or_else(|| AppError::not_found(ENTITY, id))?
            .into_task()
    }

    async fn update_status(
        &self,
        id: TaskId,
        status: TaskStatus,
        closed_at: Option<DateTime<Utc>>,
    ) -> Result<Task> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            UPDATE tasks
            SET status = ?, closed_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(status.as_str())
        .bind(closed_at.map(to_millis))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.ok_or_else(|| AppError::not_found(ENTITY, id))?
            .into_task()
    }

    async fn delete(&self, id: TaskId) -> Result<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(ENTITY, id));
        }
        Ok(())
    }

    async fn list_overdue_open(&self, now: DateTime<Utc>) -> Result<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            r#"
            SELECT * FROM tasks
            WHERE deadline IS NOT NULL
              AND deadline < ?
              AND status != ?
            ORDER BY deadline ASC, id ASC
            "#,
        )
        .bind(to_millis(now))
        .bind(TaskStatus::Done.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        into_tasks(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations, SqliteProjectRepository};
    use chrono::TimeZone;
    use tracker_core::domain::ProjectDraft;
    use tracker_core::port::ProjectRepository;

    async fn setup() -> (SqliteProjectRepository, SqliteTaskRepository, ProjectId) {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        let projects = SqliteProjectRepository::new(pool.clone());
        let project = projects
            .create(
                &ProjectDraft::new("Overdue Project", "Used for task tests").unwrap(),
                Utc::now(),
            )
            .await
            .unwrap();

        (projects, SqliteTaskRepository::new(pool), project.id)
    }

    fn draft(title: &str, deadline: Option<&str>) -> TaskDraft {
        TaskDraft::new(title, "Task used in repository tests", deadline).unwrap()
    }

    #[tokio::test]
    async fn test_create_defaults_to_todo() {
        let (_, repo, project_id) = setup().await;
        let task = repo
            .create(project_id, &draft("First", Some("2025-12-09")), Utc::now())
            .await
            .unwrap();

        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.closed_at, None);
        assert_eq!(
            task.deadline,
            Some(Utc.with_ymd_and_hms(2025, 12, 9, 0, 0, 0).unwrap())
        );
        assert_eq!(repo.get(task.id).await.unwrap(), task);
    }

    #[tokio::test]
    async fn test_create_for_missing_project_fails() {
        let (_, repo, _) = setup().await;
        let err = repo
            .create(4242, &draft("Orphan", None), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_status() {
        let (_, repo, project_id) = setup().await;
        let task = repo
            .create(project_id, &draft("First", None), Utc::now())
            .await
            .unwrap();
        repo.update_status(task.id, TaskStatus::Doing, None)
            .await
            .unwrap();

        let updated = repo
            .update(task.id, &draft("Renamed", Some("2026-01-01")))
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.status, TaskStatus::Doing);
    }

    #[tokio::test]
    async fn test_overdue_query_filters_and_orders() {
        let (_, repo, project_id) = setup().await;
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();

        let newer = repo
            .create(project_id, &draft("Newer", Some("2025-06-09")), now)
            .await
            .unwrap();
        let older = repo
            .create(project_id, &draft("Older", Some("2025-06-08")), now)
            .await
            .unwrap();
        let done = repo
            .create(project_id, &draft("Done", Some("2025-06-01")), now)
            .await
            .unwrap();
        repo.update_status(done.id, TaskStatus::Done, Some(now))
            .await
            .unwrap();
        repo.create(project_id, &draft("Future", Some("2025-06-11")), now)
            .await
            .unwrap();
        repo.create(project_id, &draft("Undated", None), now)
            .await
            .unwrap();

        let overdue: Vec<_> = repo
            .list_overdue_open(now)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(overdue, vec![older.id, newer.id]);

        // Deadline equal to now is not overdue
        let midnight = Utc.with_ymd_and_hms(2025, 6, 9, 0, 0, 0).unwrap();
        let at_midnight: Vec<_> = repo
            .list_overdue_open(midnight)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(at_midnight, vec![older.id]);
    }

    #[tokio::test]
    async fn test_project_delete_cascades() {
        let (projects, repo, project_id) = setup().await;
        let task = repo
            .create(project_id, &draft("Child", None), Utc::now())
            .await
            .unwrap();

        projects.delete(project_id).await.unwrap();

        assert!(repo.list_by_project(project_id).await.unwrap().is_empty());
        assert!(matches!(
            repo.get(task.id).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_task() {
        let (_, repo, _) = setup().await;
        assert!(matches!(
            repo.delete(7).await,
            Err(AppError::NotFound { entity: "Task", id: 7 })
        ));
    }
}
