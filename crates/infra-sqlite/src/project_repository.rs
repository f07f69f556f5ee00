// SQLite ProjectRepository Implementation

use crate::error::map_sqlx_error;
use crate::row::{to_millis, ProjectRow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use tracker_core::domain::{Project, ProjectDraft, ProjectId};
use tracker_core::error::{AppError, Result};
use tracker_core::port::ProjectRepository;

const ENTITY: &str = "Project";

pub struct SqliteProjectRepository {
    pool: SqlitePool,
}

impl SqliteProjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// The UNIQUE index is the write-time check; name the clash like the services do.
fn name_conflict(name: &str, err: AppError) -> AppError {
    match err {
        AppError::UniqueConstraint(_) => {
            AppError::UniqueConstraint(format!("Project with name '{}' already exists", name))
        }
        other => other,
    }
}

#[async_trait]
impl ProjectRepository for SqliteProjectRepository {
    async fn get(&self, id: ProjectId) -> Result<Project> {
        let row = sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.ok_or_else(|| AppError::not_found(ENTITY, id))?
            .into_project()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(ProjectRow::into_project).transpose()
    }

    async fn list(&self) -> Result<Vec<Project>> {
        let rows: Vec<ProjectRow> = sqlx::query_as("SELECT * FROM projects ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(ProjectRow::into_project).collect()
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn create(&self, draft: &ProjectDraft, created_at: DateTime<Utc>) -> Result<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            INSERT INTO projects (name, description, created_at)
            VALUES (?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(draft.name())
        .bind(draft.description())
        .bind(to_millis(created_at))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| name_conflict(draft.name(), map_sqlx_error(e)))?;

        let project = row.into_project()?;
        debug!(project_id = project.id, "Inserted project row");
        Ok(project)
    }

    async fn update(&self, id: ProjectId, draft: &ProjectDraft) -> Result<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            UPDATE projects
            SET name = ?, description = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(draft.name())
        .bind(draft.description())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| name_conflict(draft.name(), map_sqlx_error(e)))?;

        row.ok_or_else(|| AppError::not_found(ENTITY, id))?
            .into_project()
    }

    async fn delete(&self, id: ProjectId) -> Result<()> {
        // Tasks are removed explicitly as well as by ON DELETE CASCADE, in one transaction
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let tasks_deleted = sqlx::query("DELETE FROM tasks WHERE project_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .rows_affected();

        let projects_deleted = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .rows_affected();

        if projects_deleted == 0 {
            tx.rollback().await.map_err(map_sqlx_error)?;
            return Err(AppError::not_found(ENTITY, id));
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        debug!(project_id = id, tasks_deleted, "Deleted project row");
        Ok(())
    }
}
