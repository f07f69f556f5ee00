// Project Repository Port (Interface)

use crate::domain::{Project, ProjectDraft, ProjectId};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for Project persistence
///
/// Every mutation is atomic for a single caller.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Find project by ID
    ///
    /// # Errors
    /// - AppError::NotFound if no project has this id
    async fn get(&self, id: ProjectId) -> Result<Project>;

    /// Find project by exact name (uniqueness checks)
    async fn find_by_name(&self, name: &str) -> Result<Option<Project>>;

    /// All projects ordered by id
    async fn list(&self) -> Result<Vec<Project>>;

    /// Number of stored projects
    async fn count(&self) -> Result<i64>;

    /// Insert a new project and return it with its assigned id
    ///
    /// # Errors
    /// - AppError::UniqueConstraint if the name is already taken (checked at write time)
    async fn create(&self, draft: &ProjectDraft, created_at: DateTime<Utc>) -> Result<Project>;

    /// Replace name and description
    ///
    /// # Errors
    /// - AppError::NotFound if no project has this id
    /// - AppError::UniqueConstraint if another project owns the new name
    async fn update(&self, id: ProjectId, draft: &ProjectDraft) -> Result<Project>;

    /// Delete a project together with all of its tasks
    ///
    /// # Errors
    /// - AppError::NotFound if no project has this id
    async fn delete(&self, id: ProjectId) -> Result<()>;
}
