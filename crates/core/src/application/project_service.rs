// Project Service - project use cases

use crate::application::constants::TrackerLimits;
use crate::domain::{Project, ProjectDraft, ProjectId};
use crate::error::{AppError, Result};
use crate::port::{ProjectRepository, TimeProvider};
use std::sync::Arc;
use tracing::{debug, info};

/// Enforces project invariants (field bounds, unique names, project cap)
/// and delegates persistence to the injected store.
pub struct ProjectService {
    project_repo: Arc<dyn ProjectRepository>,
    time_provider: Arc<dyn TimeProvider>,
    limits: TrackerLimits,
}

impl ProjectService {
    pub fn new(
        project_repo: Arc<dyn ProjectRepository>,
        time_provider: Arc<dyn TimeProvider>,
        limits: TrackerLimits,
    ) -> Self {
        Self {
            project_repo,
            time_provider,
            limits,
        }
    }

    /// Create a new project
    ///
    /// # Errors
    /// - AppError::Domain if a field is empty or too long
    /// - AppError::BusinessRule if the project cap is reached
    /// - AppError::Validation if the name is already taken
    pub async fn create_project(&self, name: &str, description: &str) -> Result<Project> {
        let draft = ProjectDraft::new(name, description)?;

        // Read-time check only; concurrent creates may overshoot the cap.
        let count = self.project_repo.count().await?;
        if count >= self.limits.max_projects as i64 {
            return Err(AppError::BusinessRule(format!(
                "Cannot create new project. Maximum limit of {} projects reached.",
                self.limits.max_projects
            )));
        }

        self.ensure_name_free(&draft, None).await?;

        let project = self
            .project_repo
            .create(&draft, self.time_provider.now())
            .await
            .map_err(AppError::into_service_error)?;

        info!(project_id = project.id, name = %project.name, "Project created");
        Ok(project)
    }

    /// All projects ordered by id
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.project_repo.list().await
    }

    pub async fn get_project(&self, id: ProjectId) -> Result<Project> {
        self.project_repo.get(id).await
    }

    /// Replace name and description of an existing project
    ///
    /// # Errors
    /// - AppError::Domain if a field is empty or too long
    /// - AppError::NotFound if the project does not exist
    /// - AppError::Validation if another project owns `new_name`
    pub async fn edit_project(
        &self,
        id: ProjectId,
        new_name: &str,
        new_description: &str,
    ) -> Result<Project> {
        let draft = ProjectDraft::new(new_name, new_description)?;

        self.project_repo.get(id).await?;
        self.ensure_name_free(&draft, Some(id)).await?;

        let project = self
            .project_repo
            .update(id, &draft)
            .await
            .map_err(AppError::into_service_error)?;

        info!(project_id = id, name = %project.name, "Project updated");
        Ok(project)
    }

    /// Delete a project; its tasks go with it
    pub async fn delete_project(&self, id: ProjectId) -> Result<()> {
        self.project_repo.delete(id).await?;
        info!(project_id = id, "Project deleted (tasks cascaded)");
        Ok(())
    }

    // Read-time check; the store re-checks at write time.
    async fn ensure_name_free(&self, draft: &ProjectDraft, owner: Option<ProjectId>) -> Result<()> {
        match self.project_repo.find_by_name(draft.name()).await? {
            Some(existing) if Some(existing.id) != owner => {
                debug!(name = draft.name(), existing_id = existing.id, "Project name taken");
                Err(AppError::Validation(format!(
                    "Project with name '{}' already exists",
                    draft.name()
                )))
            }
            _ => Ok(()),
        }
    }
}
