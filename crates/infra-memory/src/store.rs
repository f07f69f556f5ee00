// In-memory store backing both repository ports

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::debug;
use tracker_core::domain::{
    Project, ProjectDraft, ProjectId, Task, TaskDraft, TaskId, TaskStatus,
};
use tracker_core::error::{AppError, Result};
use tracker_core::port::{ProjectRepository, TaskRepository};

#[derive(Debug)]
struct State {
    projects: BTreeMap<ProjectId, Project>,
    tasks: BTreeMap<TaskId, Task>,
    next_project_id: ProjectId,
    next_task_id: TaskId,
}

impl Default for State {
    fn default() -> Self {
        Self {
            projects: BTreeMap::new(),
            tasks: BTreeMap::new(),
            next_project_id: 1,
            next_task_id: 1,
        }
    }
}

impl State {
    fn name_taken(&self, name: &str, owner: Option<ProjectId>) -> bool {
        self.projects
            .values()
            .any(|p| p.name == name && Some(p.id) != owner)
    }

    fn task_mut(&mut self, id: TaskId) -> Result<&mut Task> {
        self.tasks
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Task", id))
    }
}

fn duplicate_name(name: &str) -> AppError {
    AppError::UniqueConstraint(format!("Project with name '{}' already exists", name))
}

/// Process-local store for tests and ephemeral runs
///
/// Projects and tasks share one lock, so a project delete and its task
/// cascade are observed together. Ids are never reused.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn get(&self, id: ProjectId) -> Result<Project> {
        let state = self.state.lock().await;
        state
            .projects
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Project", id))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Project>> {
        let state = self.state.lock().await;
        Ok(state.projects.values().find(|p| p.name == name).cloned())
    }

    async fn list(&self) -> Result<Vec<Project>> {
        let state = self.state.lock().await;
        Ok(state.projects.values().cloned().collect())
    }

    async fn count(&self) -> Result<i64> {
        let state = self.state.lock().await;
        Ok(state.projects.len() as i64)
    }

    async fn create(&self, draft: &ProjectDraft, created_at: DateTime<Utc>) -> Result<Project> {
        let mut state = self.state.lock().await;
        if state.name_taken(draft.name(), None) {
            return Err(duplicate_name(draft.name()));
        }

        let id = state.next_project_id;
        state.next_project_id += 1;

        let project = Project {
            id,
            name: draft.name().to_string(),
            description: draft.description().to_string(),
            created_at,
        };
        state.projects.insert(id, project.clone());

        debug!(project_id = id, "Stored project");
        Ok(project)
    }

    async fn update(&self, id: ProjectId, draft: &ProjectDraft) -> Result<Project> {
        let mut state = self.state.lock().await;
        if !state.projects.contains_key(&id) {
            return Err(AppError::not_found("Project", id));
        }
        if state.name_taken(draft.name(), Some(id)) {
            return Err(duplicate_name(draft.name()));
        }

        let project = state
            .projects
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Project", id))?;
        project.name = draft.name().to_string();
        project.description = draft.description().to_string();
        Ok(project.clone())
    }

    async fn delete(&self, id: ProjectId) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.projects.remove(&id).is_none() {
            return Err(AppError::not_found("Project", id));
        }

        let before = state.tasks.len();
        state.tasks.retain(|_, task| task.project_id != id);

        debug!(
            project_id = id,
            tasks_deleted = before - state.tasks.len(),
            "Removed project"
        );
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn get(&self, id: TaskId) -> Result<Task> {
        let state = self.state.lock().await;
        state
            .tasks
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Task", id))
    }

    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<Task>> {
        let state = self.state.lock().await;
        Ok(state
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn count_by_project(&self, project_id: ProjectId) -> Result<i64> {
        let state = self.state.lock().await;
        Ok(state
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .count() as i64)
    }

    async fn create(
        &self,
        project_id: ProjectId,
        draft: &TaskDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Task> {
        let mut state = self.state.lock().await;
        if !state.projects.contains_key(&project_id) {
            return Err(AppError::Validation(format!(
                "Referenced project does not exist: {}",
                project_id
            )));
        }

        let id = state.next_task_id;
        state.next_task_id += 1;

        let task = Task {
            id,
            project_id,
            title: draft.title().to_string(),
            description: draft.description().to_string(),
            status: TaskStatus::default(),
            deadline: draft.deadline(),
            created_at,
            closed_at: None,
        };
        state.tasks.insert(id, task.clone());

        debug!(task_id = id, project_id, "Stored task");
        Ok(task)
    }

    async fn update(&self, id: TaskId, draft: &TaskDraft) -> Result<Task> {
        let mut state = self.state.lock().await;
        let task = state.task_mut(id)?;
        task.title = draft.title().to_string();
        task.description = draft.description().to_string();
        task.deadline = draft.deadline();
        Ok(task.clone())
    }

    async fn update_status(
        &self,
        id: TaskId,
        status: TaskStatus,
        closed_at: Option<DateTime<Utc>>,
    ) -> Result<Task> {
        let mut state = self.state.lock().await;
        let task = state.task_mut(id)?;
        task.status = status;
        task.closed_at = closed_at;
        Ok(task.clone())
    }

    async fn delete(&self, id: TaskId) -> Result<()> {
        let mut state = self.state.lock().await;
        state
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Task", id))
    }

    async fn list_overdue_open(&self, now: DateTime<Utc>) -> Result<Vec<Task>> {
        let state = self.state.lock().await;
        let mut overdue: Vec<Task> = state
            .tasks
            .values()
            .filter(|t| t.is_overdue(now))
            .cloned()
            .collect();
        // BTreeMap order already sorts by id; stable sort keeps it as tie-breaker
        overdue.sort_by_key(|t| t.deadline);
        Ok(overdue)
    }
}
