//! RPC Method Handlers
//!
//! Thin translation between wire types and the application services.

use crate::error::to_rpc_error;
use crate::types::{
    normalize_deadline, AsOfRequest, AutocloseResponse, ChangeStatusRequest, CreateProjectRequest,
    CreateTaskRequest, DeleteResponse, ListTasksRequest, ProjectIdRequest, ProjectResponse,
    TaskIdRequest, TaskResponse, UpdateProjectRequest, UpdateTaskRequest,
};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use tracker_core::application::{ProjectService, TaskService};
use tracker_core::domain::{TaskStatus, DEADLINE_FORMAT};
use tracker_core::port::TimeProvider;
use tracker_core::AppError;

type RpcResult<T> = Result<T, ErrorObjectOwned>;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    project_service: Arc<ProjectService>,
    task_service: Arc<TaskService>,
    time_provider: Arc<dyn TimeProvider>,
}

impl RpcHandler {
    pub fn new(
        project_service: Arc<ProjectService>,
        task_service: Arc<TaskService>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            project_service,
            task_service,
            time_provider,
        }
    }

    /// project.create.v1
    pub async fn create_project(&self, params: CreateProjectRequest) -> RpcResult<ProjectResponse> {
        self.project_service
            .create_project(&params.name, &params.description)
            .await
            .map(ProjectResponse::from)
            .map_err(to_rpc_error)
    }

    /// project.list.v1
    pub async fn list_projects(&self) -> RpcResult<Vec<ProjectResponse>> {
        let projects = self
            .project_service
            .list_projects()
            .await
            .map_err(to_rpc_error)?;
        Ok(projects.into_iter().map(ProjectResponse::from).collect())
    }

    /// project.get.v1
    pub async fn get_project(&self, params: ProjectIdRequest) -> RpcResult<ProjectResponse> {
        self.project_service
            .get_project(params.id)
            .await
            .map(ProjectResponse::from)
            .map_err(to_rpc_error)
    }

    /// project.update.v1
    pub async fn update_project(&self, params: UpdateProjectRequest) -> RpcResult<ProjectResponse> {
        let current = self
            .project_service
            .get_project(params.id)
            .await
            .map_err(to_rpc_error)?;
        let name = params.name.unwrap_or(current.name);
        let description = params.description.unwrap_or(current.description);

        self.project_service
            .edit_project(params.id, &name, &description)
            .await
            .map(ProjectResponse::from)
            .map_err(to_rpc_error)
    }

    /// project.delete.v1
    pub async fn delete_project(&self, params: ProjectIdRequest) -> RpcResult<DeleteResponse> {
        self.project_service
            .delete_project(params.id)
            .await
            .map_err(to_rpc_error)?;

        Ok(DeleteResponse {
            id: params.id,
            deleted: true,
        })
    }

    /// task.create.v1
    pub async fn create_task(&self, params: CreateTaskRequest) -> RpcResult<TaskResponse> {
        let deadline = normalize_deadline(params.deadline);
        self.task_service
            .create_task(
                params.project_id,
                &params.title,
                &params.description,
                deadline.as_deref(),
            )
            .await
            .map(TaskResponse::from)
            .map_err(to_rpc_error)
    }

    /// task.list.v1
    pub async fn list_tasks(&self, params: ListTasksRequest) -> RpcResult<Vec<TaskResponse>> {
        let tasks = self
            .task_service
            .list_project_tasks(params.project_id)
            .await
            .map_err(to_rpc_error)?;
        Ok(tasks.into_iter().map(TaskResponse::from).collect())
    }

    /// task.get.v1
    pub async fn get_task(&self, params: TaskIdRequest) -> RpcResult<TaskResponse> {
        self.task_service
            .get_task(params.id)
            .await
            .map(TaskResponse::from)
            .map_err(to_rpc_error)
    }

    /// task.update.v1
    pub async fn update_task(&self, params: UpdateTaskRequest) -> RpcResult<TaskResponse> {
        // Parsed up front so a bad status rejects the whole update
        let status = params
            .status
            .as_deref()
            .map(str::parse::<TaskStatus>)
            .transpose()
            .map_err(|e| to_rpc_error(AppError::from(e)))?;

        let current = self
            .task_service
            .get_task(params.id)
            .await
            .map_err(to_rpc_error)?;
        let title = params.title.unwrap_or(current.title);
        let description = params.description.unwrap_or(current.description);
        let deadline = normalize_deadline(params.deadline).or_else(|| {
            current
                .deadline
                .map(|d| d.format(DEADLINE_FORMAT).to_string())
        });

        // Field validation happens before the store is written
        let task = self
            .task_service
            .edit_task(params.id, &title, &description, deadline.as_deref())
            .await
            .map_err(to_rpc_error)?;

        let task = match status {
            Some(status) => self
                .task_service
                .set_task_status(task.id, status)
                .await
                .map_err(to_rpc_error)?,
            None => task,
        };

        Ok(TaskResponse::from(task))
    }

    /// task.delete.v1
    pub async fn delete_task(&self, params: TaskIdRequest) -> RpcResult<DeleteResponse> {
        self.task_service
            .delete_task(params.id)
            .await
            .map_err(to_rpc_error)?;

        Ok(DeleteResponse {
            id: params.id,
            deleted: true,
        })
    }

    /// task.status.v1
    pub async fn change_status(&self, params: ChangeStatusRequest) -> RpcResult<TaskResponse> {
        self.task_service
            .change_task_status(params.id, &params.status)
            .await
            .map(TaskResponse::from)
            .map_err(to_rpc_error)
    }

    /// task.overdue.v1
    pub async fn overdue_tasks(&self, params: AsOfRequest) -> RpcResult<Vec<TaskResponse>> {
        let now = params.now.unwrap_or_else(|| self.time_provider.now());
        let tasks = self
            .task_service
            .list_overdue_open_tasks(now)
            .await
            .map_err(to_rpc_error)?;
        Ok(tasks.into_iter().map(TaskResponse::from).collect())
    }

    /// admin.autoclose.v1
    pub async fn autoclose(&self, params: AsOfRequest) -> RpcResult<AutocloseResponse> {
        let now = params.now.unwrap_or_else(|| self.time_provider.now());
        self.task_service
            .autoclose_overdue(now)
            .await
            .map(AutocloseResponse::from)
            .map_err(to_rpc_error)
    }
}
