// Domain Layer - Pure business logic and entities

pub mod error;
pub mod project;
pub mod task;
mod text;

// Re-exports
pub use error::DomainError;
pub use project::{
    Project, ProjectDraft, ProjectId, MAX_PROJECT_DESCRIPTION_LENGTH, MAX_PROJECT_NAME_LENGTH,
};
pub use task::{
    parse_deadline, Task, TaskDraft, TaskId, TaskStatus, DEADLINE_FORMAT,
    MAX_TASK_DESCRIPTION_LENGTH, MAX_TASK_TITLE_LENGTH,
};
