// Port Layer - Interfaces for external dependencies

pub mod project_repository;
pub mod task_repository;
pub mod time_provider;

// Re-exports
pub use project_repository::ProjectRepository;
pub use task_repository::TaskRepository;
pub use time_provider::TimeProvider;
