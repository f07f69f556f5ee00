// Tracker Infrastructure - SQLite Adapter
// Implements: ProjectRepository, TaskRepository

mod connection;
mod error;
mod migration;
mod project_repository;
mod row;
mod task_repository;

pub use connection::create_pool;
pub use migration::run_migrations;
pub use project_repository::SqliteProjectRepository;
pub use task_repository::SqliteTaskRepository;

// Note: sqlx::Error conversion lives in `error::map_sqlx_error`
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
