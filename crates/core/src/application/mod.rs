// Application Layer - Use Cases and Business Logic

pub mod autoclose;
pub mod constants;
pub mod project_service;
mod shutdown;
pub mod task_service;

// Re-exports
pub use autoclose::{AutocloseReport, AutocloseScheduler};
pub use constants::TrackerLimits;
pub use project_service::ProjectService;
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
pub use task_service::TaskService;
