// Tracker limits and defaults (no magic values)
use std::time::Duration;

/// Default cap on the number of projects
pub const DEFAULT_MAX_PROJECTS: usize = 20;

/// Default cap on the number of tasks per project
pub const DEFAULT_MAX_TASKS_PER_PROJECT: usize = 20;

/// Default autoclose interval (60 minutes)
pub const DEFAULT_AUTOCLOSE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Capacity limits enforced by the services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerLimits {
    pub max_projects: usize,
    pub max_tasks_per_project: usize,
}

impl Default for TrackerLimits {
    fn default() -> Self {
        Self {
            max_projects: DEFAULT_MAX_PROJECTS,
            max_tasks_per_project: DEFAULT_MAX_TASKS_PER_PROJECT,
        }
    }
}
