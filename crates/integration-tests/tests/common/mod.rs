//! Shared wiring for the integration tests
//!
//! Every scenario runs against both store implementations.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use tracker_core::application::{ProjectService, TaskService, TrackerLimits};
use tracker_core::port::time_provider::mocks::FixedTimeProvider;
use tracker_core::port::{ProjectRepository, TaskRepository, TimeProvider};
use tracker_infra_memory::InMemoryStore;
use tracker_infra_sqlite::{
    create_pool, run_migrations, SqliteProjectRepository, SqliteTaskRepository,
};

/// 2025-06-15T12:00:00Z
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

pub struct Harness {
    pub backend: &'static str,
    pub clock: Arc<FixedTimeProvider>,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub task_repo: Arc<dyn TaskRepository>,
    pub projects: Arc<ProjectService>,
    pub tasks: Arc<TaskService>,
}

impl Harness {
    pub fn with_repos(
        backend: &'static str,
        project_repo: Arc<dyn ProjectRepository>,
        task_repo: Arc<dyn TaskRepository>,
        limits: TrackerLimits,
    ) -> Self {
        let clock = Arc::new(FixedTimeProvider::new(start_time()));
        let time: Arc<dyn TimeProvider> = clock.clone();

        let projects = Arc::new(ProjectService::new(
            project_repo.clone(),
            time.clone(),
            limits,
        ));
        let tasks = Arc::new(TaskService::new(
            task_repo.clone(),
            project_repo.clone(),
            time,
            limits,
        ));

        Self {
            backend,
            clock,
            project_repo,
            task_repo,
            projects,
            tasks,
        }
    }

    pub async fn sqlite(limits: TrackerLimits) -> Self {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        Self::with_repos(
            "sqlite",
            Arc::new(SqliteProjectRepository::new(pool.clone())),
            Arc::new(SqliteTaskRepository::new(pool)),
            limits,
        )
    }

    pub fn memory(limits: TrackerLimits) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::with_repos("memory", store.clone(), store, limits)
    }

    pub fn time(&self) -> Arc<dyn TimeProvider> {
        self.clock.clone()
    }
}

/// One harness per store implementation
pub async fn all_backends(limits: TrackerLimits) -> Vec<Harness> {
    vec![Harness::sqlite(limits).await, Harness::memory(limits)]
}

pub async fn backends() -> Vec<Harness> {
    all_backends(TrackerLimits::default()).await
}
