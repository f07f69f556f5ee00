// Autoclose Scheduler
// Periodically moves overdue tasks to `done`

use crate::application::shutdown::ShutdownToken;
use crate::application::task_service::TaskService;
use crate::domain::TaskId;
use crate::error::Result;
use crate::port::TimeProvider;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

/// Outcome of one autoclose run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutocloseReport {
    pub closed: usize,
    pub failed: Vec<TaskId>,
}

/// Autoclose scheduler
///
/// Runs the autoclose use case every `period` in the background, starting
/// with an immediate run.
pub struct AutocloseScheduler {
    task_service: Arc<TaskService>,
    time_provider: Arc<dyn TimeProvider>,
    period: Duration,
}

impl AutocloseScheduler {
    pub fn new(
        task_service: Arc<TaskService>,
        time_provider: Arc<dyn TimeProvider>,
        period: Duration,
    ) -> Self {
        Self {
            task_service,
            time_provider,
            period,
        }
    }

    /// Run the loop until `shutdown` fires
    ///
    /// Should be spawned in tokio::spawn. Errors from a run are logged and
    /// the loop keeps going.
    pub async fn run(self, mut shutdown: ShutdownToken) {
        info!(
            interval_secs = self.period.as_secs(),
            "Autoclose scheduler started"
        );

        let mut tick = interval(self.period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    // A tick racing a shutdown request does not start a run
                    if shutdown.is_shutdown() {
                        break;
                    }
                    match self.run_now().await {
                        Ok(report) => {
                            info!(closed = report.closed, failed = report.failed.len(), "Scheduled autoclose completed");
                        }
                        Err(e) => {
                            error!(error = %e, "Scheduled autoclose failed");
                        }
                    }
                }
                _ = shutdown.wait() => {
                    info!("Autoclose scheduler shutting down");
                    break;
                }
            }
        }
    }

    /// Run autoclose immediately (manual trigger)
    pub async fn run_now(&self) -> Result<AutocloseReport> {
        let now = self.time_provider.now();
        self.task_service.autoclose_overdue(now).await
    }
}
