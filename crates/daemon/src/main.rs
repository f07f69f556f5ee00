//! Tracker Daemon - Main Entry Point
//! JSON-RPC server + autoclose scheduler over the SQLite store

mod config;

use anyhow::{Context, Result};
use config::{DaemonConfig, LogFormat};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tracker_api_rpc::{RpcServer, RpcServerConfig};
use tracker_core::application::{
    shutdown_channel, AutocloseScheduler, ProjectService, TaskService,
};
use tracker_core::port::time_provider::SystemTimeProvider;
use tracker_core::port::{ProjectRepository, TaskRepository, TimeProvider};
use tracker_infra_sqlite::{
    create_pool, run_migrations, SqliteProjectRepository, SqliteTaskRepository,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_logging(format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("tracker=info"))
        .context("Failed to create env filter")?;

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty())
            .init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration (.env is optional)
    dotenvy::dotenv().ok();
    let config = DaemonConfig::from_env().context("Invalid configuration")?;

    // 2. Initialize logging
    init_logging(config.log_format)?;
    info!("Tracker daemon v{} starting...", VERSION);

    // 3. Initialize database
    if let Some(parent) = Path::new(&config.db_path).parent() {
        if !parent.as_os_str().is_empty() && !config.db_path.starts_with("sqlite:") {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    info!(db_path = %config.db_path, "Initializing database...");
    let pool = create_pool(&config.database_url())
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    // 4. Setup dependencies (DI wiring)
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let project_repo: Arc<dyn ProjectRepository> =
        Arc::new(SqliteProjectRepository::new(pool.clone()));
    let task_repo: Arc<dyn TaskRepository> = Arc::new(SqliteTaskRepository::new(pool.clone()));

    let project_service = Arc::new(ProjectService::new(
        project_repo.clone(),
        time_provider.clone(),
        config.limits,
    ));
    let task_service = Arc::new(TaskService::new(
        task_repo,
        project_repo,
        time_provider.clone(),
        config.limits,
    ));

    // 5. Start JSON-RPC server
    let rpc_config = RpcServerConfig {
        host: config.rpc_host.clone(),
        port: config.rpc_port,
    };
    let rpc_server = RpcServer::new(
        rpc_config,
        project_service,
        task_service.clone(),
        time_provider.clone(),
    );
    let (rpc_addr, rpc_handle) = rpc_server
        .start()
        .await
        .context("RPC server start failed")?;

    // 6. Start autoclose scheduler (first run is immediate)
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let scheduler = AutocloseScheduler::new(task_service, time_provider, config.autoclose_interval);
    let scheduler_handle = tokio::spawn(scheduler.run(shutdown_rx));

    info!(rpc_addr = %rpc_addr, "System ready. Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    // 8. Graceful shutdown
    shutdown_tx.shutdown();
    rpc_handle
        .stop()
        .context("RPC server stop failed")?;
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), scheduler_handle).await;
    pool.close().await;

    info!("Shutdown complete.");
    Ok(())
}
