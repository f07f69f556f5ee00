//! JSON-RPC Server
//!
//! Serves the tracker methods over HTTP on a localhost TCP port.

use crate::handler::RpcHandler;
use crate::types::AsOfRequest;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracker_core::application::{ProjectService, TaskService};
use tracker_core::error::{AppError, Result};
use tracker_core::port::TimeProvider;

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 9537;

/// Every method the server exposes
pub const METHODS: [&str; 13] = [
    "project.create.v1",
    "project.list.v1",
    "project.get.v1",
    "project.update.v1",
    "project.delete.v1",
    "task.create.v1",
    "task.list.v1",
    "task.get.v1",
    "task.update.v1",
    "task.delete.v1",
    "task.status.v1",
    "task.overdue.v1",
    "admin.autoclose.v1",
];

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

// Register `$method` on the handler under `$name`.
// `params` arms parse a named-params object, `optional` arms accept none.
macro_rules! register {
    ($module:expr, $name:literal => $method:ident()) => {
        $module
            .register_async_method($name, |_, handler, _| async move {
                handler.$method().await
            })
            .map_err(|e| registration_error($name, e))?;
    };
    ($module:expr, $name:literal => $method:ident(params)) => {
        $module
            .register_async_method($name, |params, handler, _| async move {
                handler.$method(params.parse()?).await
            })
            .map_err(|e| registration_error($name, e))?;
    };
    ($module:expr, $name:literal => $method:ident(optional)) => {
        $module
            .register_async_method($name, |params, handler, _| async move {
                let req: Option<AsOfRequest> = params.parse()?;
                handler.$method(req.unwrap_or_default()).await
            })
            .map_err(|e| registration_error($name, e))?;
    };
}

fn registration_error(name: &str, err: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("Failed to register {}: {}", name, err))
}

/// Build the method table around a handler
pub fn build_module(handler: RpcHandler) -> Result<RpcModule<RpcHandler>> {
    let mut module = RpcModule::new(handler);

    register!(module, "project.create.v1" => create_project(params));
    register!(module, "project.list.v1" => list_projects());
    register!(module, "project.get.v1" => get_project(params));
    register!(module, "project.update.v1" => update_project(params));
    register!(module, "project.delete.v1" => delete_project(params));

    register!(module, "task.create.v1" => create_task(params));
    register!(module, "task.list.v1" => list_tasks(params));
    register!(module, "task.get.v1" => get_task(params));
    register!(module, "task.update.v1" => update_task(params));
    register!(module, "task.delete.v1" => delete_task(params));
    register!(module, "task.status.v1" => change_status(params));
    register!(module, "task.overdue.v1" => overdue_tasks(optional));

    register!(module, "admin.autoclose.v1" => autoclose(optional));

    Ok(module)
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: RpcHandler,
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        project_service: Arc<ProjectService>,
        task_service: Arc<TaskService>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            config,
            handler: RpcHandler::new(project_service, task_service, time_provider),
        }
    }

    /// Start the JSON-RPC server
    ///
    /// Returns the bound address (port 0 picks a free one) and the handle
    /// used to stop the server.
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle)> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| AppError::Config(format!("Failed to bind RPC server on {}: {}", addr, e)))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| AppError::Internal(format!("RPC server has no local address: {}", e)))?;

        let module = build_module(self.handler)?;

        info!(addr = %local_addr, methods = METHODS.len(), "JSON-RPC server started");
        Ok((local_addr, server.start(module)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::application::TrackerLimits;
    use tracker_core::port::time_provider::SystemTimeProvider;
    use tracker_infra_memory::InMemoryStore;

    fn handler() -> RpcHandler {
        let store = Arc::new(InMemoryStore::new());
        let clock: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
        let limits = TrackerLimits::default();
        RpcHandler::new(
            Arc::new(ProjectService::new(store.clone(), clock.clone(), limits)),
            Arc::new(TaskService::new(store.clone(), store, clock.clone(), limits)),
            clock,
        )
    }

    #[test]
    fn test_module_registers_every_method() {
        let module = build_module(handler()).unwrap();
        let mut registered: Vec<_> = module.method_names().collect();
        registered.sort_unstable();

        let mut expected = METHODS.to_vec();
        expected.sort_unstable();
        assert_eq!(registered, expected);
    }
}
