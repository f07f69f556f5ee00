// Daemon configuration

use std::str::FromStr;
use std::time::Duration;
use tracker_api_rpc::server::{DEFAULT_RPC_HOST, DEFAULT_RPC_PORT};
use tracker_core::application::constants::{
    DEFAULT_AUTOCLOSE_INTERVAL, DEFAULT_MAX_PROJECTS, DEFAULT_MAX_TASKS_PER_PROJECT,
};
use tracker_core::application::TrackerLimits;
use tracker_core::error::{AppError, Result};

const DEFAULT_DB_PATH: &str = "~/.tracker/tracker.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Daemon configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// SQLite file path, tilde expanded.
    pub db_path: String,
    pub rpc_host: String,
    pub rpc_port: u16,
    pub limits: TrackerLimits,
    pub autoclose_interval: Duration,
    pub log_format: LogFormat,
}

impl DaemonConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `TRACKER_DB_PATH`            | `~/.tracker/tracker.db` |
    /// | `TRACKER_RPC_HOST`           | `127.0.0.1`             |
    /// | `TRACKER_RPC_PORT`           | `9537`                  |
    /// | `MAX_PROJECTS`               | `20`                    |
    /// | `MAX_TASKS_PER_PROJECT`      | `20`                    |
    /// | `AUTOCLOSE_INTERVAL_MINUTES` | `60`                    |
    /// | `TRACKER_LOG_FORMAT`         | `pretty`                |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = lookup("TRACKER_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let db_path = shellexpand::tilde(&db_path).into_owned();

        let rpc_host = lookup("TRACKER_RPC_HOST").unwrap_or_else(|| DEFAULT_RPC_HOST.to_string());
        let rpc_port = parse_or(&lookup, "TRACKER_RPC_PORT", DEFAULT_RPC_PORT)?;

        let limits = TrackerLimits {
            max_projects: parse_or(&lookup, "MAX_PROJECTS", DEFAULT_MAX_PROJECTS)?,
            max_tasks_per_project: parse_or(
                &lookup,
                "MAX_TASKS_PER_PROJECT",
                DEFAULT_MAX_TASKS_PER_PROJECT,
            )?,
        };

        let minutes = parse_or(
            &lookup,
            "AUTOCLOSE_INTERVAL_MINUTES",
            DEFAULT_AUTOCLOSE_INTERVAL.as_secs() / 60,
        )?;
        if minutes == 0 {
            return Err(AppError::Config(
                "AUTOCLOSE_INTERVAL_MINUTES must be greater than 0".to_string(),
            ));
        }

        let log_format = match lookup("TRACKER_LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "TRACKER_LOG_FORMAT must be 'json' or 'pretty', got '{}'",
                    other
                )))
            }
        };

        Ok(Self {
            db_path,
            rpc_host,
            rpc_port,
            limits,
            autoclose_interval: Duration::from_secs(minutes * 60),
            log_format,
        })
    }

    /// sqlx connection URL for `db_path`
    pub fn database_url(&self) -> String {
        if self.db_path.starts_with("sqlite:") {
            self.db_path.clone()
        } else {
            format!("sqlite://{}", self.db_path)
        }
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{} has invalid value '{}': {}", key, raw, e))),
    }
}
