// JSON-RPC client over HTTP

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Error codes returned by the daemon
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const BUSINESS_RULE: i32 = 4001;
    pub const NOT_FOUND: i32 = 4004;
}

/// Error object reported by the daemon
#[derive(Debug, Clone, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl RpcError {
    /// True when changing the input can fix the call
    pub fn is_input_error(&self) -> bool {
        matches!(self.code, code::VALIDATION_ERROR | code::BUSINESS_RULE)
    }
}

/// Process exit code for a failed command
///
/// 2 for validation or business rule failures, 3 for missing ids, 1 otherwise.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<RpcError>() {
        Some(rpc) if rpc.is_input_error() => 2,
        Some(rpc) if rpc.code == code::NOT_FOUND => 3,
        _ => 1,
    }
}

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<serde_json::Value>,
    error: Option<RpcError>,
}

pub struct RpcClient {
    url: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Call `method` and decode its result
    ///
    /// Daemon-side failures come back as [`RpcError`] inside the anyhow chain.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };

        let response: JsonRpcResponse = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to connect to daemon at {}", self.url))?
            .json()
            .await
            .context("Failed to parse response")?;

        if let Some(error) = response.error {
            return Err(error.into());
        }

        let result = response
            .result
            .ok_or_else(|| anyhow::anyhow!("No result in response"))?;
        serde_json::from_value(result)
            .with_context(|| format!("Unexpected result shape for {}", method))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rpc_error(code: i32) -> anyhow::Error {
        RpcError {
            code,
            message: "failed".into(),
        }
        .into()
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&rpc_error(4000)), 2);
        assert_eq!(exit_code_for(&rpc_error(4001)), 2);
        assert_eq!(exit_code_for(&rpc_error(4004)), 3);
        assert_eq!(exit_code_for(&rpc_error(5000)), 1);
        assert_eq!(exit_code_for(&anyhow::anyhow!("connection refused")), 1);
    }

    #[test]
    fn test_error_response_decodes() {
        let response: JsonRpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":4004,"message":"Task not found (id=3)"}}"#,
        )
        .unwrap();

        let error = response.error.unwrap();
        assert_eq!(error.code, 4004);
        assert_eq!(error.to_string(), "Task not found (id=3)");
        assert!(response.result.is_none());
    }
}
