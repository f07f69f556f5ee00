//! JSON-RPC round trips against a live server

use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::core::ClientError;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::server::ServerHandle;
use serde_json::Value;
use std::sync::Arc;
use tracker_api_rpc::error::code;
use tracker_api_rpc::types::{AutocloseResponse, DeleteResponse, ProjectResponse, TaskResponse};
use tracker_api_rpc::{RpcServer, RpcServerConfig};
use tracker_core::application::{ProjectService, TaskService, TrackerLimits};
use tracker_core::port::time_provider::SystemTimeProvider;
use tracker_core::port::TimeProvider;
use tracker_infra_memory::InMemoryStore;

async fn start_server() -> (HttpClient, ServerHandle) {
    let store = Arc::new(InMemoryStore::new());
    let clock: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let limits = TrackerLimits::default();

    let server = RpcServer::new(
        RpcServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        Arc::new(ProjectService::new(store.clone(), clock.clone(), limits)),
        Arc::new(TaskService::new(store.clone(), store, clock.clone(), limits)),
        clock,
    );
    let (addr, handle) = server.start().await.unwrap();

    let client = HttpClientBuilder::default()
        .build(format!("http://{}", addr))
        .unwrap();
    (client, handle)
}

fn params(value: Value) -> ObjectParams {
    let mut params = ObjectParams::new();
    if let Value::Object(map) = value {
        for (key, value) in map {
            params.insert(&key, value).unwrap();
        }
    }
    params
}

fn error_code(err: ClientError) -> i32 {
    match err {
        ClientError::Call(obj) => obj.code(),
        other => panic!("expected call error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_project_and_task_flow() {
    let (client, handle) = start_server().await;

    let project: ProjectResponse = client
        .request(
            "project.create.v1",
            params(serde_json::json!({ "name": "Website", "description": "Company site" })),
        )
        .await
        .unwrap();
    assert_eq!(project.name, "Website");

    let task: TaskResponse = client
        .request(
            "task.create.v1",
            params(serde_json::json!({
                "project_id": project.id,
                "title": "Launch",
                "description": "Go live",
                "deadline": "2000-01-01T10:00:00+02:00",
            })),
        )
        .await
        .unwrap();
    assert_eq!(task.deadline.as_deref(), Some("2000-01-01"));

    let overdue: Vec<TaskResponse> = client
        .request("task.overdue.v1", params(serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(overdue.len(), 1);

    let report: AutocloseResponse = client
        .request("admin.autoclose.v1", ObjectParams::new())
        .await
        .unwrap();
    assert_eq!(report.closed, 1);

    let closed: TaskResponse = client
        .request("task.get.v1", params(serde_json::json!({ "id": task.id })))
        .await
        .unwrap();
    assert_eq!(closed.status, "done");
    assert!(closed.closed_at.is_some());

    let deleted: DeleteResponse = client
        .request(
            "project.delete.v1",
            params(serde_json::json!({ "id": project.id })),
        )
        .await
        .unwrap();
    assert!(deleted.deleted);

    let tasks: Vec<TaskResponse> = client
        .request(
            "task.list.v1",
            params(serde_json::json!({ "project_id": project.id })),
        )
        .await
        .unwrap();
    assert!(tasks.is_empty());

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_error_codes_on_the_wire() {
    let (client, handle) = start_server().await;

    let missing = client
        .request::<ProjectResponse, _>("project.get.v1", params(serde_json::json!({ "id": 5 })))
        .await
        .unwrap_err();
    assert_eq!(error_code(missing), code::NOT_FOUND);

    let empty_name = client
        .request::<ProjectResponse, _>(
            "project.create.v1",
            params(serde_json::json!({ "name": "  ", "description": "d" })),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(empty_name), code::VALIDATION_ERROR);

    let orphan = client
        .request::<TaskResponse, _>(
            "task.create.v1",
            params(serde_json::json!({ "project_id": 42, "title": "t", "description": "d" })),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(orphan), code::VALIDATION_ERROR);

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_project_cap_maps_to_business_rule() {
    let (client, handle) = start_server().await;

    for i in 0..20 {
        let _: ProjectResponse = client
            .request(
                "project.create.v1",
                params(serde_json::json!({ "name": format!("P{}", i), "description": "d" })),
            )
            .await
            .unwrap();
    }

    let err = client
        .request::<ProjectResponse, _>(
            "project.create.v1",
            params(serde_json::json!({ "name": "One too many", "description": "d" })),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(err), code::BUSINESS_RULE);

    handle.stop().unwrap();
}
