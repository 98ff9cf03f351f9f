//! End-to-end tool calls through the MCP protocol.
//!
//! A client and the server talk over an in-memory duplex pipe, so arguments
//! go through the same extraction and validation path as a real host.

use rmcp::model::{CallToolRequestParam, CallToolResult, ErrorCode};
use rmcp::service::{RoleClient, RunningService, ServiceError};
use rmcp::ServiceExt;
use serde_json::{Value, json};
use std::sync::Arc;
use upstash_mcp_server::UpstashService;
use upstash_mcp_server::client::UpstashClient;
use upstash_mcp_server::config::ClientConfig;
use url::Url;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn connect(server: &MockServer) -> RunningService<RoleClient, ()> {
    let config = ClientConfig::new("dev@example.com", "key", Url::parse(&server.uri()).unwrap());
    let service = UpstashService::new(Arc::new(UpstashClient::new(config).unwrap()));

    let (server_io, client_io) = tokio::io::duplex(64 * 1024);
    tokio::spawn(async move {
        if let Ok(running) = service.serve(server_io).await {
            let _ = running.waiting().await;
        }
    });
    ().serve(client_io).await.unwrap()
}

async fn call(
    client: &RunningService<RoleClient, ()>,
    name: &str,
    arguments: Value,
) -> Result<CallToolResult, ServiceError> {
    let param: CallToolRequestParam =
        serde_json::from_value(json!({"name": name, "arguments": arguments})).unwrap();
    client.call_tool(param).await
}

async fn mount_nothing_expected(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(server)
        .await;
}

fn invalid_params_message(result: Result<CallToolResult, ServiceError>) -> String {
    match result {
        Err(ServiceError::McpError(error)) => {
            assert_eq!(error.code, ErrorCode::INVALID_PARAMS);
            error.message.to_string()
        }
        other => panic!("expected invalid_params, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_region_rejected_without_request() {
    let server = MockServer::start().await;
    mount_nothing_expected(&server).await;
    let client = connect(&server).await;

    let message = invalid_params_message(
        call(
            &client,
            "redis_database_create_new",
            json!({"name": "cache1", "primary_region": "us-north-9"}),
        )
        .await,
    );
    assert!(message.contains("primary_region"), "{message}");
}

#[tokio::test]
async fn test_dot_id_rejected_without_request() {
    let server = MockServer::start().await;
    mount_nothing_expected(&server).await;
    let client = connect(&server).await;

    let message = invalid_params_message(
        call(&client, "redis_database_get_details", json!({"database_id": ".."})).await,
    );
    assert!(message.contains("database_id"), "{message}");

    let message = invalid_params_message(
        call(
            &client,
            "redis_database_delete_backup",
            json!({"database_id": "db-1", "backup_id": "."}),
        )
        .await,
    );
    assert!(message.contains("backup_id"), "{message}");
}

#[tokio::test]
async fn test_missing_argument_rejected_without_request() {
    let server = MockServer::start().await;
    mount_nothing_expected(&server).await;
    let client = connect(&server).await;

    let message = invalid_params_message(
        call(&client, "redis_database_get_usage_stats", json!({"id": "db-1", "period": "1h"}))
            .await,
    );
    assert!(message.contains("type"), "{message}");
}

#[tokio::test]
async fn test_list_databases_returns_structured_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/redis/databases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"database_id": "db-1", "database_name": "cache1", "db_acl_enabled": "false"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    let client = connect(&server).await;

    let result = call(&client, "redis_database_list_databases", json!({}))
        .await
        .unwrap();
    let structured = result.structured_content.unwrap();
    assert_eq!(structured["count"], 1);
    assert_eq!(structured["databases"][0]["database_name"], "cache1");
}
