//! Integration tests for the database management tools against a mock API.

use serde_json::json;
use std::sync::Arc;
use upstash_mcp_server::UpstashError;
use upstash_mcp_server::client::UpstashClient;
use upstash_mcp_server::config::ClientConfig;
use upstash_mcp_server::models::DatabaseSummary;
use upstash_mcp_server::tools::database::{
    CreateDatabaseInput, DatabaseIdInput, DatabaseToolHandler, ResetPasswordInput,
    UpdateRegionsInput,
};
use upstash_mcp_server::tools::validate::Validated;
use url::Url;
use wiremock::matchers::{any, basic_auth, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn handler(server: &MockServer) -> DatabaseToolHandler {
    let config = ClientConfig::new(
        "dev@example.com",
        "api-key-123",
        Url::parse(&server.uri()).unwrap(),
    );
    DatabaseToolHandler::new(Arc::new(UpstashClient::new(config).unwrap()))
}

#[tokio::test]
async fn test_create_database_returns_console_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/redis/database"))
        .and(basic_auth("dev@example.com", "api-key-123"))
        .and(body_json(json!({
            "name": "cache1",
            "region": "global",
            "primary_region": "us-east-1",
            "read_regions": ["eu-west-1"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "database_id": "96ad0856-03b1-4ee7-9666-e81abd0349e1",
            "database_name": "cache1",
            "primary_region": "us-east-1",
            "state": "active",
            "endpoint": "cache1-12345.upstash.io"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let input = Validated::<CreateDatabaseInput>::parse(json!({
        "name": "cache1",
        "primary_region": "us-east-1",
        "read_regions": ["eu-west-1"]
    }))
    .unwrap();
    let output = handler(&server).create(input).await.unwrap();

    assert_eq!(output.database.database_id, "96ad0856-03b1-4ee7-9666-e81abd0349e1");
    assert_eq!(
        output.console_url,
        "https://console.upstash.com/redis/96ad0856-03b1-4ee7-9666-e81abd0349e1"
    );
    let value = serde_json::to_value(&output).unwrap();
    assert_eq!(value["endpoint"], "cache1-12345.upstash.io");
}

#[test]
fn test_invalid_region_names_the_field() {
    let err = Validated::<CreateDatabaseInput>::parse(json!({
        "name": "cache1",
        "primary_region": "us-north-9"
    }))
    .unwrap_err();
    assert_eq!(err.field(), Some("primary_region"));
    assert!(matches!(err, UpstashError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_dot_ids_never_reach_api() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("OK")))
        .expect(0)
        .mount(&server)
        .await;

    for id in ["..", ".", "a/b"] {
        let err = Validated::<DatabaseIdInput>::parse(json!({"database_id": id})).unwrap_err();
        assert_eq!(err.field(), Some("database_id"), "{id}");
    }

    let handler = handler(&server);
    for id in ["..", "."] {
        let err = handler
            .get_details(DatabaseIdInput {
                database_id: id.to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, UpstashError::InvalidInput { .. }), "{id}");

        let err = handler
            .delete(DatabaseIdInput {
                database_id: id.to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, UpstashError::InvalidInput { .. }), "{id}");
    }
}

#[tokio::test]
async fn test_delete_returns_confirmation_text() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v2/redis/database/db-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("OK")))
        .expect(1)
        .mount(&server)
        .await;

    let message = handler(&server)
        .delete(DatabaseIdInput {
            database_id: "db-1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(message, "Database db-1 deleted successfully.");
}

#[tokio::test]
async fn test_list_keeps_only_summary_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/redis/databases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "database_id": "db-1",
                "database_name": "cache1",
                "type": "free",
                "region": "global",
                "primary_region": "us-east-1",
                "state": "active",
                "db_max_clients": 1000,
                "db_disk_threshold": 107374182400u64
            },
            {"database_id": "db-2", "database_name": "sessions"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let output = handler(&server).list().await.unwrap();
    assert_eq!(output.count, 2);

    let value = serde_json::to_value(&output).unwrap();
    let first = value["databases"][0].as_object().unwrap();
    assert_eq!(first["type"], "free");
    for key in first.keys() {
        assert!(DatabaseSummary::FIELDS.contains(&key.as_str()), "unexpected key {key}");
    }
    assert!(!first.contains_key("db_max_clients"));
}

#[tokio::test]
async fn test_list_passes_through_loosely_typed_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/redis/databases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "database_id": "db-1",
                "db_acl_enabled": "false",
                "db_acl_default_user_status": "true",
                "budget": 12.5,
                "port": "6379",
                "creation_time": 1714557600,
                "tls": true
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let output = handler(&server).list().await.unwrap();
    assert_eq!(output.count, 1);

    let value = serde_json::to_value(&output).unwrap();
    let first = &value["databases"][0];
    assert_eq!(first["db_acl_enabled"], "false");
    assert_eq!(first["db_acl_default_user_status"], "true");
    assert_eq!(first["budget"], 12.5);
    assert_eq!(first["port"], "6379");
    assert_eq!(first["creation_time"], 1714557600);
}

#[tokio::test]
async fn test_get_details_formats_limits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/redis/database/db-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "database_id": "db-1",
            "db_disk_threshold": 1073741824u64,
            "db_request_limit": 10000,
            "db_max_clients": 1000
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = handler(&server)
        .get_details(DatabaseIdInput {
            database_id: "db-1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(output.limits.disk_threshold.as_deref(), Some("1 GB"));
    assert_eq!(output.limits.request_limit, Some(10000));

    let value = serde_json::to_value(&output).unwrap();
    assert_eq!(value["db_max_clients"], 1000);
}

#[tokio::test]
async fn test_update_regions_sends_full_set() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/redis/update-regions/db-1"))
        .and(body_json(json!({"read_regions": ["us-east-1", "eu-west-1"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "database_id": "db-1",
            "read_regions": ["us-east-1", "eu-west-1"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let input = Validated::<UpdateRegionsInput>::parse(json!({
        "id": "db-1",
        "read_regions": ["us-east-1", "eu-west-1"]
    }))
    .unwrap();
    let database = handler(&server).update_regions(input).await.unwrap();
    assert_eq!(
        database.read_regions,
        Some(vec!["us-east-1".to_string(), "eu-west-1".to_string()])
    );
}

#[tokio::test]
async fn test_reset_password_posts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/redis/reset-password/db-1"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "database_id": "db-1",
            "password": "new-password"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let database = handler(&server)
        .reset_password(ResetPasswordInput {
            id: "db-1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(database.password.as_deref(), Some("new-password"));
}

#[tokio::test]
async fn test_provider_error_is_propagated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/redis/database/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("database not found"))
        .expect(1)
        .mount(&server)
        .await;

    let err = handler(&server)
        .get_details(DatabaseIdInput {
            database_id: "missing".to_string(),
        })
        .await
        .unwrap_err();
    match err {
        UpstashError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "database not found");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/redis/databases"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = handler(&server).list().await.unwrap_err();
    assert_eq!(err.to_string(), "Upstash API error (500): boom");
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/redis/databases"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = handler(&server).list().await.unwrap_err();
    assert!(matches!(err, UpstashError::InvalidResponse { .. }));
}
