//! Redis command execution tool.
//!
//! Sends commands to a database's own REST endpoint as a single pipeline
//! request, authenticated with the database's REST token.

use crate::client::UpstashClient;
use crate::error::{UpstashError, UpstashResult};
use crate::tools::validate::{ValidateInput, require_non_blank};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Input for the run_redis_commands tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RunCommandsInput {
    /// REST URL of the database (https://<endpoint>), from redis_database_get_details
    #[schemars(length(min = 1))]
    pub database_rest_url: String,
    /// REST token of the database, from redis_database_get_details
    #[schemars(length(min = 1))]
    pub database_rest_token: String,
    /// Commands to run, each as an array of arguments, e.g. [["SET", "foo", "bar"], ["GET", "foo"]]
    #[schemars(length(min = 1))]
    pub commands: Vec<Vec<String>>,
}

impl RunCommandsInput {
    fn rest_url(&self) -> UpstashResult<Url> {
        let url = Url::parse(self.database_rest_url.trim())
            .map_err(|e| UpstashError::invalid_input("database_rest_url", e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(UpstashError::invalid_input(
                "database_rest_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        Ok(url)
    }
}

impl ValidateInput for RunCommandsInput {
    fn validate(&self) -> UpstashResult<()> {
        self.rest_url()?;
        require_non_blank("database_rest_token", &self.database_rest_token)?;
        for (i, command) in self.commands.iter().enumerate() {
            match command.first() {
                Some(name) if !name.trim().is_empty() => {}
                _ => {
                    return Err(UpstashError::invalid_input(
                        format!("commands/{i}"),
                        "command must start with a command name",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Output from the run_redis_commands tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct RunCommandsOutput {
    /// One entry per command: `{"result": ...}` or `{"error": "..."}`
    pub results: Vec<JsonValue>,
}

/// Handler for the run_redis_commands tool.
pub struct CommandToolHandler {
    client: Arc<UpstashClient>,
}

impl CommandToolHandler {
    pub fn new(client: Arc<UpstashClient>) -> Self {
        Self { client }
    }

    pub async fn run_commands(&self, input: RunCommandsInput) -> UpstashResult<RunCommandsOutput> {
        let url = input.rest_url()?;
        let names: Vec<&str> = input
            .commands
            .iter()
            .filter_map(|c| c.first().map(String::as_str))
            .collect();
        info!(host = url.host_str().unwrap_or_default(), commands = ?names, "Running redis commands");

        let results = self
            .client
            .pipeline(&url, input.database_rest_token.trim(), &input.commands)
            .await?;
        Ok(RunCommandsOutput { results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::validate::Validated;
    use serde_json::json;

    #[test]
    fn test_commands_must_not_be_empty() {
        let err = Validated::<RunCommandsInput>::parse(json!({
            "database_rest_url": "https://example.upstash.io",
            "database_rest_token": "tok",
            "commands": []
        }))
        .unwrap_err();
        assert_eq!(err.field(), Some("commands"));
    }

    #[test]
    fn test_each_command_needs_a_name() {
        let err = Validated::<RunCommandsInput>::parse(json!({
            "database_rest_url": "https://example.upstash.io",
            "database_rest_token": "tok",
            "commands": [["PING"], []]
        }))
        .unwrap_err();
        assert_eq!(err.field(), Some("commands/1"));
    }

    #[test]
    fn test_rest_url_must_be_http() {
        let err = Validated::<RunCommandsInput>::parse(json!({
            "database_rest_url": "redis://example.upstash.io:6379",
            "database_rest_token": "tok",
            "commands": [["PING"]]
        }))
        .unwrap_err();
        assert_eq!(err.field(), Some("database_rest_url"));
    }

    #[test]
    fn test_valid_input() {
        let input = Validated::<RunCommandsInput>::parse(json!({
            "database_rest_url": "https://example.upstash.io",
            "database_rest_token": "tok",
            "commands": [["SET", "foo", "bar"], ["GET", "foo"]]
        }))
        .unwrap();
        assert_eq!(input.commands.len(), 2);
    }
}
