//! Stdio transport for the MCP server.
//!
//! JSON-RPC messages are read from stdin and written to stdout, so nothing
//! else may print to stdout while this transport runs.

use crate::client::UpstashClient;
use crate::error::{UpstashError, UpstashResult};
use crate::mcp::UpstashService;
use crate::transport::{Transport, wait_for_signal};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use tracing::{info, warn};

/// Stdio transport implementation.
pub struct StdioTransport {
    client: Arc<UpstashClient>,
}

impl StdioTransport {
    pub fn new(client: Arc<UpstashClient>) -> Self {
        Self { client }
    }
}

impl Transport for StdioTransport {
    async fn run(&self) -> UpstashResult<()> {
        info!("Starting MCP server with stdio transport");

        let service = UpstashService::new(self.client.clone());
        let running_service = service.serve(stdio()).await.map_err(|e| {
            UpstashError::internal(format!("Failed to start stdio transport: {}", e))
        })?;

        tokio::select! {
            result = running_service.waiting() => {
                match result {
                    Ok(_) => info!("Stdio transport completed normally"),
                    Err(e) => {
                        warn!(error = %e, "Stdio transport error");
                        return Err(UpstashError::internal(format!(
                            "Stdio transport error: {}",
                            e
                        )));
                    }
                }
                Ok(())
            }
            _ = wait_for_signal() => {
                // A blocking stdin read cannot be interrupted, so exit directly.
                info!("Shutdown signal received, exiting");
                std::process::exit(0);
            }
        }
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use url::Url;

    #[test]
    fn test_stdio_transport_creation() {
        let config = ClientConfig::new(
            "dev@example.com",
            "key",
            Url::parse("https://api.upstash.com/").unwrap(),
        );
        let client = Arc::new(UpstashClient::new(config).unwrap());
        let transport = StdioTransport::new(client);
        assert_eq!(transport.name(), "stdio");
    }
}
