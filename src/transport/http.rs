//! Streamable HTTP transport for the MCP server.
//!
//! Every MCP session gets its own `UpstashService`, all sharing one API
//! client. When auth tokens are configured the whole router sits behind
//! the bearer token middleware.

use crate::auth::{AuthConfig, auth_middleware};
use crate::client::UpstashClient;
use crate::error::{UpstashError, UpstashResult};
use crate::mcp::UpstashService;
use crate::transport::{Transport, wait_for_signal};
use axum::Router;
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Time allowed for open SSE streams to finish after a shutdown signal.
const GRACEFUL_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport implementation with Streamable HTTP support.
pub struct HttpTransport {
    client: Arc<UpstashClient>,
    auth: Arc<AuthConfig>,
    host: String,
    port: u16,
    /// MCP endpoint path
    endpoint: String,
}

impl HttpTransport {
    pub fn new(
        client: Arc<UpstashClient>,
        auth: AuthConfig,
        host: impl Into<String>,
        port: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth: Arc::new(auth),
            host: host.into(),
            port,
            endpoint: endpoint.into(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the axum router serving MCP at the configured endpoint.
    pub fn router(&self) -> Router {
        let client = self.client.clone();
        let service = StreamableHttpService::new(
            move || Ok(UpstashService::new(client.clone())),
            LocalSessionManager::default().into(),
            Default::default(),
        );

        // nest_service does not accept "/", the fallback covers it
        let router = if self.endpoint == "/" {
            Router::new().fallback_service(service)
        } else {
            Router::new().nest_service(&self.endpoint, service)
        };

        if self.auth.is_enabled() {
            router.layer(axum::middleware::from_fn_with_state(
                self.auth.clone(),
                auth_middleware,
            ))
        } else {
            router
        }
    }
}

impl Transport for HttpTransport {
    async fn run(&self) -> UpstashResult<()> {
        let bind_addr = self.bind_addr();
        info!("Starting MCP server with HTTP transport on {}", bind_addr);

        if self.auth.is_enabled() {
            info!(tokens = self.auth.token_count(), "Bearer token authentication enabled");
        } else {
            warn!("No auth tokens configured, HTTP endpoint is unauthenticated");
        }

        let app = self.router();

        let listener = TcpListener::bind(&bind_addr).await.map_err(|e| {
            UpstashError::transport(
                format!("Failed to bind to {}: {}", bind_addr, e),
                "Check that the port is available",
            )
        })?;

        info!(endpoint = %self.endpoint, "MCP endpoint ready");

        let shutdown_notify = Arc::new(tokio::sync::Notify::new());
        let notify = shutdown_notify.clone();
        let shutdown_signal = async move {
            wait_for_signal().await;
            notify.notify_one();
        };

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal);

        // SSE streams can hold the server open, so bound the drain time
        tokio::select! {
            result = server => {
                if let Err(e) = result {
                    error!(error = %e, "HTTP server error");
                    return Err(UpstashError::internal(format!("HTTP server error: {}", e)));
                }
                info!("HTTP server stopped");
            }
            _ = async {
                shutdown_notify.notified().await;
                info!(
                    timeout_secs = GRACEFUL_TIMEOUT.as_secs(),
                    "Waiting for connections to close (send signal again to force exit)..."
                );
                tokio::select! {
                    _ = tokio::time::sleep(GRACEFUL_TIMEOUT) => {
                        warn!("Graceful shutdown timeout, forcing exit");
                    }
                    _ = wait_for_signal() => {
                        warn!("Received second signal, forcing immediate exit");
                    }
                }
            } => {}
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
