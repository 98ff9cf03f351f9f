//! Configuration handling for the Upstash MCP Server.
//!
//! This module provides configuration management via CLI arguments and environment variables.

use clap::{Parser, ValueEnum};
use std::time::Duration;
use url::Url;

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/";
pub const DEFAULT_API_URL: &str = "https://api.upstash.com/";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Base of the human-facing console link returned by database creation.
pub const CONSOLE_BASE_URL: &str = "https://console.upstash.com/redis";

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// HTTP with Server-Sent Events (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Settings needed to talk to the Upstash management API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Account email used as the basic auth user.
    pub email: String,
    /// Management API key (sensitive - not logged).
    pub api_key: String,
    pub base_url: Url,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(email: impl Into<String>, api_key: impl Into<String>, base_url: Url) -> Self {
        Self {
            email: email.into(),
            api_key: api_key.into(),
            base_url,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Configuration for the Upstash MCP Server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "upstash-mcp-server",
    about = "MCP server for Upstash Redis management - enables AI assistants to create, inspect and monitor databases",
    version,
    author
)]
pub struct Config {
    /// Upstash account email
    #[arg(long, env = "UPSTASH_EMAIL", default_value = "")]
    pub email: String,

    /// Upstash management API key
    #[arg(long = "api-key", env = "UPSTASH_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Base URL of the Upstash management API
    #[arg(long = "api-url", default_value = DEFAULT_API_URL, env = "UPSTASH_API_URL")]
    pub api_url: String,

    /// Timeout for each outbound request in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS,
        env = "MCP_REQUEST_TIMEOUT"
    )]
    pub request_timeout: u64,

    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_HTTP_HOST,
        env = "MCP_HTTP_HOST"
    )]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "MCP_HTTP_PORT"
    )]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "MCP_ENDPOINT"
    )]
    pub mcp_endpoint: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,

    /// Enable logging output (disabled by default to avoid interfering with stdio transport)
    #[arg(long, env = "MCP_ENABLE_LOGS")]
    pub enable_logs: bool,

    /// Authentication tokens for HTTP transport.
    /// Can be specified multiple times or as comma-separated values.
    /// When set, all HTTP requests must include a valid Bearer token.
    #[arg(
        long = "auth-token",
        value_name = "TOKEN",
        env = "MCP_AUTH_TOKENS",
        value_delimiter = ','
    )]
    pub auth_tokens: Vec<String>,
}

impl Config {
    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            email: String::new(),
            api_key: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            enable_logs: false,
            auth_tokens: Vec::new(),
        }
    }

    /// Build the API client settings, checking that credentials are present.
    pub fn client_config(&self) -> Result<ClientConfig, String> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err("Upstash email is required (--email or UPSTASH_EMAIL)".to_string());
        }
        let api_key = self.api_key.trim();
        if api_key.is_empty() {
            return Err("Upstash API key is required (--api-key or UPSTASH_API_KEY)".to_string());
        }
        let base_url = Url::parse(&self.api_url).map_err(|e| format!("Invalid API URL: {e}"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(format!(
                "Invalid API URL scheme '{}': expected http or https",
                base_url.scheme()
            ));
        }

        Ok(ClientConfig::new(email, api_key, base_url)
            .with_request_timeout(self.request_timeout_duration()))
    }

    /// Get the HTTP bind address.
    pub fn http_bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
