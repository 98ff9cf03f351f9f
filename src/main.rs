//! Upstash MCP Server - Main entry point.
//!
//! This server provides MCP (Model Context Protocol) tools for AI assistants
//! to manage Upstash Redis databases.

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use upstash_mcp_server::auth::AuthConfig;
use upstash_mcp_server::client::UpstashClient;
use upstash_mcp_server::config::{Config, TransportMode};
use upstash_mcp_server::transport::{HttpTransport, StdioTransport, Transport};

/// Initialize the tracing subscriber. Logs go to stderr, stdout belongs to stdio MCP.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn print_usage(problem: &str) {
    eprintln!("Error: {problem}");
    eprintln!();
    eprintln!("Usage: upstash-mcp-server --email <email> --api-key <api_key>");
    eprintln!("       UPSTASH_EMAIL=<email> UPSTASH_API_KEY=<api_key> upstash-mcp-server");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  upstash-mcp-server --email dev@example.com --api-key 0000-aaaa");
    eprintln!("  upstash-mcp-server --transport http --http-port 3000 --auth-token s3cret");
    eprintln!();
    eprintln!("Create an API key at https://console.upstash.com/account/api");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    if config.enable_logs {
        init_tracing(&config);
    }

    let client_config = match config.client_config() {
        Ok(client_config) => client_config,
        Err(problem) => {
            print_usage(&problem);
            std::process::exit(1);
        }
    };

    let auth = match AuthConfig::from_tokens(&config.auth_tokens) {
        Ok(auth) => auth,
        Err(problem) => {
            print_usage(&problem);
            std::process::exit(1);
        }
    };

    info!(
        transport = %config.transport,
        api_url = %client_config.base_url,
        "Starting Upstash MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let client = Arc::new(UpstashClient::new(client_config)?);

    let result = match config.transport {
        TransportMode::Stdio => {
            let transport = StdioTransport::new(client);
            info!(transport = transport.name(), "Using stdio transport");
            transport.run().await
        }
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                client,
                auth,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
