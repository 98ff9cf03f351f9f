//! Upstash MCP Server Library
//!
//! This library provides MCP (Model Context Protocol) tools for AI assistants
//! to manage Upstash Redis databases: lifecycle, regions, credentials,
//! backups, commands and normalized usage statistics.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use client::UpstashClient;
pub use config::Config;
pub use error::{UpstashError, UpstashResult};
pub use mcp::UpstashService;
