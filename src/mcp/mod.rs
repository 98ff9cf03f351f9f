//! MCP server integration module.
//!
//! Binds the Upstash tool handlers to the MCP protocol through rmcp.

pub mod service;

pub use service::UpstashService;
