//! Outbound HTTP layer.
//!
//! Request signing, base URL handling and response decoding for the Upstash
//! management API and per-database REST endpoints.

pub mod upstash;

pub use upstash::UpstashClient;
