//! Data models for the Upstash MCP Server.
//!
//! This module re-exports all model types used throughout the application.

pub mod database;
pub mod stats;

// Re-export commonly used types
pub use database::{Backup, Database, DatabaseSummary, Region};
pub use stats::{
    CommandCount, CommandSeries, NormalizedSeries, RawPoint, RawTimestamp, StatsPeriod, StatsType,
    UsageStatsOutput,
};
