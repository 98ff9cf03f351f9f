//! MCP tool implementations.
//!
//! This module contains all Upstash tool handlers:
//! - `database`: create, delete, list, get_details, update_regions, reset_password
//! - `stats`: usage statistics
//! - `backup`: list, create, delete, restore and daily backups
//! - `commands`: run Redis commands through a database's REST endpoint
//! - `usage`: usage series normalization
//! - `validate`: schema validation of tool arguments

pub mod backup;
pub mod commands;
pub mod database;
pub mod stats;
pub mod usage;
pub mod validate;

pub use backup::{
    BackupIdInput, BackupToolHandler, CreateBackupInput, DailyBackupInput, ListBackupsInput,
    ListBackupsOutput,
};
pub use commands::{CommandToolHandler, RunCommandsInput, RunCommandsOutput};
pub use database::{
    CreateDatabaseInput, CreateDatabaseOutput, DatabaseDetailsOutput, DatabaseIdInput,
    DatabaseToolHandler, ListDatabasesOutput, ResetPasswordInput, UpdateRegionsInput,
};
pub use stats::{StatsToolHandler, UsageStatsInput};
pub use validate::{Validated, ValidateInput};
