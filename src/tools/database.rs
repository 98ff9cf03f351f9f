//! Database management tools.
//!
//! This module implements the create, delete, list, get_details,
//! update_regions and reset_password MCP tools.

use crate::client::UpstashClient;
use crate::error::{UpstashError, UpstashResult};
use crate::models::{Database, DatabaseSummary, Region};
use crate::tools::validate::{ValidateInput, require_id, require_non_blank};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Region value sent for multi-region databases.
const GLOBAL_REGION: &str = "global";

/// Input for the create tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateDatabaseInput {
    /// Name of the new database
    #[schemars(length(min = 1))]
    pub name: String,
    /// Primary (write) region. Cannot be changed after creation.
    pub primary_region: Region,
    /// Read replica regions. Optional.
    #[serde(default)]
    #[schemars(extend("uniqueItems" = true))]
    pub read_regions: Vec<Region>,
}

impl ValidateInput for CreateDatabaseInput {
    fn validate(&self) -> UpstashResult<()> {
        require_non_blank("name", &self.name)
    }
}

/// Request body for database creation.
#[derive(Debug, Serialize)]
struct CreateDatabaseBody<'a> {
    name: &'a str,
    region: &'static str,
    primary_region: Region,
    read_regions: &'a [Region],
}

/// Output from the create tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CreateDatabaseOutput {
    #[serde(flatten)]
    pub database: Database,
    /// Link to the database in the Upstash console
    pub console_url: String,
}

/// Input for the delete and get_details tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DatabaseIdInput {
    /// Database ID from redis_database_list_databases
    #[schemars(length(min = 1))]
    pub database_id: String,
}

impl ValidateInput for DatabaseIdInput {
    fn validate(&self) -> UpstashResult<()> {
        require_id("database_id", &self.database_id)
    }
}

/// Output from the list tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListDatabasesOutput {
    pub databases: Vec<DatabaseSummary>,
    pub count: usize,
}

/// Formatted resource limits of a database.
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
pub struct ResourceLimits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_threshold: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_threshold: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_bandwidth_limit: Option<String>,
    /// Requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_limit: Option<u64>,
}

impl From<&Database> for ResourceLimits {
    fn from(db: &Database) -> Self {
        Self {
            disk_threshold: db.db_disk_threshold.map(format_size),
            memory_threshold: db.db_memory_threshold.map(format_size),
            daily_bandwidth_limit: db.db_daily_bandwidth_limit.map(format_size),
            request_limit: db.db_request_limit,
        }
    }
}

/// Output from the get_details tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct DatabaseDetailsOutput {
    #[serde(flatten)]
    pub database: Database,
    /// Human-readable thresholds
    pub limits: ResourceLimits,
}

/// Input for the update_regions tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateRegionsInput {
    /// Database ID
    #[schemars(length(min = 1))]
    pub id: String,
    /// New read regions. Replaces the current set entirely.
    #[schemars(length(min = 1), extend("uniqueItems" = true))]
    pub read_regions: Vec<Region>,
}

impl ValidateInput for UpdateRegionsInput {
    fn validate(&self) -> UpstashResult<()> {
        require_id("id", &self.id)
    }
}

#[derive(Debug, Serialize)]
struct UpdateRegionsBody<'a> {
    read_regions: &'a [Region],
}

/// Input for the reset_password tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ResetPasswordInput {
    /// Database ID
    #[schemars(length(min = 1))]
    pub id: String,
}

impl ValidateInput for ResetPasswordInput {
    fn validate(&self) -> UpstashResult<()> {
        require_id("id", &self.id)
    }
}

/// Format bytes as human-readable size string.
///
/// Uses binary units (1 KB = 1024 bytes), via the `humansize` WINDOWS preset.
///
/// # Examples
///
/// ```
/// use upstash_mcp_server::tools::database::format_size;
///
/// assert_eq!(format_size(512), "512 B");
/// assert_eq!(format_size(1073741824), "1 GB");
/// ```
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::WINDOWS)
}

/// Handler for database management tools.
pub struct DatabaseToolHandler {
    client: Arc<UpstashClient>,
}

impl DatabaseToolHandler {
    pub fn new(client: Arc<UpstashClient>) -> Self {
        Self { client }
    }

    pub async fn create(&self, input: CreateDatabaseInput) -> UpstashResult<CreateDatabaseOutput> {
        info!(
            name = %input.name,
            primary_region = %input.primary_region,
            read_regions = input.read_regions.len(),
            "Creating database"
        );

        let body = CreateDatabaseBody {
            name: &input.name,
            region: GLOBAL_REGION,
            primary_region: input.primary_region,
            read_regions: &input.read_regions,
        };
        let database: Database = self
            .client
            .post(&["v2", "redis", "database"], &body)
            .await?;
        if database.database_id.is_empty() {
            return Err(UpstashError::invalid_response(
                "created database has no database_id",
            ));
        }

        let console_url = database.console_url();
        Ok(CreateDatabaseOutput {
            database,
            console_url,
        })
    }

    /// Delete a database and return a confirmation message.
    pub async fn delete(&self, input: DatabaseIdInput) -> UpstashResult<String> {
        let id = input.database_id.trim();
        info!(database_id = %id, "Deleting database");
        self.client.delete(&["v2", "redis", "database", id]).await?;
        Ok(format!("Database {} deleted successfully.", id))
    }

    pub async fn list(&self) -> UpstashResult<ListDatabasesOutput> {
        let databases: Vec<DatabaseSummary> = self.client.get(&["v2", "redis", "databases"]).await?;
        info!(count = databases.len(), "Listed databases");
        let count = databases.len();
        Ok(ListDatabasesOutput { databases, count })
    }

    pub async fn get_details(&self, input: DatabaseIdInput) -> UpstashResult<DatabaseDetailsOutput> {
        let id = input.database_id.trim();
        info!(database_id = %id, "Getting database details");
        let database: Database = self.client.get(&["v2", "redis", "database", id]).await?;
        let limits = ResourceLimits::from(&database);
        Ok(DatabaseDetailsOutput { database, limits })
    }

    /// Replace the read region set. The request carries the full new set, not a diff.
    pub async fn update_regions(&self, input: UpdateRegionsInput) -> UpstashResult<Database> {
        let id = input.id.trim();
        info!(database_id = %id, read_regions = ?input.read_regions, "Updating read regions");
        let body = UpdateRegionsBody {
            read_regions: &input.read_regions,
        };
        self.client
            .post(&["v2", "redis", "update-regions", id], &body)
            .await
    }

    pub async fn reset_password(&self, input: ResetPasswordInput) -> UpstashResult<Database> {
        let id = input.id.trim();
        info!(database_id = %id, "Resetting database password");
        self.client
            .post(
                &["v2", "redis", "reset-password", id],
                &serde_json::json!({}),
            )
            .await
    }
}
