//! Backup management tools.
//!
//! This module implements the list, create, delete, restore and daily backup
//! MCP tools. Each call maps to a single management API request.

use crate::client::UpstashClient;
use crate::error::UpstashResult;
use crate::models::Backup;
use crate::tools::validate::{ValidateInput, require_id, require_non_blank};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Input for the list_backups tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListBackupsInput {
    /// Database ID
    #[schemars(length(min = 1))]
    pub database_id: String,
}

impl ValidateInput for ListBackupsInput {
    fn validate(&self) -> UpstashResult<()> {
        require_id("database_id", &self.database_id)
    }
}

/// Output from the list_backups tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListBackupsOutput {
    pub backups: Vec<Backup>,
    pub count: usize,
}

/// Input for the create_backup tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateBackupInput {
    /// Database ID
    #[schemars(length(min = 1))]
    pub database_id: String,
    /// Name for the new backup
    #[schemars(length(min = 1))]
    pub backup_name: String,
}

impl ValidateInput for CreateBackupInput {
    fn validate(&self) -> UpstashResult<()> {
        require_id("database_id", &self.database_id)?;
        require_non_blank("backup_name", &self.backup_name)
    }
}

/// Input for the delete_backup and restore_backup tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BackupIdInput {
    /// Database ID
    #[schemars(length(min = 1))]
    pub database_id: String,
    /// Backup ID from redis_database_list_backups
    #[schemars(length(min = 1))]
    pub backup_id: String,
}

impl ValidateInput for BackupIdInput {
    fn validate(&self) -> UpstashResult<()> {
        require_id("database_id", &self.database_id)?;
        require_id("backup_id", &self.backup_id)
    }
}

/// Input for the set_daily_backup tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DailyBackupInput {
    /// Database ID
    #[schemars(length(min = 1))]
    pub database_id: String,
    /// true to enable daily backups, false to disable them
    pub enable: bool,
}

impl ValidateInput for DailyBackupInput {
    fn validate(&self) -> UpstashResult<()> {
        require_id("database_id", &self.database_id)
    }
}

#[derive(Debug, Serialize)]
struct CreateBackupBody<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct RestoreBackupBody<'a> {
    backup_id: &'a str,
}

/// Handler for backup tools.
pub struct BackupToolHandler {
    client: Arc<UpstashClient>,
}

impl BackupToolHandler {
    pub fn new(client: Arc<UpstashClient>) -> Self {
        Self { client }
    }

    pub async fn list_backups(&self, input: ListBackupsInput) -> UpstashResult<ListBackupsOutput> {
        let id = input.database_id.trim();
        let backups: Vec<Backup> = self.client.get(&["v2", "redis", "list-backup", id]).await?;
        info!(database_id = %id, count = backups.len(), "Listed backups");
        let count = backups.len();
        Ok(ListBackupsOutput { backups, count })
    }

    pub async fn create_backup(&self, input: CreateBackupInput) -> UpstashResult<String> {
        let id = input.database_id.trim();
        info!(database_id = %id, backup_name = %input.backup_name, "Creating backup");
        let body = CreateBackupBody {
            name: &input.backup_name,
        };
        self.client
            .post_text(&["v2", "redis", "create-backup", id], &body)
            .await?;
        Ok(format!(
            "Backup '{}' creation started for database {}.",
            input.backup_name, id
        ))
    }

    pub async fn delete_backup(&self, input: BackupIdInput) -> UpstashResult<String> {
        let id = input.database_id.trim();
        let backup_id = input.backup_id.trim();
        info!(database_id = %id, backup_id = %backup_id, "Deleting backup");
        self.client
            .delete(&["v2", "redis", "delete-backup", id, backup_id])
            .await?;
        Ok(format!("Backup {} deleted successfully.", backup_id))
    }

    pub async fn restore_backup(&self, input: BackupIdInput) -> UpstashResult<String> {
        let id = input.database_id.trim();
        let backup_id = input.backup_id.trim();
        info!(database_id = %id, backup_id = %backup_id, "Restoring backup");
        let body = RestoreBackupBody { backup_id };
        self.client
            .post_text(&["v2", "redis", "restore-backup", id], &body)
            .await?;
        Ok(format!("Backup {} restored to database {}.", backup_id, id))
    }

    pub async fn set_daily_backup(&self, input: DailyBackupInput) -> UpstashResult<String> {
        let id = input.database_id.trim();
        let action = if input.enable {
            "enable-dailybackup"
        } else {
            "disable-dailybackup"
        };
        info!(database_id = %id, enable = input.enable, "Updating daily backup");
        self.client.patch_text(&["v2", "redis", action, id]).await?;
        Ok(format!(
            "Daily backup {} for database {}.",
            if input.enable { "enabled" } else { "disabled" },
            id
        ))
    }
}
