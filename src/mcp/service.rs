//! MCP service implementation using rmcp.
//!
//! This module defines the UpstashService struct with all Upstash tools
//! exposed via the MCP protocol using the rmcp framework's macros.
//! Arguments arrive as `Validated<T>`, so schema violations are rejected
//! before a handler runs.

use crate::client::UpstashClient;
use crate::models::Database;
use crate::tools::backup::{
    BackupIdInput, BackupToolHandler, CreateBackupInput, DailyBackupInput, ListBackupsInput,
    ListBackupsOutput,
};
use crate::tools::commands::{CommandToolHandler, RunCommandsInput, RunCommandsOutput};
use crate::tools::database::{
    CreateDatabaseInput, CreateDatabaseOutput, DatabaseDetailsOutput, DatabaseIdInput,
    DatabaseToolHandler, ListDatabasesOutput, ResetPasswordInput, UpdateRegionsInput,
};
use crate::tools::stats::{StatsToolHandler, UsageStatsInput};
use crate::tools::validate::Validated;
use rmcp::Json;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct UpstashService {
    /// Shared management API client
    client: Arc<UpstashClient>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl UpstashService {
    /// Create a new UpstashService instance.
    pub fn new(client: Arc<UpstashClient>) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    fn databases(&self) -> DatabaseToolHandler {
        DatabaseToolHandler::new(self.client.clone())
    }

    fn backups(&self) -> BackupToolHandler {
        BackupToolHandler::new(self.client.clone())
    }
}

fn text_result(message: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(message)])
}

#[tool_router]
impl UpstashService {
    #[tool(
        description = "Create a new Upstash Redis database.\nCall redis_database_list_databases first to avoid duplicate names.\nprimary_region cannot be changed later; read_regions adds read replicas.\nReturns the new database and a console URL. Do not show the database ID to the user unless they ask for it."
    )]
    async fn redis_database_create_new(
        &self,
        Parameters(Validated(input)): Parameters<Validated<CreateDatabaseInput>>,
    ) -> Result<Json<CreateDatabaseOutput>, McpError> {
        self.databases()
            .create(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Delete an Upstash Redis database. This cannot be undone.\nAlways confirm with the user before calling this tool."
    )]
    async fn redis_database_delete(
        &self,
        Parameters(Validated(input)): Parameters<Validated<DatabaseIdInput>>,
    ) -> Result<CallToolResult, McpError> {
        let message = self.databases().delete(input).await?;
        Ok(text_result(message))
    }

    #[tool(
        description = "List all Upstash Redis databases in the account.\nReturns names, regions, state, endpoint and credentials.\nDo not show database IDs or credentials to the user unless they ask for them."
    )]
    async fn redis_database_list_databases(&self) -> Result<Json<ListDatabasesOutput>, McpError> {
        self.databases()
            .list()
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Get full details of an Upstash Redis database, including usage limits (disk, memory, daily bandwidth, requests).\nDo not show the database ID to the user unless they ask for it."
    )]
    async fn redis_database_get_details(
        &self,
        Parameters(Validated(input)): Parameters<Validated<DatabaseIdInput>>,
    ) -> Result<Json<DatabaseDetailsOutput>, McpError> {
        self.databases()
            .get_details(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Update the read replica regions of an Upstash Redis database.\nThe given read_regions replace the current set entirely; include every region that should remain."
    )]
    async fn redis_database_update_regions(
        &self,
        Parameters(Validated(input)): Parameters<Validated<UpdateRegionsInput>>,
    ) -> Result<Json<Database>, McpError> {
        self.databases()
            .update_regions(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Reset the password and REST tokens of an Upstash Redis database.\nExisting credentials stop working immediately. Confirm with the user first."
    )]
    async fn redis_database_reset_password(
        &self,
        Parameters(Validated(input)): Parameters<Validated<ResetPasswordInput>>,
    ) -> Result<Json<Database>, McpError> {
        self.databases()
            .reset_password(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Get usage statistics of an Upstash Redis database over a period (1h, 3h, 12h, 1d, 3d, 7d).\nUse it to find peak usage or latency problems.\ntype selects one metric: read_latency_mean, write_latency_mean, keyspace, throughput (commands/sec), diskusage (bytes), dailyrequests, command_counts (per command).\nTime series come back as {start, end, data: [[epoch_ms, value]]}; the last value may be null while its bucket is in progress."
    )]
    async fn redis_database_get_usage_stats(
        &self,
        Parameters(Validated(input)): Parameters<Validated<UsageStatsInput>>,
    ) -> Result<CallToolResult, McpError> {
        let output = StatsToolHandler::new(self.client.clone())
            .get_usage_stats(input)
            .await?;
        Ok(CallToolResult::success(vec![Content::json(&output)?]))
    }

    #[tool(description = "List the backups of an Upstash Redis database.")]
    async fn redis_database_list_backups(
        &self,
        Parameters(Validated(input)): Parameters<Validated<ListBackupsInput>>,
    ) -> Result<Json<ListBackupsOutput>, McpError> {
        self.backups()
            .list_backups(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(description = "Create a backup of an Upstash Redis database.")]
    async fn redis_database_create_backup(
        &self,
        Parameters(Validated(input)): Parameters<Validated<CreateBackupInput>>,
    ) -> Result<CallToolResult, McpError> {
        let message = self.backups().create_backup(input).await?;
        Ok(text_result(message))
    }

    #[tool(
        description = "Delete a backup of an Upstash Redis database. Confirm with the user first."
    )]
    async fn redis_database_delete_backup(
        &self,
        Parameters(Validated(input)): Parameters<Validated<BackupIdInput>>,
    ) -> Result<CallToolResult, McpError> {
        let message = self.backups().delete_backup(input).await?;
        Ok(text_result(message))
    }

    #[tool(
        description = "Restore a backup into an Upstash Redis database.\nCurrent data is overwritten. Confirm with the user first."
    )]
    async fn redis_database_restore_backup(
        &self,
        Parameters(Validated(input)): Parameters<Validated<BackupIdInput>>,
    ) -> Result<CallToolResult, McpError> {
        let message = self.backups().restore_backup(input).await?;
        Ok(text_result(message))
    }

    #[tool(description = "Enable or disable daily backups of an Upstash Redis database.")]
    async fn redis_database_set_daily_backup(
        &self,
        Parameters(Validated(input)): Parameters<Validated<DailyBackupInput>>,
    ) -> Result<CallToolResult, McpError> {
        let message = self.backups().set_daily_backup(input).await?;
        Ok(text_result(message))
    }

    #[tool(
        description = "Run one or more Redis commands on an Upstash Redis database through its REST API.\nTake database_rest_url (https://<endpoint>) and database_rest_token from redis_database_get_details.\nCommands are sent as one pipeline; each result is {\"result\": ...} or {\"error\": ...}.\nAvoid commands that scan the whole keyspace (KEYS *) on large databases."
    )]
    async fn redis_database_run_redis_commands(
        &self,
        Parameters(Validated(input)): Parameters<Validated<RunCommandsInput>>,
    ) -> Result<Json<RunCommandsOutput>, McpError> {
        CommandToolHandler::new(self.client.clone())
            .run_commands(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }
}

#[tool_handler]
impl ServerHandler for UpstashService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "upstash-mcp-server".to_owned(),
                title: Some("Upstash MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Tools for managing Upstash Redis databases.\n\
                \n\
                ## Workflow\n\
                1. Call `redis_database_list_databases` to find databases and their IDs\n\
                2. Use the ID in `redis_database_get_details`, `redis_database_get_usage_stats`, etc.\n\
                3. To run Redis commands, take the endpoint and REST token from `redis_database_get_details`\n\
                \n\
                ## Regions\n\
                us-east-1, us-west-1, us-west-2, eu-west-1, eu-central-1, ap-southeast-1, ap-southeast-2, sa-east-1\n\
                \n\
                ## Notes\n\
                - Do not reveal database IDs, passwords or tokens unless the user asks\n\
                - Delete, reset_password and restore_backup are destructive: confirm first\n\
                - `redis_database_update_regions` replaces the read region set, it does not merge"
                    .to_string(),
            ),
        }
    }
}
