//! Usage statistics tool.
//!
//! This module implements the `get_usage_stats` MCP tool: one stats request,
//! then per-metric dispatch into the normalizer.

use crate::client::UpstashClient;
use crate::error::{UpstashError, UpstashResult};
use crate::models::{CommandCount, RawPoint, StatsPeriod, StatsType, UsageStatsOutput};
use crate::tools::usage::{normalize_command_counts, normalize_series};
use crate::tools::validate::{ValidateInput, require_id};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;
use tracing::{info, warn};

/// Input for the get_usage_stats tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UsageStatsInput {
    /// Database ID
    #[schemars(length(min = 1))]
    pub id: String,
    /// Time window: 1h, 3h, 12h, 1d, 3d or 7d
    pub period: StatsPeriod,
    /// Metric to return
    #[serde(rename = "type")]
    pub stats_type: StatsType,
}

impl ValidateInput for UsageStatsInput {
    fn validate(&self) -> UpstashResult<()> {
        require_id("id", &self.id)
    }
}

/// Pick the requested metric out of a stats payload and normalize it.
///
/// If the metric's field is not an array the whole payload is returned
/// unchanged.
pub fn select_usage(
    stats_type: StatsType,
    payload: Map<String, JsonValue>,
) -> UpstashResult<UsageStatsOutput> {
    let field = stats_type.field_name();
    let items = match payload.get(field) {
        Some(series @ JsonValue::Array(_)) => series.clone(),
        _ => {
            warn!(metric = field, "Metric is not a series, returning raw payload");
            return Ok(UsageStatsOutput::Raw(payload));
        }
    };

    let decode_error =
        |e: serde_json::Error| UpstashError::invalid_response(format!("malformed '{field}': {e}"));

    match stats_type {
        StatsType::CommandCounts => {
            let counts: Vec<CommandCount> = serde_json::from_value(items).map_err(decode_error)?;
            normalize_command_counts(&counts).map(UsageStatsOutput::Commands)
        }
        StatsType::ReadLatencyMean
        | StatsType::WriteLatencyMean
        | StatsType::Keyspace
        | StatsType::Throughput
        | StatsType::DiskUsage
        | StatsType::DailyRequests => {
            let points: Vec<RawPoint> = serde_json::from_value(items).map_err(decode_error)?;
            normalize_series(field, &points).map(UsageStatsOutput::Series)
        }
    }
}

/// Handler for the usage stats tool.
pub struct StatsToolHandler {
    client: Arc<UpstashClient>,
}

impl StatsToolHandler {
    pub fn new(client: Arc<UpstashClient>) -> Self {
        Self { client }
    }

    pub async fn get_usage_stats(&self, input: UsageStatsInput) -> UpstashResult<UsageStatsOutput> {
        let id = input.id.trim();
        info!(
            database_id = %id,
            period = %input.period,
            metric = %input.stats_type,
            "Fetching usage stats"
        );

        let payload: Map<String, JsonValue> = self
            .client
            .get_with_query(
                &["v2", "redis", "stats", id],
                &[("period", input.period.as_str())],
            )
            .await?;
        select_usage(input.stats_type, payload)
    }
}
