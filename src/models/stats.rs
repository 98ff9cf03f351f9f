//! Usage statistics data models.
//!
//! Raw series as sent by the provider, and the normalized shapes returned by
//! the usage stats tool.

use crate::error::{UpstashError, UpstashResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as JsonValue};
use std::fmt;

/// Time window for usage statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum StatsPeriod {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "3h")]
    ThreeHours,
    #[serde(rename = "12h")]
    TwelveHours,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "3d")]
    ThreeDays,
    #[serde(rename = "7d")]
    SevenDays,
}

impl StatsPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneHour => "1h",
            Self::ThreeHours => "3h",
            Self::TwelveHours => "12h",
            Self::OneDay => "1d",
            Self::ThreeDays => "3d",
            Self::SevenDays => "7d",
        }
    }
}

impl fmt::Display for StatsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metric selected from the stats response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatsType {
    /// Mean read latency
    ReadLatencyMean,
    /// Mean write latency
    WriteLatencyMean,
    /// Number of keys
    Keyspace,
    /// Commands per second
    Throughput,
    /// Disk usage in bytes
    #[serde(rename = "diskusage")]
    DiskUsage,
    /// Requests per day
    #[serde(rename = "dailyrequests")]
    DailyRequests,
    /// Per-command request counts
    CommandCounts,
}

impl StatsType {
    /// Key of this metric in the provider's stats payload.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::ReadLatencyMean => "read_latency_mean",
            Self::WriteLatencyMean => "write_latency_mean",
            Self::Keyspace => "keyspace",
            Self::Throughput => "throughput",
            Self::DiskUsage => "diskusage",
            Self::DailyRequests => "dailyrequests",
            Self::CommandCounts => "command_counts",
        }
    }
}

impl fmt::Display for StatsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Timestamp of a raw data point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Millis(i64),
    Float(f64),
    Text(String),
}

impl RawTimestamp {
    /// Convert to milliseconds since the Unix epoch.
    ///
    /// Numbers are taken as epoch milliseconds. Strings may be RFC 3339,
    /// the Upstash form `2024-06-03 13:40:00.000 +0000 UTC`, a naive UTC
    /// date-time, a plain date, or a numeric string.
    pub fn to_epoch_millis(&self) -> UpstashResult<i64> {
        match self {
            Self::Millis(ms) => Ok(*ms),
            Self::Float(ms) if ms.is_finite() => Ok(ms.round() as i64),
            Self::Float(ms) => Err(UpstashError::invalid_response(format!(
                "non-finite timestamp {ms}"
            ))),
            Self::Text(s) => parse_timestamp_text(s).ok_or_else(|| {
                UpstashError::invalid_response(format!("unrecognized timestamp '{s}'"))
            }),
        }
    }
}

fn parse_timestamp_text(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(ms) = s.parse::<i64>() {
        return Some(ms);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    let without_zone_name = s.strip_suffix(" UTC").unwrap_or(s);
    if let Ok(dt) = DateTime::parse_from_str(without_zone_name, "%Y-%m-%d %H:%M:%S%.f %z") {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(without_zone_name, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// One `{x, y}` sample. `y` is null for an in-progress bucket.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPoint {
    pub x: RawTimestamp,
    #[serde(default)]
    pub y: Option<Number>,
}

/// Per-command raw series from the `command_counts` field.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandCount {
    #[serde(alias = "command")]
    pub metric_identifier: String,
    #[serde(default)]
    pub data_points: Vec<RawPoint>,
}

/// Normalized series: explicit bounds and epoch-ms timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSeries {
    pub start: i64,
    /// None only for a single point whose value is still null.
    pub end: Option<i64>,
    pub data: Vec<(i64, Option<Number>)>,
}

/// Normalized series labelled with its command name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandSeries {
    pub command: String,
    #[serde(flatten)]
    pub series: NormalizedSeries,
}

/// Result of the usage stats tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UsageStatsOutput {
    Series(NormalizedSeries),
    Commands(Vec<CommandSeries>),
    /// Provider payload returned as-is when the metric is not a series.
    Raw(Map<String, JsonValue>),
}
