//! Database-related data models.
//!
//! This module defines the Upstash Redis database record, the region enumeration
//! accepted by the tools, and the reduced summary returned by the list tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::str::FromStr;

/// Deployment regions accepted for primary and read replica placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Region {
    #[serde(rename = "us-east-1")]
    UsEast1,
    #[serde(rename = "us-west-1")]
    UsWest1,
    #[serde(rename = "us-west-2")]
    UsWest2,
    #[serde(rename = "eu-west-1")]
    EuWest1,
    #[serde(rename = "eu-central-1")]
    EuCentral1,
    #[serde(rename = "ap-southeast-1")]
    ApSoutheast1,
    #[serde(rename = "ap-southeast-2")]
    ApSoutheast2,
    #[serde(rename = "sa-east-1")]
    SaEast1,
}

impl Region {
    pub const ALL: [Region; 8] = [
        Region::UsEast1,
        Region::UsWest1,
        Region::UsWest2,
        Region::EuWest1,
        Region::EuCentral1,
        Region::ApSoutheast1,
        Region::ApSoutheast2,
        Region::SaEast1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::UsEast1 => "us-east-1",
            Region::UsWest1 => "us-west-1",
            Region::UsWest2 => "us-west-2",
            Region::EuWest1 => "eu-west-1",
            Region::EuCentral1 => "eu-central-1",
            Region::ApSoutheast1 => "ap-southeast-1",
            Region::ApSoutheast2 => "ap-southeast-2",
            Region::SaEast1 => "sa-east-1",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Region::ALL.iter().map(Region::as_str).collect();
                format!("unknown region '{}', expected one of: {}", s, valid.join(", "))
            })
    }
}

/// A managed Redis database as returned by the Upstash API.
///
/// Known attributes are typed; anything else the provider sends is kept in
/// `extra` so the full record reaches the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Database {
    pub database_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_type: Option<String>,
    /// "global" for multi-region databases
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_regions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Unix timestamp (seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only_rest_token: Option<String>,
    /// Bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_disk_threshold: Option<u64>,
    /// Bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_memory_threshold: Option<u64>,
    /// Bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_daily_bandwidth_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_request_limit: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Database {
    /// Human-facing console link for this database.
    pub fn console_url(&self) -> String {
        format!("{}/{}", crate::config::CONSOLE_BASE_URL, self.database_id)
    }
}

/// Reduced view of a database used by the list tool.
///
/// Deserializing a provider record into this type drops every field that is
/// not declared here. Values are passed through untyped: the provider is not
/// consistent about types (ACL flags arrive as `"false"`), and one odd value
/// must not fail the whole listing. The field set is a stable contract: see
/// [`DatabaseSummary::FIELDS`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DatabaseSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_type: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<JsonValue>,
    /// Plan type ("free", "payg", ...)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub plan_type: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_region: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_regions: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_token: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only_rest_token: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_acl_enabled: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_acl_default_user_status: Option<JsonValue>,
}

impl DatabaseSummary {
    /// Every field a summary may serialize. Adding or removing one is a breaking change.
    pub const FIELDS: &'static [&'static str] = &[
        "database_id",
        "database_name",
        "database_type",
        "region",
        "type",
        "primary_region",
        "read_regions",
        "port",
        "creation_time",
        "budget",
        "state",
        "password",
        "user_email",
        "endpoint",
        "tls",
        "rest_token",
        "read_only_rest_token",
        "db_acl_enabled",
        "db_acl_default_user_status",
    ];
}

/// A database backup as returned by the Upstash API.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Backup {
    pub backup_id: String,
    #[serde(default, alias = "backup_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}
