//! Error types for the Upstash MCP Server.
//!
//! This module defines all error types using `thiserror` for ergonomic error handling.
//! Each error variant provides actionable messages to help AI assistants understand
//! and recover from error conditions.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpstashError {
    #[error("Invalid input: {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("Upstash API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {message}")]
    Transport { message: String, suggestion: String },

    #[error("Invalid response from Upstash: {message}")]
    InvalidResponse { message: String },

    #[error("Empty usage series for metric '{metric}'")]
    EmptySeries { metric: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl UpstashError {
    /// Create an invalid input error for a specific argument.
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a provider error from a non-success response.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a transport error with a helpful suggestion.
    pub fn transport(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Create an empty series error.
    pub fn empty_series(metric: impl Into<String>) -> Self {
        Self::EmptySeries {
            metric: metric.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Transport { suggestion, .. } => Some(suggestion),
            Self::Api { status: 401, .. } | Self::Api { status: 403, .. } => {
                Some("Check the configured Upstash email and API key")
            }
            Self::Api { status: 404, .. } => {
                Some("Call redis_database_list_databases to get valid database IDs")
            }
            _ => None,
        }
    }

    /// Name of the offending argument for validation errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Convert reqwest errors to UpstashError.
impl From<reqwest::Error> for UpstashError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstashError::transport(
                format!("Request timed out: {}", err),
                "Retry later or increase --request-timeout",
            )
        } else if err.is_connect() {
            UpstashError::transport(
                format!("Connection failed: {}", err),
                "Check network connectivity and the configured API URL",
            )
        } else if err.is_decode() {
            UpstashError::invalid_response(format!("Failed to decode response body: {}", err))
        } else if let Some(status) = err.status() {
            UpstashError::api(status.as_u16(), err.to_string())
        } else {
            UpstashError::transport(err.to_string(), "Check network connectivity")
        }
    }
}

/// Result type alias for Upstash operations.
pub type UpstashResult<T> = Result<T, UpstashError>;

/// Build suggestion data as JSON value.
fn suggestion_data(suggestion: Option<&str>) -> Option<serde_json::Value> {
    suggestion.map(|s| serde_json::json!({ "suggestion": s }))
}

/// Convert UpstashError to MCP ErrorData for semantic error categorization.
/// Includes the suggestion field in the `data` object when available.
impl From<UpstashError> for rmcp::ErrorData {
    fn from(err: UpstashError) -> Self {
        let data = suggestion_data(err.suggestion());
        match &err {
            UpstashError::InvalidInput { field, .. } => rmcp::ErrorData::invalid_params(
                err.to_string(),
                Some(serde_json::json!({ "field": field })),
            ),

            UpstashError::Api { status: 404, .. } => {
                rmcp::ErrorData::resource_not_found(err.to_string(), data)
            }
            UpstashError::Api { status, .. } if (400..500).contains(status) => {
                rmcp::ErrorData::invalid_params(err.to_string(), data)
            }

            UpstashError::Api { .. }
            | UpstashError::Transport { .. }
            | UpstashError::InvalidResponse { .. }
            | UpstashError::EmptySeries { .. }
            | UpstashError::Internal { .. } => rmcp::ErrorData::internal_error(err.to_string(), data),
        }
    }
}
