//! Custom error types for the MCP server.

use thiserror::Error;

/// MCP server errors.
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Provider error: {0}")]
    Provider(#[from] health_connect_client::HealthDataError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<McpError> for String {
    fn from(err: McpError) -> Self {
        err.to_string()
    }
}

/// Result type alias for MCP operations.
pub type McpResult<T> = Result<T, McpError>;
