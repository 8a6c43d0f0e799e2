//! Custom error types for the MCP server.

use aurafit_client::CoachError;
use thiserror::Error;

use crate::state::OperationKind;

/// MCP server errors.
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Coach error: {0}")]
    Upstream(#[from] CoachError),

    #[error("{0} is already in progress")]
    Busy(OperationKind),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl McpError {
    /// Message shown to the user in place of a failed collaborator call.
    pub fn user_message(&self) -> String {
        match self {
            McpError::Upstream(CoachError::RateLimited(_)) => {
                "The coach is busy right now. Please try again in a moment.".to_string()
            }
            McpError::Upstream(CoachError::InvalidInput(msg)) | McpError::Validation(msg) => {
                msg.clone()
            }
            McpError::Upstream(_) => {
                "The coach could not process that request. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<McpError> for String {
    fn from(err: McpError) -> Self {
        err.to_string()
    }
}

/// Result type alias for MCP operations.
pub type McpResult<T> = Result<T, McpError>;
