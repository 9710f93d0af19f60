//! Error types for control service operations

use thiserror::Error;

/// Result type alias for control service operations
pub type Result<T> = std::result::Result<T, McpClientError>;

/// Errors that can occur while talking to the control service
///
/// The display strings are shown to the user verbatim.
#[derive(Error, Debug)]
pub enum McpClientError {
    /// No endpoint was discovered for the current project
    #[error("MCP client not configured. Is the MCP HTTP server running?")]
    NotConfigured,

    /// Connection, timeout or other transport failure
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP {status}: {reason}")]
    Server { status: u16, reason: String },

    /// Success status but the reply could not be unwrapped
    #[error("Unexpected MCP response format")]
    MalformedResponse,

    /// The service processed the call and reported failure
    #[error("{0}")]
    RemoteRejected(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl McpClientError {
    /// Create a server error from a status code
    pub fn server_error(status: reqwest::StatusCode) -> Self {
        Self::Server {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}
