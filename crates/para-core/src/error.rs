//! Common error types for element and path resolution

use thiserror::Error;

/// Result type for core operations
pub type ParaResult<T> = Result<T, ParaError>;

/// Errors raised while resolving names against the element model
#[derive(Debug, Error)]
pub enum ParaError {
    /// A datapoint element path could not be parsed
    #[error("Invalid element path: {0}")]
    InvalidPath(String),

    /// Datapoint not found
    #[error("Datapoint not found: {0}")]
    DatapointNotFound(String),

    /// Datapoint type not found
    #[error("Datapoint type not found: {0}")]
    TypeNotFound(String),

    /// Element not found below a datapoint or type
    #[error("Element not found: {path} (in {owner})")]
    ElementNotFound {
        /// Datapoint or type name the path was resolved against
        owner: String,
        /// Element path that did not match
        path: String,
    },
}
