//! Error types for catalog operations

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for catalog operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while opening or reading the stores
#[derive(Error, Debug)]
pub enum StoreError {
    /// A lookup was issued while no project is open
    #[error("No WinCC OA project is open")]
    NotOpen,

    /// A store file could not be opened
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query or row decoding failed
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
