//! Error types for the indexer.

use std::time::Duration;

use zinc_chain::ChainError;

/// Errors that can occur while indexing or querying indexed state.
#[derive(Debug, thiserror::Error)]
pub enum IndexerError {
    /// A chain source call failed.
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    /// A chain source call did not finish in time.
    #[error("chain call timed out after {0:?}")]
    Timeout(Duration),

    /// The store refused an operation.
    #[error("storage error: {0}")]
    Storage(String),

    /// SQLite failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to serialize or deserialize stored JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to read a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The scan was cancelled before the block was committed.
    #[error("cancelled")]
    Cancelled,
}
