//! Error types for chain data access.

/// Errors that can occur when talking to a chain data source.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Failed to serialize or deserialize data.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Resource not found (404 or unknown to the source).
    #[error("not found: {0}")]
    NotFound(String),

    /// Server returned a non-2xx response.
    #[error("server error ({status_code}): {message}")]
    Server {
        /// HTTP status code.
        status_code: u16,
        /// Error message from server.
        message: String,
    },

    /// The node refused the transaction.
    #[error("broadcast rejected: {0}")]
    Broadcast(String),

    /// The response parsed but did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ChainError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChainError::Timeout
        } else {
            ChainError::Http(err)
        }
    }
}
