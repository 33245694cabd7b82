//! Inscription error types.

use zinc_script::ScriptError;

/// Errors raised while encoding or decoding inscriptions.
#[derive(Debug, thiserror::Error)]
pub enum InscriptionError {
    /// A value violates the protocol's field rules. Raised before any
    /// bytes are produced.
    #[error("validation error: {0}")]
    Validation(String),

    /// A marker was present but the data behind it is malformed.
    #[error("decode error: {0}")]
    Decode(String),

    /// Script error.
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// JSON serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
