/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The transaction structure is invalid (e.g. missing inputs or outputs).
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    /// Signing failed or a produced signature did not verify.
    #[error("signing error: {0}")]
    SigningError(String),
    /// An error occurred during binary/hex serialization or deserialization.
    #[error("serialization error: {0}")]
    SerializationError(String),
    /// The header or version group id is not one of the supported layouts.
    #[error("unsupported transaction version: header {header:#010x}, group {group_id:#010x}")]
    UnsupportedVersion {
        /// The 4-byte header as read.
        header: u32,
        /// The version group id as read.
        group_id: u32,
    },
    /// The candidate UTXOs cannot cover outputs plus fee with valid change.
    #[error("insufficient funds: need {needed} zatoshi, have {available}")]
    InsufficientFunds {
        /// Outputs plus fee at the last attempt.
        needed: u64,
        /// Sum of all usable candidates.
        available: u64,
    },
    /// An underlying script error (forwarded from `zinc-script`).
    #[error("script error: {0}")]
    Script(#[from] zinc_script::ScriptError),
    /// An underlying primitives error (forwarded from `zinc-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] zinc_primitives::PrimitivesError),
}
