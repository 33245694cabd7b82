/// Error types for wallet operations.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("primitives error: {0}")]
    Primitives(#[from] zinc_primitives::PrimitivesError),
    #[error("script error: {0}")]
    Script(#[from] zinc_script::ScriptError),
    #[error("transaction error: {0}")]
    Transaction(#[from] zinc_transaction::TransactionError),
    #[error("inscription error: {0}")]
    Inscription(#[from] zinc_inscription::InscriptionError),
    #[error("chain error: {0}")]
    Chain(#[from] zinc_chain::ChainError),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
