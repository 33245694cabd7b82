/// Zinc SDK - Transparent transaction building, signing, and serialization.
///
/// Provides the Transaction type with its two wire layouts (v4 Sapling and
/// v5 NU5), the matching signature digests, the P2PKH signer, the action fee
/// model, greedy UTXO selection and the builder that orders inscription
/// carrier, tip, payment, recipient and change outputs.

pub mod transaction;
pub mod input;
pub mod output;
pub mod utxo;
pub mod wire;
pub mod sighash;
pub mod template;
pub mod fee;
pub mod selector;
pub mod builder;

mod error;
pub use error::TransactionError;
pub use transaction::Transaction;
pub use input::TransactionInput;
pub use output::TransactionOutput;
pub use utxo::Utxo;
pub use wire::TxVersion;
pub use fee::FeeModel;
pub use selector::{select_utxos, Selection};
pub use builder::{BuiltTransaction, TransactionBuilder};
