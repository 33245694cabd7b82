//! Unspent transparent outputs as seen by coin selection.

use serde::{Deserialize, Serialize};
use zinc_primitives::chainhash::Hash;
use zinc_script::Script;

/// An unspent output owned by the wallet.
///
/// Immutable once observed. The builder spends each selected UTXO exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    /// Txid of the transaction holding the output.
    pub txid: Hash,
    /// Output index (vout).
    pub output_index: u32,
    /// Locking script of the output.
    pub script: Script,
    /// Value in zatoshi.
    pub value: u64,
    /// Confirmations at the time of the query. Zero for mempool outputs.
    #[serde(default)]
    pub confirmations: u32,
}

impl Utxo {
    /// Create a UTXO record.
    pub fn new(txid: Hash, output_index: u32, script: Script, value: u64, confirmations: u32) -> Self {
        Utxo {
            txid,
            output_index,
            script,
            value,
            confirmations,
        }
    }
}
