//! The chain data source interface.

use std::future::Future;
use std::sync::Arc;

use zinc_transaction::Utxo;

use crate::error::ChainError;
use crate::types::TxDetail;

/// Read and broadcast access to a chain.
///
/// Retry and fallback across providers are left to implementations or
/// callers; every method is a single attempt.
pub trait ChainSource: Send + Sync {
    /// Height of the current chain tip.
    fn current_height(&self) -> impl Future<Output = Result<u32, ChainError>> + Send;

    /// Display-order txids of the block at `height`, in block order.
    fn block_transaction_ids(
        &self,
        height: u32,
    ) -> impl Future<Output = Result<Vec<String>, ChainError>> + Send;

    /// Decoded detail of one transaction.
    fn transaction(&self, txid: &str) -> impl Future<Output = Result<TxDetail, ChainError>> + Send;

    /// Unspent outputs paying to `address`.
    fn utxos(&self, address: &str) -> impl Future<Output = Result<Vec<Utxo>, ChainError>> + Send;

    /// Submit a serialized transaction.
    ///
    /// # Returns
    /// The display-order txid the node accepted.
    fn broadcast(&self, raw_tx: &[u8]) -> impl Future<Output = Result<String, ChainError>> + Send;
}

impl<T: ChainSource> ChainSource for Arc<T> {
    fn current_height(&self) -> impl Future<Output = Result<u32, ChainError>> + Send {
        (**self).current_height()
    }

    fn block_transaction_ids(
        &self,
        height: u32,
    ) -> impl Future<Output = Result<Vec<String>, ChainError>> + Send {
        (**self).block_transaction_ids(height)
    }

    fn transaction(&self, txid: &str) -> impl Future<Output = Result<TxDetail, ChainError>> + Send {
        (**self).transaction(txid)
    }

    fn utxos(&self, address: &str) -> impl Future<Output = Result<Vec<Utxo>, ChainError>> + Send {
        (**self).utxos(address)
    }

    fn broadcast(&self, raw_tx: &[u8]) -> impl Future<Output = Result<String, ChainError>> + Send {
        (**self).broadcast(raw_tx)
    }
}
