//! Persistence for indexed state.
//!
//! Reads are point lookups. The only write is [`Store::commit_block`], which
//! applies a whole [`BlockBatch`] and advances the cursor atomically.

mod memory;
mod sqlite;

use std::sync::Arc;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::IndexerError;
use crate::types::{BalanceRecord, BlockBatch, Cursor, DeployRecord, InscriptionRecord};

/// Indexed state storage.
pub trait Store: Send + Sync {
    /// The scan cursor, if any block has been committed.
    fn cursor(&self) -> Result<Option<Cursor>, IndexerError>;

    /// Deployment by ticker.
    fn deploy(&self, ticker: &str) -> Result<Option<DeployRecord>, IndexerError>;

    /// Deployment by display-order deploy txid.
    fn deploy_by_txid(&self, txid: &str) -> Result<Option<DeployRecord>, IndexerError>;

    /// Total minted so far for `ticker`.
    fn minted(&self, ticker: &str) -> Result<u64, IndexerError>;

    /// Balance of `address` in `ticker`, zero when never touched.
    fn balance(&self, address: &str, ticker: &str) -> Result<i128, IndexerError>;

    /// All balances of `address`, ordered by ticker.
    fn balances_of(&self, address: &str) -> Result<Vec<BalanceRecord>, IndexerError>;

    /// Inscription recorded for `txid`.
    fn inscription(&self, txid: &str) -> Result<Option<InscriptionRecord>, IndexerError>;

    /// Apply a block's effects and its cursor in one atomic step.
    ///
    /// # Returns
    /// `Storage` if the cursor would not move forward; nothing is written
    /// in that case.
    fn commit_block(&self, batch: &BlockBatch) -> Result<(), IndexerError>;
}

impl<T: Store + ?Sized> Store for Arc<T> {
    fn cursor(&self) -> Result<Option<Cursor>, IndexerError> {
        (**self).cursor()
    }

    fn deploy(&self, ticker: &str) -> Result<Option<DeployRecord>, IndexerError> {
        (**self).deploy(ticker)
    }

    fn deploy_by_txid(&self, txid: &str) -> Result<Option<DeployRecord>, IndexerError> {
        (**self).deploy_by_txid(txid)
    }

    fn minted(&self, ticker: &str) -> Result<u64, IndexerError> {
        (**self).minted(ticker)
    }

    fn balance(&self, address: &str, ticker: &str) -> Result<i128, IndexerError> {
        (**self).balance(address, ticker)
    }

    fn balances_of(&self, address: &str) -> Result<Vec<BalanceRecord>, IndexerError> {
        (**self).balances_of(address)
    }

    fn inscription(&self, txid: &str) -> Result<Option<InscriptionRecord>, IndexerError> {
        (**self).inscription(txid)
    }

    fn commit_block(&self, batch: &BlockBatch) -> Result<(), IndexerError> {
        (**self).commit_block(batch)
    }
}

/// Reject a batch whose cursor does not advance past `current`.
pub(crate) fn check_cursor(current: Option<Cursor>, batch: &BlockBatch) -> Result<(), IndexerError> {
    if batch.cursor.last_scanned_block != batch.height {
        return Err(IndexerError::Storage(format!(
            "batch for block {} carries cursor {}",
            batch.height, batch.cursor.last_scanned_block
        )));
    }
    match current {
        Some(c) if c.last_scanned_block >= batch.height => Err(IndexerError::Storage(format!(
            "block {} is not past cursor {}",
            batch.height, c.last_scanned_block
        ))),
        _ => Ok(()),
    }
}
