//! In-process chain source.
//!
//! Holds blocks, transaction detail and UTXOs in memory. Broadcast parses the
//! raw bytes, records them and returns the locally computed txid. Used by the
//! indexer and wallet test suites and for replaying captured chain data.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use zinc_transaction::{Transaction, Utxo};

use crate::error::ChainError;
use crate::source::ChainSource;
use crate::types::TxDetail;

#[derive(Debug, Default)]
struct State {
    blocks: BTreeMap<u32, Vec<String>>,
    transactions: HashMap<String, TxDetail>,
    utxos: HashMap<String, Vec<Utxo>>,
    broadcasts: Vec<Transaction>,
    failing: HashSet<String>,
    calls: usize,
}

/// A [`ChainSource`] backed by in-memory maps.
#[derive(Debug, Default)]
pub struct MemoryChain {
    state: Mutex<State>,
}

impl MemoryChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a block holding `txs` at `height`, replacing any previous block there.
    pub fn add_block(&self, height: u32, txs: Vec<TxDetail>) {
        let mut state = self.lock();
        let ids = txs.iter().map(|t| t.txid.clone()).collect();
        for mut tx in txs {
            tx.block_height = Some(height);
            state.transactions.insert(tx.txid.clone(), tx);
        }
        state.blocks.insert(height, ids);
    }

    /// Register an unspent output for `address`.
    pub fn add_utxo(&self, address: &str, utxo: Utxo) {
        self.lock().utxos.entry(address.to_string()).or_default().push(utxo);
    }

    /// Make every fetch of `txid` fail with a server error.
    pub fn fail_transaction(&self, txid: &str) {
        self.lock().failing.insert(txid.to_string());
    }

    /// Transactions received through `broadcast`, in order.
    pub fn broadcasts(&self) -> Vec<Transaction> {
        self.lock().broadcasts.clone()
    }

    /// Number of source calls served so far.
    pub fn call_count(&self) -> usize {
        self.lock().calls
    }

    fn record_call(&self) -> MutexGuard<'_, State> {
        let mut state = self.lock();
        state.calls += 1;
        state
    }
}

impl ChainSource for MemoryChain {
    async fn current_height(&self) -> Result<u32, ChainError> {
        let state = self.record_call();
        Ok(state.blocks.keys().next_back().copied().unwrap_or(0))
    }

    async fn block_transaction_ids(&self, height: u32) -> Result<Vec<String>, ChainError> {
        let state = self.record_call();
        state
            .blocks
            .get(&height)
            .cloned()
            .ok_or_else(|| ChainError::NotFound(format!("block {}", height)))
    }

    async fn transaction(&self, txid: &str) -> Result<TxDetail, ChainError> {
        let state = self.record_call();
        if state.failing.contains(txid) {
            return Err(ChainError::Server {
                status_code: 500,
                message: format!("injected failure for {}", txid),
            });
        }
        state
            .transactions
            .get(txid)
            .cloned()
            .ok_or_else(|| ChainError::NotFound(format!("tx {}", txid)))
    }

    async fn utxos(&self, address: &str) -> Result<Vec<Utxo>, ChainError> {
        let state = self.record_call();
        Ok(state.utxos.get(address).cloned().unwrap_or_default())
    }

    async fn broadcast(&self, raw_tx: &[u8]) -> Result<String, ChainError> {
        let tx = Transaction::from_bytes(raw_tx).map_err(|e| ChainError::Broadcast(e.to_string()))?;
        let txid = tx.tx_id_hex();
        let mut state = self.record_call();
        state.broadcasts.push(tx);
        Ok(txid)
    }
}
