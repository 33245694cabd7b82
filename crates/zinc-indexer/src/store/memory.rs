//! In-memory store.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::IndexerError;
use crate::store::{check_cursor, Store};
use crate::types::{BalanceRecord, BlockBatch, Cursor, DeployRecord, InscriptionRecord};

#[derive(Debug, Default)]
struct State {
    cursor: Option<Cursor>,
    deploys: HashMap<String, DeployRecord>,
    deploy_tickers: HashMap<String, String>,
    minted: HashMap<String, u64>,
    balances: HashMap<String, BTreeMap<String, i128>>,
    inscriptions: HashMap<String, InscriptionRecord>,
}

/// A [`Store`] that lives for the process only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store for MemoryStore {
    fn cursor(&self) -> Result<Option<Cursor>, IndexerError> {
        Ok(self.lock().cursor)
    }

    fn deploy(&self, ticker: &str) -> Result<Option<DeployRecord>, IndexerError> {
        Ok(self.lock().deploys.get(ticker).cloned())
    }

    fn deploy_by_txid(&self, txid: &str) -> Result<Option<DeployRecord>, IndexerError> {
        let state = self.lock();
        Ok(state
            .deploy_tickers
            .get(txid)
            .and_then(|ticker| state.deploys.get(ticker))
            .cloned())
    }

    fn minted(&self, ticker: &str) -> Result<u64, IndexerError> {
        Ok(self.lock().minted.get(ticker).copied().unwrap_or(0))
    }

    fn balance(&self, address: &str, ticker: &str) -> Result<i128, IndexerError> {
        Ok(self
            .lock()
            .balances
            .get(address)
            .and_then(|b| b.get(ticker))
            .copied()
            .unwrap_or(0))
    }

    fn balances_of(&self, address: &str) -> Result<Vec<BalanceRecord>, IndexerError> {
        let state = self.lock();
        Ok(state
            .balances
            .get(address)
            .map(|b| {
                b.iter()
                    .map(|(ticker, balance)| BalanceRecord {
                        address: address.to_string(),
                        ticker: ticker.clone(),
                        balance: *balance,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn inscription(&self, txid: &str) -> Result<Option<InscriptionRecord>, IndexerError> {
        Ok(self.lock().inscriptions.get(txid).cloned())
    }

    fn commit_block(&self, batch: &BlockBatch) -> Result<(), IndexerError> {
        let mut state = self.lock();
        check_cursor(state.cursor, batch)?;

        for record in &batch.inscriptions {
            state
                .inscriptions
                .entry(record.txid.clone())
                .or_insert_with(|| record.clone());
        }
        for deploy in &batch.deploys {
            if !state.deploys.contains_key(&deploy.ticker) {
                state
                    .deploy_tickers
                    .insert(deploy.deploy_txid.clone(), deploy.ticker.clone());
                state.deploys.insert(deploy.ticker.clone(), deploy.clone());
            }
        }
        for (ticker, minted) in &batch.minted {
            state.minted.insert(ticker.clone(), *minted);
        }
        for b in &batch.balances {
            state
                .balances
                .entry(b.address.clone())
                .or_default()
                .insert(b.ticker.clone(), b.balance);
        }
        state.cursor = Some(batch.cursor);
        Ok(())
    }
}
