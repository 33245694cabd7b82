//! The block scanning loop.
//!
//! One cycle fetches the tip and walks every block after the cursor:
//!
//! `Idle -> Fetching(h) -> Scanning(h) -> [Cooldown] -> Fetching(h + 1) ... -> Idle`
//!
//! Each block is committed on its own, so a cycle interrupted by an error,
//! a timeout or cancellation resumes at the first uncommitted block.

use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use zinc_chain::{ChainError, ChainSource};

use crate::config::IndexerConfig;
use crate::error::IndexerError;
use crate::extract::extract;
use crate::ledger::{BlockLedger, LedgerOutcome};
use crate::store::Store;
use crate::types::{BalanceRecord, BlockBatch, Cursor, DeployRecord, InscriptionRecord};

/// Where the scanner is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Waiting for the next tick.
    Idle,
    /// Fetching the txid list of a block.
    Fetching(u32),
    /// Fetching and applying a block's transactions.
    Scanning(u32),
    /// Pausing to stay under the source's rate limits.
    Cooldown,
}

/// Summary of one scan cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanReport {
    /// Chain tip seen at the start of the cycle.
    pub tip: u32,
    /// Blocks committed.
    pub blocks: u32,
    /// Inscriptions recorded.
    pub inscriptions: usize,
    /// Transactions skipped because their fetch failed.
    pub skipped: usize,
}

/// Chain indexer: scanner plus query API over its store.
pub struct Indexer<C, S> {
    chain: C,
    store: S,
    config: IndexerConfig,
    state: ScanState,
    calls: u32,
}

async fn timed<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, ChainError>>,
) -> Result<T, IndexerError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(IndexerError::Timeout(limit)),
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl<C: ChainSource, S: Store> Indexer<C, S> {
    /// Create an indexer.
    pub fn new(chain: C, store: S, config: IndexerConfig) -> Self {
        Self {
            chain,
            store,
            config,
            state: ScanState::Idle,
            calls: 0,
        }
    }

    /// Current scan state.
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// The chain source.
    pub fn chain(&self) -> &C {
        &self.chain
    }

    /// The store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run scan cycles on the configured interval until `cancel` fires.
    ///
    /// A failed cycle is logged and retried on the next tick.
    pub async fn run(&mut self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.config.scan_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(interval = ?self.config.scan_interval(), "indexer started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            match self.scan_once(&cancel).await {
                Ok(report) if report.blocks > 0 => tracing::info!(
                    tip = report.tip,
                    blocks = report.blocks,
                    inscriptions = report.inscriptions,
                    skipped = report.skipped,
                    "scan cycle complete"
                ),
                Ok(_) => tracing::debug!("no new blocks"),
                Err(IndexerError::Cancelled) => break,
                Err(e) => tracing::warn!("scan cycle failed, retrying next tick: {}", e),
            }
        }

        self.state = ScanState::Idle;
        tracing::info!("indexer stopped");
    }

    /// Scan every block between the cursor and the current tip.
    ///
    /// # Returns
    /// A report of what was committed, or the first error. Blocks committed
    /// before the error stay committed.
    pub async fn scan_once(&mut self, cancel: &CancellationToken) -> Result<ScanReport, IndexerError> {
        self.calls = 1;
        let result = self.scan_range(cancel).await;
        self.state = ScanState::Idle;
        result
    }

    async fn scan_range(&mut self, cancel: &CancellationToken) -> Result<ScanReport, IndexerError> {
        let tip = timed(self.config.call_timeout(), self.chain.current_height()).await?;
        let mut report = ScanReport { tip, ..Default::default() };
        let mut height = self.next_height()?;

        while height <= tip {
            if cancel.is_cancelled() {
                return Err(IndexerError::Cancelled);
            }

            let (batch, skipped) = self.scan_block(height, cancel).await?;
            self.store.commit_block(&batch)?;
            tracing::info!(height, inscriptions = batch.inscriptions.len(), "committed block");

            report.blocks += 1;
            report.inscriptions += batch.inscriptions.len();
            report.skipped += skipped;

            if height < tip
                && (report.blocks % self.config.blocks_per_cooldown.max(1) == 0
                    || self.calls >= self.config.call_budget)
            {
                self.cooldown(cancel).await?;
            }
            height += 1;
        }

        Ok(report)
    }

    /// Fetch and apply one block without committing it.
    ///
    /// Transactions already in the store are skipped, so the batch for a
    /// committed block carries no new effects.
    pub async fn process_block(
        &mut self,
        height: u32,
        cancel: &CancellationToken,
    ) -> Result<BlockBatch, IndexerError> {
        Ok(self.scan_block(height, cancel).await?.0)
    }

    async fn scan_block(
        &mut self,
        height: u32,
        cancel: &CancellationToken,
    ) -> Result<(BlockBatch, usize), IndexerError> {
        self.state = ScanState::Fetching(height);
        self.calls += 1;
        let txids = timed(self.config.call_timeout(), self.chain.block_transaction_ids(height)).await?;

        self.state = ScanState::Scanning(height);
        let network = self.config.chain.network;
        let mut ledger = BlockLedger::new(&self.store, self.config.rules, height);
        let mut skipped = 0;

        for txid in &txids {
            if cancel.is_cancelled() {
                return Err(IndexerError::Cancelled);
            }
            if ledger.is_recorded(txid)? {
                tracing::debug!(%txid, "already recorded");
                continue;
            }

            self.calls += 1;
            let tx = match timed(self.config.call_timeout(), self.chain.transaction(txid)).await {
                Ok(tx) => tx,
                Err(e) => {
                    tracing::warn!(%txid, height, "skipping transaction: {}", e);
                    skipped += 1;
                    continue;
                }
            };

            if let Some(record) = extract(&tx, height, network, &self.config.protocol) {
                if let LedgerOutcome::Rejected(_) = ledger.apply(record)? {
                    tracing::debug!(%txid, "recorded without ledger effect");
                }
            }
        }

        Ok((ledger.into_batch(unix_now()), skipped))
    }

    async fn cooldown(&mut self, cancel: &CancellationToken) -> Result<(), IndexerError> {
        self.state = ScanState::Cooldown;
        tracing::debug!(calls = self.calls, pause = ?self.config.cooldown(), "cooling down");
        tokio::select! {
            _ = tokio::time::sleep(self.config.cooldown()) => {}
            _ = cancel.cancelled() => return Err(IndexerError::Cancelled),
        }
        self.calls = 0;
        Ok(())
    }

    fn next_height(&self) -> Result<u32, IndexerError> {
        let start = self.config.protocol.start_height;
        Ok(match self.store.cursor()? {
            Some(c) => c.last_scanned_block.saturating_add(1).max(start),
            None => start,
        })
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Balance of `address` in `ticker`.
    pub fn balance(&self, address: &str, ticker: &str) -> Result<i128, IndexerError> {
        self.store.balance(address, ticker)
    }

    /// Every token balance held by `address`.
    pub fn balances_of(&self, address: &str) -> Result<Vec<BalanceRecord>, IndexerError> {
        self.store.balances_of(address)
    }

    /// Deployment of `ticker`.
    pub fn deploy(&self, ticker: &str) -> Result<Option<DeployRecord>, IndexerError> {
        self.store.deploy(ticker)
    }

    /// Total minted of `ticker`.
    pub fn minted(&self, ticker: &str) -> Result<u64, IndexerError> {
        self.store.minted(ticker)
    }

    /// Inscription recorded for `txid`.
    pub fn inscription(&self, txid: &str) -> Result<Option<InscriptionRecord>, IndexerError> {
        self.store.inscription(txid)
    }

    /// Scan progress.
    pub fn cursor(&self) -> Result<Option<Cursor>, IndexerError> {
        self.store.cursor()
    }
}
