//! ZRC-20 balance state machine.
//!
//! A [`BlockLedger`] applies one block's inscriptions on top of the committed
//! store without writing to it. Reads fall through to the store; writes stay
//! in the overlay until [`BlockLedger::into_batch`] turns them into a
//! [`BlockBatch`] for an atomic commit.

use std::collections::{BTreeMap, HashSet};

use zinc_inscription::{Inscription, ZincOp, Zrc20Deploy};

use crate::config::LedgerRules;
use crate::error::IndexerError;
use crate::store::Store;
use crate::types::{BalanceRecord, BlockBatch, Cursor, DeployRecord, InscriptionRecord};

/// What applying one inscription did to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerOutcome {
    /// A new token was deployed.
    Deployed {
        /// Ticker of the new token.
        ticker: String,
    },
    /// Tokens were credited to a minter.
    Minted {
        /// Token ticker.
        ticker: String,
        /// Credited address.
        address: String,
        /// Amount credited, possibly clamped to the remaining supply.
        amount: u64,
    },
    /// Tokens moved between addresses.
    Transferred {
        /// Token ticker.
        ticker: String,
        /// Debited address.
        from: String,
        /// Credited address.
        to: String,
        /// Amount moved.
        amount: u64,
    },
    /// Stored without ledger effect (NFTs, envelopes).
    Recorded,
    /// Stored, but the ledger refused the operation.
    Rejected(String),
    /// The txid was already recorded; nothing was applied.
    Duplicate,
}

/// Pending effects of one block over a committed store.
pub struct BlockLedger<'a, S: Store + ?Sized> {
    store: &'a S,
    rules: LedgerRules,
    height: u32,
    inscriptions: Vec<InscriptionRecord>,
    seen: HashSet<String>,
    deploys: Vec<DeployRecord>,
    minted: BTreeMap<String, u64>,
    balances: BTreeMap<(String, String), i128>,
}

impl<'a, S: Store + ?Sized> BlockLedger<'a, S> {
    /// Start an empty overlay for the block at `height`.
    pub fn new(store: &'a S, rules: LedgerRules, height: u32) -> Self {
        Self {
            store,
            rules,
            height,
            inscriptions: Vec::new(),
            seen: HashSet::new(),
            deploys: Vec::new(),
            minted: BTreeMap::new(),
            balances: BTreeMap::new(),
        }
    }

    /// Whether `txid` is already recorded, in the store or in this block.
    pub fn is_recorded(&self, txid: &str) -> Result<bool, IndexerError> {
        Ok(self.seen.contains(txid) || self.store.inscription(txid)?.is_some())
    }

    /// Record an inscription and apply its ledger effect.
    ///
    /// A txid already recorded is ignored, so replaying a block is harmless.
    /// Refused operations are still recorded; the refusal is the outcome.
    pub fn apply(&mut self, record: InscriptionRecord) -> Result<LedgerOutcome, IndexerError> {
        if self.is_recorded(&record.txid)? {
            return Ok(LedgerOutcome::Duplicate);
        }

        let outcome = match &record.inscription {
            Inscription::Zinc(ZincOp::Zrc20Deploy(deploy)) => self.deploy(deploy, &record.txid)?,
            Inscription::Zinc(ZincOp::Zrc20Mint(mint)) => {
                let deploy_txid = mint.deploy_txid.to_string();
                self.mint(&deploy_txid, mint.amount, record.recipient.as_deref())?
            }
            Inscription::Zinc(ZincOp::Zrc20Transfer(transfer)) => {
                let deploy_txid = transfer.deploy_txid.to_string();
                self.transfer(
                    &deploy_txid,
                    transfer.amount,
                    record.sender.as_deref(),
                    record.recipient.as_deref(),
                )?
            }
            Inscription::Zinc(ZincOp::CollectionDeploy(_) | ZincOp::NftMint(_))
            | Inscription::Zerdinals(_) => LedgerOutcome::Recorded,
        };

        match &outcome {
            LedgerOutcome::Rejected(reason) => {
                tracing::warn!(txid = %record.txid, height = self.height, "ledger rejected {}: {}", record.operation, reason)
            }
            other => tracing::debug!(txid = %record.txid, height = self.height, ?other, "applied inscription"),
        }

        self.seen.insert(record.txid.clone());
        self.inscriptions.push(record);
        Ok(outcome)
    }

    /// Finish the block.
    ///
    /// # Arguments
    /// * `scan_time` - Unix seconds to store in the cursor.
    pub fn into_batch(self, scan_time: u64) -> BlockBatch {
        BlockBatch {
            height: self.height,
            inscriptions: self.inscriptions,
            deploys: self.deploys,
            balances: self
                .balances
                .into_iter()
                .map(|((address, ticker), balance)| BalanceRecord { address, ticker, balance })
                .collect(),
            minted: self.minted.into_iter().collect(),
            cursor: Cursor {
                last_scanned_block: self.height,
                last_scan_time: scan_time,
            },
        }
    }

    fn deploy(&mut self, deploy: &Zrc20Deploy, txid: &str) -> Result<LedgerOutcome, IndexerError> {
        let ticker = deploy.ticker.as_str();
        if self.deploy_by_ticker(ticker)?.is_some() {
            return Ok(LedgerOutcome::Rejected(format!("{} is already deployed", ticker)));
        }
        self.deploys.push(DeployRecord {
            ticker: ticker.to_string(),
            max_supply: deploy.max_supply,
            mint_limit: deploy.mint_limit,
            decimals: deploy.decimals,
            mint_price: deploy.mint_price,
            deployer: deploy.deployer.clone(),
            deploy_txid: txid.to_string(),
            deploy_height: self.height,
        });
        Ok(LedgerOutcome::Deployed { ticker: ticker.to_string() })
    }

    fn mint(
        &mut self,
        deploy_txid: &str,
        amount: u64,
        minter: Option<&str>,
    ) -> Result<LedgerOutcome, IndexerError> {
        let Some(deploy) = self.deploy_by_txid(deploy_txid)? else {
            return Ok(LedgerOutcome::Rejected(format!("unknown deploy {}", deploy_txid)));
        };
        if amount == 0 {
            return Ok(LedgerOutcome::Rejected("zero amount".into()));
        }
        let Some(minter) = minter else {
            return Ok(LedgerOutcome::Rejected("minter address unknown".into()));
        };
        if amount > deploy.mint_limit && !self.rules.allow_over_limit_mint {
            return Ok(LedgerOutcome::Rejected(format!(
                "mint of {} exceeds limit {}",
                amount, deploy.mint_limit
            )));
        }

        let minted = self.minted(&deploy.ticker)?;
        let credit = if self.rules.allow_over_supply {
            amount
        } else {
            amount.min(deploy.max_supply.saturating_sub(minted))
        };
        if credit == 0 {
            return Ok(LedgerOutcome::Rejected(format!("{} supply exhausted", deploy.ticker)));
        }

        self.minted.insert(deploy.ticker.clone(), minted.saturating_add(credit));
        let balance = self.balance(minter, &deploy.ticker)?;
        self.balances
            .insert((minter.to_string(), deploy.ticker.clone()), balance + i128::from(credit));

        Ok(LedgerOutcome::Minted {
            ticker: deploy.ticker,
            address: minter.to_string(),
            amount: credit,
        })
    }

    fn transfer(
        &mut self,
        deploy_txid: &str,
        amount: u64,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<LedgerOutcome, IndexerError> {
        let Some(deploy) = self.deploy_by_txid(deploy_txid)? else {
            return Ok(LedgerOutcome::Rejected(format!("unknown deploy {}", deploy_txid)));
        };
        if amount == 0 {
            return Ok(LedgerOutcome::Rejected("zero amount".into()));
        }
        let (Some(from), Some(to)) = (from, to) else {
            return Ok(LedgerOutcome::Rejected("sender or recipient address unknown".into()));
        };

        let ticker = deploy.ticker;
        let amount_i = i128::from(amount);
        let from_balance = self.balance(from, &ticker)?;
        if from_balance < amount_i && !self.rules.allow_overdraft {
            return Ok(LedgerOutcome::Rejected(format!(
                "{} holds {} {}, cannot send {}",
                from, from_balance, ticker, amount
            )));
        }

        self.balances
            .insert((from.to_string(), ticker.clone()), from_balance - amount_i);
        let to_balance = self.balance(to, &ticker)?;
        self.balances
            .insert((to.to_string(), ticker.clone()), to_balance + amount_i);

        Ok(LedgerOutcome::Transferred {
            ticker,
            from: from.to_string(),
            to: to.to_string(),
            amount,
        })
    }

    fn deploy_by_ticker(&self, ticker: &str) -> Result<Option<DeployRecord>, IndexerError> {
        match self.deploys.iter().find(|d| d.ticker == ticker) {
            Some(d) => Ok(Some(d.clone())),
            None => self.store.deploy(ticker),
        }
    }

    fn deploy_by_txid(&self, txid: &str) -> Result<Option<DeployRecord>, IndexerError> {
        match self.deploys.iter().find(|d| d.deploy_txid == txid) {
            Some(d) => Ok(Some(d.clone())),
            None => self.store.deploy_by_txid(txid),
        }
    }

    fn minted(&self, ticker: &str) -> Result<u64, IndexerError> {
        match self.minted.get(ticker) {
            Some(m) => Ok(*m),
            None => self.store.minted(ticker),
        }
    }

    fn balance(&self, address: &str, ticker: &str) -> Result<i128, IndexerError> {
        match self.balances.get(&(address.to_string(), ticker.to_string())) {
            Some(b) => Ok(*b),
            None => self.store.balance(address, ticker),
        }
    }
}
