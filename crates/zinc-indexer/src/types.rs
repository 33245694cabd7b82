//! Records kept by the indexer.

use serde::{Deserialize, Serialize};
use zinc_inscription::{Family, Inscription};

/// A ZRC-20 deployment. Created once per ticker and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployRecord {
    /// Ticker, unique across deployments.
    pub ticker: String,
    /// Cap on the total ever minted.
    pub max_supply: u64,
    /// Cap on a single mint.
    pub mint_limit: u64,
    /// Display decimals.
    pub decimals: u8,
    /// Zatoshi a minter pays per mint.
    pub mint_price: u64,
    /// Address receiving mint payments.
    pub deployer: Option<String>,
    /// Display-order txid of the deploy transaction.
    pub deploy_txid: String,
    /// Height of the block holding the deploy.
    pub deploy_height: u32,
}

/// One token balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    /// Holder address.
    pub address: String,
    /// Token ticker.
    pub ticker: String,
    /// Balance in base units. Only negative under permissive rules.
    pub balance: i128,
}

/// A decoded inscription and where it was found. Write-once, keyed by txid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InscriptionRecord {
    /// Display-order txid.
    pub txid: String,
    /// Height of the containing block.
    pub block_height: u32,
    /// Inscription family.
    pub family: Family,
    /// Zinc protocol nibble; `None` for envelopes.
    pub protocol_id: Option<u8>,
    /// Operation name.
    pub operation: String,
    /// The decoded inscription.
    pub inscription: Inscription,
    /// Address of the first input.
    pub sender: Option<String>,
    /// Address credited by a mint or transfer.
    pub recipient: Option<String>,
}

/// Scan progress. A single persisted value that only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cursor {
    /// Last fully committed block.
    pub last_scanned_block: u32,
    /// Unix seconds of that commit.
    pub last_scan_time: u64,
}

/// Everything one block changes, committed in one store operation.
///
/// Balances and minted totals are absolute post-block values, not deltas,
/// so replaying a commit cannot double-apply.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockBatch {
    /// Height of the block.
    pub height: u32,
    /// Newly recorded inscriptions.
    pub inscriptions: Vec<InscriptionRecord>,
    /// Newly created deployments.
    pub deploys: Vec<DeployRecord>,
    /// Balances changed by the block.
    pub balances: Vec<BalanceRecord>,
    /// Minted totals changed by the block, by ticker.
    pub minted: Vec<(String, u64)>,
    /// Cursor to persist with the batch.
    pub cursor: Cursor,
}
