#![deny(missing_docs)]

//! # zinc-indexer
//!
//! Block scanner and ZRC-20 ledger for Zinc inscriptions.
//!
//! The [`Indexer`] walks blocks from a [`ChainSource`](zinc_chain::ChainSource),
//! decodes inscriptions from `OP_RETURN` outputs and unlock-script envelopes,
//! and applies ZRC-20 deploys, mints and transfers to a balance ledger. Each
//! block's effects and the scan cursor are committed to a [`Store`] in one
//! atomic step, so a restart resumes at the first uncommitted block without
//! applying anything twice.
//!
//! # Example
//!
//! ```no_run
//! use tokio_util::sync::CancellationToken;
//! use zinc_chain::InsightClient;
//! use zinc_indexer::{Indexer, IndexerConfig, SqliteStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = IndexerConfig::default();
//! let chain = InsightClient::new(config.chain.clone())?;
//! let store = SqliteStore::open(std::path::Path::new("zinc-index.sqlite"))?;
//!
//! let mut indexer = Indexer::new(chain, store, config);
//! indexer.scan_once(&CancellationToken::new()).await?;
//! println!("{:?}", indexer.balances_of("t1...")?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod ledger;
pub mod scanner;
pub mod store;
pub mod types;


pub use config::{IndexerConfig, LedgerRules, ProtocolConfig};
pub use error::IndexerError;
pub use ledger::{BlockLedger, LedgerOutcome};
pub use scanner::{Indexer, ScanReport, ScanState};
pub use store::{MemoryStore, SqliteStore, Store};
pub use types::{BalanceRecord, BlockBatch, Cursor, DeployRecord, InscriptionRecord};
