#![deny(missing_docs)]

//! # zinc-chain
//!
//! Chain data access for the Zinc engine.
//!
//! [`ChainSource`] is the narrow interface the indexer and wallet need from a
//! block explorer: tip height, per-block txids, decoded transaction detail,
//! address UTXOs and raw broadcast. [`InsightClient`] implements it against an
//! Insight-style REST API; [`MemoryChain`] is an in-process source for tests
//! and offline tooling.
//!
//! # Example
//!
//! ```no_run
//! use zinc_chain::{ChainConfig, ChainSource, InsightClient};
//!
//! # async fn example() -> Result<(), zinc_chain::ChainError> {
//! let client = InsightClient::new(ChainConfig {
//!     base_url: "https://explorer.example/api".to_string(),
//!     ..Default::default()
//! })?;
//!
//! let tip = client.current_height().await?;
//! let txids = client.block_transaction_ids(tip).await?;
//! println!("{} transactions at {}", txids.len(), tip);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod insight;
pub mod memory;
pub mod source;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ChainError;
pub use insight::InsightClient;
pub use memory::MemoryChain;
pub use source::ChainSource;
pub use types::{ChainConfig, InputDetail, OutputDetail, TxDetail};
