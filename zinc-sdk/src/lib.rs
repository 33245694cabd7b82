#![deny(missing_docs)]

//! Zinc SDK - Complete SDK.
//!
//! Re-exports all Zinc components for convenient single-crate usage.

pub use zinc_primitives as primitives;
pub use zinc_script as script;
pub use zinc_transaction as transaction;
pub use zinc_inscription as inscription;
pub use zinc_chain as chain;
pub use zinc_indexer as indexer;
pub use zinc_wallet as wallet;
