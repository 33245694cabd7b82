//! Indexer configuration.
//!
//! Every section has defaults, so a config file only needs the fields it
//! changes:
//!
//! ```json
//! {
//!   "chain": { "base_url": "https://explorer.example/api", "network": "mainnet" },
//!   "protocol": { "treasury_address": "t1...", "start_height": 2700000 },
//!   "store_path": "zinc-index.sqlite"
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use zinc_chain::ChainConfig;

use crate::error::IndexerError;

/// How strictly the ledger enforces supply and balance invariants.
///
/// The defaults reject overdrafts, mints above the per-mint limit and mints
/// past the remaining supply (clamping a partial overflow). Setting a flag
/// accepts the corresponding operation unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerRules {
    /// Let a transfer drive the sender's balance negative.
    pub allow_overdraft: bool,
    /// Accept mints larger than the deploy's `mint_limit`.
    pub allow_over_limit_mint: bool,
    /// Credit mints in full even past `max_supply`.
    pub allow_over_supply: bool,
}

impl LedgerRules {
    /// Accept every operation without balance or supply checks.
    pub fn permissive() -> Self {
        Self {
            allow_overdraft: true,
            allow_over_limit_mint: true,
            allow_over_supply: true,
        }
    }
}

/// Protocol parameters shared with the wallet side.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Address receiving treasury tips; its outputs never name a transfer recipient.
    pub treasury_address: Option<String>,
    /// First block to scan when no cursor exists.
    pub start_height: u32,
}

/// Full indexer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Chain data source.
    pub chain: ChainConfig,
    /// Protocol parameters.
    pub protocol: ProtocolConfig,
    /// Ledger enforcement.
    pub rules: LedgerRules,
    /// Seconds between scan cycles.
    pub scan_interval_secs: u64,
    /// Pause after this many blocks within one cycle.
    pub blocks_per_cooldown: u32,
    /// Pause after this many chain calls within one cycle.
    pub call_budget: u32,
    /// Length of a pause, in milliseconds.
    pub cooldown_ms: u64,
    /// Upper bound on any single chain call, in seconds.
    pub call_timeout_secs: u64,
    /// SQLite database path. `None` keeps state in memory.
    pub store_path: Option<PathBuf>,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            protocol: ProtocolConfig::default(),
            rules: LedgerRules::default(),
            scan_interval_secs: 30,
            blocks_per_cooldown: 10,
            call_budget: 500,
            cooldown_ms: 1_000,
            call_timeout_secs: 30,
            store_path: None,
            log_filter: "info".to_string(),
        }
    }
}

impl IndexerConfig {
    /// Load a JSON config file.
    ///
    /// # Arguments
    /// * `path` - Path to the file.
    ///
    /// # Returns
    /// The parsed config with defaults filled in, or an I/O, parse or
    /// validation error.
    pub fn load(path: &Path) -> Result<Self, IndexerError> {
        let text = std::fs::read_to_string(path)?;
        let config: IndexerConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the scanner cannot run with.
    pub fn validate(&self) -> Result<(), IndexerError> {
        if self.scan_interval_secs == 0 {
            return Err(IndexerError::Config("scan_interval_secs must be positive".into()));
        }
        if self.blocks_per_cooldown == 0 {
            return Err(IndexerError::Config("blocks_per_cooldown must be positive".into()));
        }
        if self.call_timeout_secs == 0 {
            return Err(IndexerError::Config("call_timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// Interval between scan cycles.
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }

    /// Length of a cooldown pause.
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Upper bound on a single chain call.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexer.json");
        std::fs::write(
            &path,
            r#"{ "protocol": { "start_height": 42 }, "rules": { "allow_overdraft": true } }"#,
        )
        .unwrap();

        let config = IndexerConfig::load(&path).unwrap();
        assert_eq!(config.protocol.start_height, 42);
        assert!(config.rules.allow_overdraft);
        assert!(!config.rules.allow_over_supply);
        assert_eq!(config.blocks_per_cooldown, 10);
        assert_eq!(config.chain.timeout_secs, 15);
    }

    #[test]
    fn test_invalid_values() {
        let config = IndexerConfig { blocks_per_cooldown: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(IndexerError::Config(_))));
        assert!(IndexerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            IndexerConfig::load(Path::new("/nonexistent/zinc.json")),
            Err(IndexerError::Io(_))
        ));
    }
}
