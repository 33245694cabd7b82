//! Chain data types: client configuration and decoded transaction detail.

use serde::{Deserialize, Serialize};
use zinc_script::{Address, Network, Script};
use zinc_transaction::Transaction;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration for an [`InsightClient`](crate::InsightClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Base URL of the Insight API, without a trailing slash
    /// (e.g. `https://explorer.example/api`).
    pub base_url: String,
    /// Optional key sent as a bearer token.
    pub api_key: Option<String>,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Network used to name output owners when the API omits addresses.
    pub network: Network,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3001/api".to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            network: Network::Mainnet,
        }
    }
}

/// One input of a fetched transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDetail {
    /// Display-order txid of the spent output. `None` for coinbase.
    pub prev_txid: Option<String>,
    /// Index of the spent output. `None` for coinbase.
    pub prev_index: Option<u32>,
    /// Address that owned the spent output, when the source knows it.
    pub address: Option<String>,
    /// The scriptSig.
    pub unlocking_script: Script,
    /// Value of the spent output in zatoshi, when known.
    pub value: Option<u64>,
}

/// One output of a fetched transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDetail {
    /// Position in the output list.
    pub index: u32,
    /// Value in zatoshi.
    pub value: u64,
    /// The scriptPubKey.
    pub locking_script: Script,
    /// Address the output pays to, if it is a P2PKH or P2SH output.
    pub address: Option<String>,
}

/// A transaction as returned by a chain source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxDetail {
    /// Display-order txid.
    pub txid: String,
    /// Height of the containing block, or `None` while in the mempool.
    pub block_height: Option<u32>,
    /// Confirmation count.
    pub confirmations: u32,
    /// Inputs in transaction order.
    pub inputs: Vec<InputDetail>,
    /// Outputs in transaction order.
    pub outputs: Vec<OutputDetail>,
}

impl TxDetail {
    /// Describe a locally built transaction the way a chain source would.
    ///
    /// Input addresses and values are left unknown, since only the spent
    /// outputs carry them. Output addresses are derived for `network`.
    ///
    /// # Arguments
    /// * `tx` - The transaction.
    /// * `block_height` - Height to report, or `None` for mempool.
    /// * `network` - Network used to encode output addresses.
    pub fn from_transaction(tx: &Transaction, block_height: Option<u32>, network: Network) -> Self {
        let inputs = tx
            .inputs
            .iter()
            .map(|input| InputDetail {
                prev_txid: Some(input.source_hash().to_string()),
                prev_index: Some(input.source_tx_out_index),
                address: None,
                unlocking_script: input.unlocking_script.clone().unwrap_or_default(),
                value: input.source_value(),
            })
            .collect();

        let outputs = tx
            .outputs
            .iter()
            .enumerate()
            .map(|(i, output)| OutputDetail {
                index: i as u32,
                value: output.value,
                locking_script: output.locking_script.clone(),
                address: Address::from_script(&output.locking_script, network)
                    .ok()
                    .map(|a| a.address_string),
            })
            .collect();

        TxDetail {
            txid: tx.tx_id_hex(),
            block_height,
            confirmations: u32::from(block_height.is_some()),
            inputs,
            outputs,
        }
    }

    /// Address of the first input, the conventional sender of an inscription.
    pub fn first_input_address(&self) -> Option<&str> {
        self.inputs.first().and_then(|i| i.address.as_deref())
    }
}
