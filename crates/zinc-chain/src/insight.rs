//! Insight REST client.
//!
//! Endpoints used:
//! - `GET  /status?q=getInfo`
//! - `GET  /block-index/{height}` then `GET /block/{hash}`
//! - `GET  /tx/{txid}`
//! - `GET  /addr/{address}/utxo`
//! - `POST /tx/send` with `{"rawtx": "<hex>"}`

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use zinc_primitives::chainhash::Hash;
use zinc_script::{Address, Script};
use zinc_transaction::Utxo;

use crate::error::ChainError;
use crate::source::ChainSource;
use crate::types::{ChainConfig, InputDetail, OutputDetail, TxDetail};

const ZATOSHI_PER_COIN: u64 = 100_000_000;

/// HTTP client for an Insight-style block explorer API.
#[derive(Debug, Clone)]
pub struct InsightClient {
    /// Client configuration.
    config: ChainConfig,
    /// Underlying HTTP client.
    client: reqwest::Client,
}

impl InsightClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `config` - Base URL, credentials and timeout.
    ///
    /// # Returns
    /// The client, or an error if the HTTP client cannot be built.
    pub fn new(config: ChainConfig) -> Result<Self, ChainError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(Self::build_headers(&config))
            .build()?;
        Ok(Self { config, client })
    }

    /// The client configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Resolve a block height to its hash.
    pub async fn block_hash(&self, height: u32) -> Result<String, ChainError> {
        let resp: BlockIndexResponse = self.do_request(&format!("block-index/{}", height)).await?;
        Ok(resp.block_hash)
    }

    /// Perform a GET request and deserialize the response.
    async fn do_request<T: DeserializeOwned>(&self, path: &str) -> Result<T, ChainError> {
        let url = self.url(path);
        tracing::debug!(%url, "insight request");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();

        if status.as_u16() == 404 {
            return Err(ChainError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ChainError::Server {
                status_code: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Build common headers from config.
    fn build_headers(config: &ChainConfig) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Some(ref key) = config.api_key {
            if let Ok(val) = HeaderValue::from_str(&format!("Bearer {key}")) {
                headers.insert(AUTHORIZATION, val);
            }
        }

        headers
    }

    fn convert_tx(&self, tx: InsightTx) -> Result<TxDetail, ChainError> {
        let inputs = tx
            .vin
            .into_iter()
            .map(|vin| {
                let unlocking_script = match vin.script_sig {
                    Some(sig) => Script::from_hex(&sig.hex)
                        .map_err(|e| ChainError::InvalidResponse(format!("scriptSig: {}", e)))?,
                    None => Script::new(),
                };
                Ok(InputDetail {
                    prev_txid: vin.txid,
                    prev_index: vin.vout,
                    address: vin.addr,
                    unlocking_script,
                    value: vin.value_sat,
                })
            })
            .collect::<Result<Vec<_>, ChainError>>()?;

        let outputs = tx
            .vout
            .into_iter()
            .enumerate()
            .map(|(i, vout)| {
                let locking_script = Script::from_hex(&vout.script_pub_key.hex)
                    .map_err(|e| ChainError::InvalidResponse(format!("scriptPubKey: {}", e)))?;
                let value = match vout.value_zat.or(vout.value_sat) {
                    Some(v) => v,
                    None => parse_zatoshi(&vout.value)?,
                };
                let address = vout
                    .script_pub_key
                    .addresses
                    .and_then(|a| a.into_iter().next())
                    .or_else(|| {
                        Address::from_script(&locking_script, self.config.network)
                            .ok()
                            .map(|a| a.address_string)
                    });
                Ok(OutputDetail {
                    index: vout.n.unwrap_or(i as u32),
                    value,
                    locking_script,
                    address,
                })
            })
            .collect::<Result<Vec<_>, ChainError>>()?;

        Ok(TxDetail {
            txid: tx.txid,
            block_height: tx.blockheight.and_then(|h| u32::try_from(h).ok()),
            confirmations: tx.confirmations.unwrap_or(0),
            inputs,
            outputs,
        })
    }
}

impl ChainSource for InsightClient {
    async fn current_height(&self) -> Result<u32, ChainError> {
        let resp: StatusResponse = self.do_request("status?q=getInfo").await?;
        Ok(resp.info.blocks)
    }

    async fn block_transaction_ids(&self, height: u32) -> Result<Vec<String>, ChainError> {
        let hash = self.block_hash(height).await?;
        let block: BlockResponse = self.do_request(&format!("block/{}", hash)).await?;
        Ok(block.tx)
    }

    async fn transaction(&self, txid: &str) -> Result<TxDetail, ChainError> {
        let tx: InsightTx = self.do_request(&format!("tx/{}", txid)).await?;
        self.convert_tx(tx)
    }

    async fn utxos(&self, address: &str) -> Result<Vec<Utxo>, ChainError> {
        let entries: Vec<InsightUtxo> = self.do_request(&format!("addr/{}/utxo", address)).await?;
        entries
            .into_iter()
            .map(|u| {
                let txid = Hash::from_hex(&u.txid)
                    .map_err(|e| ChainError::InvalidResponse(format!("utxo txid: {}", e)))?;
                let script = Script::from_hex(&u.script_pub_key)
                    .map_err(|e| ChainError::InvalidResponse(format!("utxo script: {}", e)))?;
                let value = match u.satoshis {
                    Some(v) => v,
                    None => parse_zatoshi(&u.amount)?,
                };
                Ok(Utxo::new(txid, u.vout, script, value, u.confirmations.unwrap_or(0)))
            })
            .collect()
    }

    async fn broadcast(&self, raw_tx: &[u8]) -> Result<String, ChainError> {
        let url = self.url("tx/send");
        let body = serde_json::json!({ "rawtx": hex::encode(raw_tx) });

        let resp = self.client.post(&url).json(&body).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %message, "broadcast rejected");
            return Err(ChainError::Broadcast(message));
        }

        let sent: SendResponse = serde_json::from_str(&resp.text().await?)?;
        tracing::info!(txid = %sent.txid, "broadcast accepted");
        Ok(sent.txid)
    }
}

/// Convert a coin amount (`"0.00010000"` or a JSON number) to zatoshi.
///
/// Strings are parsed as exact decimals. Numbers may arrive in exponent
/// form (`5.46e-6`), so they are scaled as floats and rounded to the
/// nearest zatoshi.
///
/// # Arguments
/// * `value` - A JSON string or number with at most eight decimals.
///
/// # Returns
/// The amount in zatoshi, or `InvalidResponse` for anything else.
pub fn parse_zatoshi(value: &Value) -> Result<u64, ChainError> {
    match value {
        Value::String(s) => parse_decimal(s),
        Value::Number(n) => {
            if let Some(whole) = n.as_u64() {
                return whole
                    .checked_mul(ZATOSHI_PER_COIN)
                    .ok_or_else(|| ChainError::InvalidResponse(format!("amount: {}", n)));
            }
            let coins = n.as_f64().unwrap_or(f64::NAN);
            let zatoshi = (coins * ZATOSHI_PER_COIN as f64).round();
            // Upper bound is 2^63.
            if !zatoshi.is_finite() || zatoshi < 0.0 || zatoshi >= 9.223_372_036_854_776e18 {
                return Err(ChainError::InvalidResponse(format!("amount: {}", n)));
            }
            Ok(zatoshi as u64)
        }
        other => Err(ChainError::InvalidResponse(format!("amount: {}", other))),
    }
}

fn parse_decimal(text: &str) -> Result<u64, ChainError> {
    let invalid = || ChainError::InvalidResponse(format!("amount: {}", text));

    let (whole, frac) = text.split_once('.').unwrap_or((text, ""));
    if (whole.is_empty() && frac.is_empty()) || frac.len() > 8 {
        return Err(invalid());
    }
    if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
    let frac: u64 = if frac.is_empty() {
        0
    } else {
        format!("{:0<8}", frac).parse().map_err(|_| invalid())?
    };

    whole
        .checked_mul(ZATOSHI_PER_COIN)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(invalid)
}

// ---------------------------------------------------------------------------
// Insight wire shapes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct StatusResponse {
    info: StatusInfo,
}

#[derive(Deserialize)]
struct StatusInfo {
    blocks: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockIndexResponse {
    block_hash: String,
}

#[derive(Deserialize)]
struct BlockResponse {
    #[serde(default)]
    tx: Vec<String>,
}

#[derive(Deserialize)]
struct InsightTx {
    txid: String,
    #[serde(default)]
    blockheight: Option<i64>,
    #[serde(default)]
    confirmations: Option<u32>,
    #[serde(default)]
    vin: Vec<InsightVin>,
    #[serde(default)]
    vout: Vec<InsightVout>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsightVin {
    #[serde(default)]
    txid: Option<String>,
    #[serde(default)]
    vout: Option<u32>,
    #[serde(default)]
    addr: Option<String>,
    #[serde(default)]
    script_sig: Option<InsightScriptSig>,
    #[serde(default)]
    value_sat: Option<u64>,
}

#[derive(Deserialize)]
struct InsightScriptSig {
    hex: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsightVout {
    #[serde(default)]
    value: Value,
    #[serde(default)]
    value_zat: Option<u64>,
    #[serde(default)]
    value_sat: Option<u64>,
    #[serde(default)]
    n: Option<u32>,
    script_pub_key: InsightScriptPubKey,
}

#[derive(Deserialize)]
struct InsightScriptPubKey {
    hex: String,
    #[serde(default)]
    addresses: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsightUtxo {
    txid: String,
    vout: u32,
    script_pub_key: String,
    #[serde(default)]
    amount: Value,
    #[serde(default)]
    satoshis: Option<u64>,
    #[serde(default)]
    confirmations: Option<u32>,
}

#[derive(Deserialize)]
struct SendResponse {
    txid: String,
}
