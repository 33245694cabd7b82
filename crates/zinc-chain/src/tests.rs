//! Tests for the Insight client and the in-memory chain.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zinc_primitives::chainhash::Hash;
use zinc_script::{Address, Network, Script};
use zinc_transaction::{Transaction, TransactionOutput, TxVersion};

use crate::error::ChainError;
use crate::insight::{parse_zatoshi, InsightClient};
use crate::memory::MemoryChain;
use crate::source::ChainSource;
use crate::types::{ChainConfig, TxDetail};

const TXID: &str = "6d1b5c3a0f2e4d8c9b7a6f5e4d3c2b1a0f9e8d7c6b5a4f3e2d1c0b9a8f7e6d5c";
const P2PKH_HEX: &str = "76a914751e76e8199196d454941c45d1b3a323f1433bd688ac";

fn test_config(base_url: &str) -> ChainConfig {
    ChainConfig {
        base_url: base_url.to_string(),
        api_key: Some("test-key".to_string()),
        timeout_secs: 5,
        network: Network::Mainnet,
    }
}

fn client(server: &MockServer) -> InsightClient {
    InsightClient::new(test_config(&server.uri())).unwrap()
}

#[tokio::test]
async fn test_current_height() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .and(query_param("q", "getInfo"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "info": { "blocks": 2_750_123, "version": 5090150 }
        })))
        .mount(&server)
        .await;

    assert_eq!(client(&server).current_height().await.unwrap(), 2_750_123);
}

#[tokio::test]
async fn test_block_transaction_ids() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/block-index/100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "blockHash": "00aa" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/block/00aa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hash": "00aa",
            "height": 100,
            "tx": ["t1", "t2"]
        })))
        .mount(&server)
        .await;

    let ids = client(&server).block_transaction_ids(100).await.unwrap();
    assert_eq!(ids, vec!["t1".to_string(), "t2".to_string()]);
}

#[tokio::test]
async fn test_transaction_detail() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/tx/{}", TXID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "txid": TXID,
            "blockheight": 200,
            "confirmations": 3,
            "vin": [{
                "txid": "ab".repeat(32),
                "vout": 1,
                "addr": "t1Sender",
                "valueSat": 70000,
                "scriptSig": { "hex": "0102", "asm": "02" }
            }],
            "vout": [
                { "value": "0.00000000", "n": 0, "scriptPubKey": { "hex": "6a035a1001" } },
                { "value": "0.00010000", "n": 1, "scriptPubKey": { "hex": P2PKH_HEX } },
                { "value": 1.5, "n": 2, "scriptPubKey": { "hex": P2PKH_HEX, "addresses": ["t1Named"] } }
            ]
        })))
        .mount(&server)
        .await;

    let tx = client(&server).transaction(TXID).await.unwrap();
    assert_eq!(tx.block_height, Some(200));
    assert_eq!(tx.confirmations, 3);
    assert_eq!(tx.first_input_address(), Some("t1Sender"));
    assert_eq!(tx.inputs[0].unlocking_script.to_bytes(), &[0x01, 0x02]);
    assert_eq!(tx.inputs[0].value, Some(70000));

    assert_eq!(tx.outputs[0].value, 0);
    assert_eq!(tx.outputs[0].address, None);
    assert_eq!(tx.outputs[1].value, 10_000);
    let derived = Address::from_script(&Script::from_hex(P2PKH_HEX).unwrap(), Network::Mainnet).unwrap();
    assert_eq!(tx.outputs[1].address.as_deref(), Some(derived.address_string.as_str()));
    assert_eq!(tx.outputs[2].value, 150_000_000);
    assert_eq!(tx.outputs[2].address.as_deref(), Some("t1Named"));
}

#[tokio::test]
async fn test_coinbase_and_mempool() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tx/cb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "txid": "cb",
            "blockheight": -1,
            "vin": [{ "coinbase": "03a0bb0d" }],
            "vout": []
        })))
        .mount(&server)
        .await;

    let tx = client(&server).transaction("cb").await.unwrap();
    assert_eq!(tx.block_height, None);
    assert!(tx.inputs[0].unlocking_script.is_empty());
    assert_eq!(tx.first_input_address(), None);
}

#[tokio::test]
async fn test_not_found_and_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tx/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tx/broken"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let c = client(&server);
    assert!(matches!(c.transaction("missing").await, Err(ChainError::NotFound(_))));
    match c.transaction("broken").await {
        Err(ChainError::Server { status_code, message }) => {
            assert_eq!(status_code, 503);
            assert_eq!(message, "overloaded");
        }
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "info": { "blocks": 1 } }))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.timeout_secs = 1;
    let c = InsightClient::new(config).unwrap();
    assert!(matches!(c.current_height().await, Err(ChainError::Timeout)));
}

#[tokio::test]
async fn test_utxos() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/addr/t1Owner/utxo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "address": "t1Owner",
                "txid": TXID,
                "vout": 0,
                "scriptPubKey": P2PKH_HEX,
                "amount": 0.001,
                "satoshis": 100000,
                "confirmations": 6
            },
            {
                "address": "t1Owner",
                "txid": TXID,
                "vout": 2,
                "scriptPubKey": P2PKH_HEX,
                "amount": "0.0005"
            }
        ])))
        .mount(&server)
        .await;

    let utxos = client(&server).utxos("t1Owner").await.unwrap();
    assert_eq!(utxos.len(), 2);
    assert_eq!(utxos[0].txid, Hash::from_hex(TXID).unwrap());
    assert_eq!(utxos[0].value, 100_000);
    assert_eq!(utxos[0].confirmations, 6);
    assert!(utxos[0].script.is_p2pkh());
    assert_eq!(utxos[1].output_index, 2);
    assert_eq!(utxos[1].value, 50_000);
    assert_eq!(utxos[1].confirmations, 0);
}

#[test]
fn test_parse_zatoshi_exponent_form() {
    // serde_json prints these as 5.46e-6 and 1e-8.
    assert_eq!(parse_zatoshi(&json!(0.00000546)).unwrap(), 546);
    assert_eq!(parse_zatoshi(&json!(0.00000001)).unwrap(), 1);
    assert_eq!(parse_zatoshi(&json!(0.29)).unwrap(), 29_000_000);
}

#[tokio::test]
async fn test_utxos_dust_amount_without_satoshis() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/addr/t1Owner/utxo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "address": "t1Owner",
                "txid": TXID,
                "vout": 1,
                "scriptPubKey": P2PKH_HEX,
                "amount": 0.00000546
            }
        ])))
        .mount(&server)
        .await;

    let utxos = client(&server).utxos("t1Owner").await.unwrap();
    assert_eq!(utxos.len(), 1);
    assert_eq!(utxos[0].value, 546);
}

#[tokio::test]
async fn test_broadcast() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tx/send"))
        .and(body_json(json!({ "rawtx": "deadbeef" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "txid": TXID })))
        .mount(&server)
        .await;

    let txid = client(&server).broadcast(&[0xde, 0xad, 0xbe, 0xef]).await.unwrap();
    assert_eq!(txid, TXID);
}

#[tokio::test]
async fn test_broadcast_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tx/send"))
        .respond_with(ResponseTemplate::new(400).set_body_string("16: bad-txns-inputs-spent"))
        .mount(&server)
        .await;

    let err = client(&server).broadcast(&[0x00]).await.unwrap_err();
    assert!(matches!(err, ChainError::Broadcast(ref m) if m.contains("inputs-spent")));
}

#[test]
fn test_parse_zatoshi() {
    assert_eq!(parse_zatoshi(&json!("0.00010000")).unwrap(), 10_000);
    assert_eq!(parse_zatoshi(&json!("12")).unwrap(), 1_200_000_000);
    assert_eq!(parse_zatoshi(&json!(".5")).unwrap(), 50_000_000);
    assert_eq!(parse_zatoshi(&json!(0.001)).unwrap(), 100_000);
    assert_eq!(parse_zatoshi(&json!(3)).unwrap(), 300_000_000);
    assert!(parse_zatoshi(&json!(-0.5)).is_err());
    assert!(parse_zatoshi(&json!("0.000000001")).is_err());
    assert!(parse_zatoshi(&json!("-1")).is_err());
    assert!(parse_zatoshi(&json!(null)).is_err());
}

fn sample_tx() -> Transaction {
    let mut tx = Transaction::new(TxVersion::Nu5);
    tx.add_input(zinc_transaction::TransactionInput::new([7u8; 32], 0));
    tx.add_output(TransactionOutput::new(546, Script::from_hex(P2PKH_HEX).unwrap()));
    tx
}

#[tokio::test]
async fn test_memory_chain() {
    let chain = MemoryChain::new();
    let detail = TxDetail::from_transaction(&sample_tx(), None, Network::Mainnet);
    let txid = detail.txid.clone();
    chain.add_block(5, vec![detail]);

    assert_eq!(chain.current_height().await.unwrap(), 5);
    assert_eq!(chain.block_transaction_ids(5).await.unwrap(), vec![txid.clone()]);
    assert!(matches!(chain.block_transaction_ids(6).await, Err(ChainError::NotFound(_))));

    let fetched = chain.transaction(&txid).await.unwrap();
    assert_eq!(fetched.block_height, Some(5));
    assert!(fetched.outputs[0].address.as_deref().unwrap().starts_with("t1"));

    chain.fail_transaction(&txid);
    assert!(chain.transaction(&txid).await.is_err());
    assert_eq!(chain.call_count(), 5);
}

#[tokio::test]
async fn test_memory_chain_broadcast() {
    let chain = MemoryChain::new();
    let tx = sample_tx();
    let txid = chain.broadcast(&tx.to_bytes()).await.unwrap();
    assert_eq!(txid, tx.tx_id_hex());
    assert_eq!(chain.broadcasts(), vec![tx]);
    assert!(matches!(chain.broadcast(&[1, 2, 3]).await, Err(ChainError::Broadcast(_))));
}
