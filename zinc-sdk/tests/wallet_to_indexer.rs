//! Actions built by the wallet, mined into the memory chain, read back by the indexer.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use zinc_sdk::chain::{MemoryChain, TxDetail};
use zinc_sdk::indexer::{Indexer, IndexerConfig, MemoryStore, ProtocolConfig};
use zinc_sdk::primitives::chainhash::Hash;
use zinc_sdk::script::{Address, Network};
use zinc_sdk::transaction::Utxo;
use zinc_sdk::wallet::{
    TreasuryTip, Wallet, WalletConfig, WalletKeys, Zrc20DeployArgs, Zrc20MintArgs, Zrc20TransferArgs,
};

const PHRASE: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

/// Put every transaction broadcast since the last call into block `height`.
fn mine(chain: &MemoryChain, height: u32, already: &mut usize) {
    let sent = chain.broadcasts();
    let block = sent[*already..]
        .iter()
        .map(|tx| TxDetail::from_transaction(tx, Some(height), Network::Mainnet))
        .collect();
    *already = sent.len();
    chain.add_block(height, block);
}

#[tokio::test]
async fn deploy_mint_transfer_round_trip() {
    let chain = Arc::new(MemoryChain::new());
    let treasury = Address::from_public_key_hash(&[0xee; 20], Network::Mainnet).address_string;
    let friend = Address::from_public_key_hash(&[0x42; 20], Network::Mainnet).address_string;

    let config = WalletConfig {
        treasury: Some(TreasuryTip { address: treasury.clone(), value: 1_000 }),
        ..Default::default()
    };
    let keys = WalletKeys::from_mnemonic(PHRASE, "", Network::Mainnet).unwrap();
    let wallet = Wallet::new(chain.clone(), keys, config).unwrap();
    let me = wallet.address().unwrap();
    chain.add_utxo(
        &me.address_string,
        Utxo::new(Hash::new([1; 32]), 0, me.to_script(), 1_000_000, 6),
    );

    let mut mined = 0;
    let deploy = wallet
        .deploy_zrc20(Zrc20DeployArgs {
            ticker: "TICK".into(),
            max_supply: 1_000,
            mint_limit: 100,
            decimals: 0,
            mint_price: 0,
            deployer: None,
        })
        .await
        .unwrap();
    mine(&chain, 1, &mut mined);

    wallet
        .mint_zrc20(Zrc20MintArgs { deploy_txid: deploy.txid.clone(), amount: 100, payment: None })
        .await
        .unwrap();
    mine(&chain, 2, &mut mined);

    wallet
        .transfer_zrc20(Zrc20TransferArgs { deploy_txid: deploy.txid.clone(), amount: 40, to: friend.clone() })
        .await
        .unwrap();
    mine(&chain, 3, &mut mined);

    let config = IndexerConfig {
        protocol: ProtocolConfig { treasury_address: Some(treasury), start_height: 1 },
        cooldown_ms: 1,
        ..Default::default()
    };
    let mut indexer = Indexer::new(chain.clone(), Arc::new(MemoryStore::new()), config);
    let report = indexer.scan_once(&CancellationToken::new()).await.unwrap();

    assert_eq!(report.inscriptions, 3);
    assert_eq!(indexer.deploy("TICK").unwrap().unwrap().deploy_txid, deploy.txid);
    // Senders are recovered from the scriptSig public key.
    assert_eq!(indexer.balance(&me.address_string, "TICK").unwrap(), 60);
    assert_eq!(indexer.balance(&friend, "TICK").unwrap(), 40);
    assert_eq!(indexer.minted("TICK").unwrap(), 100);
}
