//! Wallet configuration and action arguments.

use serde::{Deserialize, Serialize};
use zinc_inscription::ContentProtocol;
use zinc_script::Network;
use zinc_transaction::{FeeModel, TxVersion};

/// A fixed payment to the protocol treasury added to inscription actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryTip {
    /// Treasury address.
    pub address: String,
    /// Tip in zatoshi.
    pub value: u64,
}

/// Wallet settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Network for addresses and key derivation.
    pub network: Network,
    /// Wire format of built transactions.
    pub tx_version: TxVersion,
    /// Consensus branch id; the version's default when `None`.
    pub consensus_branch_id: Option<u32>,
    /// Fee parameters.
    pub fee_model: FeeModel,
    /// UTXOs with fewer confirmations are not spent.
    pub min_confirmations: u32,
    /// Address index that funds actions and receives change.
    pub address_index: u32,
    /// Tip added to every inscription action.
    pub treasury: Option<TreasuryTip>,
}

impl Default for WalletConfig {
    fn default() -> Self {
        WalletConfig {
            network: Network::Mainnet,
            tx_version: TxVersion::Nu5,
            consensus_branch_id: None,
            fee_model: FeeModel::default(),
            min_confirmations: 0,
            address_index: 0,
            treasury: None,
        }
    }
}

/// Plain payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendArgs {
    /// Recipient address.
    pub to: String,
    /// Amount in zatoshi.
    pub amount: u64,
}

/// ZRC-20 deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zrc20DeployArgs {
    /// 1-10 uppercase alphanumerics.
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
}

/// Payment of a deployment's mint price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintPayment {
    /// The deployer's address.
    pub address: String,
    /// Price in zatoshi.
    pub value: u64,
}

/// ZRC-20 mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zrc20MintArgs {
    /// Display-order txid of the deployment.
    pub deploy_txid: String,
    /// Amount to mint.
    pub amount: u64,
    /// Mint price owed to the deployer, if any.
    pub payment: Option<MintPayment>,
}

/// ZRC-20 transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zrc20TransferArgs {
    /// Display-order txid of the deployment.
    pub deploy_txid: String,
    /// Amount to move.
    pub amount: u64,
    /// Recipient address; receives a dust output.
    pub to: String,
}

/// NFT collection deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDeployArgs {
    /// Collection name, 1-64 bytes.
    pub name: String,
    /// Optional JSON metadata.
    pub metadata: Option<String>,
}

/// NFT mint into a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftMintArgs {
    /// Display-order txid of the collection deployment.
    pub collection_txid: String,
    /// How `content` is interpreted.
    pub content_protocol: ContentProtocol,
    /// Inline bytes, a CID or a URL.
    pub content: Vec<u8>,
    /// MIME type of the content.
    pub mime: String,
}

/// Zerdinals envelope inscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InscribeArgs {
    /// MIME type.
    pub content_type: String,
    /// Body.
    pub content: Vec<u8>,
}

/// Something the wallet can build, sign and broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Send(SendArgs),
    Zrc20Deploy(Zrc20DeployArgs),
    Zrc20Mint(Zrc20MintArgs),
    Zrc20Transfer(Zrc20TransferArgs),
    CollectionDeploy(CollectionDeployArgs),
    NftMint(NftMintArgs),
    Inscribe(InscribeArgs),
}

impl Action {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Send(_) => "send",
            Action::Zrc20Deploy(_) => "zrc20-deploy",
            Action::Zrc20Mint(_) => "zrc20-mint",
            Action::Zrc20Transfer(_) => "zrc20-transfer",
            Action::CollectionDeploy(_) => "collection-deploy",
            Action::NftMint(_) => "nft-mint",
            Action::Inscribe(_) => "inscribe",
        }
    }

    /// Whether the action carries an inscription and so pays the treasury tip.
    pub fn is_inscription(&self) -> bool {
        !matches!(self, Action::Send(_))
    }
}

/// A signed action ready for broadcast.
#[derive(Debug, Clone)]
pub struct PreparedAction {
    /// The signed transaction.
    pub transaction: zinc_transaction::Transaction,
    /// Fee paid.
    pub fee: u64,
    /// Change returned to the wallet.
    pub change: u64,
}

/// What a broadcast action produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReceipt {
    /// Txid reported by the node.
    pub txid: String,
    /// Fee paid.
    pub fee: u64,
    /// Change returned to the wallet.
    pub change: u64,
    /// Serialized transaction as hex.
    pub raw_tx: String,
}
