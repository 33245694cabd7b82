/// Zinc SDK - Wallet keys and inscription actions.
///
/// Derives BIP-44 account keys from a mnemonic and drives each wallet
/// action (payment, ZRC-20 deploy/mint/transfer, NFT collection and mint,
/// Zerdinals inscription) through UTXO fetch, build, sign and broadcast.

mod error;
pub use error::WalletError;

pub mod keys;
pub mod types;
pub mod wallet;

pub use keys::WalletKeys;
pub use types::{
    Action, ActionReceipt, CollectionDeployArgs, InscribeArgs, MintPayment, NftMintArgs,
    PreparedAction, SendArgs, TreasuryTip, WalletConfig, Zrc20DeployArgs, Zrc20MintArgs,
    Zrc20TransferArgs,
};
pub use wallet::Wallet;
