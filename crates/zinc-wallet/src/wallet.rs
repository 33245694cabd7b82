//! Wallet facade: UTXO fetch, build, sign and broadcast for each action.

use zinc_chain::ChainSource;
use zinc_inscription::envelope::build_envelope;
use zinc_inscription::zinc::encode;
use zinc_inscription::{
    CollectionDeploy, NftMint, Ticker, ZincOp, Zrc20Deploy, Zrc20Mint, Zrc20Transfer,
};
use zinc_primitives::chainhash::Hash;
use zinc_script::address::address_to_script;
use zinc_script::Address;
use zinc_transaction::{TransactionBuilder, Utxo};

use crate::error::WalletError;
use crate::keys::WalletKeys;
use crate::types::*;

/// A single-address wallet over a chain source.
///
/// Actions are validated and encoded before any chain call, so bad
/// arguments never cost a UTXO query.
pub struct Wallet<C> {
    chain: C,
    keys: WalletKeys,
    config: WalletConfig,
}

impl<C: ChainSource> Wallet<C> {
    /// Create a wallet.
    ///
    /// # Arguments
    /// * `chain` - Source of UTXOs and broadcast target.
    /// * `keys` - Account keys; must be derived for `config.network`.
    /// * `config` - Fee, version and treasury settings.
    pub fn new(chain: C, keys: WalletKeys, config: WalletConfig) -> Result<Self, WalletError> {
        if keys.network() != config.network {
            return Err(WalletError::InvalidArgument(format!(
                "keys are for {:?}, config is for {:?}",
                keys.network(),
                config.network
            )));
        }
        Ok(Wallet { chain, keys, config })
    }

    /// The wallet configuration.
    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// The chain source.
    pub fn chain(&self) -> &C {
        &self.chain
    }

    /// The funding and change address.
    pub fn address(&self) -> Result<Address, WalletError> {
        self.keys.address(self.config.address_index)
    }

    /// Unspent outputs of the funding address.
    pub async fn utxos(&self) -> Result<Vec<Utxo>, WalletError> {
        let address = self.address()?;
        Ok(self.chain.utxos(&address.address_string).await?)
    }

    /// Sum of the funding address's unspent outputs.
    pub async fn balance(&self) -> Result<u64, WalletError> {
        Ok(self.utxos().await?.iter().map(|u| u.value).sum())
    }

    /// Pay `amount` zatoshi to `to`.
    pub async fn send(&self, to: &str, amount: u64) -> Result<ActionReceipt, WalletError> {
        self.execute(Action::Send(SendArgs { to: to.to_string(), amount })).await
    }

    /// Deploy a ZRC-20 token.
    pub async fn deploy_zrc20(&self, args: Zrc20DeployArgs) -> Result<ActionReceipt, WalletError> {
        self.execute(Action::Zrc20Deploy(args)).await
    }

    /// Mint ZRC-20 tokens to the wallet's address.
    pub async fn mint_zrc20(&self, args: Zrc20MintArgs) -> Result<ActionReceipt, WalletError> {
        self.execute(Action::Zrc20Mint(args)).await
    }

    /// Transfer ZRC-20 tokens.
    pub async fn transfer_zrc20(&self, args: Zrc20TransferArgs) -> Result<ActionReceipt, WalletError> {
        self.execute(Action::Zrc20Transfer(args)).await
    }

    /// Deploy an NFT collection.
    pub async fn deploy_collection(
        &self,
        args: CollectionDeployArgs,
    ) -> Result<ActionReceipt, WalletError> {
        self.execute(Action::CollectionDeploy(args)).await
    }

    /// Mint an NFT into a collection.
    pub async fn mint_nft(&self, args: NftMintArgs) -> Result<ActionReceipt, WalletError> {
        self.execute(Action::NftMint(args)).await
    }

    /// Inscribe content in a Zerdinals envelope.
    pub async fn inscribe(&self, args: InscribeArgs) -> Result<ActionReceipt, WalletError> {
        self.execute(Action::Inscribe(args)).await
    }

    /// Prepare and broadcast `action`.
    ///
    /// # Returns
    /// The receipt with the node's txid. A node txid that differs from the
    /// locally computed one is logged, and the node's value is reported.
    pub async fn execute(&self, action: Action) -> Result<ActionReceipt, WalletError> {
        let name = action.name();
        let prepared = self.prepare(action).await?;
        let raw = prepared.transaction.to_bytes();
        let local_txid = prepared.transaction.tx_id_hex();

        let txid = self.chain.broadcast(&raw).await?;
        if txid != local_txid {
            tracing::warn!(%local_txid, node_txid = %txid, "node reported a different txid");
        }
        tracing::info!(action = name, %txid, fee = prepared.fee, "broadcast action");

        Ok(ActionReceipt {
            txid,
            fee: prepared.fee,
            change: prepared.change,
            raw_tx: prepared.transaction.to_hex(),
        })
    }

    /// Build and sign `action` without broadcasting it.
    ///
    /// # Returns
    /// The signed transaction, or a validation, selection or signing error.
    pub async fn prepare(&self, action: Action) -> Result<PreparedAction, WalletError> {
        let builder = self.builder_for(&action)?;
        let key = self.keys.private_key(self.config.address_index)?;
        let utxos = self.utxos().await?;
        tracing::debug!(action = action.name(), utxos = utxos.len(), "building action");

        let built = builder.build(&utxos)?;
        let (fee, change) = (built.fee, built.change);
        let transaction = built.sign(key)?;
        Ok(PreparedAction { transaction, fee, change })
    }

    /// Translate an action into a builder with every output but change.
    fn builder_for(&self, action: &Action) -> Result<TransactionBuilder, WalletError> {
        let mut builder = TransactionBuilder::new(self.config.tx_version)
            .fee_model(self.config.fee_model)
            .min_confirmations(self.config.min_confirmations)
            .change_to(self.address()?.to_script());
        if let Some(branch_id) = self.config.consensus_branch_id {
            builder = builder.branch_id(branch_id);
        }
        if action.is_inscription() {
            if let Some(tip) = &self.config.treasury {
                builder = builder.treasury_tip(address_to_script(&tip.address)?, tip.value);
            }
        }

        let builder = match action {
            Action::Send(args) => {
                if args.amount == 0 {
                    return Err(WalletError::InvalidArgument("send amount is zero".into()));
                }
                builder.recipient(address_to_script(&args.to)?, args.amount)
            }
            Action::Zrc20Deploy(args) => {
                if let Some(deployer) = &args.deployer {
                    Address::from_string(deployer)?;
                }
                let op = ZincOp::Zrc20Deploy(Zrc20Deploy {
                    ticker: Ticker::new(&args.ticker)?,
                    max_supply: args.max_supply,
                    mint_limit: args.mint_limit,
                    decimals: args.decimals,
                    mint_price: args.mint_price,
                    deployer: args.deployer.clone(),
                });
                builder.op_return(encode(&op)?)
            }
            Action::Zrc20Mint(args) => {
                let op = ZincOp::Zrc20Mint(Zrc20Mint {
                    deploy_txid: parse_txid(&args.deploy_txid)?,
                    amount: args.amount,
                });
                let builder = builder.op_return(encode(&op)?);
                match &args.payment {
                    Some(p) if p.value > 0 => builder.mint_payment(address_to_script(&p.address)?, p.value),
                    _ => builder,
                }
            }
            Action::Zrc20Transfer(args) => {
                let op = ZincOp::Zrc20Transfer(Zrc20Transfer {
                    deploy_txid: parse_txid(&args.deploy_txid)?,
                    amount: args.amount,
                });
                builder
                    .op_return(encode(&op)?)
                    .recipient(address_to_script(&args.to)?, self.config.fee_model.dust_threshold)
            }
            Action::CollectionDeploy(args) => {
                let op = ZincOp::CollectionDeploy(CollectionDeploy {
                    name: args.name.clone(),
                    metadata: args.metadata.clone(),
                });
                builder.op_return(encode(&op)?)
            }
            Action::NftMint(args) => {
                let op = ZincOp::NftMint(NftMint {
                    collection_txid: parse_txid(&args.collection_txid)?,
                    content_protocol: args.content_protocol,
                    content: args.content.clone(),
                    mime: args.mime.clone(),
                });
                builder.op_return(encode(&op)?)
            }
            Action::Inscribe(args) => builder.envelope(build_envelope(&args.content_type, &args.content)?),
        };
        Ok(builder)
    }
}

fn parse_txid(txid: &str) -> Result<Hash, WalletError> {
    Hash::from_hex(txid).map_err(|e| WalletError::InvalidArgument(format!("txid '{}': {}", txid, e)))
}
