//! BIP-44 account keys.
//!
//! WalletKeys holds the external chain node `m/44'/coin'/account'/0` of a
//! mnemonic-derived tree and hands out the signing key and P2PKH address at
//! each address index below it.

use zinc_primitives::bip32::{ChildNumber, DerivationPath, ExtendedPrivateKey};
use zinc_primitives::bip39::mnemonic_to_seed;
use zinc_primitives::ec::PrivateKey;
use zinc_script::{Address, Network};

use crate::error::WalletError;

/// External (receiving) chain index under the account node.
const EXTERNAL_CHAIN: u32 = 0;

/// Keys for one wallet account.
#[derive(Clone, Debug)]
pub struct WalletKeys {
    external: ExtendedPrivateKey,
    network: Network,
    account: u32,
}

impl WalletKeys {
    /// Derive account 0 from a mnemonic phrase.
    ///
    /// # Arguments
    /// * `phrase` - 12 to 24 word mnemonic.
    /// * `passphrase` - Optional BIP-39 passphrase ("" when unused).
    /// * `network` - Selects the coin type and address prefixes.
    ///
    /// # Returns
    /// The account keys, or `InvalidMnemonic` for a malformed phrase.
    pub fn from_mnemonic(phrase: &str, passphrase: &str, network: Network) -> Result<Self, WalletError> {
        let seed = mnemonic_to_seed(phrase, passphrase)?;
        Self::from_seed(&seed, network, 0)
    }

    /// Derive an account from raw seed bytes.
    ///
    /// # Arguments
    /// * `seed` - 16 to 64 bytes of BIP-32 seed.
    /// * `network` - Selects the coin type and address prefixes.
    /// * `account` - Hardened account number.
    pub fn from_seed(seed: &[u8], network: Network, account: u32) -> Result<Self, WalletError> {
        let master = ExtendedPrivateKey::new_master(seed)?;
        let account_path = DerivationPath::new(vec![
            ChildNumber::hardened(44),
            ChildNumber::hardened(network.coin_type()),
            ChildNumber::hardened(account),
            ChildNumber::normal(EXTERNAL_CHAIN),
        ]);
        let external = master.derive_path(&account_path)?;
        Ok(WalletKeys {
            external,
            network,
            account,
        })
    }

    /// The network these keys encode addresses for.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Full derivation path of the key at `index`.
    pub fn path(&self, index: u32) -> DerivationPath {
        DerivationPath::bip44(self.network.coin_type(), self.account, index)
    }

    /// Signing key at `index`.
    pub fn private_key(&self, index: u32) -> Result<PrivateKey, WalletError> {
        let child = self.external.derive_child(ChildNumber::normal(index))?;
        Ok(child.private_key().clone())
    }

    /// P2PKH address at `index`.
    pub fn address(&self, index: u32) -> Result<Address, WalletError> {
        let key = self.private_key(index)?;
        Ok(Address::from_public_key(&key.pub_key(), self.network))
    }
}
