/// Transparent address handling.
///
/// A transparent address is Base58Check over a two-byte version prefix and
/// a 20-byte hash. The prefix selects both network and kind: `t1` / `tm`
/// addresses pay to a public key hash, `t3` / `t2` to a script hash.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zinc_primitives::base58;
use zinc_primitives::ec::PublicKey;
use zinc_primitives::PrimitivesError;

use crate::{Script, ScriptError};

/// Length of the version prefix plus hash.
pub const ADDRESS_PAYLOAD_LEN: usize = 22;

const MAINNET_P2PKH: [u8; 2] = [0x1c, 0xb8];
const MAINNET_P2SH: [u8; 2] = [0x1c, 0xbd];
const TESTNET_P2PKH: [u8; 2] = [0x1d, 0x25];
const TESTNET_P2SH: [u8; 2] = [0x1c, 0xba];

/// Network type for address prefix selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production chain (`t1...` / `t3...`).
    #[default]
    Mainnet,
    /// Test chain (`tm...` / `t2...`).
    Testnet,
}

impl Network {
    /// Two-byte version prefix for pay-to-public-key-hash addresses.
    pub fn p2pkh_prefix(&self) -> [u8; 2] {
        match self {
            Network::Mainnet => MAINNET_P2PKH,
            Network::Testnet => TESTNET_P2PKH,
        }
    }

    /// Two-byte version prefix for pay-to-script-hash addresses.
    pub fn p2sh_prefix(&self) -> [u8; 2] {
        match self {
            Network::Mainnet => MAINNET_P2SH,
            Network::Testnet => TESTNET_P2SH,
        }
    }

    /// SLIP-44 coin type used in the BIP-44 account path.
    pub fn coin_type(&self) -> u32 {
        match self {
            Network::Mainnet => 133,
            Network::Testnet => 1,
        }
    }
}

impl FromStr for Network {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Network::Mainnet),
            "testnet" | "test" => Ok(Network::Testnet),
            other => Err(ScriptError::InvalidAddress(format!("unknown network '{}'", other))),
        }
    }
}

/// What the address hash commits to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// Hash160 of a compressed public key.
    P2pkh,
    /// Hash160 of a redeem script.
    P2sh,
}

/// A decoded transparent address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    /// The Base58Check string.
    pub address_string: String,
    /// The 20-byte hash.
    pub hash: [u8; 20],
    /// Public key hash or script hash.
    pub kind: AddressKind,
    /// The network the prefix belongs to.
    pub network: Network,
}

/// Base58Check-encode a raw 22-byte address payload.
///
/// # Arguments
/// * `payload` - Two-byte version prefix followed by a 20-byte hash.
///
/// # Returns
/// The address string.
pub fn encode_payload(payload: &[u8; ADDRESS_PAYLOAD_LEN]) -> String {
    base58::check_encode(payload)
}

/// Decode an address string to its raw 22-byte payload.
///
/// The prefix is not interpreted, so any two-byte version round-trips.
///
/// # Arguments
/// * `addr` - The Base58Check string.
///
/// # Returns
/// The payload, `EncodingChecksumFailed` if the checksum does not match, or
/// `InvalidAddressLength` for the wrong payload size.
pub fn decode_payload(addr: &str) -> Result<[u8; ADDRESS_PAYLOAD_LEN], ScriptError> {
    let payload = base58::check_decode(addr).map_err(|e| match e {
        PrimitivesError::ChecksumMismatch => ScriptError::EncodingChecksumFailed,
        other => ScriptError::InvalidAddress(format!("{} for '{}'", other, addr)),
    })?;
    payload
        .as_slice()
        .try_into()
        .map_err(|_| ScriptError::InvalidAddressLength(addr.to_string()))
}

impl Address {
    /// Parse and classify an address string.
    ///
    /// # Arguments
    /// * `addr` - The Base58Check address.
    ///
    /// # Returns
    /// An `Address`, or an error for bad encoding, checksum, length or prefix.
    pub fn from_string(addr: &str) -> Result<Self, ScriptError> {
        let payload = decode_payload(addr)?;
        let prefix = [payload[0], payload[1]];
        let (kind, network) = match prefix {
            MAINNET_P2PKH => (AddressKind::P2pkh, Network::Mainnet),
            MAINNET_P2SH => (AddressKind::P2sh, Network::Mainnet),
            TESTNET_P2PKH => (AddressKind::P2pkh, Network::Testnet),
            TESTNET_P2SH => (AddressKind::P2sh, Network::Testnet),
            _ => return Err(ScriptError::EncodingInvalidVersion(prefix[0], prefix[1])),
        };
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&payload[2..]);
        Ok(Address {
            address_string: addr.to_string(),
            hash,
            kind,
            network,
        })
    }

    /// Build a P2PKH address from a public key hash.
    pub fn from_public_key_hash(hash: &[u8; 20], network: Network) -> Self {
        Self::build(AddressKind::P2pkh, hash, network)
    }

    /// Build a P2SH address from a script hash.
    pub fn from_script_hash(hash: &[u8; 20], network: Network) -> Self {
        Self::build(AddressKind::P2sh, hash, network)
    }

    /// Build the P2PKH address of a public key.
    pub fn from_public_key(key: &PublicKey, network: Network) -> Self {
        Self::from_public_key_hash(&key.hash160(), network)
    }

    /// Recover the address a locking script pays to.
    ///
    /// # Arguments
    /// * `script` - A P2PKH or P2SH locking script.
    /// * `network` - The network to encode for.
    ///
    /// # Returns
    /// The address, or `NoAddress` for any other script form.
    pub fn from_script(script: &Script, network: Network) -> Result<Self, ScriptError> {
        if let Ok(pkh) = script.public_key_hash() {
            return Ok(Self::from_public_key_hash(&pkh, network));
        }
        if let Some(sh) = script.script_hash() {
            return Ok(Self::from_script_hash(&sh, network));
        }
        Err(ScriptError::NoAddress)
    }

    /// Build the locking script that pays to this address.
    ///
    /// Drops the version prefix and wraps the hash as P2PKH or P2SH.
    pub fn to_script(&self) -> Script {
        match self.kind {
            AddressKind::P2pkh => Script::p2pkh(&self.hash),
            AddressKind::P2sh => Script::p2sh(&self.hash),
        }
    }

    /// The 22-byte prefix plus hash payload.
    pub fn payload(&self) -> [u8; ADDRESS_PAYLOAD_LEN] {
        let prefix = match self.kind {
            AddressKind::P2pkh => self.network.p2pkh_prefix(),
            AddressKind::P2sh => self.network.p2sh_prefix(),
        };
        let mut out = [0u8; ADDRESS_PAYLOAD_LEN];
        out[..2].copy_from_slice(&prefix);
        out[2..].copy_from_slice(&self.hash);
        out
    }

    fn build(kind: AddressKind, hash: &[u8; 20], network: Network) -> Self {
        let mut addr = Address {
            address_string: String::new(),
            hash: *hash,
            kind,
            network,
        };
        addr.address_string = encode_payload(&addr.payload());
        addr
    }
}

/// Convert an address string straight to its locking script.
///
/// # Arguments
/// * `addr` - A transparent address.
///
/// # Returns
/// The P2PKH or P2SH locking script.
pub fn address_to_script(addr: &str) -> Result<Script, ScriptError> {
    Ok(Address::from_string(addr)?.to_script())
}

impl FromStr for Address {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_string(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_string)
    }
}
