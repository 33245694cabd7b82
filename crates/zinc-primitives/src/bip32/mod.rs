//! BIP-32 hierarchical deterministic private key derivation.
//!
//! Only the private-parent to private-child direction (CKDpriv) is provided.
//! Parent public keys needed by non-hardened steps come from the
//! field-arithmetic multiplier, via `PrivateKey::pub_key`.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Zero;
use zeroize::Zeroize;

use crate::ec::curve::{group_order, to_fixed_32};
use crate::ec::PrivateKey;
use crate::hash::{hash160, sha512_hmac};
use crate::PrimitivesError;

/// Offset marking a hardened child index.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// HMAC key used to derive the master node from a seed.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// One step of a derivation path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChildNumber(pub u32);

impl ChildNumber {
    /// A hardened child index (`index'`).
    pub fn hardened(index: u32) -> Self {
        ChildNumber(index | HARDENED_OFFSET)
    }

    /// A normal child index.
    pub fn normal(index: u32) -> Self {
        ChildNumber(index & !HARDENED_OFFSET)
    }

    /// Whether this index is hardened.
    pub fn is_hardened(&self) -> bool {
        self.0 & HARDENED_OFFSET != 0
    }
}

/// A parsed derivation path such as `m/44'/133'/0'/0/0`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    /// Build a path from its steps.
    pub fn new(steps: Vec<ChildNumber>) -> Self {
        DerivationPath(steps)
    }

    /// The BIP-44 path `m/44'/coin'/account'/0/index`.
    ///
    /// # Arguments
    /// * `coin_type` - SLIP-44 coin type (133 for Zcash mainnet, 1 for testnets).
    /// * `account` - Account number.
    /// * `index` - External address index.
    pub fn bip44(coin_type: u32, account: u32, index: u32) -> Self {
        DerivationPath(vec![
            ChildNumber::hardened(44),
            ChildNumber::hardened(coin_type),
            ChildNumber::hardened(account),
            ChildNumber::normal(0),
            ChildNumber::normal(index),
        ])
    }

    /// The path steps.
    pub fn steps(&self) -> &[ChildNumber] {
        &self.0
    }
}

impl FromStr for DerivationPath {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        if parts.next() != Some("m") {
            return Err(PrimitivesError::InvalidDerivationPath(format!(
                "path must start with 'm': {}",
                s
            )));
        }
        let mut steps = Vec::new();
        for part in parts {
            let (digits, hardened) = match part.strip_suffix('\'').or_else(|| part.strip_suffix('h')) {
                Some(d) => (d, true),
                None => (part, false),
            };
            let index: u32 = digits.parse().map_err(|_| {
                PrimitivesError::InvalidDerivationPath(format!("bad path segment '{}'", part))
            })?;
            if index >= HARDENED_OFFSET {
                return Err(PrimitivesError::InvalidDerivationPath(format!(
                    "index out of range '{}'",
                    part
                )));
            }
            steps.push(if hardened {
                ChildNumber::hardened(index)
            } else {
                ChildNumber::normal(index)
            });
        }
        Ok(DerivationPath(steps))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for step in &self.0 {
            if step.is_hardened() {
                write!(f, "/{}'", step.0 & !HARDENED_OFFSET)?;
            } else {
                write!(f, "/{}", step.0)?;
            }
        }
        Ok(())
    }
}

/// An extended private key: a private key plus its chain code.
#[derive(Clone, Debug)]
pub struct ExtendedPrivateKey {
    private_key: PrivateKey,
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: ChildNumber,
}

impl ExtendedPrivateKey {
    /// Derive the master node from a BIP-39 seed.
    ///
    /// # Arguments
    /// * `seed` - 16 to 64 bytes of seed material.
    ///
    /// # Returns
    /// The master extended key, or an error if the seed length is out of
    /// range or the derived scalar is invalid.
    pub fn new_master(seed: &[u8]) -> Result<Self, PrimitivesError> {
        if seed.len() < 16 || seed.len() > 64 {
            return Err(PrimitivesError::InvalidPrivateKey(format!(
                "seed must be 16-64 bytes, got {}",
                seed.len()
            )));
        }
        let mut i = sha512_hmac(MASTER_HMAC_KEY, seed);
        let private_key = PrivateKey::from_bytes(&i[..32]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&i[32..]);
        i.zeroize();
        Ok(ExtendedPrivateKey {
            private_key: private_key?,
            chain_code,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_number: ChildNumber(0),
        })
    }

    /// Derive a single child (CKDpriv).
    ///
    /// # Arguments
    /// * `child` - The child index; hardened indices hash the private key,
    ///   normal ones hash the compressed public key.
    ///
    /// # Returns
    /// The child key, or an error in the (negligible) case where the
    /// derived scalar is zero or not below the group order.
    pub fn derive_child(&self, child: ChildNumber) -> Result<Self, PrimitivesError> {
        let parent_pub = self.private_key.pub_key().to_compressed();

        let mut data = Vec::with_capacity(37);
        if child.is_hardened() {
            data.push(0x00);
            data.extend_from_slice(&self.private_key.to_bytes());
        } else {
            data.extend_from_slice(&parent_pub);
        }
        data.extend_from_slice(&child.0.to_be_bytes());

        let mut i = sha512_hmac(&self.chain_code, &data);
        data.zeroize();

        let order = group_order();
        let tweak = BigUint::from_bytes_be(&i[..32]);
        if &tweak >= order {
            i.zeroize();
            return Err(PrimitivesError::InvalidPrivateKey(
                "derived tweak is not below the group order".to_string(),
            ));
        }
        let parent = BigUint::from_bytes_be(&self.private_key.to_bytes());
        let child_scalar = (tweak + parent) % order;
        if child_scalar.is_zero() {
            i.zeroize();
            return Err(PrimitivesError::InvalidPrivateKey(
                "derived child scalar is zero".to_string(),
            ));
        }
        let mut child_bytes = to_fixed_32(&child_scalar);
        let private_key = PrivateKey::from_bytes(&child_bytes);
        child_bytes.zeroize();

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&i[32..]);
        i.zeroize();

        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&hash160(&parent_pub)[..4]);

        Ok(ExtendedPrivateKey {
            private_key: private_key?,
            chain_code,
            depth: self.depth.saturating_add(1),
            parent_fingerprint,
            child_number: child,
        })
    }

    /// Walk a full derivation path from this node.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, PrimitivesError> {
        path.steps()
            .iter()
            .try_fold(self.clone(), |node, step| node.derive_child(*step))
    }

    /// The private key at this node.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// The chain code at this node.
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Depth below the master node.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// First four bytes of the parent's Hash160.
    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// The index this node was derived with.
    pub fn child_number(&self) -> ChildNumber {
        self.child_number
    }
}

impl Drop for ExtendedPrivateKey {
    fn drop(&mut self) {
        self.chain_code.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // BIP-32 test vector 1.
    const SEED_1: &str = "000102030405060708090a0b0c0d0e0f";

    #[test]
    fn test_vector_1_master() {
        let master = ExtendedPrivateKey::new_master(&hex::decode(SEED_1).unwrap()).unwrap();
        assert_eq!(
            master.private_key().to_hex(),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            hex::encode(master.chain_code()),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );
    }

    #[test]
    fn test_vector_1_hardened_child() {
        let master = ExtendedPrivateKey::new_master(&hex::decode(SEED_1).unwrap()).unwrap();
        let child = master.derive_path(&"m/0'".parse().unwrap()).unwrap();
        assert_eq!(
            child.private_key().to_hex(),
            "edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea"
        );
        assert_eq!(
            hex::encode(child.chain_code()),
            "47fdacbd0f1097043b78c63c20c34ef4ed9a111d980047ad16282c7ae6236141"
        );
        assert_eq!(child.depth(), 1);
        assert_eq!(hex::encode(child.parent_fingerprint()), "3442193e");
    }

    #[test]
    fn test_vector_1_normal_child() {
        let master = ExtendedPrivateKey::new_master(&hex::decode(SEED_1).unwrap()).unwrap();
        let child = master.derive_path(&"m/0'/1".parse().unwrap()).unwrap();
        assert_eq!(
            child.private_key().to_hex(),
            "3c6cb8d0f6a264c91ea8b5030fadaa8e538b020f0a387421a12de9319dc93368"
        );
        assert_eq!(
            child.private_key().pub_key().to_hex(),
            "03501e454bf00751f24b1b489aa925215d66af2234e3891c3b21a52bedb3cd711c"
        );
    }

    #[test]
    fn test_path_parse_and_display() {
        let path: DerivationPath = "m/44'/133'/0'/0/7".parse().unwrap();
        assert_eq!(path, DerivationPath::bip44(133, 0, 7));
        assert_eq!(path.to_string(), "m/44'/133'/0'/0/7");
        assert!("44'/0".parse::<DerivationPath>().is_err());
        assert!("m/x".parse::<DerivationPath>().is_err());
        assert!("m/2147483648".parse::<DerivationPath>().is_err());
    }
}
