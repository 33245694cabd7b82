//! secp256k1 private key.
//!
//! Wraps a k256 signing key for RFC 6979 signing. The matching public key is
//! computed once at construction through the field-arithmetic multiplier in
//! `ec::curve`, so there is a single derivation path for public keys.

use k256::ecdsa::SigningKey;
use zeroize::Zeroize;

use crate::ec::curve::public_key_from_secret;
use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::hash::sha256d;
use crate::PrimitivesError;

/// Length of a serialized private key in bytes.
const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// WIF prefix for mainnet keys.
pub const WIF_MAINNET_PREFIX: u8 = 0x80;

/// WIF prefix for testnet keys.
pub const WIF_TESTNET_PREFIX: u8 = 0xef;

/// Compression flag appended to WIF payloads.
const COMPRESS_MAGIC: u8 = 0x01;

/// A secp256k1 private key paired with its compressed public key.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SigningKey,
    public: PublicKey,
}

impl PrivateKey {
    /// Create a private key from a raw 32-byte big-endian scalar.
    ///
    /// # Arguments
    /// * `bytes` - A 32-byte slice holding the scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` if the scalar is in `[1, n)`, or an error otherwise.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let mut secret: [u8; PRIVATE_KEY_BYTES_LEN] = bytes.try_into().map_err(|_| {
            PrimitivesError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_BYTES_LEN,
                bytes.len()
            ))
        })?;
        let inner = SigningKey::from_bytes((&secret).into())
            .map_err(|e| PrimitivesError::InvalidPrivateKey(e.to_string()));
        let compressed = public_key_from_secret(&secret);
        secret.zeroize();

        let public = PublicKey::from_bytes(&compressed?)?;
        Ok(PrivateKey { inner: inner?, public })
    }

    /// Create a private key from a 64-character hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Err(PrimitivesError::InvalidPrivateKey(
                "private key hex is empty".to_string(),
            ));
        }
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Parse a compressed-key WIF string.
    ///
    /// # Arguments
    /// * `wif` - Base58Check string of `prefix || key || 0x01`.
    ///
    /// # Returns
    /// The key, or an error for a bad checksum, length or compression flag.
    pub fn from_wif(wif: &str) -> Result<Self, PrimitivesError> {
        let payload = crate::base58::check_decode(wif).map_err(|e| match e {
            PrimitivesError::ChecksumMismatch => e,
            other => PrimitivesError::InvalidWif(other.to_string()),
        })?;
        if payload.len() != 1 + PRIVATE_KEY_BYTES_LEN + 1 {
            return Err(PrimitivesError::InvalidWif(format!(
                "malformed private key: invalid length {}",
                payload.len()
            )));
        }
        if payload[0] != WIF_MAINNET_PREFIX && payload[0] != WIF_TESTNET_PREFIX {
            return Err(PrimitivesError::InvalidWif(format!(
                "unknown prefix {:#04x}",
                payload[0]
            )));
        }
        if payload[33] != COMPRESS_MAGIC {
            return Err(PrimitivesError::InvalidWif(
                "malformed private key: invalid compression flag".to_string(),
            ));
        }
        Self::from_bytes(&payload[1..33])
    }

    /// Encode as a compressed-key WIF string.
    ///
    /// # Arguments
    /// * `prefix` - `WIF_MAINNET_PREFIX` or `WIF_TESTNET_PREFIX`.
    pub fn to_wif(&self, prefix: u8) -> String {
        let mut payload = Vec::with_capacity(1 + PRIVATE_KEY_BYTES_LEN + 1 + 4);
        payload.push(prefix);
        payload.extend_from_slice(&self.to_bytes());
        payload.push(COMPRESS_MAGIC);
        let checksum = sha256d(&payload);
        payload.extend_from_slice(&checksum[..4]);
        let encoded = bs58::encode(&payload).into_string();
        payload.zeroize();
        encoded
    }

    /// Serialize the scalar as 32 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes().into()
    }

    /// Serialize the scalar as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Return the public key for this private key.
    pub fn pub_key(&self) -> PublicKey {
        self.public.clone()
    }

    /// Sign a 32-byte digest with a deterministic RFC 6979 nonce.
    ///
    /// The resulting signature is low-S normalized.
    ///
    /// # Arguments
    /// * `hash` - The digest to sign.
    ///
    /// # Returns
    /// `Ok(Signature)` on success, or an error if signing fails.
    pub fn sign(&self, hash: &[u8; 32]) -> Result<Signature, PrimitivesError> {
        Signature::sign(hash, self)
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public", &self.public.to_hex())
            .finish_non_exhaustive()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}
