/// Zinc SDK - Cryptographic primitives, hashing, and wire utilities.
///
/// This crate provides the foundational building blocks for the Zinc engine:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, HMAC-SHA512, personalized BLAKE2b)
/// - Chain hash type for transaction and block identification
/// - secp256k1 keys, field-arithmetic point multiplication, and low-S signatures
/// - CompactSize encoding with little-endian reader/writer
/// - Base58 and Base58Check encoding
/// - BIP-39 seed derivation and BIP-32 hierarchical key derivation

pub mod hash;
pub mod chainhash;
pub mod util;
pub mod base58;
pub mod ec;
pub mod bip39;
pub mod bip32;

mod error;
pub use error::PrimitivesError;
