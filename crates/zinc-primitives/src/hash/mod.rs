//! Hash function primitives.
//!
//! SHA-256 and its double form back transaction ids, Base58Check checksums and
//! the current-version signature digest. RIPEMD-160 over SHA-256 produces
//! transparent address hashes. HMAC-SHA512 drives BIP-32, and personalized
//! BLAKE2b-256 drives the legacy (ZIP-243) signature digest.

use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

/// Length of a BLAKE2b personalization string in bytes.
pub const BLAKE2B_PERSONAL_LEN: usize = 16;

/// Compute SHA-256 hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte SHA-256 digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Compute SHA-256(SHA-256(data)).
///
/// Used for transaction ids and Base58Check checksums.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte double-SHA-256 digest.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute RIPEMD-160 hash of the input data.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// Compute Hash160: RIPEMD-160(SHA-256(data)).
///
/// The 20-byte hash carried in P2PKH scripts and transparent addresses.
///
/// # Arguments
/// * `data` - Byte slice to hash (normally a compressed public key).
///
/// # Returns
/// A 20-byte Hash160 digest.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

/// Compute SHA-512 hash of the input data.
pub fn sha512(data: &[u8]) -> [u8; 64] {
    let mut output = [0u8; 64];
    output.copy_from_slice(&Sha512::digest(data));
    output
}

/// Compute HMAC-SHA512 of the input data with the given key.
///
/// # Arguments
/// * `key` - The HMAC key bytes.
/// * `data` - The message bytes to authenticate.
///
/// # Returns
/// A 64-byte HMAC-SHA512 tag.
pub fn sha512_hmac(key: &[u8], data: &[u8]) -> [u8; 64] {
    type HmacSha512 = Hmac<Sha512>;
    let mut mac = HmacSha512::new_from_slice(key)
        .expect("HMAC accepts any key length");
    mac.update(data);
    let mut output = [0u8; 64];
    output.copy_from_slice(&mac.finalize().into_bytes());
    output
}

/// Compute an unkeyed BLAKE2b-256 digest under a 16-byte personalization.
///
/// # Arguments
/// * `personal` - The personalization string, e.g. `b"ZcashPrevoutHash"`.
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte BLAKE2b digest.
pub fn blake2b_256_personal(personal: &[u8; BLAKE2B_PERSONAL_LEN], data: &[u8]) -> [u8; 32] {
    let hash = blake2b_simd::Params::new()
        .hash_length(32)
        .personal(personal)
        .hash(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(hash.as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_abc() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256d_empty() {
        assert_eq!(
            hex::encode(sha256d(b"")),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn test_ripemd160_empty_string() {
        assert_eq!(
            hex::encode(ripemd160(b"")),
            "9c1185a5c5e9fc54612808977ee8f548b2258d31"
        );
    }

    #[test]
    fn test_hash160_is_ripemd_of_sha() {
        let data = b"zinc";
        assert_eq!(hash160(data), ripemd160(&sha256(data)));
    }

    #[test]
    fn test_sha512_hmac_rfc4231_case_2() {
        let tag = sha512_hmac(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            hex::encode(tag),
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
             9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        );
    }

    // An all-zero personalization is the BLAKE2b default, so the digest must
    // match plain BLAKE2b-256.
    #[test]
    fn test_blake2b_zero_personal_matches_plain() {
        let digest = blake2b_256_personal(&[0u8; 16], b"abc");
        assert_eq!(
            hex::encode(digest),
            "bddd813c634239723171ef3fee98579b94964e3bb1cb3e427262c8c068d52319"
        );
    }

    #[test]
    fn test_blake2b_personal_separates_domains() {
        let a = blake2b_256_personal(b"ZcashPrevoutHash", b"");
        let b = blake2b_256_personal(b"ZcashOutputsHash", b"");
        assert_ne!(a, b);
    }
}
