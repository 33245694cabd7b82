//! BIP-39 seed derivation.
//!
//! Phrases are parsed against the English wordlist, so an unknown word or a
//! failed checksum is rejected before any seed is derived. The seed is the
//! standard PBKDF2-HMAC-SHA512 stretch of the phrase and passphrase.

use ::bip39::{Language, Mnemonic};

use crate::PrimitivesError;

/// Length of the derived seed in bytes.
pub const SEED_LEN: usize = 64;

/// Parse a mnemonic phrase.
///
/// Whitespace between words is collapsed.
///
/// # Returns
/// The parsed mnemonic, or `InvalidMnemonic` for a bad word count, a word
/// outside the English list, or a checksum mismatch.
pub fn parse_mnemonic(phrase: &str) -> Result<Mnemonic, PrimitivesError> {
    Mnemonic::parse_in(Language::English, phrase)
        .map_err(|e| PrimitivesError::InvalidMnemonic(e.to_string()))
}

/// Derive the 64-byte BIP-39 seed from a mnemonic phrase.
///
/// # Arguments
/// * `phrase` - The mnemonic.
/// * `passphrase` - Optional extra passphrase ("" when unused).
///
/// # Returns
/// The seed bytes, or `InvalidMnemonic` if the phrase does not parse.
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<[u8; SEED_LEN], PrimitivesError> {
    Ok(parse_mnemonic(phrase)?.to_seed(passphrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON_12: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    // Trezor reference vector: all-zero entropy with passphrase "TREZOR".
    #[test]
    fn test_trezor_vector() {
        let seed = mnemonic_to_seed(ABANDON_12, "TREZOR").unwrap();
        assert_eq!(
            hex::encode(seed),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    #[test]
    fn test_whitespace_is_normalized() {
        let messy = format!("  {}\n", ABANDON_12.replace(' ', "   "));
        assert_eq!(
            mnemonic_to_seed(&messy, "").unwrap(),
            mnemonic_to_seed(ABANDON_12, "").unwrap()
        );
    }

    #[test]
    fn test_rejects_bad_word_count() {
        assert!(matches!(
            mnemonic_to_seed("abandon about", ""),
            Err(PrimitivesError::InvalidMnemonic(_))
        ));
    }

    #[test]
    fn test_rejects_bad_checksum() {
        // Twelve valid words whose last word does not carry the checksum.
        let phrase = ["abandon"; 12].join(" ");
        assert!(matches!(
            mnemonic_to_seed(&phrase, ""),
            Err(PrimitivesError::InvalidMnemonic(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_word() {
        let phrase = ["zzzz"; 12].join(" ");
        assert!(matches!(
            mnemonic_to_seed(&phrase, ""),
            Err(PrimitivesError::InvalidMnemonic(_))
        ));
        let typo = ABANDON_12.replace("about", "abuot");
        assert!(mnemonic_to_seed(&typo, "").is_err());
    }
}
