use proptest::prelude::*;

use zinc_primitives::base58::{check_decode, check_encode};
use zinc_primitives::chainhash::Hash;
use zinc_primitives::ec::curve::public_key_from_secret;
use zinc_primitives::ec::private_key::PrivateKey;
use zinc_primitives::hash::sha256;
use zinc_primitives::util::{CompactSize, WireReader, WireWriter};
use zinc_primitives::PrimitivesError;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn field_arithmetic_pubkey_matches_k256(seed in prop::array::uniform32(any::<u8>())) {
        if let Ok(secret) = k256::SecretKey::from_slice(&seed) {
            use k256::elliptic_curve::sec1::ToEncodedPoint;
            let expected = secret.public_key().to_encoded_point(true);
            let ours = public_key_from_secret(&seed).unwrap();
            prop_assert_eq!(ours.as_slice(), expected.as_bytes());
        }
    }

    #[test]
    fn sign_verify_low_s(
        seed in prop::array::uniform32(any::<u8>()),
        msg in prop::collection::vec(any::<u8>(), 0..128)
    ) {
        if let Ok(pk) = PrivateKey::from_bytes(&seed) {
            let digest = sha256(&msg);
            let sig = pk.sign(&digest).unwrap();
            prop_assert!(sig.is_low_s());
            prop_assert!(pk.pub_key().verify(&digest, &sig));
        }
    }

    #[test]
    fn address_payload_flip_breaks_checksum(
        payload in prop::collection::vec(any::<u8>(), 22..=22),
        flip_at in 0usize..22,
    ) {
        let encoded = check_encode(&payload);
        prop_assert_eq!(check_decode(&encoded).unwrap(), payload.clone());

        let mut tampered = payload.clone();
        tampered[flip_at] ^= 0x01;
        let mut raw = tampered.clone();
        raw.extend_from_slice(&zinc_primitives::hash::sha256d(&payload)[..4]);
        let forged = zinc_primitives::base58::encode(&raw);
        prop_assert!(matches!(check_decode(&forged), Err(PrimitivesError::ChecksumMismatch)));
    }

    #[test]
    fn compact_size_reads_back(value in any::<u64>()) {
        let mut w = WireWriter::new();
        w.write_compact_size(CompactSize(value));
        let bytes = w.into_bytes();
        prop_assert_eq!(bytes.len(), CompactSize(value).length());
        let mut r = WireReader::new(&bytes);
        prop_assert_eq!(r.read_compact_size().unwrap().value(), value);
    }

    #[test]
    fn hash_hex_roundtrip(bytes in prop::array::uniform32(any::<u8>())) {
        let hash = Hash::new(bytes);
        let back = Hash::from_hex(&hash.to_string()).unwrap();
        prop_assert_eq!(hash, back);
    }
}
