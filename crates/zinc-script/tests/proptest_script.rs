use proptest::prelude::*;

use zinc_script::address::{decode_payload, encode_payload, ADDRESS_PAYLOAD_LEN};
use zinc_script::chunk::{decode_script, encode_push_datas};
use zinc_script::{Address, Network, Script, ScriptError};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn script_hex_roundtrip(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let script = Script::from_bytes(&data);
        let script2 = Script::from_hex(&script.to_hex()).unwrap();
        prop_assert_eq!(script.to_bytes(), script2.to_bytes());
    }

    #[test]
    fn address_payload_roundtrip(payload in prop::array::uniform22(any::<u8>())) {
        let encoded = encode_payload(&payload);
        prop_assert_eq!(decode_payload(&encoded).unwrap(), payload);
    }

    #[test]
    fn p2pkh_address_script_roundtrip(hash in prop::array::uniform20(any::<u8>()), testnet in any::<bool>()) {
        let network = if testnet { Network::Testnet } else { Network::Mainnet };
        let addr = Address::from_public_key_hash(&hash, network);
        let script = addr.to_script();
        prop_assert!(script.is_p2pkh());
        let back = Address::from_script(&script, network).unwrap();
        prop_assert_eq!(back.address_string, addr.address_string);
    }

    #[test]
    fn checksum_byte_flip_detected(
        hash in prop::array::uniform20(any::<u8>()),
        flip_at in 0usize..(ADDRESS_PAYLOAD_LEN + 4),
        bit in 0u8..8,
    ) {
        let addr = Address::from_public_key_hash(&hash, Network::Mainnet);
        let mut raw = zinc_primitives::base58::decode(&addr.address_string).unwrap();
        raw[flip_at] ^= 1 << bit;
        let forged = zinc_primitives::base58::encode(&raw);
        prop_assert!(matches!(
            Address::from_string(&forged),
            Err(ScriptError::EncodingChecksumFailed)
        ));
    }

    #[test]
    fn minimal_pushes_decode(parts in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..600), 1..4)) {
        let refs: Vec<&[u8]> = parts.iter().map(|p| p.as_slice()).collect();
        let encoded = encode_push_datas(&refs).unwrap();
        let chunks = decode_script(&encoded).unwrap();
        prop_assert_eq!(chunks.len(), parts.len());
        for (chunk, part) in chunks.iter().zip(parts.iter()) {
            prop_assert_eq!(chunk.push_data(), Some(part.as_slice()));
        }
    }
}
