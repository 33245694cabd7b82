use proptest::prelude::*;

use zinc_inscription::envelope::{build_envelope, decode_envelope};
use zinc_inscription::zinc::{carrier_script, decode as decode_zinc, encode};
use zinc_inscription::{
    decode, CollectionDeploy, ContentProtocol, Inscription, NftMint, Ticker, Zrc20Deploy,
    Zrc20Mint, Zrc20Transfer, ZincOp,
};
use zinc_primitives::chainhash::Hash;

fn arb_ticker() -> impl Strategy<Value = Ticker> {
    "[A-Z0-9]{1,10}".prop_map(|s| Ticker::new(&s).unwrap())
}

fn arb_hash() -> impl Strategy<Value = Hash> {
    prop::array::uniform32(any::<u8>()).prop_map(Hash::new)
}

fn arb_op() -> impl Strategy<Value = ZincOp> {
    let deploy = (
        arb_ticker(),
        1u64..=u64::MAX,
        any::<u64>(),
        any::<u8>(),
        any::<u64>(),
        prop::option::of("t1[1-9A-HJ-NP-Za-km-z]{33}"),
    )
        .prop_map(|(ticker, max_supply, lim, decimals, mint_price, deployer)| {
            ZincOp::Zrc20Deploy(Zrc20Deploy {
                ticker,
                max_supply,
                mint_limit: lim % max_supply + 1,
                decimals,
                mint_price,
                deployer,
            })
        });
    let mint = (arb_hash(), 1u64..=u64::MAX)
        .prop_map(|(deploy_txid, amount)| ZincOp::Zrc20Mint(Zrc20Mint { deploy_txid, amount }));
    let transfer = (arb_hash(), 1u64..=u64::MAX)
        .prop_map(|(deploy_txid, amount)| ZincOp::Zrc20Transfer(Zrc20Transfer { deploy_txid, amount }));
    let collection = ("[a-zA-Z0-9 ]{1,64}", prop::option::of(any::<u32>()))
        .prop_map(|(name, meta)| {
            ZincOp::CollectionDeploy(CollectionDeploy {
                name,
                metadata: meta.map(|m| format!("{{\"n\":{}}}", m)),
            })
        });
    let nft = (
        arb_hash(),
        prop_oneof![
            Just(ContentProtocol::Inline),
            Just(ContentProtocol::Ipfs),
            Just(ContentProtocol::Url)
        ],
        prop::collection::vec(any::<u8>(), 1..2048),
        "[a-z]{1,20}/[a-z0-9.+-]{1,40}",
    )
        .prop_map(|(collection_txid, content_protocol, content, mime)| {
            ZincOp::NftMint(NftMint {
                collection_txid,
                content_protocol,
                content,
                mime,
            })
        });
    prop_oneof![deploy, mint, transfer, collection, nft]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn zinc_roundtrip(op in arb_op()) {
        let payload = encode(&op).unwrap();
        prop_assert_eq!(decode_zinc(&payload).unwrap(), Some(op.clone()));
        let script = carrier_script(&op).unwrap();
        prop_assert_eq!(decode(script.to_bytes()), Some(Inscription::Zinc(op)));
    }

    #[test]
    fn envelope_roundtrip(
        content in prop::collection::vec(any::<u8>(), 0..3000),
        ctype in "[a-z]{1,12}/[a-z]{1,12}",
    ) {
        let script = build_envelope(&ctype, &content).unwrap();
        let decoded = decode_envelope(script.to_bytes()).unwrap().unwrap();
        prop_assert_eq!(decoded.content_type, ctype);
        prop_assert_eq!(decoded.content, content);
    }

    #[test]
    fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode(&bytes);
    }
}
