use proptest::prelude::*;

use zinc_primitives::chainhash::Hash;
use zinc_script::Script;
use zinc_transaction::{
    select_utxos, FeeModel, Transaction, TransactionInput, TransactionOutput, TxVersion, Utxo,
};

/// Strategy to generate a random transparent transaction.
fn arb_transaction() -> impl Strategy<Value = Transaction> {
    let arb_input = (
        prop::array::uniform32(any::<u8>()),
        any::<u32>(),
        prop::collection::vec(any::<u8>(), 1..64),
        any::<u32>(),
    )
        .prop_map(|(hash, idx, script_bytes, seq)| {
            let mut input = TransactionInput::new(hash, idx);
            input.unlocking_script = Some(Script::from_bytes(&script_bytes));
            input.sequence_number = seq;
            input
        });

    let arb_output = (any::<u64>(), prop::collection::vec(any::<u8>(), 0..64))
        .prop_map(|(value, script_bytes)| TransactionOutput::new(value, Script::from_bytes(&script_bytes)));

    (
        prop_oneof![Just(TxVersion::Sapling), Just(TxVersion::Nu5)],
        prop::collection::vec(arb_input, 1..4),
        prop::collection::vec(arb_output, 1..4),
        any::<u32>(),
        any::<u32>(),
    )
        .prop_map(|(version, inputs, outputs, lock_time, expiry)| {
            let mut tx = Transaction::new(version);
            tx.lock_time = lock_time;
            tx.expiry_height = expiry;
            for i in inputs {
                tx.add_input(i);
            }
            for o in outputs {
                tx.add_output(o);
            }
            tx
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn wire_roundtrip(tx in arb_transaction()) {
        let bytes = tx.to_bytes();
        let parsed = Transaction::from_bytes(&bytes).unwrap();
        prop_assert_eq!(parsed.to_bytes(), bytes);
        prop_assert_eq!(parsed.version, tx.version);
        prop_assert_eq!(parsed.tx_id(), tx.tx_id());
    }

    #[test]
    fn selection_change_is_zero_or_above_dust(
        values in prop::collection::vec(1u64..2_000_000, 1..8),
        target in 1u64..3_000_000,
        outputs in 1usize..5,
    ) {
        let model = FeeModel::default();
        let utxos: Vec<Utxo> = values
            .iter()
            .enumerate()
            .map(|(i, v)| Utxo::new(Hash::new([i as u8; 32]), i as u32, Script::new(), *v, 1))
            .collect();
        if let Ok(sel) = select_utxos(&utxos, target, outputs, &model, 0) {
            prop_assert!(sel.change == 0 || sel.change >= model.dust_threshold);
            prop_assert_eq!(sel.total, target + sel.fee + sel.change);
            let with_change = model.fee(sel.utxos.len(), outputs + 1);
            if sel.change > 0 {
                prop_assert_eq!(sel.fee, with_change);
            } else {
                let bare = model.fee(sel.utxos.len(), outputs);
                prop_assert!(sel.fee == bare || sel.fee == with_change);
            }
            let picked: Vec<u64> = sel.utxos.iter().map(|u| u.value).collect();
            let mut sorted = picked.clone();
            sorted.sort_unstable_by(|a, b| b.cmp(a));
            prop_assert_eq!(picked, sorted);
        }
    }
}
