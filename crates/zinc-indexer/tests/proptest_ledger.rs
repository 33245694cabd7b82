use proptest::prelude::*;

use zinc_indexer::{BlockLedger, LedgerRules, MemoryStore, Store};
use zinc_indexer::types::InscriptionRecord;
use zinc_inscription::{Inscription, Ticker, ZincOp, Zrc20Deploy, Zrc20Mint, Zrc20Transfer};
use zinc_primitives::chainhash::Hash;

const HOLDERS: [&str; 3] = ["t1alice", "t1bob", "t1carol"];
const DEPLOY_TXID: &str = "00000000000000000000000000000000000000000000000000000000000000d0";

#[derive(Debug, Clone)]
enum Op {
    Mint { to: usize, amount: u64 },
    Transfer { from: usize, to: usize, amount: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..HOLDERS.len(), 0u64..150).prop_map(|(to, amount)| Op::Mint { to, amount }),
        (0..HOLDERS.len(), 0..HOLDERS.len(), 0u64..120)
            .prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
    ]
}

fn record(n: usize, op: ZincOp, sender: &str, recipient: Option<&str>) -> InscriptionRecord {
    let inscription = Inscription::Zinc(op);
    InscriptionRecord {
        txid: format!("{:064x}", n + 1),
        block_height: 0,
        family: inscription.family(),
        protocol_id: inscription.protocol_id().map(|p| p as u8),
        operation: inscription.operation_name(),
        inscription,
        sender: Some(sender.to_string()),
        recipient: recipient.map(str::to_string),
    }
}

fn deploy(max_supply: u64, mint_limit: u64) -> InscriptionRecord {
    let mut r = record(
        0,
        ZincOp::Zrc20Deploy(Zrc20Deploy {
            ticker: Ticker::new("PROP").unwrap(),
            max_supply,
            mint_limit,
            decimals: 0,
            mint_price: 0,
            deployer: None,
        }),
        HOLDERS[0],
        None,
    );
    r.txid = DEPLOY_TXID.to_string();
    r
}

fn to_record(n: usize, op: &Op) -> InscriptionRecord {
    let deploy_txid = Hash::from_hex(DEPLOY_TXID).unwrap();
    match *op {
        Op::Mint { to, amount } => record(
            n,
            ZincOp::Zrc20Mint(Zrc20Mint { deploy_txid, amount }),
            HOLDERS[to],
            Some(HOLDERS[to]),
        ),
        Op::Transfer { from, to, amount } => record(
            n,
            ZincOp::Zrc20Transfer(Zrc20Transfer { deploy_txid, amount }),
            HOLDERS[from],
            Some(HOLDERS[to]),
        ),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn strict_ledger_conserves_supply(
        max_supply in 1u64..500,
        mint_limit in 1u64..200,
        blocks in prop::collection::vec(prop::collection::vec(op_strategy(), 0..8), 1..6),
    ) {
        let store = MemoryStore::new();

        let mut first = BlockLedger::new(&store, LedgerRules::default(), 1);
        first.apply(deploy(max_supply, mint_limit)).unwrap();
        store.commit_block(&first.into_batch(1)).unwrap();

        let mut n = 1;
        for (i, ops) in blocks.iter().enumerate() {
            let height = i as u32 + 2;
            let mut ledger = BlockLedger::new(&store, LedgerRules::default(), height);
            for op in ops {
                ledger.apply(to_record(n, op)).unwrap();
                n += 1;
            }
            store.commit_block(&ledger.into_batch(u64::from(height))).unwrap();
        }

        let minted = store.minted("PROP").unwrap();
        prop_assert!(minted <= max_supply);

        let mut total = 0i128;
        for holder in HOLDERS {
            let balance = store.balance(holder, "PROP").unwrap();
            prop_assert!(balance >= 0, "{} went negative: {}", holder, balance);
            total += balance;
        }
        prop_assert_eq!(total, i128::from(minted));
    }

    #[test]
    fn replayed_records_are_ignored(ops in prop::collection::vec(op_strategy(), 1..10)) {
        let store = MemoryStore::new();
        let mut ledger = BlockLedger::new(&store, LedgerRules::default(), 1);
        ledger.apply(deploy(1_000, 100)).unwrap();
        for (n, op) in ops.iter().enumerate() {
            ledger.apply(to_record(n + 1, op)).unwrap();
        }
        store.commit_block(&ledger.into_batch(1)).unwrap();
        let before: Vec<i128> = HOLDERS.iter().map(|h| store.balance(h, "PROP").unwrap()).collect();

        let mut replay = BlockLedger::new(&store, LedgerRules::default(), 2);
        for (n, op) in ops.iter().enumerate() {
            prop_assert_eq!(
                replay.apply(to_record(n + 1, op)).unwrap(),
                zinc_indexer::LedgerOutcome::Duplicate
            );
        }
        let batch = replay.into_batch(2);
        prop_assert!(batch.inscriptions.is_empty());
        prop_assert!(batch.balances.is_empty());
        store.commit_block(&batch).unwrap();

        let after: Vec<i128> = HOLDERS.iter().map(|h| store.balance(h, "PROP").unwrap()).collect();
        prop_assert_eq!(before, after);
    }
}
