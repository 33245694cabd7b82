use proptest::prelude::*;

use zinc_chain::MemoryChain;
use zinc_primitives::chainhash::Hash;
use zinc_script::{Address, Network};
use zinc_transaction::Utxo;
use zinc_wallet::{Action, SendArgs, Wallet, WalletConfig, WalletError, WalletKeys};

const PHRASE: &str =
    "legal winner thank year wave sausage worth useful legal winner thank yellow";

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().build().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn send_balances_and_leaves_no_dust(
        values in prop::collection::vec(1_000u64..200_000, 1..6),
        amount in 1u64..300_000,
    ) {
        let keys = WalletKeys::from_mnemonic(PHRASE, "", Network::Mainnet).unwrap();
        let chain = MemoryChain::new();
        let wallet = Wallet::new(chain, keys, WalletConfig::default()).unwrap();
        let address = wallet.address().unwrap();
        for (i, value) in values.iter().enumerate() {
            wallet.chain().add_utxo(
                &address.address_string,
                Utxo::new(Hash::new([i as u8; 32]), i as u32, address.to_script(), *value, 1),
            );
        }
        let to = Address::from_public_key_hash(&[9; 20], Network::Mainnet).address_string;

        let result = runtime().block_on(wallet.prepare(Action::Send(SendArgs { to, amount })));
        match result {
            Ok(prepared) => {
                let tx = &prepared.transaction;
                let spent: u64 = tx.inputs.iter().map(|i| i.source_value().unwrap()).sum();
                let paid: u64 = tx.outputs.iter().map(|o| o.value).sum();
                prop_assert_eq!(spent, paid + prepared.fee);
                prop_assert!(prepared.change == 0 || prepared.change >= 546);
                prop_assert_eq!(tx.outputs[0].value, amount);
                prop_assert!(tx.inputs.iter().all(|i| i.unlocking_script.is_some()));
            }
            Err(WalletError::Transaction(_)) => {
                // Short, or every candidate spent and the change still dust.
                let total: u64 = values.iter().sum();
                let fee = 5_000 * (values.len() as u64).max(2);
                prop_assert!(total < amount + fee + 546);
            }
            Err(e) => prop_assert!(false, "unexpected error {}", e),
        }
    }
}
