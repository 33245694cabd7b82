//! Greedy largest-first UTXO selection.

use crate::fee::FeeModel;
use crate::utxo::Utxo;
use crate::TransactionError;

/// Outcome of a successful selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Chosen UTXOs, largest first.
    pub utxos: Vec<Utxo>,
    /// Sum of the chosen values.
    pub total: u64,
    /// Fee for the chosen input count.
    pub fee: u64,
    /// `total - outputs - fee`; zero or at least the dust threshold.
    pub change: u64,
}

/// Select UTXOs covering `target` plus fee.
///
/// Candidates are sorted by value, descending, and accumulated one by one.
/// After each addition the fee is recomputed for the current input count and
/// `fixed_outputs` plus one change output. Selection stops once the total
/// covers `target + fee` and the leftover change is either zero or at least
/// the dust threshold.
///
/// A total that exactly covers `target` and the fee without a change output
/// also succeeds, at that lower fee. When the leftover exactly equals the
/// change output's share of the fee, no change output is emitted and the
/// leftover is paid as fee: returning it would need the output it pays for.
///
/// # Arguments
/// * `candidates` - Available UTXOs. Zero-value ones and those with fewer
///   than `min_confirmations` confirmations are ignored.
/// * `target` - Sum of every non-change output value.
/// * `fixed_outputs` - Number of non-change outputs.
/// * `fee_model` - Fee parameters.
/// * `min_confirmations` - Confirmation floor.
///
/// # Returns
/// The selection, or `InsufficientFunds` once candidates are exhausted.
pub fn select_utxos(
    candidates: &[Utxo],
    target: u64,
    fixed_outputs: usize,
    fee_model: &FeeModel,
    min_confirmations: u32,
) -> Result<Selection, TransactionError> {
    let mut usable: Vec<&Utxo> = candidates
        .iter()
        .filter(|u| u.value > 0 && u.confirmations >= min_confirmations)
        .collect();
    usable.sort_by(|a, b| b.value.cmp(&a.value));

    let mut chosen = Vec::new();
    let mut total = 0u64;
    let mut needed = target.saturating_add(fee_model.fee(1, fixed_outputs + 1));

    for utxo in usable {
        chosen.push(utxo.clone());
        total = total.saturating_add(utxo.value);

        let bare_fee = fee_model.fee(chosen.len(), fixed_outputs);
        if total == target.saturating_add(bare_fee) {
            return Ok(Selection {
                utxos: chosen,
                total,
                fee: bare_fee,
                change: 0,
            });
        }

        let fee = fee_model.fee(chosen.len(), fixed_outputs + 1);
        needed = target.saturating_add(fee);
        if total < needed {
            continue;
        }
        let change = total - needed;
        if fee_model.is_valid_change(change) {
            return Ok(Selection {
                utxos: chosen,
                total,
                fee,
                change,
            });
        }
    }

    Err(TransactionError::InsufficientFunds {
        needed,
        available: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use zinc_primitives::chainhash::Hash;
    use zinc_script::Script;

    fn utxo(tag: u8, value: u64) -> Utxo {
        Utxo::new(Hash::new([tag; 32]), 0, Script::p2pkh(&[1; 20]), value, 1)
    }

    fn pool() -> Vec<Utxo> {
        vec![utxo(1, 100_000), utxo(2, 500_000), utxo(3, 300_000)]
    }

    #[test]
    fn test_largest_first_suffices() {
        let model = FeeModel::default();
        let sel = select_utxos(&pool(), 400_000, 2, &model, 0).unwrap();
        assert_eq!(sel.utxos.len(), 1);
        assert_eq!(sel.utxos[0].value, 500_000);
        assert_eq!(sel.fee, 15_000);
        assert_eq!(sel.change, 85_000);
    }

    #[test]
    fn test_second_added_only_when_needed() {
        let model = FeeModel::default();
        let sel = select_utxos(&pool(), 491_000, 2, &model, 0).unwrap();
        let values: Vec<u64> = sel.utxos.iter().map(|u| u.value).collect();
        assert_eq!(values, vec![500_000, 300_000]);
        assert_eq!(sel.change, 800_000 - 491_000 - 15_000);
    }

    #[test]
    fn test_dust_change_forces_another_input() {
        let model = FeeModel::default();
        // 500000 - 15000 - 484900 = 100 zatoshi change, which is dust.
        let sel = select_utxos(&pool(), 484_900, 2, &model, 0).unwrap();
        assert_eq!(sel.utxos.len(), 2);
        assert!(model.is_valid_change(sel.change));
    }

    #[test]
    fn test_exact_change_zero() {
        let model = FeeModel::default();
        let sel = select_utxos(&pool(), 485_000, 2, &model, 0).unwrap();
        assert_eq!(sel.utxos.len(), 1);
        assert_eq!(sel.change, 0);
        // The leftover equals the change output's fee share.
        assert_eq!(sel.fee, 15_000);
    }

    #[test]
    fn test_exact_cover_without_change_uses_real_output_count() {
        let model = FeeModel::default();
        // Two outputs and one input cost 10000; a change output would make it 15000.
        let sel = select_utxos(&pool(), 490_000, 2, &model, 0).unwrap();
        assert_eq!(sel.utxos.len(), 1);
        assert_eq!(sel.fee, 10_000);
        assert_eq!(sel.change, 0);

        // With three outputs the same input no longer covers it exactly.
        let sel = select_utxos(&pool(), 490_000, 3, &model, 0).unwrap();
        assert_eq!(sel.utxos.len(), 2);
        assert_eq!(sel.fee, 20_000);
    }

    #[test]
    fn test_insufficient() {
        let model = FeeModel::default();
        let err = select_utxos(&pool(), 1_000_000, 1, &model, 0).unwrap_err();
        match err {
            TransactionError::InsufficientFunds { needed, available } => {
                assert_eq!(available, 900_000);
                assert_eq!(needed, 1_015_000);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_filters_zero_and_unconfirmed() {
        let model = FeeModel::default();
        let mut candidates = vec![utxo(9, 0)];
        let mut fresh = utxo(8, 1_000_000);
        fresh.confirmations = 0;
        candidates.push(fresh);
        candidates.push(utxo(7, 50_000));

        let sel = select_utxos(&candidates, 10_000, 1, &model, 1).unwrap();
        assert_eq!(sel.utxos.len(), 1);
        assert_eq!(sel.utxos[0].value, 50_000);

        assert!(select_utxos(&[utxo(9, 0)], 1, 1, &model, 0).is_err());
    }
}
