//! Script templates for signing transaction inputs.
//!
//! Provides the `UnlockingScriptTemplate` trait and the P2PKH implementation
//! used for every wallet-owned input.

pub mod p2pkh;

use zinc_script::Script;

use crate::transaction::Transaction;
use crate::TransactionError;

/// Trait for script templates that produce unlocking scripts.
///
/// The `sign` method receives the full transaction and the input index,
/// computes the version's signature digest, signs it, and returns the
/// unlocking script.
pub trait UnlockingScriptTemplate {
    /// Produce an unlocking script for the given input.
    ///
    /// # Arguments
    /// * `tx` - The transaction being signed.
    /// * `input_index` - The index of the input to sign.
    ///
    /// # Returns
    /// `Ok(Script)` containing the unlocking script, or an error on failure.
    fn sign(&self, tx: &Transaction, input_index: usize) -> Result<Script, TransactionError>;
}

/// Sign every input of `tx` with `template`, in order.
///
/// Digests are computed against the unsigned transaction, so the result does
/// not depend on signing order. Output order is never touched.
///
/// # Returns
/// The signed transaction, or the first signing error.
pub fn sign_all<T: UnlockingScriptTemplate>(
    mut tx: Transaction,
    template: &T,
) -> Result<Transaction, TransactionError> {
    let scripts = (0..tx.inputs.len())
        .map(|i| template.sign(&tx, i))
        .collect::<Result<Vec<_>, _>>()?;
    for (input, script) in tx.inputs.iter_mut().zip(scripts) {
        input.unlocking_script = Some(script);
    }
    Ok(tx)
}
