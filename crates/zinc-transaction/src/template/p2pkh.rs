//! Pay-to-Public-Key-Hash (P2PKH) script template.
//!
//! Unlocking scripts have the form `<DER sig || 0x01> <compressed pubkey>`.
//! An optional envelope script is prepended to the first input only, which
//! is how Zerdinals inscriptions ride on a spend.

use zinc_primitives::ec::PrivateKey;
use zinc_script::Script;

use crate::sighash::SIGHASH_ALL;
use crate::template::UnlockingScriptTemplate;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Create a P2PKH unlocker.
///
/// # Arguments
/// * `private_key` - The key owning every input.
///
/// # Returns
/// A `P2PKH` instance implementing `UnlockingScriptTemplate`.
pub fn unlock(private_key: PrivateKey) -> P2PKH {
    P2PKH {
        private_key,
        first_input_prefix: None,
    }
}

/// P2PKH signing template.
pub struct P2PKH {
    private_key: PrivateKey,
    first_input_prefix: Option<Script>,
}

impl P2PKH {
    /// Prepend `envelope` to the unlocking script of input 0.
    pub fn with_envelope(mut self, envelope: Script) -> Self {
        self.first_input_prefix = Some(envelope);
        self
    }
}

impl UnlockingScriptTemplate for P2PKH {
    /// Sign the specified input and produce the unlocking script.
    ///
    /// The produced signature is verified against the public key and checked
    /// for low-S before it is accepted.
    fn sign(&self, tx: &Transaction, input_index: usize) -> Result<Script, TransactionError> {
        if input_index >= tx.inputs.len() {
            return Err(TransactionError::SigningError(format!(
                "input index {} out of range (tx has {} inputs)",
                input_index,
                tx.inputs.len()
            )));
        }

        let sig_hash = tx.calc_input_signature_hash(input_index)?;
        let signature = self.private_key.sign(&sig_hash)?;
        let pub_key = self.private_key.pub_key();

        if !signature.is_low_s() {
            return Err(TransactionError::SigningError(format!(
                "signature for input {} is not low-S",
                input_index
            )));
        }
        if !pub_key.verify(&sig_hash, &signature) {
            return Err(TransactionError::SigningError(format!(
                "signature for input {} does not verify",
                input_index
            )));
        }

        let der_sig = signature.to_der();
        let mut sig_buf = Vec::with_capacity(der_sig.len() + 1);
        sig_buf.extend_from_slice(&der_sig);
        sig_buf.push(SIGHASH_ALL as u8);

        let mut script = match (&self.first_input_prefix, input_index) {
            (Some(envelope), 0) => envelope.clone(),
            _ => Script::new(),
        };
        script.append_push_data(&sig_buf)?;
        script.append_push_data(&pub_key.to_compressed())?;

        Ok(script)
    }
}
