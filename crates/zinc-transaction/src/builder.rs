//! Assembles unsigned transactions for wallet actions.
//!
//! Output order is fixed and protocol significant:
//!
//! 1. inscription carrier (`OP_RETURN` for Zinc; a dust output back to the
//!    wallet for Zerdinals, whose envelope rides in input 0's unlock script)
//! 2. treasury tip
//! 3. mint price payment
//! 4. recipient (transfer dust or a plain payment)
//! 5. change
//!
//! Inputs are the selector's UTXOs verbatim with sequence `0xffffffff`.

use zinc_primitives::ec::PrivateKey;
use zinc_script::Script;

use crate::fee::FeeModel;
use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::selector::{select_utxos, Selection};
use crate::template::{p2pkh, sign_all};
use crate::transaction::Transaction;
use crate::utxo::Utxo;
use crate::wire::TxVersion;
use crate::TransactionError;

#[derive(Clone, Debug)]
enum Carrier {
    OpReturn(Vec<u8>),
    Envelope(Script),
}

/// Builder for a single wallet action.
#[derive(Clone, Debug)]
pub struct TransactionBuilder {
    version: TxVersion,
    consensus_branch_id: u32,
    lock_time: u32,
    expiry_height: u32,
    fee_model: FeeModel,
    min_confirmations: u32,
    carrier: Option<Carrier>,
    treasury_tip: Option<TransactionOutput>,
    mint_payment: Option<TransactionOutput>,
    recipient: Option<TransactionOutput>,
    change_script: Option<Script>,
}

/// An unsigned transaction plus what the selector decided.
#[derive(Clone, Debug)]
pub struct BuiltTransaction {
    /// The unsigned transaction, source outputs attached to every input.
    pub transaction: Transaction,
    /// Fee paid.
    pub fee: u64,
    /// Change returned to the wallet (zero means no change output).
    pub change: u64,
    envelope: Option<Script>,
}

impl TransactionBuilder {
    /// Start a builder for `version` with its default branch id.
    pub fn new(version: TxVersion) -> Self {
        TransactionBuilder {
            version,
            consensus_branch_id: version.default_branch_id(),
            lock_time: 0,
            expiry_height: 0,
            fee_model: FeeModel::default(),
            min_confirmations: 0,
            carrier: None,
            treasury_tip: None,
            mint_payment: None,
            recipient: None,
            change_script: None,
        }
    }

    /// Override the consensus branch id.
    pub fn branch_id(mut self, branch_id: u32) -> Self {
        self.consensus_branch_id = branch_id;
        self
    }

    /// Set the lock time.
    pub fn lock_time(mut self, lock_time: u32) -> Self {
        self.lock_time = lock_time;
        self
    }

    /// Set the expiry height (0 = no expiry).
    pub fn expiry_height(mut self, height: u32) -> Self {
        self.expiry_height = height;
        self
    }

    /// Use a non-default fee model.
    pub fn fee_model(mut self, model: FeeModel) -> Self {
        self.fee_model = model;
        self
    }

    /// Skip UTXOs with fewer confirmations.
    pub fn min_confirmations(mut self, confirmations: u32) -> Self {
        self.min_confirmations = confirmations;
        self
    }

    /// Carry `payload` in a zero-value `OP_RETURN` first output.
    pub fn op_return(mut self, payload: Vec<u8>) -> Self {
        self.carrier = Some(Carrier::OpReturn(payload));
        self
    }

    /// Carry an envelope script in the first input's unlock script.
    ///
    /// The first output becomes a dust payment back to the change script.
    pub fn envelope(mut self, envelope: Script) -> Self {
        self.carrier = Some(Carrier::Envelope(envelope));
        self
    }

    /// Pay a tip to the protocol treasury.
    pub fn treasury_tip(mut self, script: Script, value: u64) -> Self {
        self.treasury_tip = Some(TransactionOutput::new(value, script));
        self
    }

    /// Pay the deployer's mint price.
    pub fn mint_payment(mut self, script: Script, value: u64) -> Self {
        self.mint_payment = Some(TransactionOutput::new(value, script));
        self
    }

    /// Pay `value` to the recipient.
    pub fn recipient(mut self, script: Script, value: u64) -> Self {
        self.recipient = Some(TransactionOutput::new(value, script));
        self
    }

    /// Where change (and the Zerdinals carrier dust) goes.
    pub fn change_to(mut self, script: Script) -> Self {
        self.change_script = Some(script);
        self
    }

    /// The non-change outputs in protocol order.
    fn fixed_outputs(&self, change_script: &Script) -> Result<Vec<TransactionOutput>, TransactionError> {
        let mut outputs = Vec::with_capacity(5);
        match &self.carrier {
            Some(Carrier::OpReturn(payload)) => {
                outputs.push(TransactionOutput::new(0, Script::op_return(payload)?));
            }
            Some(Carrier::Envelope(_)) => {
                outputs.push(TransactionOutput::new(
                    self.fee_model.dust_threshold,
                    change_script.clone(),
                ));
            }
            None => {}
        }
        for (label, output) in [
            ("treasury tip", &self.treasury_tip),
            ("mint payment", &self.mint_payment),
            ("recipient", &self.recipient),
        ] {
            if let Some(output) = output {
                if output.value == 0 {
                    return Err(TransactionError::InvalidTransaction(format!(
                        "{} output has zero value",
                        label
                    )));
                }
                outputs.push(output.clone());
            }
        }
        Ok(outputs)
    }

    /// Select inputs and assemble the unsigned transaction.
    ///
    /// # Arguments
    /// * `utxos` - The wallet's spendable outputs.
    ///
    /// # Returns
    /// The unsigned transaction with fee and change, `InvalidTransaction` for
    /// a builder with nothing to do or no change script, or
    /// `InsufficientFunds` from the selector.
    pub fn build(&self, utxos: &[Utxo]) -> Result<BuiltTransaction, TransactionError> {
        let change_script = self.change_script.as_ref().ok_or_else(|| {
            TransactionError::InvalidTransaction("no change script set".to_string())
        })?;

        let outputs = self.fixed_outputs(change_script)?;
        if outputs.is_empty() {
            return Err(TransactionError::InvalidTransaction("no outputs".to_string()));
        }
        let target: u64 = outputs.iter().map(|o| o.value).sum();

        let Selection {
            utxos: chosen,
            fee,
            change,
            ..
        } = select_utxos(
            utxos,
            target,
            outputs.len(),
            &self.fee_model,
            self.min_confirmations,
        )?;

        let mut tx = Transaction::new(self.version);
        tx.consensus_branch_id = self.consensus_branch_id;
        tx.lock_time = self.lock_time;
        tx.expiry_height = self.expiry_height;
        for utxo in &chosen {
            tx.add_input(TransactionInput::from_utxo(utxo));
        }
        for output in outputs {
            tx.add_output(output);
        }
        if change > 0 {
            tx.add_output(TransactionOutput::change(change, change_script.clone()));
        }

        let envelope = match &self.carrier {
            Some(Carrier::Envelope(script)) => Some(script.clone()),
            _ => None,
        };

        Ok(BuiltTransaction {
            transaction: tx,
            fee,
            change,
            envelope,
        })
    }
}

impl BuiltTransaction {
    /// Sign every input with `private_key`.
    ///
    /// The envelope, if any, is prepended to input 0 only.
    ///
    /// # Returns
    /// The signed transaction, or a `SigningError`.
    pub fn sign(self, private_key: PrivateKey) -> Result<Transaction, TransactionError> {
        let template = match self.envelope {
            Some(envelope) => p2pkh::unlock(private_key).with_envelope(envelope),
            None => p2pkh::unlock(private_key),
        };
        sign_all(self.transaction, &template)
    }
}
