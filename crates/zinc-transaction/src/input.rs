//! Transaction input referencing a previous output.
//!
//! Carries the spent outpoint, unlocking script and sequence number, plus an
//! optional local copy of the spent output so that signature digests can be
//! computed without the source transaction.

use zinc_primitives::chainhash::Hash;
use zinc_primitives::util::{CompactSize, WireReader, WireWriter};
use zinc_script::Script;

use crate::output::TransactionOutput;
use crate::utxo::Utxo;
use crate::TransactionError;

/// Sequence number for finalized inputs. Every built input uses it.
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// A single transparent input.
///
/// # Wire format
///
/// | Field              | Size             |
/// |--------------------|------------------|
/// | source_txid        | 32 bytes (LE)    |
/// | source_tx_out_index| 4 bytes (LE)     |
/// | script length      | CompactSize      |
/// | unlocking_script   | variable         |
/// | sequence_number    | 4 bytes (LE)     |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionInput {
    /// Txid of the spent output, internal byte order.
    pub source_txid: [u8; 32],

    /// Index of the output within the source transaction.
    pub source_tx_out_index: u32,

    /// Sequence number. Defaults to `0xFFFFFFFF`.
    pub sequence_number: u32,

    /// The unlocking script. `None` until signed.
    pub unlocking_script: Option<Script>,

    /// The output being spent, needed for the signature digest.
    source_output: Option<TransactionOutput>,
}

impl TransactionInput {
    /// Create an unsigned input spending `txid:vout`.
    pub fn new(source_txid: [u8; 32], source_tx_out_index: u32) -> Self {
        TransactionInput {
            source_txid,
            source_tx_out_index,
            sequence_number: DEFAULT_SEQUENCE_NUMBER,
            unlocking_script: None,
            source_output: None,
        }
    }

    /// Create an unsigned input from a UTXO, remembering its script and value.
    pub fn from_utxo(utxo: &Utxo) -> Self {
        let mut input = Self::new(*utxo.txid.as_bytes(), utxo.output_index);
        input.source_output = Some(TransactionOutput::new(utxo.value, utxo.script.clone()));
        input
    }

    /// Deserialize an input from a `WireReader`.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of an encoded input.
    ///
    /// # Returns
    /// `Ok(TransactionInput)` on success, or a `SerializationError` if the
    /// data is truncated.
    pub fn read_from(reader: &mut WireReader) -> Result<Self, TransactionError> {
        let source_txid = reader.read_array::<32>().map_err(|e| {
            TransactionError::SerializationError(format!("reading source txid: {}", e))
        })?;

        let source_tx_out_index = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading output index: {}", e))
        })?;

        let script_bytes = reader.read_var_bytes().map_err(|e| {
            TransactionError::SerializationError(format!("reading unlocking script: {}", e))
        })?;

        let sequence_number = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading sequence number: {}", e))
        })?;

        let unlocking_script = if script_bytes.is_empty() {
            None
        } else {
            Some(Script::from_bytes(script_bytes))
        };

        Ok(TransactionInput {
            source_txid,
            source_tx_out_index,
            sequence_number,
            unlocking_script,
            source_output: None,
        })
    }

    /// Serialize this input into a `WireWriter`.
    pub fn write_to(&self, writer: &mut WireWriter) {
        self.write_outpoint(writer);
        match &self.unlocking_script {
            Some(script) => {
                let script_bytes = script.to_bytes();
                writer.write_compact_size(CompactSize::from(script_bytes.len()));
                writer.write_bytes(script_bytes);
            }
            None => writer.write_compact_size(CompactSize(0)),
        }
        writer.write_u32_le(self.sequence_number);
    }

    /// Write the 36-byte outpoint (txid then index).
    pub fn write_outpoint(&self, writer: &mut WireWriter) {
        writer.write_bytes(&self.source_txid);
        writer.write_u32_le(self.source_tx_out_index);
    }

    /// The spent txid as a display-order hash.
    pub fn source_hash(&self) -> Hash {
        Hash::new(self.source_txid)
    }

    /// Attach (or clear) the output being spent.
    pub fn set_source_output(&mut self, output: Option<TransactionOutput>) {
        self.source_output = output;
    }

    /// The output being spent, if known.
    pub fn source_tx_output(&self) -> Option<&TransactionOutput> {
        self.source_output.as_ref()
    }

    /// Value of the output being spent, if known.
    pub fn source_value(&self) -> Option<u64> {
        self.source_output.as_ref().map(|o| o.value)
    }
}
