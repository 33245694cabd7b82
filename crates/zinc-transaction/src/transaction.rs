//! Core transparent transaction type.
//!
//! Holds the version, branch id, inputs, outputs, lock time and expiry
//! height. Serialization, parsing and signature digests are delegated to the
//! `WireFormat` strategy of the transaction's version.

use zinc_primitives::chainhash::Hash;
use zinc_primitives::hash::sha256d;
use zinc_primitives::util::{WireReader, WireWriter};

use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::wire::TxVersion;
use crate::TransactionError;

/// A transparent-only transaction.
///
/// An unsigned transaction has `None` unlocking scripts; the signed variant
/// is the same type with every unlocking script populated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Wire layout and digest algorithm.
    pub version: TxVersion,

    /// Consensus branch id committed to by the signature digest (and, for
    /// v5, serialized in the transaction).
    pub consensus_branch_id: u32,

    /// Ordered list of transaction inputs.
    pub inputs: Vec<TransactionInput>,

    /// Ordered list of transaction outputs. Order is protocol significant.
    pub outputs: Vec<TransactionOutput>,

    /// Lock time. Zero unless set by the caller.
    pub lock_time: u32,

    /// Block height after which the transaction expires. Zero means never.
    pub expiry_height: u32,
}

impl Transaction {
    /// Create an empty transaction of the given version with its default
    /// branch id, lock time 0 and no expiry.
    ///
    /// # Arguments
    /// * `version` - The wire layout to use.
    ///
    /// # Returns
    /// A `Transaction` with no inputs or outputs.
    pub fn new(version: TxVersion) -> Self {
        Transaction {
            version,
            consensus_branch_id: version.default_branch_id(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
            expiry_height: 0,
        }
    }

    // -----------------------------------------------------------------
    // Deserialization
    // -----------------------------------------------------------------

    /// Parse a transaction from a hex-encoded string.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str).map_err(|e| {
            TransactionError::SerializationError(format!("invalid hex: {}", e))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Parse a transaction from raw bytes, detecting the version from the
    /// header.
    ///
    /// # Arguments
    /// * `bytes` - Exactly one serialized transaction.
    ///
    /// # Returns
    /// `Ok(Transaction)`, `UnsupportedVersion` for an unknown header or
    /// version group id, or a `SerializationError` for truncated, trailing
    /// or shielded data.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = WireReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(TransactionError::SerializationError(format!(
                "trailing {} bytes after transaction",
                reader.remaining()
            )));
        }
        Ok(tx)
    }

    /// Deserialize a transaction from a `WireReader`.
    pub fn read_from(reader: &mut WireReader) -> Result<Self, TransactionError> {
        let header = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading header: {}", e))
        })?;
        let group_id = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading version group id: {}", e))
        })?;

        let format = TxVersion::from_header(header)
            .map(|v| v.format())
            .filter(|f| f.version_group_id() == group_id)
            .ok_or(TransactionError::UnsupportedVersion { header, group_id })?;

        format.read_body(reader)
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// Serialize this transaction in its version's wire layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = WireWriter::with_capacity(256);
        self.version.format().write(self, &mut writer);
        writer.into_bytes()
    }

    /// Serialize this transaction to a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Return the size of this transaction in bytes.
    pub fn size(&self) -> usize {
        self.to_bytes().len()
    }

    // -----------------------------------------------------------------
    // Transaction ID
    // -----------------------------------------------------------------

    /// Compute the transaction ID (double SHA-256 of the serialized bytes).
    ///
    /// # Returns
    /// A `Hash` whose `Display` is the conventional byte-reversed hex.
    pub fn tx_id(&self) -> Hash {
        Hash::new(sha256d(&self.to_bytes()))
    }

    /// Compute the transaction ID as a display hex string.
    pub fn tx_id_hex(&self) -> String {
        self.tx_id().to_string()
    }

    // -----------------------------------------------------------------
    // Inputs and outputs
    // -----------------------------------------------------------------

    /// Append an input.
    pub fn add_input(&mut self, input: TransactionInput) {
        self.inputs.push(input);
    }

    /// Append an output.
    pub fn add_output(&mut self, output: TransactionOutput) {
        self.outputs.push(output);
    }

    /// Sum of all output values.
    pub fn total_output_value(&self) -> u64 {
        self.outputs.iter().map(|o| o.value).sum()
    }

    /// Sum of all input values from their attached source outputs.
    ///
    /// # Returns
    /// `Ok(total)`, or `InvalidTransaction` if any input lacks source info.
    pub fn total_input_value(&self) -> Result<u64, TransactionError> {
        self.inputs.iter().try_fold(0u64, |acc, input| {
            input.source_value().map(|v| acc + v).ok_or_else(|| {
                TransactionError::InvalidTransaction("missing source output on input".to_string())
            })
        })
    }

    /// Whether every input carries an unlocking script.
    pub fn is_signed(&self) -> bool {
        !self.inputs.is_empty() && self.inputs.iter().all(|i| i.unlocking_script.is_some())
    }

    // -----------------------------------------------------------------
    // Signature hash
    // -----------------------------------------------------------------

    /// Compute the signature digest for one input using its attached source
    /// output as script code and value.
    ///
    /// # Arguments
    /// * `input_index` - Index of the input being signed.
    ///
    /// # Returns
    /// The 32-byte digest, or an error if the index is out of range or the
    /// input has no source output.
    pub fn calc_input_signature_hash(&self, input_index: usize) -> Result<[u8; 32], TransactionError> {
        let input = self.inputs.get(input_index).ok_or_else(|| {
            TransactionError::InvalidTransaction(format!(
                "input index {} out of range (tx has {} inputs)",
                input_index,
                self.inputs.len()
            ))
        })?;
        let source_output = input.source_tx_output().ok_or_else(|| {
            TransactionError::SigningError("missing source output on input".to_string())
        })?;

        self.version.format().signature_hash(
            self,
            input_index,
            source_output.locking_script.to_bytes(),
            source_output.value,
        )
    }
}

impl std::fmt::Display for Transaction {
    /// Display the transaction as its hex-encoded serialization.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
