//! Version-specific wire layouts.
//!
//! Each supported transaction version is a `WireFormat` strategy that knows
//! its header, version group id, byte layout and signature digest. The
//! `Transaction` type never branches on the version itself; it looks the
//! strategy up through `TxVersion::format`.

pub mod nu5;
pub mod sapling;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zinc_primitives::util::{CompactSize, WireReader, WireWriter};

use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::transaction::Transaction;
use crate::TransactionError;

/// The overwintered flag set in the high bit of every supported header.
pub const OVERWINTERED_FLAG: u32 = 0x8000_0000;

/// Supported transparent transaction versions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TxVersion {
    /// v4, Sapling layout, ZIP-243 BLAKE2b signature digest.
    #[default]
    Sapling,
    /// v5, NU5 layout, double-SHA256 signature digest.
    Nu5,
}

impl TxVersion {
    /// The wire strategy for this version.
    pub fn format(&self) -> &'static dyn WireFormat {
        match self {
            TxVersion::Sapling => &sapling::SaplingV4,
            TxVersion::Nu5 => &nu5::Nu5V5,
        }
    }

    /// The 4-byte header (overwintered flag | version number).
    pub fn header(&self) -> u32 {
        self.format().header()
    }

    /// The version group id.
    pub fn version_group_id(&self) -> u32 {
        self.format().version_group_id()
    }

    /// The consensus branch id used when the caller does not set one.
    pub fn default_branch_id(&self) -> u32 {
        self.format().default_branch_id()
    }

    /// Map a header back to its version.
    pub fn from_header(header: u32) -> Option<TxVersion> {
        [TxVersion::Sapling, TxVersion::Nu5]
            .into_iter()
            .find(|v| v.header() == header)
    }
}

impl FromStr for TxVersion {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sapling" | "v4" | "4" => Ok(TxVersion::Sapling),
            "nu5" | "v5" | "5" => Ok(TxVersion::Nu5),
            other => Err(TransactionError::InvalidTransaction(format!(
                "unknown transaction version '{}'",
                other
            ))),
        }
    }
}

/// A transaction wire layout together with its signature digest.
pub trait WireFormat: Send + Sync {
    /// Which version this strategy implements.
    fn version(&self) -> TxVersion;

    /// The 4-byte header written first.
    fn header(&self) -> u32;

    /// The version group id written after the header.
    fn version_group_id(&self) -> u32;

    /// Branch id used when none is configured.
    fn default_branch_id(&self) -> u32;

    /// Serialize the full transaction.
    fn write(&self, tx: &Transaction, writer: &mut WireWriter);

    /// Parse the remainder of a transaction whose header and version group id
    /// have already been read and matched to this strategy.
    fn read_body(&self, reader: &mut WireReader) -> Result<Transaction, TransactionError>;

    /// Compute the 32-byte digest signed for one input.
    ///
    /// # Arguments
    /// * `tx` - The transaction being signed.
    /// * `input_index` - Index of the input being signed.
    /// * `script_code` - Locking script of the output being spent.
    /// * `value` - Value of the output being spent.
    fn signature_hash(
        &self,
        tx: &Transaction,
        input_index: usize,
        script_code: &[u8],
        value: u64,
    ) -> Result<[u8; 32], TransactionError>;
}

fn ser_err(context: &'static str) -> impl Fn(zinc_primitives::PrimitivesError) -> TransactionError {
    move |e| TransactionError::SerializationError(format!("reading {}: {}", context, e))
}

pub(crate) fn write_inputs(inputs: &[TransactionInput], writer: &mut WireWriter) {
    writer.write_compact_size(CompactSize::from(inputs.len()));
    for input in inputs {
        input.write_to(writer);
    }
}

pub(crate) fn write_outputs(outputs: &[TransactionOutput], writer: &mut WireWriter) {
    writer.write_compact_size(CompactSize::from(outputs.len()));
    for output in outputs {
        output.write_to(writer);
    }
}

pub(crate) fn read_inputs(reader: &mut WireReader) -> Result<Vec<TransactionInput>, TransactionError> {
    let count = reader.read_compact_size().map_err(ser_err("input count"))?.value();
    // Each input is at least 41 bytes; reject counts the buffer cannot hold.
    if count > (reader.remaining() / 41) as u64 {
        return Err(TransactionError::SerializationError(format!(
            "input count {} exceeds remaining data",
            count
        )));
    }
    (0..count).map(|_| TransactionInput::read_from(reader)).collect()
}

pub(crate) fn read_outputs(reader: &mut WireReader) -> Result<Vec<TransactionOutput>, TransactionError> {
    let count = reader.read_compact_size().map_err(ser_err("output count"))?.value();
    if count > (reader.remaining() / 9) as u64 {
        return Err(TransactionError::SerializationError(format!(
            "output count {} exceeds remaining data",
            count
        )));
    }
    (0..count).map(|_| TransactionOutput::read_from(reader)).collect()
}

pub(crate) fn read_u32(reader: &mut WireReader, context: &'static str) -> Result<u32, TransactionError> {
    reader.read_u32_le().map_err(ser_err(context))
}

/// Require an empty shielded bundle count.
pub(crate) fn expect_empty(reader: &mut WireReader, context: &'static str) -> Result<(), TransactionError> {
    let n = reader.read_compact_size().map_err(ser_err(context))?.value();
    if n != 0 {
        return Err(TransactionError::SerializationError(format!(
            "{} is {}; shielded components are not supported",
            context, n
        )));
    }
    Ok(())
}
