//! v4 Sapling layout with the ZIP-243 signature digest.

use zinc_primitives::util::{CompactSize, WireReader, WireWriter};

use super::{expect_empty, read_inputs, read_outputs, read_u32, write_inputs, write_outputs};
use super::{TxVersion, WireFormat, OVERWINTERED_FLAG};
use crate::sighash;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Sapling version group id.
pub const SAPLING_VERSION_GROUP_ID: u32 = 0x892F_2085;

/// NU5 consensus branch id, the default for v4 transactions.
pub const NU5_BRANCH_ID: u32 = 0xC2D6_D0B4;

/// Strategy for v4 transactions.
///
/// | Field            | Size          |
/// |------------------|---------------|
/// | header           | 4 (LE)        |
/// | version group id | 4 (LE)        |
/// | vin, vout        | variable      |
/// | lock_time        | 4 (LE)        |
/// | expiry_height    | 4 (LE)        |
/// | value_balance    | 8 (LE), zero  |
/// | nShieldedSpend   | CompactSize 0 |
/// | nShieldedOutput  | CompactSize 0 |
/// | nJoinSplit       | CompactSize 0 |
#[derive(Clone, Copy, Debug, Default)]
pub struct SaplingV4;

impl WireFormat for SaplingV4 {
    fn version(&self) -> TxVersion {
        TxVersion::Sapling
    }

    fn header(&self) -> u32 {
        OVERWINTERED_FLAG | 4
    }

    fn version_group_id(&self) -> u32 {
        SAPLING_VERSION_GROUP_ID
    }

    fn default_branch_id(&self) -> u32 {
        NU5_BRANCH_ID
    }

    fn write(&self, tx: &Transaction, writer: &mut WireWriter) {
        writer.write_u32_le(self.header());
        writer.write_u32_le(self.version_group_id());
        write_inputs(&tx.inputs, writer);
        write_outputs(&tx.outputs, writer);
        writer.write_u32_le(tx.lock_time);
        writer.write_u32_le(tx.expiry_height);
        writer.write_i64_le(0);
        writer.write_compact_size(CompactSize(0));
        writer.write_compact_size(CompactSize(0));
        writer.write_compact_size(CompactSize(0));
    }

    fn read_body(&self, reader: &mut WireReader) -> Result<Transaction, TransactionError> {
        let inputs = read_inputs(reader)?;
        let outputs = read_outputs(reader)?;
        let lock_time = read_u32(reader, "lock time")?;
        let expiry_height = read_u32(reader, "expiry height")?;
        let value_balance = reader.read_i64_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading value balance: {}", e))
        })?;
        if value_balance != 0 {
            return Err(TransactionError::SerializationError(format!(
                "value balance {} on a transparent-only transaction",
                value_balance
            )));
        }
        expect_empty(reader, "nShieldedSpend")?;
        expect_empty(reader, "nShieldedOutput")?;
        expect_empty(reader, "nJoinSplit")?;

        Ok(Transaction {
            version: TxVersion::Sapling,
            consensus_branch_id: NU5_BRANCH_ID,
            inputs,
            outputs,
            lock_time,
            expiry_height,
        })
    }

    fn signature_hash(
        &self,
        tx: &Transaction,
        input_index: usize,
        script_code: &[u8],
        value: u64,
    ) -> Result<[u8; 32], TransactionError> {
        sighash::legacy_signature_hash(tx, input_index, script_code, value)
    }
}
