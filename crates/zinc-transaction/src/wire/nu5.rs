//! v5 NU5 layout. The branch id travels in the transaction itself.

use zinc_primitives::util::{CompactSize, WireReader, WireWriter};

use super::{expect_empty, read_inputs, read_outputs, read_u32, write_inputs, write_outputs};
use super::{TxVersion, WireFormat, OVERWINTERED_FLAG};
use crate::sighash;
use crate::transaction::Transaction;
use crate::TransactionError;

/// NU5 version group id.
pub const NU5_VERSION_GROUP_ID: u32 = 0x26A7_270A;

/// NU6 consensus branch id, the default for v5 transactions.
pub const NU6_BRANCH_ID: u32 = 0xC8E7_1055;

/// Strategy for v5 transactions.
///
/// | Field              | Size          |
/// |--------------------|---------------|
/// | header             | 4 (LE)        |
/// | version group id   | 4 (LE)        |
/// | consensus branch id| 4 (LE)        |
/// | lock_time          | 4 (LE)        |
/// | expiry_height      | 4 (LE)        |
/// | vin, vout          | variable      |
/// | nSpendsSapling     | CompactSize 0 |
/// | nOutputsSapling    | CompactSize 0 |
/// | nActionsOrchard    | CompactSize 0 |
#[derive(Clone, Copy, Debug, Default)]
pub struct Nu5V5;

impl WireFormat for Nu5V5 {
    fn version(&self) -> TxVersion {
        TxVersion::Nu5
    }

    fn header(&self) -> u32 {
        OVERWINTERED_FLAG | 5
    }

    fn version_group_id(&self) -> u32 {
        NU5_VERSION_GROUP_ID
    }

    fn default_branch_id(&self) -> u32 {
        NU6_BRANCH_ID
    }

    fn write(&self, tx: &Transaction, writer: &mut WireWriter) {
        writer.write_u32_le(self.header());
        writer.write_u32_le(self.version_group_id());
        writer.write_u32_le(tx.consensus_branch_id);
        writer.write_u32_le(tx.lock_time);
        writer.write_u32_le(tx.expiry_height);
        write_inputs(&tx.inputs, writer);
        write_outputs(&tx.outputs, writer);
        writer.write_compact_size(CompactSize(0));
        writer.write_compact_size(CompactSize(0));
        writer.write_compact_size(CompactSize(0));
    }

    fn read_body(&self, reader: &mut WireReader) -> Result<Transaction, TransactionError> {
        let consensus_branch_id = read_u32(reader, "consensus branch id")?;
        let lock_time = read_u32(reader, "lock time")?;
        let expiry_height = read_u32(reader, "expiry height")?;
        let inputs = read_inputs(reader)?;
        let outputs = read_outputs(reader)?;
        expect_empty(reader, "nSpendsSapling")?;
        expect_empty(reader, "nOutputsSapling")?;
        expect_empty(reader, "nActionsOrchard")?;

        Ok(Transaction {
            version: TxVersion::Nu5,
            consensus_branch_id,
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
        sighash::current_signature_hash(tx, input_index, script_code, value)
    }
}
