//! Signature digest computation for transparent inputs.
//!
//! Two digests share one preimage shape and differ in the hash function:
//!
//! - legacy (v4): ZIP-243, every hash is BLAKE2b-256 with a 16-byte
//!   personalization, and the final personalization binds the consensus
//!   branch id;
//! - current (v5): the same commitments with double SHA-256 throughout and
//!   the branch id written into the preimage.
//!
//! Only `SIGHASH_ALL` is produced. Both functions are pure in
//! `(transaction, input index, script code, value)`.
//!
//! See <https://zips.z.cash/zip-0243>

use zinc_primitives::hash::{blake2b_256_personal, sha256d, BLAKE2B_PERSONAL_LEN};
use zinc_primitives::util::{CompactSize, WireWriter};

use crate::transaction::Transaction;
use crate::TransactionError;

/// Sign all inputs and all outputs.
pub const SIGHASH_ALL: u32 = 0x01;

/// Personalization for `hashPrevouts`.
pub const PREVOUTS_PERSONAL: &[u8; BLAKE2B_PERSONAL_LEN] = b"ZcashPrevoutHash";
/// Personalization for `hashSequence`.
pub const SEQUENCE_PERSONAL: &[u8; BLAKE2B_PERSONAL_LEN] = b"ZcashSequencHash";
/// Personalization for `hashOutputs`.
pub const OUTPUTS_PERSONAL: &[u8; BLAKE2B_PERSONAL_LEN] = b"ZcashOutputsHash";
/// Prefix of the final personalization; the branch id fills the last 4 bytes.
pub const SIGHASH_PERSONAL_PREFIX: &[u8; 12] = b"ZcashSigHash";

/// The three transparent commitments shared by every input's digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Commitments {
    prevouts: [u8; 32],
    sequence: [u8; 32],
    outputs: [u8; 32],
}

fn prevouts_bytes(tx: &Transaction) -> Vec<u8> {
    let mut writer = WireWriter::with_capacity(tx.inputs.len() * 36);
    for input in &tx.inputs {
        input.write_outpoint(&mut writer);
    }
    writer.into_bytes()
}

fn sequence_bytes(tx: &Transaction) -> Vec<u8> {
    let mut writer = WireWriter::with_capacity(tx.inputs.len() * 4);
    for input in &tx.inputs {
        writer.write_u32_le(input.sequence_number);
    }
    writer.into_bytes()
}

fn outputs_bytes(tx: &Transaction) -> Vec<u8> {
    let mut writer = WireWriter::new();
    for output in &tx.outputs {
        output.write_to(&mut writer);
    }
    writer.into_bytes()
}

fn check_index(tx: &Transaction, input_index: usize) -> Result<(), TransactionError> {
    if input_index >= tx.inputs.len() {
        return Err(TransactionError::InvalidTransaction(format!(
            "input index {} out of range (tx has {} inputs)",
            input_index,
            tx.inputs.len()
        )));
    }
    Ok(())
}

/// Write the per-input tail: outpoint, script code, value, sequence.
fn write_input_tail(
    writer: &mut WireWriter,
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    value: u64,
) {
    let input = &tx.inputs[input_index];
    input.write_outpoint(writer);
    writer.write_compact_size(CompactSize::from(script_code.len()));
    writer.write_bytes(script_code);
    writer.write_u64_le(value);
    writer.write_u32_le(input.sequence_number);
}

// -----------------------------------------------------------------------
// Legacy (ZIP-243)
// -----------------------------------------------------------------------

/// Build the ZIP-243 preimage for one input.
///
/// 1. header, version group id
/// 2. hashPrevouts, hashSequence, hashOutputs (personalized BLAKE2b-256)
/// 3. hashJoinSplits, hashShieldedSpends, hashShieldedOutputs (all zero)
/// 4. lock time, expiry height, value balance (zero), hash type
/// 5. outpoint, script code, value, sequence of the signed input
///
/// # Returns
/// The raw preimage bytes (not yet hashed).
pub fn legacy_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    value: u64,
) -> Result<Vec<u8>, TransactionError> {
    check_index(tx, input_index)?;

    let c = Commitments {
        prevouts: blake2b_256_personal(PREVOUTS_PERSONAL, &prevouts_bytes(tx)),
        sequence: blake2b_256_personal(SEQUENCE_PERSONAL, &sequence_bytes(tx)),
        outputs: blake2b_256_personal(OUTPUTS_PERSONAL, &outputs_bytes(tx)),
    };

    let mut writer = WireWriter::with_capacity(256);
    writer.write_u32_le(tx.version.header());
    writer.write_u32_le(tx.version.version_group_id());
    writer.write_bytes(&c.prevouts);
    writer.write_bytes(&c.sequence);
    writer.write_bytes(&c.outputs);
    writer.write_bytes(&[0u8; 32]);
    writer.write_bytes(&[0u8; 32]);
    writer.write_bytes(&[0u8; 32]);
    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(tx.expiry_height);
    writer.write_i64_le(0);
    writer.write_u32_le(SIGHASH_ALL);
    write_input_tail(&mut writer, tx, input_index, script_code, value);
    Ok(writer.into_bytes())
}

/// The final-hash personalization: `"ZcashSigHash"` then the branch id LE.
pub fn sighash_personalization(consensus_branch_id: u32) -> [u8; BLAKE2B_PERSONAL_LEN] {
    let mut personal = [0u8; BLAKE2B_PERSONAL_LEN];
    personal[..12].copy_from_slice(SIGHASH_PERSONAL_PREFIX);
    personal[12..].copy_from_slice(&consensus_branch_id.to_le_bytes());
    personal
}

/// Compute the ZIP-243 signature digest for one input.
///
/// # Arguments
/// * `tx` - The transaction being signed.
/// * `input_index` - Index of the input being signed.
/// * `script_code` - Locking script of the output being spent.
/// * `value` - Value of the output being spent, in zatoshi.
///
/// # Returns
/// A 32-byte BLAKE2b digest to be signed by ECDSA.
pub fn legacy_signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    value: u64,
) -> Result<[u8; 32], TransactionError> {
    let preimage = legacy_preimage(tx, input_index, script_code, value)?;
    Ok(blake2b_256_personal(
        &sighash_personalization(tx.consensus_branch_id),
        &preimage,
    ))
}

// -----------------------------------------------------------------------
// Current (v5)
// -----------------------------------------------------------------------

/// Build the v5 preimage for one input.
///
/// Same commitments as the legacy preimage, hashed with double SHA-256,
/// with the consensus branch id following the version group id and without
/// the shielded placeholders.
pub fn current_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    value: u64,
) -> Result<Vec<u8>, TransactionError> {
    check_index(tx, input_index)?;

    let c = Commitments {
        prevouts: sha256d(&prevouts_bytes(tx)),
        sequence: sha256d(&sequence_bytes(tx)),
        outputs: sha256d(&outputs_bytes(tx)),
    };

    let mut writer = WireWriter::with_capacity(256);
    writer.write_u32_le(tx.version.header());
    writer.write_u32_le(tx.version.version_group_id());
    writer.write_u32_le(tx.consensus_branch_id);
    writer.write_bytes(&c.prevouts);
    writer.write_bytes(&c.sequence);
    writer.write_bytes(&c.outputs);
    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(tx.expiry_height);
    writer.write_u32_le(SIGHASH_ALL);
    write_input_tail(&mut writer, tx, input_index, script_code, value);
    Ok(writer.into_bytes())
}

/// Compute the v5 signature digest for one input.
///
/// # Returns
/// A 32-byte double-SHA256 digest to be signed by ECDSA.
pub fn current_signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    value: u64,
) -> Result<[u8; 32], TransactionError> {
    let preimage = current_preimage(tx, input_index, script_code, value)?;
    Ok(sha256d(&preimage))
}
