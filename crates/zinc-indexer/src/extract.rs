//! Finding inscriptions in fetched transactions and naming the parties.

use zinc_chain::TxDetail;
use zinc_inscription::{decode, Inscription, ZincOp};
use zinc_primitives::hash::hash160;
use zinc_script::{Address, Network};

use crate::config::ProtocolConfig;
use crate::types::InscriptionRecord;

const COMPRESSED_KEY_LEN: usize = 33;

/// Find the inscription a transaction carries.
///
/// Data-carrier outputs are searched for the Zinc magic first, then input
/// unlock scripts for a Zerdinals envelope. Only the first match is kept,
/// since records are keyed by txid.
pub fn find_inscription(tx: &TxDetail) -> Option<Inscription> {
    let from_outputs = tx
        .outputs
        .iter()
        .filter(|o| o.locking_script.is_data())
        .find_map(|o| match decode(o.locking_script.to_bytes()) {
            Some(found @ Inscription::Zinc(_)) => Some(found),
            _ => None,
        });
    if from_outputs.is_some() {
        return from_outputs;
    }

    tx.inputs
        .iter()
        .find_map(|i| match decode(i.unlocking_script.to_bytes()) {
            Some(found @ Inscription::Zerdinals(_)) => Some(found),
            _ => None,
        })
}

/// Address of the transaction's first input.
///
/// Uses the address the chain source reported; otherwise derives the P2PKH
/// address from the trailing compressed public key push of the scriptSig.
pub fn sender_address(tx: &TxDetail, network: Network) -> Option<String> {
    if let Some(addr) = tx.first_input_address() {
        return Some(addr.to_string());
    }

    let chunks = tx.inputs.first()?.unlocking_script.chunks().ok()?;
    let key = chunks.last()?.push_data()?;
    if key.len() != COMPRESSED_KEY_LEN || !matches!(key[0], 0x02 | 0x03) {
        return None;
    }
    Some(Address::from_public_key_hash(&hash160(key), network).address_string)
}

/// The first output that is neither a data carrier nor a treasury payment.
pub fn recipient_address(tx: &TxDetail, treasury: Option<&str>) -> Option<String> {
    tx.outputs
        .iter()
        .filter(|o| !o.locking_script.is_data())
        .filter_map(|o| o.address.as_deref())
        .find(|addr| Some(*addr) != treasury)
        .map(str::to_string)
}

/// Build the inscription record for `tx`, if it carries one.
///
/// The recipient is the transfer destination for transfers and the minter
/// for mints; other operations have none.
///
/// # Arguments
/// * `tx` - Transaction detail from the chain source.
/// * `height` - Height of the containing block.
/// * `network` - Network used to derive fallback sender addresses.
/// * `protocol` - Supplies the treasury address to skip.
pub fn extract(
    tx: &TxDetail,
    height: u32,
    network: Network,
    protocol: &ProtocolConfig,
) -> Option<InscriptionRecord> {
    let inscription = find_inscription(tx)?;
    let sender = sender_address(tx, network);
    let recipient = match &inscription {
        Inscription::Zinc(ZincOp::Zrc20Transfer(_)) => {
            recipient_address(tx, protocol.treasury_address.as_deref())
        }
        Inscription::Zinc(ZincOp::Zrc20Mint(_)) => sender.clone(),
        _ => None,
    };

    Some(InscriptionRecord {
        txid: tx.txid.clone(),
        block_height: height,
        family: inscription.family(),
        protocol_id: inscription.protocol_id().map(|p| p as u8),
        operation: inscription.operation_name(),
        inscription,
        sender,
        recipient,
    })
}
