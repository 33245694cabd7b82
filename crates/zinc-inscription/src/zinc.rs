//! Zinc binary codec.
//!
//! Payload = `magic(0x5A) ‖ (protocol << 4 | operation) ‖ body`, carried as
//! `OP_RETURN <push(payload)>`. All integers are little-endian and txid
//! references use internal byte order (display hex reversed).
//!
//! | record            | body                                                    |
//! |-------------------|---------------------------------------------------------|
//! | ZRC-20 deploy     | ticker ‖ 0x00 ‖ max u64 ‖ limit u64 ‖ decimals u8 ‖ price u64 ‖ deployerLen u8 ‖ deployer |
//! | ZRC-20 mint       | deployTxid\[32\] ‖ amount u64                           |
//! | ZRC-20 transfer   | deployTxid\[32\] ‖ amount u64                           |
//! | collection deploy | nameLen u8 ‖ name ‖ metadataLen u16 ‖ metadata          |
//! | NFT mint          | collectionTxid\[32\] ‖ protocol u8 ‖ contentLen u16 ‖ content ‖ mimeLen u8 ‖ mime |

use zinc_primitives::chainhash::Hash;
use zinc_primitives::util::{WireReader, WireWriter};
use zinc_primitives::PrimitivesError;
use zinc_script::Script;

use crate::ticker::Ticker;
use crate::types::{
    CollectionDeploy, ContentProtocol, NftMint, Operation, ProtocolId, Zrc20Deploy, Zrc20Mint,
    Zrc20Transfer, ZincOp,
};
use crate::InscriptionError;

/// First byte of every Zinc payload ('Z').
pub const ZINC_MAGIC: u8 = 0x5A;

/// Maximum collection name length in bytes.
pub const MAX_COLLECTION_NAME_LEN: usize = 64;

/// Maximum deployer address length in bytes.
pub const MAX_DEPLOYER_LEN: usize = u8::MAX as usize;

/// Maximum metadata and NFT content length in bytes.
pub const MAX_U16_FIELD_LEN: usize = u16::MAX as usize;

/// Maximum MIME type length in bytes.
pub const MAX_MIME_LEN: usize = u8::MAX as usize;

fn invalid(msg: impl Into<String>) -> InscriptionError {
    InscriptionError::Validation(msg.into())
}

fn truncated(field: &'static str) -> impl Fn(PrimitivesError) -> InscriptionError {
    move |e| InscriptionError::Decode(format!("reading {}: {}", field, e))
}

/// The header byte for a protocol and operation.
pub fn header_byte(protocol: ProtocolId, operation: Operation) -> u8 {
    ((protocol as u8) << 4) | operation as u8
}

// -----------------------------------------------------------------------
// Encoding
// -----------------------------------------------------------------------

/// Validate and encode a Zinc operation as its full payload.
///
/// # Arguments
/// * `op` - The operation to encode.
///
/// # Returns
/// `magic ‖ header ‖ body`, or `Validation` if a field is out of range.
pub fn encode(op: &ZincOp) -> Result<Vec<u8>, InscriptionError> {
    let mut w = WireWriter::with_capacity(64);
    w.write_u8(ZINC_MAGIC);
    w.write_u8(header_byte(op.protocol_id(), op.operation()));

    match op {
        ZincOp::Zrc20Deploy(d) => encode_deploy(d, &mut w)?,
        ZincOp::Zrc20Mint(Zrc20Mint { deploy_txid, amount })
        | ZincOp::Zrc20Transfer(Zrc20Transfer { deploy_txid, amount }) => {
            if *amount == 0 {
                return Err(invalid("amount must be positive"));
            }
            w.write_bytes(deploy_txid.as_bytes());
            w.write_u64_le(*amount);
        }
        ZincOp::CollectionDeploy(c) => encode_collection(c, &mut w)?,
        ZincOp::NftMint(n) => encode_nft(n, &mut w)?,
    }

    Ok(w.into_bytes())
}

fn encode_deploy(d: &Zrc20Deploy, w: &mut WireWriter) -> Result<(), InscriptionError> {
    if d.max_supply == 0 {
        return Err(invalid("max supply must be positive"));
    }
    if d.mint_limit == 0 || d.mint_limit > d.max_supply {
        return Err(invalid(format!(
            "mint limit {} must be in 1..={}",
            d.mint_limit, d.max_supply
        )));
    }
    let deployer = d.deployer.as_deref().unwrap_or("").as_bytes();
    if deployer.len() > MAX_DEPLOYER_LEN {
        return Err(invalid(format!("deployer is {} bytes", deployer.len())));
    }

    w.write_bytes(d.ticker.as_str().as_bytes());
    w.write_u8(0);
    w.write_u64_le(d.max_supply);
    w.write_u64_le(d.mint_limit);
    w.write_u8(d.decimals);
    w.write_u64_le(d.mint_price);
    w.write_u8(deployer.len() as u8);
    w.write_bytes(deployer);
    Ok(())
}

fn encode_collection(c: &CollectionDeploy, w: &mut WireWriter) -> Result<(), InscriptionError> {
    let name = c.name.as_bytes();
    if name.is_empty() || name.len() > MAX_COLLECTION_NAME_LEN {
        return Err(invalid(format!(
            "collection name must be 1-{} bytes, got {}",
            MAX_COLLECTION_NAME_LEN,
            name.len()
        )));
    }
    let metadata = c.metadata.as_deref().unwrap_or("").as_bytes();
    if metadata.len() > MAX_U16_FIELD_LEN {
        return Err(invalid(format!("metadata is {} bytes", metadata.len())));
    }
    if !metadata.is_empty() {
        serde_json::from_slice::<serde_json::Value>(metadata)
            .map_err(|e| invalid(format!("metadata is not JSON: {}", e)))?;
    }

    w.write_u8(name.len() as u8);
    w.write_bytes(name);
    w.write_u16_le(metadata.len() as u16);
    w.write_bytes(metadata);
    Ok(())
}

fn encode_nft(n: &NftMint, w: &mut WireWriter) -> Result<(), InscriptionError> {
    if n.content.is_empty() || n.content.len() > MAX_U16_FIELD_LEN {
        return Err(invalid(format!(
            "content must be 1-{} bytes, got {}",
            MAX_U16_FIELD_LEN,
            n.content.len()
        )));
    }
    let mime = n.mime.as_bytes();
    if mime.len() > MAX_MIME_LEN {
        return Err(invalid(format!("mime type is {} bytes", mime.len())));
    }

    w.write_bytes(n.collection_txid.as_bytes());
    w.write_u8(n.content_protocol as u8);
    w.write_u16_le(n.content.len() as u16);
    w.write_bytes(&n.content);
    w.write_u8(mime.len() as u8);
    w.write_bytes(mime);
    Ok(())
}

/// Encode an operation and wrap it as `OP_RETURN <push(payload)>`.
pub fn carrier_script(op: &ZincOp) -> Result<Script, InscriptionError> {
    Ok(Script::op_return(&encode(op)?)?)
}

// -----------------------------------------------------------------------
// Decoding
// -----------------------------------------------------------------------

/// Decode a Zinc payload.
///
/// # Arguments
/// * `payload` - The bytes pushed after `OP_RETURN`.
///
/// # Returns
/// `Ok(None)` if the payload does not start with the magic byte,
/// `Ok(Some(op))` on success, or `Decode` for a malformed body, unknown
/// header, unimplemented protocol or trailing bytes.
pub fn decode(payload: &[u8]) -> Result<Option<ZincOp>, InscriptionError> {
    if payload.first() != Some(&ZINC_MAGIC) {
        return Ok(None);
    }
    let mut r = WireReader::new(&payload[1..]);
    let header = r.read_u8().map_err(truncated("header"))?;
    let protocol = ProtocolId::try_from(header >> 4)?;
    let operation = Operation::try_from(header & 0x0f)?;

    let op = match (protocol, operation) {
        (ProtocolId::Zrc20, Operation::Deploy) => ZincOp::Zrc20Deploy(decode_deploy(&mut r)?),
        (ProtocolId::Zrc20, Operation::Mint) => {
            let (deploy_txid, amount) = decode_reference(&mut r)?;
            ZincOp::Zrc20Mint(Zrc20Mint { deploy_txid, amount })
        }
        (ProtocolId::Zrc20, Operation::Transfer) => {
            let (deploy_txid, amount) = decode_reference(&mut r)?;
            ZincOp::Zrc20Transfer(Zrc20Transfer { deploy_txid, amount })
        }
        (ProtocolId::Core, Operation::Deploy) => ZincOp::CollectionDeploy(decode_collection(&mut r)?),
        (ProtocolId::Core, Operation::Mint) => ZincOp::NftMint(decode_nft(&mut r)?),
        (ProtocolId::Core, Operation::Transfer) => {
            return Err(InscriptionError::Decode("core transfer is not defined".to_string()))
        }
        (ProtocolId::Marketplace, _) => {
            return Err(InscriptionError::Decode(
                "marketplace protocol is not implemented".to_string(),
            ))
        }
    };

    if r.remaining() != 0 {
        return Err(InscriptionError::Decode(format!(
            "{} trailing bytes after {} {}",
            r.remaining(),
            protocol as u8,
            operation.as_str()
        )));
    }
    Ok(Some(op))
}

fn utf8(bytes: &[u8], field: &str) -> Result<String, InscriptionError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| InscriptionError::Decode(format!("{} is not UTF-8", field)))
}

fn decode_deploy(r: &mut WireReader) -> Result<Zrc20Deploy, InscriptionError> {
    let tick = r.read_until_nul().map_err(truncated("ticker"))?;
    let ticker = Ticker::new(&utf8(tick, "ticker")?)
        .map_err(|e| InscriptionError::Decode(e.to_string()))?;
    let max_supply = r.read_u64_le().map_err(truncated("max supply"))?;
    let mint_limit = r.read_u64_le().map_err(truncated("mint limit"))?;
    let decimals = r.read_u8().map_err(truncated("decimals"))?;
    let mint_price = r.read_u64_le().map_err(truncated("mint price"))?;
    let deployer_len = r.read_u8().map_err(truncated("deployer length"))? as usize;
    let deployer = match deployer_len {
        0 => None,
        n => Some(utf8(r.read_bytes(n).map_err(truncated("deployer"))?, "deployer")?),
    };
    Ok(Zrc20Deploy {
        ticker,
        max_supply,
        mint_limit,
        decimals,
        mint_price,
        deployer,
    })
}

fn decode_reference(r: &mut WireReader) -> Result<(Hash, u64), InscriptionError> {
    let txid = r.read_array::<32>().map_err(truncated("deploy txid"))?;
    let amount = r.read_u64_le().map_err(truncated("amount"))?;
    Ok((Hash::new(txid), amount))
}

fn decode_collection(r: &mut WireReader) -> Result<CollectionDeploy, InscriptionError> {
    let name_len = r.read_u8().map_err(truncated("name length"))? as usize;
    if name_len == 0 || name_len > MAX_COLLECTION_NAME_LEN {
        return Err(InscriptionError::Decode(format!("collection name length {}", name_len)));
    }
    let name = utf8(r.read_bytes(name_len).map_err(truncated("name"))?, "name")?;
    let meta_len = r.read_u16_le().map_err(truncated("metadata length"))? as usize;
    let metadata = match meta_len {
        0 => None,
        n => Some(utf8(r.read_bytes(n).map_err(truncated("metadata"))?, "metadata")?),
    };
    Ok(CollectionDeploy { name, metadata })
}

fn decode_nft(r: &mut WireReader) -> Result<NftMint, InscriptionError> {
    let collection_txid = Hash::new(r.read_array::<32>().map_err(truncated("collection txid"))?);
    let content_protocol = ContentProtocol::try_from(r.read_u8().map_err(truncated("content protocol"))?)?;
    let content_len = r.read_u16_le().map_err(truncated("content length"))? as usize;
    let content = r.read_bytes(content_len).map_err(truncated("content"))?.to_vec();
    let mime_len = r.read_u8().map_err(truncated("mime length"))? as usize;
    let mime = utf8(r.read_bytes(mime_len).map_err(truncated("mime"))?, "mime")?;
    Ok(NftMint {
        collection_txid,
        content_protocol,
        content,
        mime,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deploy() -> ZincOp {
        ZincOp::Zrc20Deploy(Zrc20Deploy {
            ticker: Ticker::new("TICK").unwrap(),
            max_supply: 1000,
            mint_limit: 100,
            decimals: 8,
            mint_price: 0,
            deployer: None,
        })
    }

    #[test]
    fn test_deploy_bytes() {
        let bytes = encode(&deploy()).unwrap();
        let mut expected = vec![0x5a, 0x10];
        expected.extend_from_slice(b"TICK\0");
        expected.extend_from_slice(&1000u64.to_le_bytes());
        expected.extend_from_slice(&100u64.to_le_bytes());
        expected.push(8);
        expected.extend_from_slice(&0u64.to_le_bytes());
        expected.push(0);
        assert_eq!(bytes, expected);
        assert_eq!(decode(&bytes).unwrap(), Some(deploy()));
    }

    #[test]
    fn test_mint_uses_internal_txid_order() {
        let txid = Hash::from_hex(
            "00000000000000000000000000000000000000000000000000000000000000ff",
        )
        .unwrap();
        let op = ZincOp::Zrc20Mint(Zrc20Mint { deploy_txid: txid, amount: 100 });
        let bytes = encode(&op).unwrap();
        assert_eq!(bytes[1], 0x11);
        assert_eq!(bytes[2], 0xff, "display hex is reversed on the wire");
        assert_eq!(bytes.len(), 2 + 32 + 8);
        assert_eq!(decode(&bytes).unwrap(), Some(op));
    }

    #[test]
    fn test_transfer_header() {
        let op = ZincOp::Zrc20Transfer(Zrc20Transfer { deploy_txid: Hash::new([1; 32]), amount: 40 });
        assert_eq!(encode(&op).unwrap()[1], 0x12);
    }

    #[test]
    fn test_collection_and_nft() {
        let c = ZincOp::CollectionDeploy(CollectionDeploy {
            name: "Zebras".to_string(),
            metadata: Some("{\"a\":1}".to_string()),
        });
        let bytes = encode(&c).unwrap();
        assert_eq!(bytes[1], 0x00);
        assert_eq!(decode(&bytes).unwrap(), Some(c));

        let n = ZincOp::NftMint(NftMint {
            collection_txid: Hash::new([9; 32]),
            content_protocol: ContentProtocol::Url,
            content: b"https://example.org/1.png".to_vec(),
            mime: "image/png".to_string(),
        });
        let bytes = encode(&n).unwrap();
        assert_eq!(bytes[1], 0x01);
        assert_eq!(decode(&bytes).unwrap(), Some(n));
    }

    #[test]
    fn test_validation() {
        let long_name = ZincOp::CollectionDeploy(CollectionDeploy { name: "x".repeat(65), metadata: None });
        assert!(matches!(encode(&long_name), Err(InscriptionError::Validation(_))));
        let empty_name = ZincOp::CollectionDeploy(CollectionDeploy { name: String::new(), metadata: None });
        assert!(encode(&empty_name).is_err());
        let bad_meta = ZincOp::CollectionDeploy(CollectionDeploy {
            name: "ok".to_string(),
            metadata: Some("{not json".to_string()),
        });
        assert!(encode(&bad_meta).is_err());
        let zero = ZincOp::Zrc20Mint(Zrc20Mint { deploy_txid: Hash::new([1; 32]), amount: 0 });
        assert!(encode(&zero).is_err());
        let mut d = match deploy() {
            ZincOp::Zrc20Deploy(d) => d,
            _ => unreachable!(),
        };
        d.mint_limit = 2000;
        assert!(encode(&ZincOp::Zrc20Deploy(d)).is_err());
    }

    #[test]
    fn test_decode_absent_and_malformed() {
        assert_eq!(decode(&[]).unwrap(), None);
        assert_eq!(decode(&[0x00, 0x10]).unwrap(), None);
        assert!(matches!(decode(&[0x5a]), Err(InscriptionError::Decode(_))));
        assert!(matches!(decode(&[0x5a, 0x20]), Err(InscriptionError::Decode(_))));
        assert!(matches!(decode(&[0x5a, 0x02]), Err(InscriptionError::Decode(_))));
        assert!(matches!(decode(&[0x5a, 0x30]), Err(InscriptionError::Decode(_))));
        assert!(matches!(decode(&[0x5a, 0x11, 1, 2, 3]), Err(InscriptionError::Decode(_))));

        let mut trailing = encode(&deploy()).unwrap();
        trailing.push(0);
        assert!(matches!(decode(&trailing), Err(InscriptionError::Decode(_))));
    }

    #[test]
    fn test_carrier_script() {
        let script = carrier_script(&deploy()).unwrap();
        assert!(script.is_data());
        assert_eq!(script.op_return_payload().unwrap(), encode(&deploy()).unwrap());
    }
}
