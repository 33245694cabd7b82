//! Typed inscription model shared by both codecs.

use serde::{Deserialize, Serialize};
use zinc_primitives::chainhash::Hash;

use crate::ticker::Ticker;
use crate::InscriptionError;

/// Inscription family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Binary payload in an `OP_RETURN` output.
    Zinc,
    /// Ordinals-style envelope in an unlock script.
    Zerdinals,
}

impl Family {
    /// Lowercase name, as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Zinc => "zinc",
            Family::Zerdinals => "zerdinals",
        }
    }
}

/// Protocol nibble of the Zinc header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ProtocolId {
    /// NFT collections and mints.
    Core = 0,
    /// Fungible tokens.
    Zrc20 = 1,
    /// Reserved for listings; not implemented.
    Marketplace = 2,
}

impl TryFrom<u8> for ProtocolId {
    type Error = InscriptionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ProtocolId::Core),
            1 => Ok(ProtocolId::Zrc20),
            2 => Ok(ProtocolId::Marketplace),
            other => Err(InscriptionError::Decode(format!("unknown protocol id {}", other))),
        }
    }
}

/// Operation nibble of the Zinc header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Operation {
    /// Create a token or collection.
    Deploy = 0,
    /// Mint tokens or an NFT.
    Mint = 1,
    /// Move tokens.
    Transfer = 2,
}

impl Operation {
    /// Lowercase name, as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Deploy => "deploy",
            Operation::Mint => "mint",
            Operation::Transfer => "transfer",
        }
    }
}

impl TryFrom<u8> for Operation {
    type Error = InscriptionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Operation::Deploy),
            1 => Ok(Operation::Mint),
            2 => Ok(Operation::Transfer),
            other => Err(InscriptionError::Decode(format!("unknown operation {}", other))),
        }
    }
}

/// Where NFT content lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ContentProtocol {
    /// The content bytes are the NFT.
    Inline = 0,
    /// The content is an IPFS CID.
    Ipfs = 1,
    /// The content is a URL.
    Url = 2,
}

impl TryFrom<u8> for ContentProtocol {
    type Error = InscriptionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ContentProtocol::Inline),
            1 => Ok(ContentProtocol::Ipfs),
            2 => Ok(ContentProtocol::Url),
            other => Err(InscriptionError::Decode(format!("unknown content protocol {}", other))),
        }
    }
}

/// ZRC-20 token deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zrc20Deploy {
    /// Token ticker.
    pub ticker: Ticker,
    /// Cap on the total ever minted.
    pub max_supply: u64,
    /// Cap on a single mint.
    pub mint_limit: u64,
    /// Display decimals.
    pub decimals: u8,
    /// Zatoshi a minter pays the deployer per mint (0 = free).
    pub mint_price: u64,
    /// Address receiving mint payments, if any.
    pub deployer: Option<String>,
}

/// ZRC-20 mint against a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zrc20Mint {
    /// Txid of the deploy transaction.
    pub deploy_txid: Hash,
    /// Amount minted.
    pub amount: u64,
}

/// ZRC-20 transfer. The recipient is the transaction's first paying output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zrc20Transfer {
    /// Txid of the deploy transaction.
    pub deploy_txid: Hash,
    /// Amount moved.
    pub amount: u64,
}

/// NFT collection deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDeploy {
    /// Collection name, 1-64 bytes.
    pub name: String,
    /// Optional JSON metadata text.
    pub metadata: Option<String>,
}

/// NFT mint into a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftMint {
    /// Txid of the collection deploy.
    pub collection_txid: Hash,
    /// How to interpret `content`.
    pub content_protocol: ContentProtocol,
    /// Content bytes, a CID or a URL.
    #[serde(with = "hex_bytes")]
    pub content: Vec<u8>,
    /// MIME type of the content.
    pub mime: String,
}

/// A decoded Zinc binary payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZincOp {
    /// ZRC-20 deploy.
    Zrc20Deploy(Zrc20Deploy),
    /// ZRC-20 mint.
    Zrc20Mint(Zrc20Mint),
    /// ZRC-20 transfer.
    Zrc20Transfer(Zrc20Transfer),
    /// Core collection deploy.
    CollectionDeploy(CollectionDeploy),
    /// Core NFT mint.
    NftMint(NftMint),
}

impl ZincOp {
    /// The protocol nibble.
    pub fn protocol_id(&self) -> ProtocolId {
        match self {
            ZincOp::Zrc20Deploy(_) | ZincOp::Zrc20Mint(_) | ZincOp::Zrc20Transfer(_) => ProtocolId::Zrc20,
            ZincOp::CollectionDeploy(_) | ZincOp::NftMint(_) => ProtocolId::Core,
        }
    }

    /// The operation nibble.
    pub fn operation(&self) -> Operation {
        match self {
            ZincOp::Zrc20Deploy(_) | ZincOp::CollectionDeploy(_) => Operation::Deploy,
            ZincOp::Zrc20Mint(_) | ZincOp::NftMint(_) => Operation::Mint,
            ZincOp::Zrc20Transfer(_) => Operation::Transfer,
        }
    }
}

/// A ZRC-20 operation expressed as envelope JSON (`"p": "zrc-20"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zrc20JsonOp {
    /// `deploy`, `mint` or `transfer`.
    pub op: String,
    /// Ticker as written.
    pub tick: String,
    /// Amount, as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amt: Option<String>,
    /// Max supply, as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    /// Mint limit, as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lim: Option<String>,
}

/// How an envelope's content was classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ContentKind {
    /// JSON with `"p": "zrc-20"`.
    Zrc20(Zrc20JsonOp),
    /// Any other valid JSON.
    Json(serde_json::Value),
    /// UTF-8 text (lossy), including JSON that failed to parse.
    Text(String),
    /// Anything else.
    Binary,
}

/// A decoded Zerdinals envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZerdinalsInscription {
    /// Declared MIME type.
    pub content_type: String,
    /// Reassembled content.
    #[serde(with = "hex_bytes")]
    pub content: Vec<u8>,
    /// Classification of `content`.
    pub kind: ContentKind,
}

/// Any decoded inscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", content = "body", rename_all = "lowercase")]
pub enum Inscription {
    /// From an `OP_RETURN` output.
    Zinc(ZincOp),
    /// From an unlock script envelope.
    Zerdinals(ZerdinalsInscription),
}

impl Inscription {
    /// The family.
    pub fn family(&self) -> Family {
        match self {
            Inscription::Zinc(_) => Family::Zinc,
            Inscription::Zerdinals(_) => Family::Zerdinals,
        }
    }

    /// Protocol nibble for Zinc inscriptions; `None` for envelopes.
    pub fn protocol_id(&self) -> Option<ProtocolId> {
        match self {
            Inscription::Zinc(op) => Some(op.protocol_id()),
            Inscription::Zerdinals(_) => None,
        }
    }

    /// Operation name: the Zinc operation, the envelope's ZRC-20 `op`, or
    /// `inscribe` for any other envelope.
    pub fn operation_name(&self) -> String {
        match self {
            Inscription::Zinc(op) => op.operation().as_str().to_string(),
            Inscription::Zerdinals(z) => match &z.kind {
                ContentKind::Zrc20(j) => j.op.clone(),
                _ => "inscribe".to_string(),
            },
        }
    }
}

/// Serialize byte vectors as hex strings.
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(d)?;
        hex::decode(text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_enums() {
        assert_eq!(ProtocolId::try_from(1).unwrap(), ProtocolId::Zrc20);
        assert!(ProtocolId::try_from(3).is_err());
        assert_eq!(Operation::try_from(2).unwrap(), Operation::Transfer);
        assert!(Operation::try_from(3).is_err());
        assert_eq!(ContentProtocol::try_from(2).unwrap(), ContentProtocol::Url);
        assert!(ContentProtocol::try_from(9).is_err());
    }

    #[test]
    fn test_inscription_json_roundtrip() {
        let ins = Inscription::Zinc(ZincOp::NftMint(NftMint {
            collection_txid: Hash::new([7; 32]),
            content_protocol: ContentProtocol::Ipfs,
            content: b"bafy".to_vec(),
            mime: "image/png".to_string(),
        }));
        let json = serde_json::to_string(&ins).unwrap();
        assert!(json.contains("\"family\":\"zinc\""));
        assert!(json.contains("62616679"));
        let back: Inscription = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ins);
        assert_eq!(back.operation_name(), "mint");
        assert_eq!(back.protocol_id(), Some(ProtocolId::Core));
    }
}
