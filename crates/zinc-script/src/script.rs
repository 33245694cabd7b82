/// Script type - a sequence of opcodes and data pushes.
///
/// Locking scripts on outputs and unlocking scripts on inputs share this
/// byte newtype. Builders append minimal pushes and bare opcodes; the
/// classifiers recognise the three output forms the engine produces:
/// P2PKH, P2SH and `OP_RETURN` data carriers.

use std::fmt;

use crate::chunk::{decode_script, push_data_prefix, ScriptChunk};
use crate::opcodes::*;
use crate::ScriptError;

/// A script, represented as a byte vector newtype.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Script(Vec<u8>);

impl Script {
    /// Create an empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Parse a script from hex.
    ///
    /// # Arguments
    /// * `hex_str` - Lowercase or uppercase hex.
    ///
    /// # Returns
    /// The script, or a hex decoding error.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        Ok(Script(hex::decode(hex_str)?))
    }

    /// Wrap raw script bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Build the P2PKH locking script for a 20-byte public key hash.
    ///
    /// `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`
    pub fn p2pkh(public_key_hash: &[u8; 20]) -> Self {
        let mut b = Vec::with_capacity(25);
        b.extend_from_slice(&[OP_DUP, OP_HASH160, OP_DATA_20]);
        b.extend_from_slice(public_key_hash);
        b.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        Script(b)
    }

    /// Build the P2SH locking script for a 20-byte script hash.
    ///
    /// `OP_HASH160 <20 bytes> OP_EQUAL`
    pub fn p2sh(script_hash: &[u8; 20]) -> Self {
        let mut b = Vec::with_capacity(23);
        b.extend_from_slice(&[OP_HASH160, OP_DATA_20]);
        b.extend_from_slice(script_hash);
        b.push(OP_EQUAL);
        Script(b)
    }

    /// Build an `OP_RETURN <payload>` data carrier with a minimal push.
    ///
    /// # Arguments
    /// * `payload` - The carried bytes.
    ///
    /// # Returns
    /// The script, or `DataTooBig` for payloads beyond the push range.
    pub fn op_return(payload: &[u8]) -> Result<Self, ScriptError> {
        let mut s = Script(vec![OP_RETURN]);
        s.append_push_data(payload)?;
        Ok(s)
    }

    /// Encode as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Render as space-separated ASM.
    pub fn to_asm(&self) -> String {
        match self.chunks() {
            Ok(chunks) => chunks
                .iter()
                .map(ScriptChunk::to_asm_string)
                .collect::<Vec<_>>()
                .join(" "),
            Err(_) => "[error]".to_string(),
        }
    }

    /// Borrow the raw bytes.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the script and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the script has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // -----------------------------------------------------------------------
    // Script classification
    // -----------------------------------------------------------------------

    /// Check for `OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG`.
    pub fn is_p2pkh(&self) -> bool {
        let b = &self.0;
        b.len() == 25
            && b[0] == OP_DUP
            && b[1] == OP_HASH160
            && b[2] == OP_DATA_20
            && b[23] == OP_EQUALVERIFY
            && b[24] == OP_CHECKSIG
    }

    /// Check for `OP_HASH160 <20> OP_EQUAL`.
    pub fn is_p2sh(&self) -> bool {
        let b = &self.0;
        b.len() == 23 && b[0] == OP_HASH160 && b[1] == OP_DATA_20 && b[22] == OP_EQUAL
    }

    /// Check for a data carrier: `OP_RETURN ...` or `OP_FALSE OP_RETURN ...`.
    pub fn is_data(&self) -> bool {
        let b = &self.0;
        (!b.is_empty() && b[0] == OP_RETURN)
            || (b.len() > 1 && b[0] == OP_FALSE && b[1] == OP_RETURN)
    }

    // -----------------------------------------------------------------------
    // Data extraction
    // -----------------------------------------------------------------------

    /// Extract the public key hash of a P2PKH script.
    ///
    /// # Returns
    /// The 20-byte hash, or `NotP2PKH`.
    pub fn public_key_hash(&self) -> Result<[u8; 20], ScriptError> {
        if !self.is_p2pkh() {
            return Err(ScriptError::NotP2PKH);
        }
        let mut h = [0u8; 20];
        h.copy_from_slice(&self.0[3..23]);
        Ok(h)
    }

    /// Extract the script hash of a P2SH script.
    pub fn script_hash(&self) -> Option<[u8; 20]> {
        if !self.is_p2sh() {
            return None;
        }
        let mut h = [0u8; 20];
        h.copy_from_slice(&self.0[2..22]);
        Some(h)
    }

    /// Return the payload of the first push after a leading `OP_RETURN`.
    ///
    /// # Returns
    /// `None` if this is not a data carrier or it carries no push.
    pub fn op_return_payload(&self) -> Option<Vec<u8>> {
        if !self.is_data() {
            return None;
        }
        let chunks = self.chunks().ok()?;
        chunks
            .iter()
            .skip_while(|c| c.op != OP_RETURN)
            .skip(1)
            .find_map(|c| c.data.clone())
    }

    /// Parse into chunks.
    pub fn chunks(&self) -> Result<Vec<ScriptChunk>, ScriptError> {
        decode_script(&self.0)
    }

    // -----------------------------------------------------------------------
    // Mutation / building
    // -----------------------------------------------------------------------

    /// Append a minimal push of `data`.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<(), ScriptError> {
        let prefix = push_data_prefix(data.len())?;
        self.0.extend_from_slice(&prefix);
        self.0.extend_from_slice(data);
        Ok(())
    }

    /// Append bare opcodes.
    ///
    /// Push opcodes (`OP_DATA_1` to `OP_PUSHDATA4`) are rejected since they
    /// need a payload; use `append_push_data` for those.
    pub fn append_opcodes(&mut self, opcodes: &[u8]) -> Result<(), ScriptError> {
        if let Some(&op) = opcodes.iter().find(|&&op| (OP_DATA_1..=OP_PUSHDATA4).contains(&op)) {
            return Err(ScriptError::InvalidOpcodeType(opcode_to_string(op)));
        }
        self.0.extend_from_slice(opcodes);
        Ok(())
    }

    /// Append another script's raw bytes.
    pub fn append_script(&mut self, other: &Script) {
        self.0.extend_from_slice(&other.0);
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PKH: [u8; 20] = [
        0x75, 0x1e, 0x76, 0xe8, 0x19, 0x91, 0x96, 0xd4, 0x54, 0x94, 0x1c, 0x45, 0xd1, 0xb3, 0xa3,
        0x23, 0xf1, 0x43, 0x3b, 0xd6,
    ];

    #[test]
    fn test_p2pkh_build_and_classify() {
        let s = Script::p2pkh(&PKH);
        assert_eq!(s.to_hex(), "76a914751e76e8199196d454941c45d1b3a323f1433bd688ac");
        assert!(s.is_p2pkh());
        assert!(!s.is_p2sh());
        assert!(!s.is_data());
        assert_eq!(s.public_key_hash().unwrap(), PKH);
        assert_eq!(
            s.to_asm(),
            "OP_DUP OP_HASH160 751e76e8199196d454941c45d1b3a323f1433bd6 OP_EQUALVERIFY OP_CHECKSIG"
        );
    }

    #[test]
    fn test_p2sh() {
        let s = Script::p2sh(&PKH);
        assert!(s.is_p2sh());
        assert_eq!(s.script_hash(), Some(PKH));
        assert!(s.public_key_hash().is_err());
    }

    #[test]
    fn test_op_return_payload() {
        let s = Script::op_return(&[0x5a, 0x10, 0x01]).unwrap();
        assert_eq!(s.to_hex(), "6a035a1001");
        assert!(s.is_data());
        assert_eq!(s.op_return_payload(), Some(vec![0x5a, 0x10, 0x01]));

        let big = vec![7u8; 80];
        let s = Script::op_return(&big).unwrap();
        assert_eq!(&s.to_bytes()[..3], &[OP_RETURN, OP_PUSHDATA1, 80]);
        assert_eq!(s.op_return_payload(), Some(big));

        assert_eq!(Script::p2pkh(&PKH).op_return_payload(), None);
        assert_eq!(Script::from_bytes(&[OP_RETURN]).op_return_payload(), None);
    }

    #[test]
    fn test_append_opcodes_rejects_push() {
        let mut s = Script::new();
        assert!(s.append_opcodes(&[OP_FALSE, OP_IF]).is_ok());
        assert!(s.append_opcodes(&[OP_PUSHDATA1]).is_err());
        assert_eq!(s.to_bytes(), &[OP_FALSE, OP_IF]);
    }

    #[test]
    fn test_serde_hex() {
        let s = Script::p2pkh(&PKH);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "\"76a914751e76e8199196d454941c45d1b3a323f1433bd688ac\"");
        let back: Script = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
