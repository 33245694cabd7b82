//! Script chunk parsing and push encoding.
//!
//! A chunk is either a bare opcode or a data push together with its bytes.
//! Unlike some script dialects, `OP_RETURN` does not swallow the rest of the
//! script here: data carriers are `OP_RETURN <push>` and the push is parsed
//! as its own chunk.

use crate::opcodes::*;
use crate::ScriptError;

/// A single parsed element of a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// The opcode byte. For direct pushes (1-75 bytes) this is the length.
    pub op: u8,
    /// The pushed bytes, if this chunk is a push operation.
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// A bare opcode chunk.
    pub fn opcode(op: u8) -> Self {
        ScriptChunk { op, data: None }
    }

    /// Return the pushed bytes when this chunk is a data push.
    ///
    /// `OP_0` counts as an empty push.
    pub fn push_data(&self) -> Option<&[u8]> {
        match (&self.data, self.op) {
            (Some(d), _) => Some(d.as_slice()),
            (None, OP_0) => Some(&[][..]),
            _ => None,
        }
    }

    /// Render as an ASM token: hex for pushes, names for opcodes.
    pub fn to_asm_string(&self) -> String {
        match &self.data {
            Some(data) => hex::encode(data),
            None => opcode_to_string(self.op),
        }
    }
}

fn take<'a>(bytes: &'a [u8], pos: usize, len: usize) -> Result<&'a [u8], ScriptError> {
    let end = pos.checked_add(len).ok_or(ScriptError::DataTooSmall)?;
    bytes.get(pos..end).ok_or(ScriptError::DataTooSmall)
}

/// Decode raw script bytes into chunks.
///
/// # Arguments
/// * `bytes` - The raw script bytes.
///
/// # Returns
/// The parsed chunks, or `DataTooSmall` if a push runs past the end.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    let mut chunks = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let op = bytes[pos];
        pos += 1;

        let len = match op {
            OP_DATA_1..=OP_DATA_75 => op as usize,
            OP_PUSHDATA1 => {
                let l = take(bytes, pos, 1)?[0] as usize;
                pos += 1;
                l
            }
            OP_PUSHDATA2 => {
                let l = take(bytes, pos, 2)?;
                pos += 2;
                u16::from_le_bytes([l[0], l[1]]) as usize
            }
            OP_PUSHDATA4 => {
                let l = take(bytes, pos, 4)?;
                pos += 4;
                u32::from_le_bytes([l[0], l[1], l[2], l[3]]) as usize
            }
            _ => {
                chunks.push(ScriptChunk::opcode(op));
                continue;
            }
        };

        let data = take(bytes, pos, len)?.to_vec();
        pos += len;
        chunks.push(ScriptChunk { op, data: Some(data) });
    }

    Ok(chunks)
}

/// Compute the minimal push prefix for a payload of `data_len` bytes.
///
/// Direct push up to 75 bytes, then OP_PUSHDATA1 / 2 / 4.
///
/// # Arguments
/// * `data_len` - The number of bytes that will follow the prefix.
///
/// # Returns
/// The prefix bytes, or `DataTooBig` beyond the 4-byte length range.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    if data_len <= OP_DATA_75 as usize {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xFF {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xFFFF {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else if data_len <= 0xFFFF_FFFF {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        Ok(buf)
    } else {
        Err(ScriptError::DataTooBig)
    }
}

/// Encode several payloads as consecutive minimal pushes.
pub fn encode_push_datas(parts: &[&[u8]]) -> Result<Vec<u8>, ScriptError> {
    let mut result = Vec::new();
    for part in parts {
        result.extend_from_slice(&push_data_prefix(part.len())?);
        result.extend_from_slice(part);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_p2pkh() {
        let script = hex::decode("76a914751e76e8199196d454941c45d1b3a323f1433bd688ac").unwrap();
        let chunks = decode_script(&script).unwrap();
        assert_eq!(chunks.len(), 5);
        assert_eq!(chunks[0], ScriptChunk::opcode(OP_DUP));
        assert_eq!(chunks[2].op, OP_DATA_20);
        assert_eq!(chunks[2].push_data().unwrap().len(), 20);
        assert_eq!(chunks[4], ScriptChunk::opcode(OP_CHECKSIG));
    }

    #[test]
    fn test_op_return_push_is_separate_chunk() {
        let chunks = decode_script(&[OP_RETURN, 0x02, 0x5a, 0x10]).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].op, OP_RETURN);
        assert_eq!(chunks[1].push_data(), Some(&[0x5a, 0x10][..]));
    }

    #[test]
    fn test_op_0_is_empty_push() {
        let chunks = decode_script(&[OP_0]).unwrap();
        assert_eq!(chunks[0].push_data(), Some(&[][..]));
        assert_eq!(ScriptChunk::opcode(OP_IF).push_data(), None);
    }

    #[test]
    fn test_pushdata_forms() {
        let mut script = vec![OP_PUSHDATA1, 3, 1, 2, 3];
        script.extend_from_slice(&[OP_PUSHDATA2, 2, 0, 9, 9]);
        script.extend_from_slice(&[OP_PUSHDATA4, 1, 0, 0, 0, 7]);
        let chunks = decode_script(&script).unwrap();
        assert_eq!(chunks[0].push_data(), Some(&[1, 2, 3][..]));
        assert_eq!(chunks[1].push_data(), Some(&[9, 9][..]));
        assert_eq!(chunks[2].push_data(), Some(&[7][..]));
    }

    #[test]
    fn test_truncated_pushes() {
        assert!(matches!(decode_script(&[0x05, 1, 2]), Err(ScriptError::DataTooSmall)));
        assert!(decode_script(&[OP_PUSHDATA1]).is_err());
        assert!(decode_script(&[OP_PUSHDATA2, 0xff]).is_err());
        assert!(decode_script(&[OP_PUSHDATA4, 0xff, 0xff, 0xff, 0xff]).is_err());
    }

    #[test]
    fn test_push_prefix_boundaries() {
        assert_eq!(push_data_prefix(0).unwrap(), vec![0x00]);
        assert_eq!(push_data_prefix(75).unwrap(), vec![75]);
        assert_eq!(push_data_prefix(76).unwrap(), vec![OP_PUSHDATA1, 76]);
        assert_eq!(push_data_prefix(255).unwrap(), vec![OP_PUSHDATA1, 255]);
        assert_eq!(push_data_prefix(256).unwrap(), vec![OP_PUSHDATA2, 0x00, 0x01]);
        assert_eq!(push_data_prefix(520).unwrap(), vec![OP_PUSHDATA2, 0x08, 0x02]);
        assert_eq!(push_data_prefix(0x10000).unwrap(), vec![OP_PUSHDATA4, 0, 0, 1, 0]);
    }

    #[test]
    fn test_encode_push_datas_roundtrip() {
        let big = vec![0xabu8; 300];
        let encoded = encode_push_datas(&[&b"ord"[..], &big[..]]).unwrap();
        let chunks = decode_script(&encoded).unwrap();
        assert_eq!(chunks[0].push_data(), Some(&b"ord"[..]));
        assert_eq!(chunks[1].op, OP_PUSHDATA2);
        assert_eq!(chunks[1].push_data(), Some(big.as_slice()));
    }
}
