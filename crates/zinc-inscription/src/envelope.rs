//! Zerdinals envelope codec.
//!
//! ```text
//! OP_FALSE OP_IF
//!   push("ord") OP_1 push(content type) OP_0
//!   push(chunk) push(chunk) ...        (each chunk at most 520 bytes)
//! OP_ENDIF
//! ```
//!
//! The envelope is prepended to an input's unlock script, so decoding scans
//! the whole script for the `"ord"` push and reads the fields after it.

use zinc_script::chunk::{decode_script, ScriptChunk};
use zinc_script::opcodes::*;
use zinc_script::Script;

use crate::types::{ContentKind, ZerdinalsInscription, Zrc20JsonOp};
use crate::InscriptionError;

/// The protocol marker pushed first inside the envelope.
pub const ORD_MARKER: &[u8; 3] = b"ord";

/// Largest single content push.
pub const MAX_CHUNK_LEN: usize = 520;

/// Largest content accepted by the encoder.
pub const MAX_CONTENT_LEN: usize = 400_000;

/// Largest content type accepted by the encoder.
pub const MAX_CONTENT_TYPE_LEN: usize = 255;

/// Build an envelope script.
///
/// # Arguments
/// * `content_type` - MIME type, 1-255 bytes.
/// * `content` - Body, at most 400 000 bytes.
///
/// # Returns
/// The envelope, or `Validation` for out-of-range fields.
pub fn build_envelope(content_type: &str, content: &[u8]) -> Result<Script, InscriptionError> {
    if content_type.is_empty() || content_type.len() > MAX_CONTENT_TYPE_LEN {
        return Err(InscriptionError::Validation(format!(
            "content type must be 1-{} bytes, got {}",
            MAX_CONTENT_TYPE_LEN,
            content_type.len()
        )));
    }
    if content.len() > MAX_CONTENT_LEN {
        return Err(InscriptionError::Validation(format!(
            "content is {} bytes, limit {}",
            content.len(),
            MAX_CONTENT_LEN
        )));
    }

    let mut script = Script::new();
    script.append_opcodes(&[OP_FALSE, OP_IF])?;
    script.append_push_data(ORD_MARKER)?;
    script.append_opcodes(&[OP_1])?;
    script.append_push_data(content_type.as_bytes())?;
    script.append_opcodes(&[OP_0])?;
    for chunk in content.chunks(MAX_CHUNK_LEN) {
        script.append_push_data(chunk)?;
    }
    script.append_opcodes(&[OP_ENDIF])?;
    Ok(script)
}

fn is_marker(chunk: &ScriptChunk) -> bool {
    chunk.data.as_deref() == Some(&ORD_MARKER[..])
}

fn malformed(msg: &str) -> InscriptionError {
    InscriptionError::Decode(format!("envelope: {}", msg))
}

/// Find and decode an envelope anywhere in `script`.
///
/// # Arguments
/// * `script` - Raw script bytes, typically an unlock script.
///
/// # Returns
/// `Ok(None)` when no `"ord"` marker is present, the inscription when one
/// is, or `Decode` when the marker is followed by malformed fields.
pub fn decode_envelope(script: &[u8]) -> Result<Option<ZerdinalsInscription>, InscriptionError> {
    let chunks = match decode_script(script) {
        Ok(chunks) => chunks,
        Err(e) => {
            if script.windows(ORD_MARKER.len()).any(|w| w == ORD_MARKER) {
                return Err(malformed(&format!("unparseable script: {}", e)));
            }
            return Ok(None);
        }
    };

    let Some(start) = chunks.iter().position(is_marker) else {
        return Ok(None);
    };
    let mut rest = chunks[start + 1..].iter();

    match rest.next() {
        Some(c) if c.op == OP_1 || c.data.as_deref() == Some(&[1u8][..]) => {}
        _ => return Err(malformed("missing content type tag")),
    }
    let content_type = rest
        .next()
        .and_then(|c| c.data.as_deref())
        .ok_or_else(|| malformed("missing content type"))?;
    let content_type = String::from_utf8(content_type.to_vec())
        .map_err(|_| malformed("content type is not UTF-8"))?;
    match rest.next() {
        Some(c) if c.op == OP_0 => {}
        _ => return Err(malformed("missing body separator")),
    }

    let mut content = Vec::new();
    loop {
        match rest.next() {
            Some(c) if c.op == OP_ENDIF => break,
            Some(c) => match c.push_data() {
                Some(data) => content.extend_from_slice(data),
                None => return Err(malformed("non-push opcode in body")),
            },
            None => return Err(malformed("missing OP_ENDIF")),
        }
    }

    let kind = classify(&content_type, &content);
    Ok(Some(ZerdinalsInscription {
        content_type,
        content,
        kind,
    }))
}

/// Classify envelope content by its declared type.
///
/// JSON that fails to parse degrades to text.
pub fn classify(content_type: &str, content: &[u8]) -> ContentKind {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" {
        return match serde_json::from_slice::<serde_json::Value>(content) {
            Ok(value) if value.get("p").and_then(|p| p.as_str()) == Some("zrc-20") => {
                serde_json::from_value::<Zrc20JsonOp>(value.clone())
                    .map(ContentKind::Zrc20)
                    .unwrap_or(ContentKind::Json(value))
            }
            Ok(value) => ContentKind::Json(value),
            Err(e) => {
                tracing::debug!("envelope JSON did not parse, treating as text: {}", e);
                ContentKind::Text(String::from_utf8_lossy(content).into_owned())
            }
        };
    }
    if mime.starts_with("text/") {
        return ContentKind::Text(String::from_utf8_lossy(content).into_owned());
    }
    ContentKind::Binary
}
