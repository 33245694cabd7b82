//! Typed decoder dispatch over both inscription families.

use zinc_script::Script;

use crate::envelope::decode_envelope;
use crate::types::Inscription;
use crate::{zinc, InscriptionError};

/// Decode whatever inscription `script` carries.
///
/// A data-carrier script whose first push starts with the Zinc magic byte is
/// decoded as Zinc; otherwise the script is searched for a Zerdinals
/// envelope.
///
/// # Arguments
/// * `script` - Raw locking or unlocking script bytes.
///
/// # Returns
/// `Ok(None)` when neither marker is present, the inscription when one is,
/// or `Decode` when a marker is followed by malformed data.
pub fn try_decode(script: &[u8]) -> Result<Option<Inscription>, InscriptionError> {
    let parsed = Script::from_bytes(script);
    if let Some(payload) = parsed.op_return_payload() {
        if payload.first() == Some(&zinc::ZINC_MAGIC) {
            return Ok(zinc::decode(&payload)?.map(Inscription::Zinc));
        }
    }
    Ok(decode_envelope(script)?.map(Inscription::Zerdinals))
}

/// Like `try_decode`, but malformed data is logged and treated as absent.
pub fn decode(script: &[u8]) -> Option<Inscription> {
    match try_decode(script) {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(script = %hex::encode(script), "ignoring malformed inscription: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::build_envelope;
    use crate::types::{Zrc20Mint, ZincOp};
    use zinc_primitives::chainhash::Hash;

    #[test]
    fn test_dispatch() {
        let op = ZincOp::Zrc20Mint(Zrc20Mint { deploy_txid: Hash::new([3; 32]), amount: 5 });
        let carrier = zinc::carrier_script(&op).unwrap();
        assert_eq!(decode(carrier.to_bytes()), Some(Inscription::Zinc(op)));

        let env = build_envelope("text/plain", b"hello").unwrap();
        match decode(env.to_bytes()) {
            Some(Inscription::Zerdinals(z)) => assert_eq!(z.content, b"hello"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_absent_is_none() {
        assert_eq!(decode(Script::p2pkh(&[1; 20]).to_bytes()), None);
        assert_eq!(decode(Script::op_return(b"hello").unwrap().to_bytes()), None);
        assert_eq!(decode(&[]), None);
    }

    #[test]
    fn test_malformed_is_none_but_try_decode_errors() {
        let bad = Script::op_return(&[0x5a, 0x11, 0x00]).unwrap();
        assert!(try_decode(bad.to_bytes()).is_err());
        assert_eq!(decode(bad.to_bytes()), None);
    }
}
