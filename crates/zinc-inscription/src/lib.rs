#![deny(missing_docs)]
//! Inscription codecs for the Zinc overlay protocols.
//!
//! Two families share one typed model:
//!
//! - **Zinc**: a compact binary payload in an `OP_RETURN` output, prefixed
//!   by the magic byte `0x5A` and a `(protocol << 4) | operation` header,
//!   carrying ZRC-20 deploy/mint/transfer and NFT collection/mint records.
//! - **Zerdinals**: an ordinals-style `OP_FALSE OP_IF "ord" ... OP_ENDIF`
//!   envelope carried in an input's unlock script.
//!
//! `decode` returns `None` when a script carries neither marker.

pub mod error;
pub mod ticker;
pub mod types;
pub mod zinc;
pub mod envelope;
pub mod decode;

pub use decode::{decode, try_decode};
pub use error::InscriptionError;
pub use ticker::Ticker;
pub use types::{
    CollectionDeploy, ContentKind, ContentProtocol, Family, Inscription, NftMint, Operation,
    ProtocolId, ZerdinalsInscription, Zrc20Deploy, Zrc20JsonOp, Zrc20Mint, Zrc20Transfer, ZincOp,
};
