/// Error types for script operations.
///
/// Covers chunk parsing, push encoding, and address decoding failures.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Generic invalid script error.
    #[error("invalid script: {0}")]
    InvalidScript(String),

    /// Attempted to append a push opcode without its data.
    #[error("use append_push_data for push data opcodes: {0}")]
    InvalidOpcodeType(String),

    /// Invalid address string.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Address payload has the wrong length after Base58 decoding.
    #[error("invalid address length for '{0}'")]
    InvalidAddressLength(String),

    /// The two-byte version prefix is not a known transparent prefix.
    #[error("unknown address version {0:02x}{1:02x}")]
    EncodingInvalidVersion(u8, u8),

    /// Base58Check checksum does not match.
    #[error("checksum failed")]
    EncodingChecksumFailed,

    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// Script is not a P2PKH script.
    #[error("not a P2PKH")]
    NotP2PKH,

    /// Script does not pay to an address form this crate understands.
    #[error("script has no transparent address")]
    NoAddress,

    /// A push opcode claims more bytes than the script holds.
    #[error("not enough data")]
    DataTooSmall,

    /// Push data exceeds the largest push encoding.
    #[error("data too big")]
    DataTooBig,

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] zinc_primitives::PrimitivesError),
}
