/// Zinc SDK - Script construction, chunk parsing, and transparent addresses.
///
/// Provides the `Script` byte newtype, the opcode table used by P2PKH, data
/// carrier and envelope scripts, chunk decoding with minimal push encoding,
/// and Base58Check transparent addresses with two-byte version prefixes.

pub mod script;
pub mod opcodes;
pub mod chunk;
pub mod address;

mod error;
pub use error::ScriptError;
pub use script::Script;
pub use address::{Address, AddressKind, Network};
pub use chunk::ScriptChunk;
