/// Elliptic curve cryptography on secp256k1.
///
/// Provides affine field arithmetic for public key derivation, private and
/// public key wrappers, and low-S DER signatures.

pub mod curve;
pub mod private_key;
pub mod public_key;
pub mod signature;

pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::Signature;
