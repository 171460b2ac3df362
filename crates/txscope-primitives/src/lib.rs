/// txscope - Byte-level and cryptographic primitives.
///
/// This crate provides the foundational building blocks for the decoder:
/// - Positional byte cursor and growable writer
/// - Variable-length integer encoding
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
/// - Chain hash type for transaction identification
/// - secp256k1 public keys and ECDSA signatures (lax DER)
/// - Base58Check encoding

pub mod hash;
pub mod chainhash;
pub mod util;
pub mod base58;
pub mod ec;

mod error;
pub use error::PrimitivesError;
