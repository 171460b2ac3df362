//! Hash functions used by transaction identification, script hashing
//! opcodes and signature-hash preimages.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// SHA-256 of the input.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Double SHA-256: `SHA-256(SHA-256(data))`.
///
/// Transaction ids and signature hashes are computed with this function.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// RIPEMD-160 of the input.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// Hash160: `RIPEMD-160(SHA-256(data))`.
///
/// Used by the `HASH160` opcode and to derive pay-to-public-key-hash
/// addresses from public keys.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}
