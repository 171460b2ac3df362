//! Base58Check encoding.
//!
//! Addresses are rendered as `base58(version || payload || checksum)` where
//! the checksum is the first four bytes of the double SHA-256 of
//! `version || payload`.

use crate::hash::sha256d;
use crate::PrimitivesError;

/// Encode bytes with a 4-byte double-SHA-256 checksum appended.
///
/// # Arguments
/// * `data` - The bytes to encode (version byte + payload).
///
/// # Returns
/// A Base58Check string.
pub fn check_encode(data: &[u8]) -> String {
    let checksum = sha256d(data);
    let mut payload = data.to_vec();
    payload.extend_from_slice(&checksum[..4]);
    bs58::encode(payload).into_string()
}

/// Decode a Base58Check string, verifying its checksum.
///
/// # Arguments
/// * `s` - The Base58Check string.
///
/// # Returns
/// The payload without checksum, or an error for bad characters, short
/// input, or a checksum mismatch.
pub fn check_decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    let decoded = bs58::decode(s)
        .into_vec()
        .map_err(|e| PrimitivesError::InvalidBase58(e.to_string()))?;
    if decoded.len() < 4 {
        return Err(PrimitivesError::InvalidBase58(
            "data too short for checksum".to_string(),
        ));
    }
    let (payload, checksum) = decoded.split_at(decoded.len() - 4);
    if checksum != &sha256d(payload)[..4] {
        return Err(PrimitivesError::ChecksumMismatch);
    }
    Ok(payload.to_vec())
}
