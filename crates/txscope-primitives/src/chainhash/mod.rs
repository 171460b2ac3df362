//! Chain hash type for transaction identification.
//!
//! A `ChainHash` stores 32 bytes in wire (internal) order and displays them
//! byte-reversed, which is how transaction ids are conventionally shown.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::hash::sha256d;
use crate::PrimitivesError;

/// Size of a ChainHash in bytes.
pub const HASH_SIZE: usize = 32;

/// A 32-byte hash shown as byte-reversed hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChainHash([u8; HASH_SIZE]);

impl ChainHash {
    /// Wrap 32 bytes given in wire order.
    pub fn new(bytes: [u8; HASH_SIZE]) -> Self {
        ChainHash(bytes)
    }

    /// Compute the double SHA-256 of `data`.
    ///
    /// # Arguments
    /// * `data` - Serialized bytes to identify, usually a whole transaction.
    ///
    /// # Returns
    /// The digest as a `ChainHash` (wire order).
    pub fn digest(data: &[u8]) -> Self {
        ChainHash(sha256d(data))
    }

    /// Parse a display-order (byte-reversed) hex string.
    ///
    /// # Arguments
    /// * `hex_str` - Exactly 64 hex characters.
    ///
    /// # Returns
    /// The hash in wire order, or an error for bad hex or length.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let decoded = hex::decode(hex_str)?;
        if decoded.len() != HASH_SIZE {
            return Err(PrimitivesError::InvalidHash(format!(
                "invalid hash length of {}, want {}",
                decoded.len(),
                HASH_SIZE
            )));
        }
        let mut bytes = [0u8; HASH_SIZE];
        for (dst, src) in bytes.iter_mut().zip(decoded.iter().rev()) {
            *dst = *src;
        }
        Ok(ChainHash(bytes))
    }

    /// Bytes in wire order.
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Bytes in display order.
    pub fn to_display_bytes(&self) -> [u8; HASH_SIZE] {
        let mut reversed = self.0;
        reversed.reverse();
        reversed
    }
}

impl fmt::Display for ChainHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_display_bytes()))
    }
}

impl fmt::Debug for ChainHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainHash({})", self)
    }
}

impl FromStr for ChainHash {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChainHash::from_hex(s)
    }
}

impl Serialize for ChainHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ChainHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ChainHash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
