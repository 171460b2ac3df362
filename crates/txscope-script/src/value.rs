//! Interpretations of pushed operand bytes.

use std::borrow::Cow;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::interpreter::scriptnum::{self, MAX_I64_NUM_LEN};

/// Operand bytes viewed as a number, as text, or as hex.
///
/// Each interpretation is computed on demand from the untouched bytes.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ScriptValue {
    bytes: Vec<u8>,
}

impl ScriptValue {
    /// Wrap operand bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        ScriptValue { bytes }
    }

    /// The raw operand bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Script-number interpretation (little-endian sign-magnitude).
    ///
    /// # Returns
    /// `None` for operands wider than eight bytes.
    pub fn number(&self) -> Option<i64> {
        scriptnum::decode(&self.bytes, MAX_I64_NUM_LEN)
    }

    /// Best-effort UTF-8 text; invalid sequences become U+FFFD.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Lowercase hex of the bytes.
    pub fn hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Compare the bytes against a hex string.
    pub fn is_hex(&self, expected: &str) -> bool {
        self.hex().eq_ignore_ascii_case(expected)
    }

    /// Consume the view, returning the bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl From<&[u8]> for ScriptValue {
    fn from(bytes: &[u8]) -> Self {
        ScriptValue::new(bytes.to_vec())
    }
}

impl fmt::Debug for ScriptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScriptValue({})", self.hex())
    }
}

impl Serialize for ScriptValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_views() {
        let value = ScriptValue::from(&b"TKN"[..]);
        assert_eq!(value.text(), "TKN");
        assert_eq!(value.hex(), "544b4e");
        assert_eq!(value.number(), Some(0x4e4b54));
    }

    #[test]
    fn test_number_view() {
        assert_eq!(ScriptValue::new(vec![]).number(), Some(0));
        assert_eq!(ScriptValue::new(vec![0x02]).number(), Some(2));
        assert_eq!(ScriptValue::new(vec![0x81]).number(), Some(-1));
        assert_eq!(ScriptValue::new(vec![0x01; 9]).number(), None);
    }

    #[test]
    fn test_text_is_lossy() {
        let value = ScriptValue::new(vec![0x41, 0xff, 0x42]);
        assert_eq!(value.text(), "A\u{fffd}B");
        // the bytes survive untouched
        assert_eq!(value.bytes(), &[0x41, 0xff, 0x42]);
    }

    #[test]
    fn test_is_hex() {
        let value = ScriptValue::new(vec![0xbd, 0x01]);
        assert!(value.is_hex("bd01"));
        assert!(value.is_hex("BD01"));
        assert!(!value.is_hex("bd00"));
    }

    #[test]
    fn test_serializes_as_hex() {
        let value = ScriptValue::new(vec![0xde, 0xad]);
        assert_eq!(serde_json::to_string(&value).unwrap(), "\"dead\"");
    }
}
