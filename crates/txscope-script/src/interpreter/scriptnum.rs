//! Script number encoding.
//!
//! Numbers on the script stack are little-endian magnitudes with the sign
//! carried in the most significant bit of the final byte. The empty vector
//! is zero. Numeric opcodes accept operands of at most four bytes.

use super::error::{InterpreterError, InterpreterErrorCode};

/// Widest operand accepted by numeric opcodes.
pub const MAX_NUM_LEN: usize = 4;

/// Widest encoding representable as an `i64`.
pub const MAX_I64_NUM_LEN: usize = 8;

/// A decoded script number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScriptNumber(pub i64);

impl ScriptNumber {
    /// Parse a stack element as a number of at most `max_len` bytes.
    ///
    /// # Arguments
    /// * `bb` - The stack element bytes.
    /// * `max_len` - The widest encoding accepted.
    ///
    /// # Returns
    /// The number, or a `TypeMismatch` error when the element is too wide.
    pub fn from_bytes(bb: &[u8], max_len: usize) -> Result<Self, InterpreterError> {
        decode(bb, max_len).map(ScriptNumber).ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::TypeMismatch,
                format!(
                    "numeric value encoded as {} is {} bytes which exceeds the max allowed of {}",
                    hex::encode(bb),
                    bb.len(),
                    max_len
                ),
            )
        })
    }

    /// Minimal encoding of the number.
    pub fn to_bytes(&self) -> Vec<u8> {
        encode(self.0)
    }

    /// Check if the number is zero (including negative zero).
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Decode a little-endian sign-magnitude number.
///
/// # Arguments
/// * `bb` - Encoded bytes; empty means zero.
/// * `max_len` - Widest accepted encoding, capped at eight bytes.
///
/// # Returns
/// `None` when the encoding is wider than `max_len`.
pub fn decode(bb: &[u8], max_len: usize) -> Option<i64> {
    if bb.len() > max_len.min(MAX_I64_NUM_LEN) {
        return None;
    }
    let Some((&last, _)) = bb.split_last() else {
        return Some(0);
    };

    let mut magnitude: u64 = 0;
    for (i, b) in bb.iter().enumerate() {
        magnitude |= (*b as u64) << (8 * i);
    }

    if last & 0x80 != 0 {
        magnitude &= !(0x80u64 << (8 * (bb.len() - 1)));
        Some(-(magnitude as i64))
    } else {
        Some(magnitude as i64)
    }
}

/// Encode a number in its minimal sign-magnitude form.
pub fn encode(n: i64) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }

    let negative = n < 0;
    let mut abs = n.unsigned_abs();
    let mut out = Vec::with_capacity(9);
    while abs > 0 {
        out.push((abs & 0xff) as u8);
        abs >>= 8;
    }

    // A set high bit in the last magnitude byte needs an extra sign byte.
    let last = out.len() - 1;
    if out[last] & 0x80 != 0 {
        out.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        out[last] |= 0x80;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_zero_forms() {
        assert_eq!(decode(&[], MAX_NUM_LEN), Some(0));
        assert_eq!(decode(&[0x00], MAX_NUM_LEN), Some(0));
        // negative zero
        assert_eq!(decode(&[0x80], MAX_NUM_LEN), Some(0));
        assert_eq!(decode(&[0x00, 0x80], MAX_NUM_LEN), Some(0));
    }

    #[test]
    fn test_decode_small_values() {
        assert_eq!(decode(&[0x01], MAX_NUM_LEN), Some(1));
        assert_eq!(decode(&[0x81], MAX_NUM_LEN), Some(-1));
        assert_eq!(decode(&[0x7f], MAX_NUM_LEN), Some(127));
        assert_eq!(decode(&[0x80, 0x00], MAX_NUM_LEN), Some(128));
        assert_eq!(decode(&[0x80, 0x80], MAX_NUM_LEN), Some(-128));
        assert_eq!(decode(&[0xff, 0x00], MAX_NUM_LEN), Some(255));
        assert_eq!(decode(&[0x00, 0x01], MAX_NUM_LEN), Some(256));
        assert_eq!(decode(&[0x00, 0x81], MAX_NUM_LEN), Some(-256));
    }

    #[test]
    fn test_decode_max_width() {
        assert_eq!(decode(&[0xff, 0xff, 0xff, 0x7f], MAX_NUM_LEN), Some(0x7fff_ffff));
        assert_eq!(decode(&[0xff, 0xff, 0xff, 0xff], MAX_NUM_LEN), Some(-0x7fff_ffff));
        assert_eq!(decode(&[0x01, 0x02, 0x03, 0x04, 0x05], MAX_NUM_LEN), None);

        let widest = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f];
        assert_eq!(decode(&widest, MAX_I64_NUM_LEN), Some(i64::MAX));
        let widest_neg = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
        assert_eq!(decode(&widest_neg, MAX_I64_NUM_LEN), Some(-i64::MAX));
        assert_eq!(decode(&[0u8; 9], 16), None);
    }

    #[test]
    fn test_encode_minimal() {
        let cases: Vec<(i64, Vec<u8>)> = vec![
            (0, vec![]),
            (1, vec![0x01]),
            (-1, vec![0x81]),
            (127, vec![0x7f]),
            (-127, vec![0xff]),
            (128, vec![0x80, 0x00]),
            (-128, vec![0x80, 0x80]),
            (255, vec![0xff, 0x00]),
            (256, vec![0x00, 0x01]),
            (0x7fff_ffff, vec![0xff, 0xff, 0xff, 0x7f]),
            (-0x7fff_ffff, vec![0xff, 0xff, 0xff, 0xff]),
            (0x8000_0000, vec![0x00, 0x00, 0x00, 0x80, 0x00]),
        ];
        for (n, expected) in cases {
            assert_eq!(encode(n), expected, "encoding of {}", n);
            assert_eq!(decode(&expected, MAX_I64_NUM_LEN), Some(n), "decoding of {}", n);
        }
    }

    #[test]
    fn test_from_bytes_type_mismatch() {
        let err = ScriptNumber::from_bytes(&[0u8; 5], MAX_NUM_LEN).unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::TypeMismatch);
        assert_eq!(ScriptNumber::from_bytes(&[0x05], MAX_NUM_LEN).unwrap(), ScriptNumber(5));
    }
}
