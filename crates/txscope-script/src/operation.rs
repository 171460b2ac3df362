//! Single decoded script operations.
//!
//! An `Operation` keeps the exact bytes it was decoded from, so that a list
//! of operations re-encodes byte-identically even when an opcode carries no
//! meaning for this crate.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use txscope_primitives::util::ByteReader;
use txscope_primitives::PrimitivesError;

use crate::opcodes::*;
use crate::value::ScriptValue;
use crate::ScriptError;

/// One opcode with its optional operand and original encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    opcode: u8,
    operand: Option<Vec<u8>>,
    raw: Vec<u8>,
}

impl Operation {
    /// Build a push of `data` with the smallest length prefix.
    ///
    /// Lengths for PUSHDATA2/PUSHDATA4 are written big-endian, matching the
    /// decoder.
    ///
    /// # Arguments
    /// * `data` - The bytes to push.
    ///
    /// # Returns
    /// The push operation, or `DataTooBig` beyond `u32::MAX` bytes.
    pub fn push(data: &[u8]) -> Result<Self, ScriptError> {
        let len = data.len();
        let mut raw = Vec::with_capacity(len + 5);
        if len == 0 {
            raw.push(OP_0);
        } else if len <= OP_DATA_75 as usize {
            raw.push(len as u8);
        } else if len <= 0xff {
            raw.push(OP_PUSHDATA1);
            raw.push(len as u8);
        } else if len <= 0xffff {
            raw.push(OP_PUSHDATA2);
            raw.extend_from_slice(&(len as u16).to_be_bytes());
        } else if let Ok(len32) = u32::try_from(len) {
            raw.push(OP_PUSHDATA4);
            raw.extend_from_slice(&len32.to_be_bytes());
        } else {
            return Err(ScriptError::DataTooBig(len));
        }
        raw.extend_from_slice(data);
        Ok(Operation {
            opcode: raw[0],
            operand: Some(data.to_vec()),
            raw,
        })
    }

    /// Build a non-push opcode, or a small-integer push.
    pub fn opcode(op: u8) -> Self {
        Operation {
            opcode: op,
            operand: small_int_operand(op),
            raw: vec![op],
        }
    }

    /// Read one operation from the cursor.
    ///
    /// # Arguments
    /// * `reader` - Cursor positioned at an opcode byte.
    ///
    /// # Returns
    /// The operation with its consumed bytes, or the read failure. On failure
    /// the cursor may have advanced part way into the operation.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, PrimitivesError> {
        let start = reader.position();
        let opcode = reader.read_u8()?;
        let operand = match opcode {
            OP_DATA_1..=OP_DATA_75 => Some(reader.read_bytes(opcode as usize)?.to_vec()),
            OP_PUSHDATA1 => {
                let len = reader.read_u8()? as usize;
                Some(reader.read_bytes(len)?.to_vec())
            }
            OP_PUSHDATA2 => {
                let len = reader.read_u16_be()? as usize;
                Some(reader.read_bytes(len)?.to_vec())
            }
            OP_PUSHDATA4 => {
                let len = reader.read_u32_be()?;
                let len = usize::try_from(len)
                    .map_err(|_| PrimitivesError::IntegerOverflow(len as u64))?;
                Some(reader.read_bytes(len)?.to_vec())
            }
            op => small_int_operand(op),
        };
        let raw = reader.data()[start..reader.position()].to_vec();
        Ok(Operation { opcode, operand, raw })
    }

    /// The opcode byte.
    pub fn opcode_byte(&self) -> u8 {
        self.opcode
    }

    /// The opcode name (`PUSH` for every push form).
    pub fn name(&self) -> &'static str {
        opcode_name(self.opcode)
    }

    /// Check if this operation pushes data.
    pub fn is_push(&self) -> bool {
        is_push(self.opcode)
    }

    /// The pushed bytes, if this is a push.
    pub fn operand(&self) -> Option<&[u8]> {
        self.operand.as_deref()
    }

    /// The operand as a `ScriptValue`, if this is a push.
    pub fn value(&self) -> Option<ScriptValue> {
        self.operand.as_deref().map(ScriptValue::from)
    }

    /// The exact bytes this operation was decoded from.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// ASM token: operand hex for data pushes, opcode name otherwise.
    pub fn to_asm(&self) -> String {
        match (&self.operand, self.opcode) {
            (Some(data), OP_DATA_1..=OP_PUSHDATA4) => hex::encode(data),
            (Some(_), OP_0) => "0".to_string(),
            (Some(data), _) => {
                // OP_1NEGATE and OP_1..OP_16
                crate::interpreter::scriptnum::decode(data, 1)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| hex::encode(data))
            }
            (None, _) => self.name().to_string(),
        }
    }
}

/// Operand pushed by OP_0, OP_1NEGATE and OP_1..=OP_16.
fn small_int_operand(op: u8) -> Option<Vec<u8>> {
    match op {
        OP_0 => Some(Vec::new()),
        OP_1NEGATE => Some(vec![0x81]),
        OP_1..=OP_16 => Some(vec![op - (OP_1 - 1)]),
        _ => None,
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Operation", 3)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("operand", &self.operand.as_ref().map(hex::encode))?;
        state.serialize_field("raw", &hex::encode(&self.raw))?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(bytes: &[u8]) -> Result<Operation, PrimitivesError> {
        Operation::read_from(&mut ByteReader::new(bytes))
    }

    // ---- decoding ----

    #[test]
    fn test_read_direct_push() {
        let op = read(&[0x03, 0xaa, 0xbb, 0xcc]).unwrap();
        assert_eq!(op.name(), PUSH);
        assert_eq!(op.operand(), Some(&[0xaa, 0xbb, 0xcc][..]));
        assert_eq!(op.raw(), &[0x03, 0xaa, 0xbb, 0xcc]);
    }

    #[test]
    fn test_read_op0_is_empty_push() {
        let op = read(&[OP_0]).unwrap();
        assert!(op.is_push());
        assert_eq!(op.operand(), Some(&[][..]));
    }

    #[test]
    fn test_read_pushdata_lengths_big_endian() {
        let mut bytes = vec![OP_PUSHDATA2, 0x01, 0x00];
        bytes.extend(vec![0x11; 256]);
        let op = read(&bytes).unwrap();
        assert_eq!(op.operand().map(|d| d.len()), Some(256));
        assert_eq!(op.raw().len(), 259);

        let mut bytes = vec![OP_PUSHDATA4, 0x00, 0x00, 0x00, 0x02, 0xab, 0xcd];
        bytes.push(0xff); // trailing byte belongs to the next op
        let op = read(&bytes).unwrap();
        assert_eq!(op.operand(), Some(&[0xab, 0xcd][..]));
        assert_eq!(op.raw(), &bytes[..7]);
    }

    #[test]
    fn test_read_small_ints() {
        assert_eq!(read(&[OP_1NEGATE]).unwrap().operand(), Some(&[0x81][..]));
        assert_eq!(read(&[OP_1]).unwrap().operand(), Some(&[0x01][..]));
        assert_eq!(read(&[OP_16]).unwrap().operand(), Some(&[0x10][..]));
        let reserved = read(&[OP_RESERVED]).unwrap();
        assert_eq!(reserved.name(), "RESERVED");
        assert_eq!(reserved.operand(), None);
    }

    #[test]
    fn test_read_named_and_unknown() {
        let op = read(&[OP_CHECKSIG]).unwrap();
        assert_eq!(op.name(), "CHECKSIG");
        assert!(!op.is_push());

        let op = read(&[0xfe]).unwrap();
        assert_eq!(op.name(), UNKNOWN);
        assert_eq!(op.raw(), &[0xfe]);
    }

    #[test]
    fn test_read_truncated_push() {
        assert!(matches!(
            read(&[0x05, 0x01, 0x02]),
            Err(PrimitivesError::TruncatedInput { needed: 5, remaining: 2 })
        ));
        assert!(read(&[OP_PUSHDATA2, 0x01]).is_err());
    }

    // ---- building ----

    #[test]
    fn test_push_prefix_selection() {
        assert_eq!(Operation::push(&[]).unwrap().raw(), &[OP_0]);
        assert_eq!(Operation::push(&[0x07]).unwrap().raw(), &[0x01, 0x07]);
        assert_eq!(Operation::push(&[0u8; 75]).unwrap().raw()[0], 75);
        assert_eq!(&Operation::push(&[0u8; 76]).unwrap().raw()[..2], &[OP_PUSHDATA1, 76]);
        assert_eq!(
            &Operation::push(&[0u8; 256]).unwrap().raw()[..3],
            &[OP_PUSHDATA2, 0x01, 0x00]
        );
        assert_eq!(
            &Operation::push(&[0u8; 0x10000]).unwrap().raw()[..5],
            &[OP_PUSHDATA4, 0x00, 0x01, 0x00, 0x00]
        );
    }

    #[test]
    fn test_built_op0_matches_decoded() {
        let built = Operation::opcode(OP_0);
        assert_eq!(built, read(&[OP_0]).unwrap());
        assert_eq!(built, Operation::push(&[]).unwrap());
        assert_eq!(built.value().map(|v| v.bytes().is_empty()), Some(true));
    }

    #[test]
    fn test_built_push_reads_back() {
        let built = Operation::push(&[0x42; 300]).unwrap();
        let decoded = read(built.raw()).unwrap();
        assert_eq!(decoded, built);
    }

    #[test]
    fn test_asm_tokens() {
        assert_eq!(Operation::push(&[0xab]).unwrap().to_asm(), "ab");
        assert_eq!(Operation::opcode(OP_0).to_asm(), "0");
        assert_eq!(Operation::opcode(OP_1NEGATE).to_asm(), "-1");
        assert_eq!(Operation::opcode(OP_16).to_asm(), "16");
        assert_eq!(Operation::opcode(OP_DUP).to_asm(), "DUP");
    }
}
