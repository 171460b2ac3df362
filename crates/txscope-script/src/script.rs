/// Script type - an ordered list of decoded operations.
///
/// Decoding never fails: when a read runs out of bytes part way through an
/// operation, decoding stops and the undecodable tail is kept as a
/// `ScriptFault`. Encoding concatenates every operation's original bytes
/// followed by the fault remainder, so `to_bytes` always reproduces the input.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use txscope_primitives::util::{ByteReader, ByteWriter};
use txscope_primitives::PrimitivesError;

use crate::operation::Operation;
use crate::ScriptError;

/// Terminal error marker of a partially decoded script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptFault {
    /// Why decoding stopped.
    pub reason: String,
    /// The bytes from the failed operation to the end of the script.
    pub remainder: Vec<u8>,
}

/// A decoded script.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Script {
    operations: Vec<Operation>,
    fault: Option<ScriptFault>,
}

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a new empty script.
    pub fn new() -> Self {
        Script::default()
    }

    /// Decode a script body.
    ///
    /// # Arguments
    /// * `bytes` - Raw script bytes, without the length prefix.
    ///
    /// # Returns
    /// The decoded operations; a truncated tail is kept as the script's fault.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut reader = ByteReader::new(bytes);
        let mut operations = Vec::new();
        let mut fault = None;

        while !reader.at_end() {
            let start = reader.position();
            match Operation::read_from(&mut reader) {
                Ok(op) => operations.push(op),
                Err(e) => {
                    log::warn!(
                        "script decode stopped at offset {} after {} operations: {}",
                        start,
                        operations.len(),
                        e
                    );
                    fault = Some(ScriptFault {
                        reason: e.to_string(),
                        remainder: bytes[start..].to_vec(),
                    });
                    break;
                }
            }
        }

        Script { operations, fault }
    }

    /// Create a script from a hex-encoded string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string (e.g. "76a914...88ac").
    ///
    /// # Returns
    /// The decoded `Script`, or an error if the hex is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        let bytes = hex::decode(hex_str)?;
        Ok(Script::from_bytes(&bytes))
    }

    /// Build a script from already-formed operations.
    pub fn from_operations(operations: Vec<Operation>) -> Self {
        Script { operations, fault: None }
    }

    /// Read a varint-prefixed script from a cursor.
    ///
    /// Only the length prefix and body length can fail here; the body itself
    /// decodes as in `from_bytes`.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, PrimitivesError> {
        let body = reader.read_var_bytes()?;
        Ok(Script::from_bytes(body))
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Encode the script body.
    ///
    /// # Returns
    /// Every operation's raw bytes in order, followed by any fault remainder.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        for op in &self.operations {
            out.extend_from_slice(op.raw());
        }
        if let Some(fault) = &self.fault {
            out.extend_from_slice(&fault.remainder);
        }
        out
    }

    /// Write the script as a varint-prefixed block.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_var_bytes(&self.to_bytes());
    }

    /// Encode the script body as a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Convert the script to its ASM representation.
    ///
    /// Data pushes appear as hex, opcodes by name. A fault is rendered as a
    /// trailing `[error]` token.
    pub fn to_asm(&self) -> String {
        let mut parts: Vec<String> = self.operations.iter().map(Operation::to_asm).collect();
        if self.fault.is_some() {
            parts.push("[error]".to_string());
        }
        parts.join(" ")
    }

    /// Length of the encoded script body in bytes.
    pub fn encoded_len(&self) -> usize {
        let ops: usize = self.operations.iter().map(|op| op.raw().len()).sum();
        ops + self.fault.as_ref().map_or(0, |f| f.remainder.len())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The decoded operations.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// The terminal error marker, if decoding stopped early.
    pub fn fault(&self) -> Option<&ScriptFault> {
        self.fault.as_ref()
    }

    /// Check if decoding stopped early.
    pub fn has_fault(&self) -> bool {
        self.fault.is_some()
    }

    /// Opcode names in order, ignoring operands.
    pub fn names(&self) -> Vec<&'static str> {
        self.operations.iter().map(Operation::name).collect()
    }

    /// Check if the script has no operations and no fault.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty() && self.fault.is_none()
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_asm())
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_asm())
    }
}

impl Serialize for Script {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Script {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(D::Error::custom)
    }
}
