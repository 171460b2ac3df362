//! Core transaction type.
//!
//! Represents a decoded transaction with version, inputs, outputs and the
//! trailing time (lock time) field. Every input, every output and the
//! transaction itself remember the byte range they were decoded from, so
//! callers can show the raw bytes of any part.

use std::fmt;

use serde::{Deserialize, Serialize};

use txscope_primitives::chainhash::ChainHash;
use txscope_primitives::util::{ByteRange, ByteReader, ByteWriter, VarInt};

use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::TransactionError;

/// A transaction consisting of a version, a set of inputs, a set of
/// outputs, and a lock time.
///
/// # Wire format
///
/// | Field        | Size                      |
/// |--------------|---------------------------|
/// | version      | 4 bytes (LE)              |
/// | input count  | VarInt                    |
/// | inputs       | variable (per input)      |
/// | output count | VarInt                    |
/// | outputs      | variable (per output)     |
/// | lock_time    | 4 bytes (LE)              |
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction format version.
    pub version: u32,

    /// Ordered list of transaction inputs.
    pub inputs: Vec<TransactionInput>,

    /// Ordered list of transaction outputs.
    pub outputs: Vec<TransactionOutput>,

    /// The trailing time field.
    pub lock_time: u32,

    /// Bytes this transaction occupied in its source buffer.
    #[serde(default)]
    pub byte_range: ByteRange,
}

impl Transaction {
    /// Create a new empty transaction with version 1 and lock time 0.
    pub fn new() -> Self {
        Transaction {
            version: 1,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
            byte_range: ByteRange::default(),
        }
    }

    // -----------------------------------------------------------------
    // Deserialization
    // -----------------------------------------------------------------

    /// Parse a transaction from a hex-encoded string.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Parse a transaction from raw bytes.
    ///
    /// This method requires the byte slice to contain exactly one complete
    /// transaction with no trailing data.
    ///
    /// # Arguments
    /// * `bytes` - The raw transaction bytes.
    ///
    /// # Returns
    /// `Ok(Transaction)` on success, or a `TransactionError` if the data
    /// is truncated or has trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = ByteReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if !reader.at_end() {
            return Err(TransactionError::TrailingBytes(reader.remaining()));
        }
        Ok(tx)
    }

    /// Deserialize a transaction from a `ByteReader`.
    ///
    /// Byte ranges are offsets into the reader's whole buffer.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of a serialized transaction.
    ///
    /// # Returns
    /// `Ok(Transaction)` on success, or a `TransactionError` on truncated data.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TransactionError> {
        let start = reader.position();

        let version = reader
            .read_u32_le()
            .map_err(TransactionError::reading("version"))?;

        let input_count = read_count(reader, "input count")?;
        let mut inputs = Vec::with_capacity(input_count.min(reader.remaining()));
        for _ in 0..input_count {
            inputs.push(TransactionInput::read_from(reader)?);
        }

        let output_count = read_count(reader, "output count")?;
        let mut outputs = Vec::with_capacity(output_count.min(reader.remaining()));
        for _ in 0..output_count {
            outputs.push(TransactionOutput::read_from(reader)?);
        }

        let lock_time = reader
            .read_u32_le()
            .map_err(TransactionError::reading("lock time"))?;

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
            byte_range: reader.range_from(start),
        })
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// Serialize this transaction to raw bytes.
    ///
    /// # Returns
    /// version(4) + varint(n_in) + inputs + varint(n_out) + outputs + locktime(4).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(256);
        self.write_to(&mut writer);
        writer.into_bytes()
    }

    /// Serialize this transaction into a `ByteWriter`.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u32_le(self.version);

        writer.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(writer);
        }

        writer.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(writer);
        }

        writer.write_u32_le(self.lock_time);
    }

    /// Serialize this transaction to a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    // -----------------------------------------------------------------
    // Identity and accessors
    // -----------------------------------------------------------------

    /// Compute the transaction ID (double SHA-256 of the serialized bytes).
    ///
    /// Script encoding is lossless, so this equals the hash of the source
    /// byte range for any decoded transaction.
    pub fn tx_id(&self) -> ChainHash {
        ChainHash::digest(&self.to_bytes())
    }

    /// The transaction ID as display (byte-reversed) hex.
    pub fn tx_id_hex(&self) -> String {
        self.tx_id().to_string()
    }

    /// Serialized size in bytes.
    pub fn size(&self) -> usize {
        let inputs: usize = self
            .inputs
            .iter()
            .map(|i| 36 + script_field_len(i.unlocking_script.encoded_len()) + 4)
            .sum();
        let outputs: usize = self
            .outputs
            .iter()
            .map(|o| 8 + script_field_len(o.locking_script.encoded_len()))
            .sum();
        4 + VarInt::from(self.inputs.len()).length()
            + inputs
            + VarInt::from(self.outputs.len()).length()
            + outputs
            + 4
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Check if this is a coinbase transaction (one input with a null outpoint).
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].is_null_outpoint()
    }

    /// Sum of all output values; `None` on overflow.
    pub fn total_output_satoshis(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |acc, o| acc.checked_add(o.satoshis))
    }

    /// Check if any script in the transaction stopped decoding early.
    pub fn has_script_faults(&self) -> bool {
        self.inputs.iter().any(|i| i.unlocking_script.has_fault())
            || self.outputs.iter().any(|o| o.locking_script.has_fault())
    }

    /// Index of the input spending `prev_txid:index`, if any.
    pub fn find_spending_input(&self, prev_txid: &ChainHash, index: u32) -> Option<usize> {
        self.inputs
            .iter()
            .position(|i| &i.source_txid == prev_txid && i.source_tx_out_index == index)
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Read a varint element count as a `usize`.
fn read_count(reader: &mut ByteReader<'_>, field: &'static str) -> Result<usize, TransactionError> {
    reader
        .read_varint()
        .and_then(|count| count.to_usize())
        .map_err(TransactionError::reading(field))
}

/// Length of a varint-prefixed script field.
fn script_field_len(script_len: usize) -> usize {
    VarInt::from(script_len).length() + script_len
}
