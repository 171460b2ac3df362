//! Transaction input referencing a previous output.
//!
//! Contains the source transaction ID, output index, unlocking script,
//! sequence number and the byte range the input was decoded from.

use serde::{Deserialize, Serialize};

use txscope_primitives::chainhash::{ChainHash, HASH_SIZE};
use txscope_primitives::util::{ByteRange, ByteReader, ByteWriter};
use txscope_script::Script;

use crate::TransactionError;

/// Default sequence number indicating a finalized input.
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// A single input in a transaction.
///
/// # Wire format
///
/// | Field              | Size             |
/// |--------------------|------------------|
/// | source_txid        | 32 bytes (LE)    |
/// | source_tx_out_index| 4 bytes (LE)     |
/// | script length      | VarInt           |
/// | unlocking_script   | variable         |
/// | sequence_number    | 4 bytes (LE)     |
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    /// Transaction ID of the output being spent. Wire order inside, shown
    /// byte-reversed.
    pub source_txid: ChainHash,

    /// Index of the output within the source transaction.
    pub source_tx_out_index: u32,

    /// The unlocking script.
    pub unlocking_script: Script,

    /// Sequence number.
    pub sequence_number: u32,

    /// Bytes this input occupied in its source buffer.
    #[serde(default)]
    pub byte_range: ByteRange,
}

impl TransactionInput {
    /// Create an input spending `source_txid:source_tx_out_index` with an
    /// empty unlocking script.
    pub fn new(source_txid: ChainHash, source_tx_out_index: u32) -> Self {
        TransactionInput {
            source_txid,
            source_tx_out_index,
            unlocking_script: Script::new(),
            sequence_number: DEFAULT_SEQUENCE_NUMBER,
            byte_range: ByteRange::default(),
        }
    }

    /// Deserialize an input from a `ByteReader`.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of an encoded input.
    ///
    /// # Returns
    /// The input with its byte range set relative to the reader's buffer,
    /// or a `TransactionError` if the data is truncated.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TransactionError> {
        let start = reader.position();

        let txid = reader
            .read_array::<HASH_SIZE>()
            .map_err(TransactionError::reading("source txid"))?;
        let source_tx_out_index = reader
            .read_u32_le()
            .map_err(TransactionError::reading("output index"))?;
        let unlocking_script =
            Script::read_from(reader).map_err(TransactionError::reading("unlocking script"))?;
        let sequence_number = reader
            .read_u32_le()
            .map_err(TransactionError::reading("sequence number"))?;

        Ok(TransactionInput {
            source_txid: ChainHash::new(txid),
            source_tx_out_index,
            unlocking_script,
            sequence_number,
            byte_range: reader.range_from(start),
        })
    }

    /// Serialize this input into a `ByteWriter`.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        self.write_with_script(writer, &self.unlocking_script.to_bytes(), self.sequence_number);
    }

    /// Serialize the outpoint (txid + output index).
    pub fn write_outpoint(&self, writer: &mut ByteWriter) {
        writer.write_bytes(self.source_txid.as_bytes());
        writer.write_u32_le(self.source_tx_out_index);
    }

    /// Serialize with a substituted script and sequence, as needed when
    /// building legacy signature hash preimages.
    pub(crate) fn write_with_script(&self, writer: &mut ByteWriter, script: &[u8], sequence: u32) {
        self.write_outpoint(writer);
        writer.write_var_bytes(script);
        writer.write_u32_le(sequence);
    }

    /// Check if this input has the null outpoint of a coinbase.
    pub fn is_null_outpoint(&self) -> bool {
        self.source_txid == ChainHash::default() && self.source_tx_out_index == 0xFFFF_FFFF
    }
}
