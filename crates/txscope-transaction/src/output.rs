//! Transaction output with a satoshi value and locking script.

use serde::{Deserialize, Serialize};

use txscope_primitives::util::{ByteRange, ByteReader, ByteWriter};
use txscope_script::Script;

use crate::TransactionError;

/// A single output in a transaction.
///
/// # Wire format
///
/// | Field          | Size          |
/// |----------------|---------------|
/// | satoshis       | 8 bytes (LE)  |
/// | script length  | VarInt        |
/// | locking_script | variable      |
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    /// Amount in satoshis.
    pub satoshis: u64,

    /// The locking script.
    pub locking_script: Script,

    /// Bytes this output occupied in its source buffer.
    #[serde(default)]
    pub byte_range: ByteRange,
}

impl TransactionOutput {
    pub fn new(satoshis: u64, locking_script: Script) -> Self {
        TransactionOutput {
            satoshis,
            locking_script,
            byte_range: ByteRange::default(),
        }
    }

    /// Deserialize an output from a `ByteReader`.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TransactionError> {
        let start = reader.position();
        let satoshis = reader
            .read_u64_le()
            .map_err(TransactionError::reading("satoshis"))?;
        let locking_script =
            Script::read_from(reader).map_err(TransactionError::reading("locking script"))?;

        Ok(TransactionOutput {
            satoshis,
            locking_script,
            byte_range: reader.range_from(start),
        })
    }

    /// Serialize this output into a `ByteWriter`.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u64_le(self.satoshis);
        self.locking_script.write_to(writer);
    }
}
