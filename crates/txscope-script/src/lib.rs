/// txscope - Script decoding, encoding and evaluation.
///
/// Provides the opcode table, the lossless operation codec, the numeric/text
/// views over pushed operands, address encoding for hashed public keys, the
/// sighash flag byte, and a partial script interpreter.

pub mod opcodes;
pub mod operation;
pub mod script;
pub mod value;
pub mod address;
pub mod sighash;
pub mod interpreter;

mod error;
pub use error::ScriptError;
pub use address::{AddressEncoder, Base58AddressEncoder, Network};
pub use operation::Operation;
pub use script::{Script, ScriptFault};
pub use sighash::{SigHashBase, SigHashFlags};
pub use value::ScriptValue;
