/// txscope - Transaction decoding, encoding and signature hashing.
///
/// Provides the Transaction type with byte-range annotated inputs and
/// outputs, the legacy and fork-id signature hash preimages, and the spend
/// context the script interpreter uses for CHECKSIG.

pub mod transaction;
pub mod input;
pub mod output;
pub mod sighash;
pub mod context;

mod error;
pub use error::TransactionError;
pub use transaction::Transaction;
pub use input::TransactionInput;
pub use output::TransactionOutput;
pub use context::{verify_input, SpendContext};
