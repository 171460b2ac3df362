//! txscope - Transaction inspection.
//!
//! Re-exports every layer of the decoder and adds the `inspect` module,
//! which turns a raw transaction into a report: txid, byte ranges, the
//! payload each script was recognized as, the Tokenized action an envelope
//! carries, and anything nested inside those actions.

pub use txscope_envelope as envelope;
pub use txscope_primitives as primitives;
pub use txscope_script as script;
pub use txscope_tokenized as tokenized;
pub use txscope_transaction as transaction;

pub mod config;
pub mod fee;
pub mod inspect;

mod error;
pub use config::InspectConfig;
pub use error::InspectError;
pub use fee::FeeSummary;
pub use inspect::{
    find_spending_input, inspect, inspect_batch, Embedded, InputReport, Inspector, OutputReport,
    TransactionReport,
};
pub use txscope_transaction::verify_input;
