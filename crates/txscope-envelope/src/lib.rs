/// txscope - Output script classification and data envelopes.
///
/// Classifies decoded scripts by their opcode names: pay-to-public-key-hash
/// locking and unlocking scripts, and null-data outputs carrying a data
/// envelope. Envelopes come in two wire versions; both resolve their content
/// through the Tokenized payload decoder.

pub mod cursor;
pub mod header;
pub mod envelope;
pub mod matcher;

mod error;
pub use error::EnvelopeError;
pub use cursor::OpCursor;
pub use header::EnvelopeHeader;
pub use envelope::{Envelope, EnvelopeV0, EnvelopeV1, PROTOCOL_TAGS};
pub use matcher::{
    decode_input_script, decode_output_script, P2pkh, Payload, ENVELOPE_V0_MARKER,
    ENVELOPE_V1_MARKER,
};
