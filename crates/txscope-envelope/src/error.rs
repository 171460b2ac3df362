/// Error types for envelope decoding.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The envelope ended where the format requires a push.
    #[error("envelope missing {0}")]
    MissingPush(&'static str),
    /// A count push is negative, too wide, or larger than what follows.
    #[error("invalid {what}: {value}")]
    InvalidCount { what: &'static str, value: String },
    /// The V0 envelope header is not a valid header message.
    #[error("envelope header: {0}")]
    Header(#[from] prost::DecodeError),
    /// The envelope's payload failed to decode.
    #[error("payload: {0}")]
    Tokenized(#[from] txscope_tokenized::TokenizedError),
}
