use thiserror::Error;

/// Errors from schema loading and payload decoding.
#[derive(Debug, Error)]
pub enum TokenizedError {
    #[error("schema document: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("payload wire format: {0}")]
    Wire(#[from] prost::DecodeError),

    #[error("field {field}: expected {expected}, found wire type {wire_type}")]
    WireTypeMismatch {
        field: String,
        expected: &'static str,
        wire_type: u8,
    },

    #[error("field {field}: length {len} exceeds remaining {remaining} bytes")]
    LengthOverrun {
        field: String,
        len: u64,
        remaining: usize,
    },

    #[error("nested decode exceeded depth limit of {limit}")]
    RecursionLimitExceeded { limit: usize },
}
