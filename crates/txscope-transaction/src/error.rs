use txscope_primitives::PrimitivesError;
use txscope_script::interpreter::InterpreterError;

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// A field could not be read (usually `TruncatedInput`).
    #[error("reading {field}: {source}")]
    Read {
        field: &'static str,
        #[source]
        source: PrimitivesError,
    },
    /// Bytes left over after a complete transaction.
    #[error("trailing {0} bytes after transaction")]
    TrailingBytes(usize),
    /// Input index outside the transaction.
    #[error("input index {index} out of range (tx has {count} inputs)")]
    InvalidInputIndex { index: usize, count: usize },
    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
    /// Script evaluation failed while verifying an input.
    #[error("script evaluation failed: {0}")]
    Interpreter(#[from] InterpreterError),
    /// An underlying script error (forwarded from `txscope-script`).
    #[error("script error: {0}")]
    Script(#[from] txscope_script::ScriptError),
    /// An underlying primitives error (forwarded from `txscope-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] PrimitivesError),
}

impl TransactionError {
    /// Attach a field name to a cursor failure.
    pub(crate) fn reading(field: &'static str) -> impl FnOnce(PrimitivesError) -> Self {
        move |source| TransactionError::Read { field, source }
    }
}
