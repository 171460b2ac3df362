/// Error types for transaction inspection.
use thiserror::Error;

use txscope_envelope::EnvelopeError;
use txscope_tokenized::TokenizedError;
use txscope_transaction::TransactionError;

/// Errors from inspecting a transaction or loading inspection config.
#[derive(Debug, Error)]
pub enum InspectError {
    /// The transaction bytes did not decode.
    #[error("transaction: {0}")]
    Transaction(#[from] TransactionError),
    /// A recognized envelope was malformed.
    #[error("envelope: {0}")]
    Envelope(#[from] EnvelopeError),
    /// A payload failed to decode, or nesting went too deep.
    #[error("payload: {0}")]
    Tokenized(#[from] TokenizedError),
    /// The config document is not valid.
    #[error("config: {0}")]
    Config(#[from] serde_json::Error),
}

impl InspectError {
    /// Whether this error is the nested decode bound being hit.
    pub fn is_recursion_limit(&self) -> bool {
        matches!(
            self,
            InspectError::Tokenized(TokenizedError::RecursionLimitExceeded { .. })
                | InspectError::Envelope(EnvelopeError::Tokenized(
                    TokenizedError::RecursionLimitExceeded { .. }
                ))
        )
    }
}
