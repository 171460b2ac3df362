//! Interpreter error types.

use std::fmt;

/// Error codes for the script interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpreterErrorCode {
    /// Pop or peek on an empty stack.
    StackUnderflow,
    /// A stack element could not be read as a number.
    TypeMismatch,
    /// OP_EQUALVERIFY compared unequal elements.
    EqualVerifyFailed,
    /// OP_CHECKSIGVERIFY found an invalid signature.
    SignatureVerificationFailed,
    /// The final stack is not a single non-zero number.
    ScriptNotTruthy,
    /// Opcode outside the supported subset, or a script decode fault.
    UnsupportedOpcode,
    /// ELSE/ENDIF without IF, or IF left open.
    UnbalancedConditional,
    /// Conditional nesting exceeds the configured bound.
    ConditionalTooDeep,
    /// Signature check requested without a spend context.
    MissingContext,
    /// Input index outside the spending transaction.
    InvalidInputIndex,
}

impl fmt::Display for InterpreterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A script interpreter error with an error code and description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterError {
    pub code: InterpreterErrorCode,
    pub description: String,
}

impl InterpreterError {
    pub fn new(code: InterpreterErrorCode, description: String) -> Self {
        InterpreterError { code, description }
    }
}

impl fmt::Display for InterpreterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.description)
    }
}

impl std::error::Error for InterpreterError {}

/// Check if an error has a specific error code.
pub fn is_error_code(err: &InterpreterError, code: InterpreterErrorCode) -> bool {
    err.code == code
}
