//! Interpreter limits.

/// Default bound on IF nesting.
pub const DEFAULT_MAX_CONDITIONAL_DEPTH: usize = 100;

/// Interpreter configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Deepest allowed IF nesting; the next IF fails with `ConditionalTooDeep`.
    pub max_conditional_depth: usize,
}

impl InterpreterConfig {
    pub fn new(max_conditional_depth: usize) -> Self {
        InterpreterConfig { max_conditional_depth }
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_conditional_depth: DEFAULT_MAX_CONDITIONAL_DEPTH,
        }
    }
}
