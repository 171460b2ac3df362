//! Partial script interpreter.
//!
//! Executes the opcode subset needed for pay-to-public-key-hash spends and
//! plain signature checks: pushes, IF/ELSE/ENDIF, DUP, the alt stack, 1ADD,
//! LESSTHANOREQUAL, HASH160, EQUALVERIFY and CHECKSIG(VERIFY). Anything else
//! fails with `UnsupportedOpcode`.
//!
//! # Architecture
//!
//! The interpreter does not depend on the transaction crate. Callers provide
//! a [`TxContext`] that computes the signature hash and verifies signatures
//! for the input under evaluation.
//!
//! # Example
//!
//! ```ignore
//! use txscope_script::interpreter::Engine;
//!
//! let engine = Engine::new();
//! engine.verify_spend(&unlocking_script, &locking_script, Some(&ctx), 0)?;
//! ```

pub mod config;
pub mod error;
pub mod scriptnum;
pub mod stack;
pub mod thread;

mod ops_crypto;
mod ops_flow;
mod ops_stack;

pub use config::InterpreterConfig;
pub use error::{InterpreterError, InterpreterErrorCode};
pub use scriptnum::ScriptNumber;
pub use stack::Stack;

use crate::sighash::SigHashFlags;
use crate::Script;
use scriptnum::MAX_NUM_LEN;
use thread::Thread;

/// Signature verification for one spending transaction.
///
/// Implementors know the transaction and the outputs being spent, and so can
/// build the signature hash preimage selected by `flags`.
pub trait TxContext {
    /// Verify a signature against a public key for the given input.
    ///
    /// `sig` is the DER signature with the sighash byte already removed;
    /// `flags` is that byte. Malformed signatures or keys verify as
    /// `Ok(false)`; `Err` is reserved for an unusable context such as an
    /// input index out of range.
    fn verify_signature(
        &self,
        sig: &[u8],
        flags: SigHashFlags,
        pub_key: &[u8],
        input_idx: usize,
    ) -> Result<bool, InterpreterError>;
}

/// The script execution engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct Engine {
    config: InterpreterConfig,
}

impl Engine {
    pub fn new() -> Self {
        Engine::default()
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        Engine { config }
    }

    /// Execute a script and return the final main stack, bottom first.
    ///
    /// No truthiness check is applied.
    pub fn run(
        &self,
        script: &Script,
        tx_context: Option<&dyn TxContext>,
        input_idx: usize,
    ) -> Result<Vec<Vec<u8>>, InterpreterError> {
        let mut thread = Thread::new(self.config, tx_context, input_idx);
        thread.execute_script(script)?;
        Ok(thread.into_stack())
    }

    /// Execute a script and require a single truthy result.
    pub fn evaluate(
        &self,
        script: &Script,
        tx_context: Option<&dyn TxContext>,
        input_idx: usize,
    ) -> Result<(), InterpreterError> {
        let stack = self.run(script, tx_context, input_idx)?;
        check_truthy(&stack)
    }

    /// Execute the unlocking script then the locking script on one state.
    ///
    /// # Arguments
    /// * `unlocking_script` - The input's unlocking (signature) script.
    /// * `locking_script` - The spent output's locking script.
    /// * `tx_context` - Transaction context for checksig operations.
    /// * `input_idx` - The input index being verified.
    pub fn verify_spend(
        &self,
        unlocking_script: &Script,
        locking_script: &Script,
        tx_context: Option<&dyn TxContext>,
        input_idx: usize,
    ) -> Result<(), InterpreterError> {
        let mut thread = Thread::new(self.config, tx_context, input_idx);
        thread.execute_script(unlocking_script)?;
        thread.execute_script(locking_script)?;
        check_truthy(&thread.into_stack())
    }
}

/// Require exactly one non-zero number on a final stack.
pub fn check_truthy(stack: &[Vec<u8>]) -> Result<(), InterpreterError> {
    let [top] = stack else {
        return Err(InterpreterError::new(
            InterpreterErrorCode::ScriptNotTruthy,
            format!(
                "expected exactly one stack item at end of script, found {}",
                stack.len()
            ),
        ));
    };
    match ScriptNumber::from_bytes(top, MAX_NUM_LEN) {
        Ok(n) if !n.is_zero() => Ok(()),
        Ok(_) => Err(InterpreterError::new(
            InterpreterErrorCode::ScriptNotTruthy,
            "false stack entry at end of script execution".to_string(),
        )),
        Err(_) => Err(InterpreterError::new(
            InterpreterErrorCode::ScriptNotTruthy,
            format!("final stack entry {} is not a number", hex::encode(top)),
        )),
    }
}
