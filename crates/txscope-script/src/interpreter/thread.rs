//! Script execution thread: one interpreter state driven over one or more
//! scripts in order.

use crate::opcodes::*;
use crate::{Operation, Script};

use super::config::InterpreterConfig;
use super::error::{InterpreterError, InterpreterErrorCode};
use super::stack::Stack;
use super::TxContext;

/// The execution thread for the script interpreter.
pub struct Thread<'a> {
    /// The main data stack.
    pub dstack: Stack,
    /// The alternate stack used by OP_TOALTSTACK and OP_FROMALTSTACK.
    pub astack: Stack,
    /// Enabled-state saved by each open IF, innermost last.
    pub cond_stack: Vec<bool>,
    /// Whether the current branch executes.
    pub enabled: bool,
    /// Interpreter limits.
    pub cfg: InterpreterConfig,
    /// Optional transaction context for signature verification.
    pub tx_context: Option<&'a dyn TxContext>,
    /// The transaction input index being verified.
    pub input_idx: usize,
}

impl<'a> Thread<'a> {
    pub fn new(
        cfg: InterpreterConfig,
        tx_context: Option<&'a dyn TxContext>,
        input_idx: usize,
    ) -> Self {
        Thread {
            dstack: Stack::new("main"),
            astack: Stack::new("alt"),
            cond_stack: Vec::new(),
            enabled: true,
            cfg,
            tx_context,
            input_idx,
        }
    }

    /// Return true if the current conditional branch is executing.
    pub fn is_branch_executing(&self) -> bool {
        self.enabled
    }

    /// Execute every operation of `script`, leaving the stacks in place.
    ///
    /// A decode fault counts as an unsupported opcode once reached. The alt
    /// stack does not survive past the end of a script.
    pub fn execute_script(&mut self, script: &Script) -> Result<(), InterpreterError> {
        for op in script.operations() {
            self.execute_opcode(op)?;
        }

        if let Some(fault) = script.fault() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::UnsupportedOpcode,
                format!("script could not be fully decoded: {}", fault.reason),
            ));
        }

        if !self.cond_stack.is_empty() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::UnbalancedConditional,
                "end of script reached in conditional execution".to_string(),
            ));
        }

        self.astack.clear();
        Ok(())
    }

    /// Consume the thread, returning the main stack bottom first.
    pub fn into_stack(self) -> Vec<Vec<u8>> {
        self.dstack.into_inner()
    }

    fn execute_opcode(&mut self, op: &Operation) -> Result<(), InterpreterError> {
        let opcode = op.opcode_byte();
        let conditional = matches!(opcode, OP_IF | OP_NOTIF | OP_ELSE | OP_ENDIF);
        if !self.enabled && !conditional {
            return Ok(());
        }

        log::trace!(
            "exec {} (depth {}, branch {})",
            op.to_asm(),
            self.dstack.depth(),
            self.enabled
        );
        self.dispatch_opcode(op)
    }

    fn dispatch_opcode(&mut self, op: &Operation) -> Result<(), InterpreterError> {
        match op.opcode_byte() {
            opcode if is_push(opcode) => {
                self.dstack
                    .push_byte_array(op.operand().map(<[u8]>::to_vec).unwrap_or_default());
                Ok(())
            }

            // Flow
            OP_IF => self.op_if(false),
            OP_NOTIF => self.op_if(true),
            OP_ELSE => self.op_else(op),
            OP_ENDIF => self.op_endif(op),

            // Stack ops
            OP_TOALTSTACK => self.op_to_alt_stack(),
            OP_FROMALTSTACK => self.op_from_alt_stack(),
            OP_DUP => self.op_dup(),

            // Arithmetic
            OP_1ADD => self.op_1add(),
            OP_LESSTHANOREQUAL => self.op_less_than_or_equal(),

            // Crypto
            OP_HASH160 => self.op_hash160(),
            OP_EQUALVERIFY => self.op_equalverify(),
            OP_CHECKSIG => self.op_checksig(),
            OP_CHECKSIGVERIFY => self.op_checksigverify(),

            _ => Err(InterpreterError::new(
                InterpreterErrorCode::UnsupportedOpcode,
                format!("attempt to execute unsupported opcode {} ({:#04x})", op.name(), op.opcode_byte()),
            )),
        }
    }
}
