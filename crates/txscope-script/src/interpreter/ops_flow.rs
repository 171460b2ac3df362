//! Flow control operations for the script interpreter.
//!
//! The enabled-state is an explicit stack: IF (or NOTIF, with the condition
//! inverted) saves the current state and enters its branch, ELSE flips the branch only when the enclosing state is
//! enabled, ENDIF restores the saved state. IF inside a disabled branch still
//! opens a (disabled) level so its ELSE/ENDIF balance.

use crate::Operation;

use super::error::{InterpreterError, InterpreterErrorCode};
use super::thread::Thread;

impl<'a> Thread<'a> {
    pub(crate) fn op_if(&mut self, negate: bool) -> Result<(), InterpreterError> {
        if self.cond_stack.len() >= self.cfg.max_conditional_depth {
            return Err(InterpreterError::new(
                InterpreterErrorCode::ConditionalTooDeep,
                format!(
                    "conditional nesting exceeds the max allowed depth of {}",
                    self.cfg.max_conditional_depth
                ),
            ));
        }

        let branch = if self.enabled {
            self.dstack.pop_bool()? != negate
        } else {
            false
        };
        self.cond_stack.push(self.enabled);
        self.enabled = branch;
        Ok(())
    }

    pub(crate) fn op_else(&mut self, op: &Operation) -> Result<(), InterpreterError> {
        let parent = *self.cond_stack.last().ok_or_else(|| unbalanced(op))?;
        self.enabled = parent && !self.enabled;
        Ok(())
    }

    pub(crate) fn op_endif(&mut self, op: &Operation) -> Result<(), InterpreterError> {
        self.enabled = self.cond_stack.pop().ok_or_else(|| unbalanced(op))?;
        Ok(())
    }
}

fn unbalanced(op: &Operation) -> InterpreterError {
    InterpreterError::new(
        InterpreterErrorCode::UnbalancedConditional,
        format!(
            "encountered opcode {} with no matching opcode to begin conditional execution",
            op.name()
        ),
    )
}
