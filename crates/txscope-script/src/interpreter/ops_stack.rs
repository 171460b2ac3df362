//! Stack manipulation and arithmetic operations for the script interpreter.

use super::error::InterpreterError;
use super::scriptnum::ScriptNumber;
use super::thread::Thread;

impl<'a> Thread<'a> {
    pub(crate) fn op_dup(&mut self) -> Result<(), InterpreterError> {
        let top = self.dstack.peek_byte_array()?;
        self.dstack.push_byte_array(top);
        Ok(())
    }

    pub(crate) fn op_to_alt_stack(&mut self) -> Result<(), InterpreterError> {
        let data = self.dstack.pop_byte_array()?;
        self.astack.push_byte_array(data);
        Ok(())
    }

    pub(crate) fn op_from_alt_stack(&mut self) -> Result<(), InterpreterError> {
        let data = self.astack.pop_byte_array()?;
        self.dstack.push_byte_array(data);
        Ok(())
    }

    pub(crate) fn op_1add(&mut self) -> Result<(), InterpreterError> {
        let m = self.dstack.pop_int()?;
        self.dstack.push_int(ScriptNumber(m.0 + 1));
        Ok(())
    }

    /// Pops b then a, pushes a <= b.
    pub(crate) fn op_less_than_or_equal(&mut self) -> Result<(), InterpreterError> {
        let b = self.dstack.pop_int()?;
        let a = self.dstack.pop_int()?;
        self.dstack.push_bool(a <= b);
        Ok(())
    }
}
