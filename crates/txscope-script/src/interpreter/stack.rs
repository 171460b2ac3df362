//! Script execution stack.

use super::error::{InterpreterError, InterpreterErrorCode};
use super::scriptnum::{ScriptNumber, MAX_NUM_LEN};

/// Convert byte array to boolean (negative zero is false).
pub fn as_bool(t: &[u8]) -> bool {
    match t.split_last() {
        None => false,
        Some((&last, rest)) => rest.iter().any(|&b| b != 0) || (last & 0x7f) != 0,
    }
}

/// Convert boolean to byte array.
pub fn from_bool(v: bool) -> Vec<u8> {
    if v {
        vec![1]
    } else {
        vec![]
    }
}

/// The main data/alt stack used by the script interpreter.
#[derive(Debug, Default, Clone)]
pub struct Stack {
    stk: Vec<Vec<u8>>,
    name: &'static str,
}

impl Stack {
    pub fn new(name: &'static str) -> Self {
        Stack { stk: Vec::new(), name }
    }

    pub fn depth(&self) -> usize {
        self.stk.len()
    }

    pub fn push_byte_array(&mut self, data: Vec<u8>) {
        self.stk.push(data);
    }

    pub fn push_int(&mut self, n: ScriptNumber) {
        self.push_byte_array(n.to_bytes());
    }

    pub fn push_bool(&mut self, val: bool) {
        self.push_byte_array(from_bool(val));
    }

    pub fn pop_byte_array(&mut self) -> Result<Vec<u8>, InterpreterError> {
        self.stk.pop().ok_or_else(|| self.underflow())
    }

    pub fn pop_int(&mut self) -> Result<ScriptNumber, InterpreterError> {
        let data = self.pop_byte_array()?;
        ScriptNumber::from_bytes(&data, MAX_NUM_LEN)
    }

    pub fn pop_bool(&mut self) -> Result<bool, InterpreterError> {
        let data = self.pop_byte_array()?;
        Ok(as_bool(&data))
    }

    /// Clone of the top element.
    pub fn peek_byte_array(&self) -> Result<Vec<u8>, InterpreterError> {
        self.stk.last().cloned().ok_or_else(|| self.underflow())
    }

    pub fn clear(&mut self) {
        self.stk.clear();
    }

    /// Consume the stack, bottom element first.
    pub fn into_inner(self) -> Vec<Vec<u8>> {
        self.stk
    }

    fn underflow(&self) -> InterpreterError {
        InterpreterError::new(
            InterpreterErrorCode::StackUnderflow,
            format!("attempt to read from empty {} stack", self.name),
        )
    }
}
