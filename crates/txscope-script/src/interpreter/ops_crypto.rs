//! Hashing, equality and signature operations for the script interpreter.

use txscope_primitives::hash::hash160;

use crate::sighash::SigHashFlags;

use super::error::{InterpreterError, InterpreterErrorCode};
use super::thread::Thread;

impl<'a> Thread<'a> {
    pub(crate) fn op_hash160(&mut self) -> Result<(), InterpreterError> {
        let data = self.dstack.pop_byte_array()?;
        self.dstack.push_byte_array(hash160(&data).to_vec());
        Ok(())
    }

    pub(crate) fn op_equalverify(&mut self) -> Result<(), InterpreterError> {
        let b = self.dstack.pop_byte_array()?;
        let a = self.dstack.pop_byte_array()?;
        if a != b {
            return Err(InterpreterError::new(
                InterpreterErrorCode::EqualVerifyFailed,
                format!("{} != {}", hex::encode(&a), hex::encode(&b)),
            ));
        }
        Ok(())
    }

    /// Pops the public key then the signature and pushes the result.
    pub(crate) fn op_checksig(&mut self) -> Result<(), InterpreterError> {
        let valid = self.check_signature()?;
        self.dstack.push_bool(valid);
        Ok(())
    }

    pub(crate) fn op_checksigverify(&mut self) -> Result<(), InterpreterError> {
        if !self.check_signature()? {
            return Err(InterpreterError::new(
                InterpreterErrorCode::SignatureVerificationFailed,
                format!("signature check failed for input {}", self.input_idx),
            ));
        }
        Ok(())
    }

    fn check_signature(&mut self) -> Result<bool, InterpreterError> {
        let pk_bytes = self.dstack.pop_byte_array()?;
        let full_sig_bytes = self.dstack.pop_byte_array()?;

        let Some((&flag_byte, sig_bytes)) = full_sig_bytes.split_last() else {
            return Ok(false);
        };

        let ctx = self.tx_context.ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::MissingContext,
                "no tx context for checksig".to_string(),
            )
        })?;

        let flags = SigHashFlags::new(flag_byte);
        ctx.verify_signature(sig_bytes, flags, &pk_bytes, self.input_idx)
    }
}
