//! Spend context: the transaction and spent output behind CHECKSIG.

use txscope_primitives::ec::{PublicKey, Signature};
use txscope_script::interpreter::{Engine, InterpreterError, InterpreterErrorCode, TxContext};
use txscope_script::SigHashFlags;

use crate::output::TransactionOutput;
use crate::sighash;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Verifies signatures for inputs of one transaction spending one output.
pub struct SpendContext<'a> {
    tx: &'a Transaction,
    spent_output: &'a TransactionOutput,
}

impl<'a> SpendContext<'a> {
    /// # Arguments
    /// * `tx` - The spending transaction.
    /// * `spent_output` - The output the evaluated input spends; its value
    ///   and locking script feed the signature hash.
    pub fn new(tx: &'a Transaction, spent_output: &'a TransactionOutput) -> Self {
        SpendContext { tx, spent_output }
    }

    /// Digest the signature for `input_idx` must cover.
    pub fn signature_hash(
        &self,
        input_idx: usize,
        flags: SigHashFlags,
    ) -> Result<[u8; 32], TransactionError> {
        sighash::signature_hash(
            self.tx,
            input_idx,
            &self.spent_output.locking_script.to_bytes(),
            flags,
            self.spent_output.satoshis,
        )
    }
}

impl TxContext for SpendContext<'_> {
    fn verify_signature(
        &self,
        sig: &[u8],
        flags: SigHashFlags,
        pub_key: &[u8],
        input_idx: usize,
    ) -> Result<bool, InterpreterError> {
        let hash = self.signature_hash(input_idx, flags).map_err(|e| {
            InterpreterError::new(InterpreterErrorCode::InvalidInputIndex, e.to_string())
        })?;

        let signature = match Signature::from_der(sig) {
            Ok(signature) => signature,
            Err(e) => {
                log::debug!("input {}: unparseable signature: {}", input_idx, e);
                return Ok(false);
            }
        };
        let public_key = match PublicKey::from_bytes(pub_key) {
            Ok(key) => key,
            Err(e) => {
                log::debug!("input {}: unparseable public key: {}", input_idx, e);
                return Ok(false);
            }
        };

        Ok(signature.verify(&hash, &public_key))
    }
}

/// Run an input's unlocking script followed by the spent output's locking
/// script on one interpreter state.
///
/// # Arguments
/// * `tx` - The spending transaction.
/// * `index` - The input to verify.
/// * `spent_output` - The output that input spends.
///
/// # Returns
/// `Ok(())` when the scripts leave a single truthy value.
pub fn verify_input(
    tx: &Transaction,
    index: usize,
    spent_output: &TransactionOutput,
) -> Result<(), TransactionError> {
    let input = tx.inputs.get(index).ok_or(TransactionError::InvalidInputIndex {
        index,
        count: tx.inputs.len(),
    })?;
    let ctx = SpendContext::new(tx, spent_output);
    Engine::new().verify_spend(
        &input.unlocking_script,
        &spent_output.locking_script,
        Some(&ctx),
        index,
    )?;
    Ok(())
}
