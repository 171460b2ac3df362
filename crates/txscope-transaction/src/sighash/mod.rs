//! Signature hash computation.
//!
//! Two preimage algorithms exist, selected by the FORKID bit of the sighash
//! flag byte:
//!
//! - the fork-id (BIP-143 style) digest, which commits to the value being
//!   spent and to summary hashes of the prevouts, sequences and outputs;
//! - the legacy digest, which re-serializes a modified copy of the whole
//!   transaction.
//!
//! See <https://github.com/bitcoin-sv/bitcoin-sv/blob/master/doc/abc/replay-protected-sighash.md#digest-algorithm>

use txscope_primitives::hash::sha256d;
use txscope_primitives::util::{ByteWriter, VarInt};
use txscope_script::{SigHashBase, SigHashFlags};

use crate::transaction::Transaction;
use crate::TransactionError;

/// Digest signed by legacy SIGHASH_SINGLE when the input has no matching
/// output: the number one as a little-endian 256-bit integer.
pub const SIGHASH_SINGLE_NO_OUTPUT: [u8; 32] = {
    let mut one = [0u8; 32];
    one[0] = 1;
    one
};

/// Output value written for the outputs a legacy SIGHASH_SINGLE blanks out.
const NULL_OUTPUT_VALUE: u64 = u64::MAX;

/// Compute the digest signed for one input.
///
/// # Arguments
/// * `tx`                  - The spending transaction.
/// * `input_index`         - Index of the input being signed.
/// * `prev_output_script`  - The locking script of the output being spent.
/// * `flags`               - The sighash flag byte.
/// * `satoshis`            - The value of the output being spent.
///
/// # Returns
/// A 32-byte double-SHA256 hash, or an error for an out-of-range input.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    prev_output_script: &[u8],
    flags: SigHashFlags,
    satoshis: u64,
) -> Result<[u8; 32], TransactionError> {
    if flags.has_fork_id() {
        log::debug!("input {}: fork-id sighash ({})", input_index, flags);
        let preimage = fork_preimage(tx, input_index, prev_output_script, flags, satoshis)?;
        return Ok(sha256d(&preimage));
    }

    log::debug!("input {}: legacy sighash ({})", input_index, flags);
    match legacy_preimage(tx, input_index, prev_output_script, flags)? {
        Some(preimage) => Ok(sha256d(&preimage)),
        None => Ok(SIGHASH_SINGLE_NO_OUTPUT),
    }
}

/// Build the fork-id preimage bytes before double-hashing.
///
/// The preimage consists of:
/// 1. nVersion (4 bytes LE)
/// 2. hashPrevouts (32 bytes) - sha256d of all outpoints unless ANYONECANPAY
/// 3. hashSequence (32 bytes) - sha256d of all sequences unless ANYONECANPAY/SINGLE/NONE
/// 4. outpoint (32+4 bytes) - txid + vout of the input being signed
/// 5. scriptCode (varint + script) - the locking script being satisfied
/// 6. value (8 bytes LE) - satoshis of the output being spent
/// 7. nSequence (4 bytes LE) - sequence of the input being signed
/// 8. hashOutputs (32 bytes) - sha256d of all outputs, the matching output, or zero
/// 9. nLocktime (4 bytes LE)
/// 10. sighashType (4 bytes LE)
pub fn fork_preimage(
    tx: &Transaction,
    input_index: usize,
    prev_output_script: &[u8],
    flags: SigHashFlags,
    satoshis: u64,
) -> Result<Vec<u8>, TransactionError> {
    let input = tx.inputs.get(input_index).ok_or(TransactionError::InvalidInputIndex {
        index: input_index,
        count: tx.inputs.len(),
    })?;
    let base = flags.base();

    let hash_prevouts = if !flags.anyone_can_pay() {
        prevouts_hash(tx)
    } else {
        [0u8; 32]
    };

    let hash_sequence = if !flags.anyone_can_pay() && base == SigHashBase::All {
        sequence_hash(tx)
    } else {
        [0u8; 32]
    };

    let hash_outputs = match base {
        SigHashBase::All => outputs_hash(tx, None),
        SigHashBase::Single if input_index < tx.outputs.len() => {
            outputs_hash(tx, Some(input_index))
        }
        _ => [0u8; 32],
    };

    let mut writer = ByteWriter::with_capacity(156 + prev_output_script.len());
    writer.write_u32_le(tx.version);
    writer.write_bytes(&hash_prevouts);
    writer.write_bytes(&hash_sequence);
    input.write_outpoint(&mut writer);
    writer.write_varint(VarInt::from(prev_output_script.len()));
    writer.write_bytes(prev_output_script);
    writer.write_u64_le(satoshis);
    writer.write_u32_le(input.sequence_number);
    writer.write_bytes(&hash_outputs);
    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(flags.as_u32());

    Ok(writer.into_bytes())
}

/// Build the legacy preimage bytes before double-hashing.
///
/// A copy of the transaction is serialized with every unlocking script
/// blanked except the signed input's, which is replaced by
/// `prev_output_script`, then the sighash type is appended as a u32.
///
/// - NONE: no outputs; other inputs' sequences are zero.
/// - SINGLE: outputs up to the signed index, earlier ones nulled (value -1,
///   empty script); other inputs' sequences are zero.
/// - ANYONECANPAY: only the signed input is kept.
///
/// # Returns
/// `None` for SINGLE without a matching output, which signs
/// [`SIGHASH_SINGLE_NO_OUTPUT`] instead of a preimage.
pub fn legacy_preimage(
    tx: &Transaction,
    input_index: usize,
    prev_output_script: &[u8],
    flags: SigHashFlags,
) -> Result<Option<Vec<u8>>, TransactionError> {
    if input_index >= tx.inputs.len() {
        return Err(TransactionError::InvalidInputIndex {
            index: input_index,
            count: tx.inputs.len(),
        });
    }
    let base = flags.base();
    if base == SigHashBase::Single && input_index >= tx.outputs.len() {
        return Ok(None);
    }

    let mut writer = ByteWriter::with_capacity(tx.size() + prev_output_script.len() + 4);
    writer.write_u32_le(tx.version);

    // Inputs
    let signed_only = flags.anyone_can_pay();
    let input_count = if signed_only { 1 } else { tx.inputs.len() };
    writer.write_varint(VarInt::from(input_count));
    for (i, input) in tx.inputs.iter().enumerate() {
        if signed_only && i != input_index {
            continue;
        }
        if i == input_index {
            input.write_with_script(&mut writer, prev_output_script, input.sequence_number);
        } else {
            let sequence = match base {
                SigHashBase::All => input.sequence_number,
                SigHashBase::None | SigHashBase::Single => 0,
            };
            input.write_with_script(&mut writer, &[], sequence);
        }
    }

    // Outputs
    match base {
        SigHashBase::All => {
            writer.write_varint(VarInt::from(tx.outputs.len()));
            for output in &tx.outputs {
                output.write_to(&mut writer);
            }
        }
        SigHashBase::None => writer.write_varint(VarInt(0)),
        SigHashBase::Single => {
            writer.write_varint(VarInt::from(input_index + 1));
            for _ in 0..input_index {
                writer.write_u64_le(NULL_OUTPUT_VALUE);
                writer.write_var_bytes(&[]);
            }
            tx.outputs[input_index].write_to(&mut writer);
        }
    }

    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(flags.as_u32());

    Ok(Some(writer.into_bytes()))
}

// -----------------------------------------------------------------------
// Internal helper functions
// -----------------------------------------------------------------------

/// Double-SHA256 of all input outpoints concatenated.
fn prevouts_hash(tx: &Transaction) -> [u8; 32] {
    let mut writer = ByteWriter::with_capacity(tx.inputs.len() * 36);
    for input in &tx.inputs {
        input.write_outpoint(&mut writer);
    }
    sha256d(writer.as_bytes())
}

/// Double-SHA256 of all input sequence numbers concatenated.
fn sequence_hash(tx: &Transaction) -> [u8; 32] {
    let mut writer = ByteWriter::with_capacity(tx.inputs.len() * 4);
    for input in &tx.inputs {
        writer.write_u32_le(input.sequence_number);
    }
    sha256d(writer.as_bytes())
}

/// Double-SHA256 of all serialized outputs, or only output `n`.
fn outputs_hash(tx: &Transaction, n: Option<usize>) -> [u8; 32] {
    let mut writer = ByteWriter::new();
    match n {
        None => {
            for output in &tx.outputs {
                output.write_to(&mut writer);
            }
        }
        Some(n) => tx.outputs[n].write_to(&mut writer),
    }
    sha256d(writer.as_bytes())
}
