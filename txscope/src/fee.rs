//! Fee summary for a transaction whose spent outputs are known.

use serde::Serialize;

use txscope_transaction::{Transaction, TransactionOutput};

/// Value flowing through a transaction.
///
/// Totals that cannot be computed are `None`: the input total when any spent
/// output is missing (always, for a coinbase), and the fee when either total
/// is unknown or the outputs exceed the inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeeSummary {
    pub input_total: Option<u64>,
    pub output_total: Option<u64>,
    pub fee: Option<u64>,
    /// Serialized size in bytes.
    pub size: usize,
    pub sat_per_byte: Option<f64>,
}

impl FeeSummary {
    /// # Arguments
    /// * `tx` - The spending transaction.
    /// * `spent_outputs` - The output each input spends, by input index.
    pub fn new(tx: &Transaction, spent_outputs: &[Option<TransactionOutput>]) -> Self {
        let input_total = (0..tx.inputs.len()).try_fold(0u64, |acc, i| {
            let spent = spent_outputs.get(i)?.as_ref()?;
            acc.checked_add(spent.satoshis)
        });
        let output_total = tx.total_output_satoshis();
        let fee = match (input_total, output_total) {
            (Some(inputs), Some(outputs)) => inputs.checked_sub(outputs),
            _ => None,
        };
        let size = tx.size();
        let sat_per_byte = fee.filter(|_| size > 0).map(|fee| fee as f64 / size as f64);

        FeeSummary {
            input_total,
            output_total,
            fee,
            size,
            sat_per_byte,
        }
    }
}
