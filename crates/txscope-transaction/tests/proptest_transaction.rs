use proptest::prelude::*;

use txscope_primitives::chainhash::ChainHash;
use txscope_script::Script;
use txscope_transaction::{Transaction, TransactionInput, TransactionOutput};

fn arb_input() -> impl Strategy<Value = TransactionInput> {
    (
        any::<[u8; 32]>(),
        any::<u32>(),
        prop::collection::vec(any::<u8>(), 0..120),
        any::<u32>(),
    )
        .prop_map(|(txid, index, script, sequence)| {
            let mut input = TransactionInput::new(ChainHash::new(txid), index);
            input.unlocking_script = Script::from_bytes(&script);
            input.sequence_number = sequence;
            input
        })
}

fn arb_output() -> impl Strategy<Value = TransactionOutput> {
    (any::<u64>(), prop::collection::vec(any::<u8>(), 0..120))
        .prop_map(|(satoshis, script)| TransactionOutput::new(satoshis, Script::from_bytes(&script)))
}

fn arb_transaction() -> impl Strategy<Value = Transaction> {
    (
        any::<u32>(),
        prop::collection::vec(arb_input(), 0..4),
        prop::collection::vec(arb_output(), 0..4),
        any::<u32>(),
    )
        .prop_map(|(version, inputs, outputs, lock_time)| {
            let mut tx = Transaction::new();
            tx.version = version;
            tx.inputs = inputs;
            tx.outputs = outputs;
            tx.lock_time = lock_time;
            tx
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn transaction_bytes_roundtrip(tx in arb_transaction()) {
        let bytes = tx.to_bytes();
        prop_assert_eq!(bytes.len(), tx.size());

        let decoded = Transaction::from_bytes(&bytes).unwrap();
        prop_assert_eq!(decoded.to_bytes(), bytes.clone());
        prop_assert_eq!(decoded.tx_id(), tx.tx_id());
        prop_assert_eq!(decoded.byte_range.len(), bytes.len());
    }

    #[test]
    fn byte_ranges_cover_their_encoding(tx in arb_transaction()) {
        let bytes = tx.to_bytes();
        let decoded = Transaction::from_bytes(&bytes).unwrap();

        let mut last_end = 0;
        for input in &decoded.inputs {
            prop_assert!(input.byte_range.start >= last_end);
            let mut writer = txscope_primitives::util::ByteWriter::new();
            input.write_to(&mut writer);
            prop_assert_eq!(input.byte_range.slice(&bytes), Some(writer.as_bytes()));
            last_end = input.byte_range.end;
        }
        for output in &decoded.outputs {
            prop_assert!(output.byte_range.start >= last_end);
            let mut writer = txscope_primitives::util::ByteWriter::new();
            output.write_to(&mut writer);
            prop_assert_eq!(output.byte_range.slice(&bytes), Some(writer.as_bytes()));
            last_end = output.byte_range.end;
        }
    }

    #[test]
    fn truncation_never_panics(tx in arb_transaction(), cut in 0usize..64) {
        let bytes = tx.to_bytes();
        let cut = cut.min(bytes.len());
        let truncated = &bytes[..bytes.len() - cut];
        let result = Transaction::from_bytes(truncated);
        if cut > 0 {
            prop_assert!(result.is_err());
        }
    }
}
