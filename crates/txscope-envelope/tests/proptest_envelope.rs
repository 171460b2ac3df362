use proptest::prelude::*;

use txscope_envelope::{decode_output_script, Envelope, Payload, ENVELOPE_V1_MARKER};
use txscope_script::opcodes::{OP_0, OP_1, OP_RETURN};
use txscope_script::{Base58AddressEncoder, Operation, Script};

fn null_data(rest: &[u8]) -> Script {
    let mut bytes = vec![OP_0, OP_RETURN];
    bytes.extend_from_slice(rest);
    Script::from_bytes(&bytes)
}

/// A count as a literal push or as the matching small-integer opcode.
fn count_op(n: usize, small_int: bool) -> Operation {
    match n {
        0 if small_int => Operation::opcode(OP_0),
        1..=16 if small_int => Operation::opcode(OP_1 + (n as u8 - 1)),
        _ => Operation::push(&[n as u8]).unwrap(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn arbitrary_envelope_bodies_never_panic(body in prop::collection::vec(any::<u8>(), 0..128)) {
        let mut rest = vec![0x02, 0xbd, 0x01];
        rest.extend_from_slice(&body);
        let _ = decode_output_script(&null_data(&rest), &Base58AddressEncoder::default());

        rest[2] = 0x00;
        let _ = decode_output_script(&null_data(&rest), &Base58AddressEncoder::default());
    }

    #[test]
    fn v1_empty_envelopes_decode(extra in prop::collection::vec(any::<u8>(), 0..4)) {
        // <bd01> OP_0 OP_0, optionally followed by unrelated pushes
        let mut rest = vec![0x02, 0xbd, 0x01, OP_0, OP_0];
        for b in &extra {
            rest.extend_from_slice(&[0x01, *b]);
        }
        let payload = decode_output_script(&null_data(&rest), &Base58AddressEncoder::default()).unwrap();
        match payload {
            Some(Payload::Envelope(Envelope::V1(env))) => {
                prop_assert!(env.protocols.is_empty());
                prop_assert!(env.data.is_empty());
            }
            other => prop_assert!(false, "expected V1 envelope, got {:?}", other),
        }
    }

    #[test]
    fn v1_envelopes_decode_their_items(
        protocols in prop::collection::vec("[a-zA-Z.]{1,12}", 0..4),
        data in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..40), 0..6),
        small_int in any::<bool>(),
    ) {
        let mut ops = vec![
            Operation::opcode(OP_0),
            Operation::opcode(OP_RETURN),
            Operation::push(&ENVELOPE_V1_MARKER).unwrap(),
            count_op(protocols.len(), small_int),
        ];
        for p in &protocols {
            ops.push(Operation::push(p.as_bytes()).unwrap());
        }
        ops.push(count_op(data.len(), small_int));
        for d in &data {
            ops.push(Operation::push(d).unwrap());
        }
        // re-decode from bytes, as an output script would be read
        let script = Script::from_bytes(&Script::from_operations(ops).to_bytes());

        let payload = decode_output_script(&script, &Base58AddressEncoder::default()).unwrap();
        match payload {
            Some(Payload::Envelope(Envelope::V1(env))) => {
                prop_assert_eq!(env.protocols, protocols);
                let decoded: Vec<Vec<u8>> = env.data.iter().map(|v| v.bytes().to_vec()).collect();
                prop_assert_eq!(decoded, data);
            }
            other => prop_assert!(false, "expected V1 envelope, got {:?}", other),
        }
    }
}
