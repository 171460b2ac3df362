//! Script classification by opcode names.

use serde::{Serialize, Serializer};

use txscope_primitives::hash::hash160;
use txscope_script::opcodes::PUSH;
use txscope_script::{AddressEncoder, Script};

use crate::cursor::OpCursor;
use crate::envelope::{Envelope, EnvelopeV0, EnvelopeV1};
use crate::EnvelopeError;

/// Marker push selecting a version 1 envelope.
pub const ENVELOPE_V1_MARKER: [u8; 2] = [0xbd, 0x01];
/// Marker push selecting a version 0 envelope.
pub const ENVELOPE_V0_MARKER: [u8; 2] = [0xbd, 0x00];

const P2PKH_LOCK: [&str; 5] = ["DUP", "HASH160", PUSH, "EQUALVERIFY", "CHECKSIG"];
const P2PKH_UNLOCK: [&str; 2] = [PUSH, PUSH];
const NULL_DATA_PREFIX: [&str; 2] = [PUSH, "RETURN"];

/// What a script was recognized as.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    P2pkh(P2pkh),
    Envelope(Envelope),
}

/// A pay-to-public-key-hash party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct P2pkh {
    pub address: String,
    #[serde(serialize_with = "hex_bytes")]
    pub public_key_hash: [u8; 20],
    /// Present when recognized from an unlocking script.
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "hex_opt")]
    pub public_key: Option<Vec<u8>>,
}

fn hex_bytes<S: Serializer>(bytes: &[u8; 20], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

fn hex_opt<S: Serializer>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
    match bytes {
        Some(b) => serializer.serialize_str(&hex::encode(b)),
        None => serializer.serialize_none(),
    }
}

/// Classify a locking script.
///
/// # Arguments
/// * `script` - The output's locking script.
/// * `encoder` - Renders public key hashes as addresses.
///
/// # Returns
/// - `Ok(Some(Payload::P2pkh))` for `DUP HASH160 <20 bytes> EQUALVERIFY CHECKSIG`;
/// - `Ok(Some(Payload::Envelope))` for `<push> RETURN <marker> ...` with a
///   known marker;
/// - `Ok(None)` for anything else, including scripts that failed to decode;
/// - `Err` when a marker is present but the envelope after it is malformed.
pub fn decode_output_script(
    script: &Script,
    encoder: &dyn AddressEncoder,
) -> Result<Option<Payload>, EnvelopeError> {
    if script.has_fault() {
        return Ok(None);
    }
    let names = script.names();
    let ops = script.operations();

    if names == P2PKH_LOCK {
        let hash: Option<[u8; 20]> = ops[2].operand().and_then(|d| d.try_into().ok());
        return Ok(hash.map(|hash| {
            Payload::P2pkh(P2pkh {
                address: encoder.encode(&hash),
                public_key_hash: hash,
                public_key: None,
            })
        }));
    }

    if names.len() < 3 || names[..2] != NULL_DATA_PREFIX {
        return Ok(None);
    }
    let mut cursor = OpCursor::new(&ops[2..]);
    let marker = match cursor.next_push() {
        Some(marker) => marker,
        None => return Ok(None),
    };
    let envelope = if marker.bytes() == ENVELOPE_V1_MARKER {
        log::debug!("envelope v1 marker");
        Envelope::V1(EnvelopeV1::decode(&mut cursor)?)
    } else if marker.bytes() == ENVELOPE_V0_MARKER {
        log::debug!("envelope v0 marker");
        Envelope::V0(EnvelopeV0::decode(&mut cursor)?)
    } else {
        return Ok(None);
    };
    Ok(Some(Payload::Envelope(envelope)))
}

/// Classify an unlocking script.
///
/// Two pushes are read as `<signature> <public key>`; the payload is the
/// address of that key.
pub fn decode_input_script(script: &Script, encoder: &dyn AddressEncoder) -> Option<Payload> {
    if script.has_fault() || script.names() != P2PKH_UNLOCK {
        return None;
    }
    let public_key = script.operations()[1].operand()?;
    let hash = hash160(public_key);
    Some(Payload::P2pkh(P2pkh {
        address: encoder.encode(&hash),
        public_key_hash: hash,
        public_key: Some(public_key.to_vec()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use txscope_script::opcodes::{OP_0, OP_1, OP_3, OP_DUP, OP_RETURN};
    use txscope_script::{Base58AddressEncoder, Network, Operation};

    fn push(data: &[u8]) -> Operation {
        Operation::push(data).unwrap()
    }

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn null_data(rest: Vec<Operation>) -> Script {
        let mut ops = vec![Operation::opcode(OP_0), Operation::opcode(OP_RETURN)];
        ops.extend(rest);
        Script::from_operations(ops)
    }

    #[test]
    fn test_p2pkh_output() {
        let script = Script::from_hex(&format!("76a914{}88ac", "89abcdef".repeat(5))).unwrap();
        let payload = decode_output_script(&script, &Base58AddressEncoder::default()).unwrap();
        match payload {
            Some(Payload::P2pkh(p2pkh)) => {
                assert_eq!(p2pkh.address, "1DYwPTp6PAnXhbaUeHgTXwYV4UNuN85ZJw");
                assert_eq!(hex::encode(p2pkh.public_key_hash), "89abcdef".repeat(5));
                assert_eq!(p2pkh.public_key, None);
            }
            other => panic!("expected P2PKH, got {:?}", other),
        }

        let testnet = Base58AddressEncoder::new(Network::Testnet);
        match decode_output_script(&script, &testnet).unwrap() {
            Some(Payload::P2pkh(p2pkh)) => {
                assert_eq!(p2pkh.address, "mt4tgWu5CCDnUi46MreqMrkovTycDTBWFc")
            }
            other => panic!("expected P2PKH, got {:?}", other),
        }
    }

    #[test]
    fn test_p2pkh_wrong_hash_length() {
        let script = Script::from_hex("76a90312345688ac").unwrap();
        assert_eq!(script.names(), P2PKH_LOCK);
        assert_eq!(decode_output_script(&script, &Base58AddressEncoder::default()).unwrap(), None);
    }

    #[test]
    fn test_p2pkh_input() {
        let pub_key =
            hex::decode("03abb36c3de2dbfc5e4c30d5aaa033909a5cd119fad8eea47cf592b46a23e40a46").unwrap();
        let script = Script::from_operations(vec![push(&[0x30, 0x44, 0x01]), push(&pub_key)]);
        match decode_input_script(&script, &Base58AddressEncoder::default()) {
            Some(Payload::P2pkh(p2pkh)) => {
                assert_eq!(p2pkh.address, "1BqgpLfvqQ179pw9nBPCsabrvT37qwM5M6");
                assert_eq!(
                    hex::encode(p2pkh.public_key_hash),
                    "76e675fcb53030baebc664cd1fdd1df0f72b3944"
                );
                assert_eq!(p2pkh.public_key, Some(pub_key));
            }
            other => panic!("expected P2PKH, got {:?}", other),
        }

        let three = Script::from_operations(vec![push(&[1]), push(&[2]), push(&[3])]);
        assert_eq!(decode_input_script(&three, &Base58AddressEncoder::default()), None);
    }

    #[test]
    fn test_envelope_v1_output() {
        init_logger();
        let script = null_data(vec![
            push(&ENVELOPE_V1_MARKER),
            Operation::opcode(OP_1),
            push(b"TKN"),
            Operation::opcode(OP_3),
            Operation::opcode(OP_0),
            push(b"T1"),
            push(&[0x08, 0x01]),
        ]);
        let payload = decode_output_script(&script, &Base58AddressEncoder::default()).unwrap();
        match payload {
            Some(Payload::Envelope(Envelope::V1(env))) => {
                assert_eq!(env.protocols, vec!["TKN".to_string()]);
                assert_eq!(env.data[2].bytes(), &[0x08, 0x01]);
            }
            other => panic!("expected V1 envelope, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_v1_empty_from_bytes() {
        init_logger();
        let script = Script::from_hex("006a02bd010000").unwrap();
        let payload = decode_output_script(&script, &Base58AddressEncoder::default()).unwrap();
        match payload {
            Some(Payload::Envelope(Envelope::V1(env))) => {
                assert!(env.protocols.is_empty());
                assert!(env.data.is_empty());
            }
            other => panic!("expected V1 envelope, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_v0_output() {
        let script = null_data(vec![
            push(&ENVELOPE_V0_MARKER),
            push(b"TKN"),
            push(&[0x1a, 0x02, b'C', b'1']),
            push(&[0x0a, 0x00]),
        ]);
        let payload = decode_output_script(&script, &Base58AddressEncoder::default()).unwrap();
        match payload {
            Some(Payload::Envelope(Envelope::V0(env))) => {
                assert_eq!(env.protocol_tag, "TKN");
                assert_eq!(env.header.identifier_text(), "C1");
            }
            other => panic!("expected V0 envelope, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_marker_is_not_an_envelope() {
        let encoder = Base58AddressEncoder::default();
        let script = null_data(vec![push(&[0xbd, 0x02]), Operation::opcode(OP_0)]);
        assert_eq!(decode_output_script(&script, &encoder).unwrap(), None);

        // marker position holds an opcode
        let script = null_data(vec![Operation::opcode(OP_DUP)]);
        assert_eq!(decode_output_script(&script, &encoder).unwrap(), None);

        // plain data carrier
        let script = null_data(vec![push(b"hello")]);
        assert_eq!(decode_output_script(&script, &encoder).unwrap(), None);

        let script = Script::from_operations(vec![Operation::opcode(OP_RETURN), push(&ENVELOPE_V1_MARKER)]);
        assert_eq!(decode_output_script(&script, &encoder).unwrap(), None);
    }

    #[test]
    fn test_malformed_envelope_is_an_error() {
        let script = null_data(vec![push(&ENVELOPE_V1_MARKER), Operation::opcode(OP_3)]);
        assert!(matches!(
            decode_output_script(&script, &Base58AddressEncoder::default()),
            Err(EnvelopeError::InvalidCount { .. })
        ));
    }

    #[test]
    fn test_faulted_script_never_matches() {
        // P2PKH prefix with a truncated hash push
        let script = Script::from_hex("76a9148fe80c75").unwrap();
        assert!(script.has_fault());
        assert_eq!(decode_output_script(&script, &Base58AddressEncoder::default()).unwrap(), None);
    }

    #[test]
    fn test_payload_json() {
        let script = Script::from_hex(&format!("76a914{}88ac", "89abcdef".repeat(5))).unwrap();
        let payload = decode_output_script(&script, &Base58AddressEncoder::default())
            .unwrap()
            .unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["p2pkh"]["address"], "1DYwPTp6PAnXhbaUeHgTXwYV4UNuN85ZJw");
        assert!(json["p2pkh"].get("public_key").is_none());
    }
}
