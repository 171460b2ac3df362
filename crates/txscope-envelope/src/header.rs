//! Version 0 envelope header message.

use serde::{Serialize, Serializer};

/// Header carried by a V0 envelope as a protobuf message.
///
/// `identifier` names the payload type, e.g. the action code `C1`.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct EnvelopeHeader {
    #[prost(uint64, tag = "1")]
    pub version: u64,
    #[prost(bytes = "vec", tag = "2")]
    #[serde(rename = "type", serialize_with = "text")]
    pub r#type: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    #[serde(serialize_with = "text")]
    pub identifier: Vec<u8>,
    #[prost(bytes = "vec", tag = "4")]
    #[serde(serialize_with = "hex_bytes")]
    pub meta_net: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "5")]
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "hex_list")]
    pub encrypted_payloads: Vec<Vec<u8>>,
}

impl EnvelopeHeader {
    /// The payload type identifier as text.
    pub fn identifier_text(&self) -> String {
        String::from_utf8_lossy(&self.identifier).into_owned()
    }
}

fn text<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(bytes))
}

fn hex_bytes<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

fn hex_list<S: Serializer>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(items.iter().map(hex::encode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_decode_header() {
        // version 0, identifier "T1"
        let bytes = hex::decode("1a025431").unwrap();
        let header = EnvelopeHeader::decode(bytes.as_slice()).unwrap();
        assert_eq!(header.version, 0);
        assert_eq!(header.identifier_text(), "T1");
        assert!(header.encrypted_payloads.is_empty());
    }

    #[test]
    fn test_header_round_trip_and_json() {
        let header = EnvelopeHeader {
            version: 1,
            r#type: b"action".to_vec(),
            identifier: b"C1".to_vec(),
            meta_net: vec![0xab],
            encrypted_payloads: vec![vec![0x01, 0x02]],
        };
        let decoded = EnvelopeHeader::decode(header.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded, header);

        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json["type"], "action");
        assert_eq!(json["identifier"], "C1");
        assert_eq!(json["meta_net"], "ab");
        assert_eq!(json["encrypted_payloads"][0], "0102");
    }

    #[test]
    fn test_malformed_header() {
        assert!(EnvelopeHeader::decode(&[0x1a, 0x05, 0x41][..]).is_err());
    }
}
