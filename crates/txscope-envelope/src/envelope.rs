/// Data envelopes carried in null-data outputs.
///
/// Version 1 lists its protocol identifiers and data items with explicit
/// counts:
///
/// ```text
/// <protocol count> <protocol>... <data count> <data>...
/// ```
///
/// Version 0 has a single protocol tag, a protobuf header and one payload:
///
/// ```text
/// <protocol tag> <header> <payload>
/// ```
///
/// See <https://tsc.bitcoinassociation.net/standards/envelope-specification/>

use prost::Message;
use serde::Serialize;

use txscope_script::ScriptValue;
use txscope_tokenized::{DecodeContext, DecodedValue};

use crate::cursor::OpCursor;
use crate::header::EnvelopeHeader;
use crate::EnvelopeError;

/// Protocol identifiers whose payloads are Tokenized actions.
pub const PROTOCOL_TAGS: [&str; 2] = ["TKN", "test.TKN"];

/// Payload format version a V1 Tokenized envelope must declare.
const TOKENIZED_PAYLOAD_VERSION: i64 = 0;

fn is_recognized(protocol: &str) -> bool {
    PROTOCOL_TAGS.iter().any(|tag| *tag == protocol)
}

/// A decoded data envelope of either wire version.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Envelope {
    V0(EnvelopeV0),
    V1(EnvelopeV1),
}

impl Envelope {
    /// Decode the payload when the envelope names a recognized protocol.
    ///
    /// # Returns
    /// `Ok(None)` for unrecognized protocols and for V1 envelopes whose data
    /// does not carry a version 0 payload.
    pub fn content(&self, ctx: &DecodeContext<'_>) -> Result<Option<DecodedValue>, EnvelopeError> {
        match self {
            Envelope::V0(env) => env.content(ctx),
            Envelope::V1(env) => env.content(ctx),
        }
    }

    /// The protocol identifiers the envelope declares.
    pub fn protocols(&self) -> Vec<&str> {
        match self {
            Envelope::V0(env) => vec![env.protocol_tag.as_str()],
            Envelope::V1(env) => env.protocols.iter().map(String::as_str).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Version 1
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvelopeV1 {
    pub protocols: Vec<String>,
    /// Data items as pushed; interpretation is up to the protocol.
    pub data: Vec<ScriptValue>,
}

impl EnvelopeV1 {
    /// Read a V1 envelope from the operations following its marker.
    pub fn decode(cursor: &mut OpCursor<'_>) -> Result<Self, EnvelopeError> {
        let protocol_count = cursor.require_count("protocol count")?;
        let protocols = (0..protocol_count)
            .map(|_| cursor.require_push("protocol").map(|v| v.text().into_owned()))
            .collect::<Result<Vec<_>, _>>()?;

        let data_count = cursor.require_count("data count")?;
        let data = (0..data_count)
            .map(|_| cursor.require_push("data item"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EnvelopeV1 { protocols, data })
    }

    /// Decode the Tokenized action the data items carry.
    ///
    /// The first three data items are the payload version, the action code
    /// and the payload bytes; only version 0 payloads are decoded.
    pub fn content(&self, ctx: &DecodeContext<'_>) -> Result<Option<DecodedValue>, EnvelopeError> {
        match self.protocols.first() {
            Some(protocol) if is_recognized(protocol) => {}
            _ => return Ok(None),
        }
        let (version, code, payload) = match self.data.as_slice() {
            [version, code, payload, ..] => (version, code, payload),
            _ => return Ok(None),
        };
        if version.number() != Some(TOKENIZED_PAYLOAD_VERSION) {
            log::debug!("unsupported payload version {}", version.hex());
            return Ok(None);
        }
        Ok(Some(ctx.decode_action(&code.text(), payload.bytes())?))
    }
}

// ---------------------------------------------------------------------------
// Version 0
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvelopeV0 {
    pub protocol_tag: String,
    pub header: EnvelopeHeader,
    pub data: ScriptValue,
}

impl EnvelopeV0 {
    /// Read a V0 envelope from the operations following its marker.
    pub fn decode(cursor: &mut OpCursor<'_>) -> Result<Self, EnvelopeError> {
        let protocol_tag = cursor.require_push("protocol tag")?.text().into_owned();
        let header_bytes = cursor.require_push("envelope header")?;
        let header = EnvelopeHeader::decode(header_bytes.bytes())?;
        let data = cursor.require_push("payload")?;
        Ok(EnvelopeV0 {
            protocol_tag,
            header,
            data,
        })
    }

    /// Decode the payload as the action the header identifies.
    pub fn content(&self, ctx: &DecodeContext<'_>) -> Result<Option<DecodedValue>, EnvelopeError> {
        if !is_recognized(&self.protocol_tag) {
            return Ok(None);
        }
        let code = self.header.identifier_text();
        Ok(Some(ctx.decode_action(&code, self.data.bytes())?))
    }
}
