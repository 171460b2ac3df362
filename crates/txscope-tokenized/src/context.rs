//! Decode context: schema tables, payload decoder and nesting bound.

use serde::{Deserialize, Serialize};

use crate::action::{canonical_action_code, DecodedValue};
use crate::schema::{SchemaKind, SchemaSet};
use crate::value::{FieldValue, Fields};
use crate::wire::{PayloadDecoder, WireDecoder};
use crate::TokenizedError;

/// Default bound on nested payload decoding.
pub const DEFAULT_MAX_DEPTH: usize = 4;

static DEFAULT_DECODER: WireDecoder = WireDecoder::new();

/// Limits applied while decoding nested payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeLimits {
    /// How many payloads deep a decode may go, counting each message,
    /// instrument or embedded transaction as one level.
    pub max_depth: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        DecodeLimits {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Everything a payload decode reads from, plus its current depth.
///
/// Cheap to copy; [`DecodeContext::nested`] hands out a context one level
/// deeper for decoding embedded payloads.
#[derive(Clone, Copy)]
pub struct DecodeContext<'a> {
    schemas: &'a SchemaSet,
    decoder: &'a dyn PayloadDecoder,
    limits: DecodeLimits,
    depth: usize,
}

impl<'a> DecodeContext<'a> {
    /// A top-level context using the protobuf wire decoder.
    pub fn new(schemas: &'a SchemaSet) -> Self {
        DecodeContext {
            schemas,
            decoder: &DEFAULT_DECODER,
            limits: DecodeLimits::default(),
            depth: 0,
        }
    }

    pub fn with_decoder(self, decoder: &'a dyn PayloadDecoder) -> Self {
        DecodeContext { decoder, ..self }
    }

    pub fn with_limits(self, limits: DecodeLimits) -> Self {
        DecodeContext { limits, ..self }
    }

    pub fn schemas(&self) -> &'a SchemaSet {
        self.schemas
    }

    pub fn limits(&self) -> DecodeLimits {
        self.limits
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// A context one level deeper.
    ///
    /// # Returns
    /// `RecursionLimitExceeded` once the depth would pass `max_depth`.
    pub fn nested(&self) -> Result<DecodeContext<'a>, TokenizedError> {
        if self.depth >= self.limits.max_depth {
            return Err(TokenizedError::RecursionLimitExceeded {
                limit: self.limits.max_depth,
            });
        }
        Ok(DecodeContext {
            depth: self.depth + 1,
            ..*self
        })
    }

    /// Decode an action payload, applying the action alias table to `code`.
    pub fn decode_action(&self, code: &str, payload: &[u8]) -> Result<DecodedValue, TokenizedError> {
        self.decode(SchemaKind::Actions, canonical_action_code(code), payload)
    }

    pub fn decode_instrument(&self, code: &str, payload: &[u8]) -> Result<DecodedValue, TokenizedError> {
        self.decode(SchemaKind::Instruments, code, payload)
    }

    pub fn decode_message(&self, code: &str, payload: &[u8]) -> Result<DecodedValue, TokenizedError> {
        self.decode(SchemaKind::Messages, code, payload)
    }

    /// Decode `payload` as the entry `code` selects in the `kind` table.
    ///
    /// A code missing from the table is not an error: the result carries no
    /// entry or fields. `Message` actions also decode their message, and
    /// instrument creation/definition actions their instrument.
    pub fn decode(
        &self,
        kind: SchemaKind,
        code: &str,
        payload: &[u8],
    ) -> Result<DecodedValue, TokenizedError> {
        let schema = self.schemas.get(kind);
        let entry = match schema.find_code(code) {
            Some(entry) => entry,
            None => {
                log::debug!("no {} schema entry for code {:?}", kind, code);
                return Ok(DecodedValue::unresolved(kind, code));
            }
        };

        let fields = self.decoder.decode(schema, entry, payload)?;
        let mut value = DecodedValue::resolved(kind, code, entry, fields);

        if kind == SchemaKind::Actions {
            match entry.name.as_str() {
                "Message" => {
                    value.message =
                        self.sub_decode(SchemaKind::Messages, &value, "MessageCode", "MessagePayload")?;
                }
                "InstrumentCreation" | "InstrumentDefinition" => {
                    value.instrument = self.sub_decode(
                        SchemaKind::Instruments,
                        &value,
                        "InstrumentType",
                        "InstrumentPayload",
                    )?;
                }
                _ => {}
            }
        }
        Ok(value)
    }

    /// Decode the payload an action carries in `payload_field`, typed by
    /// `code_field`. Absent when the action has no code field.
    fn sub_decode(
        &self,
        kind: SchemaKind,
        parent: &DecodedValue,
        code_field: &str,
        payload_field: &str,
    ) -> Result<Option<Box<DecodedValue>>, TokenizedError> {
        let fields = match &parent.fields {
            Some(fields) => fields,
            None => return Ok(None),
        };
        let code = match fields.get(code_field).and_then(FieldValue::as_code) {
            Some(code) => code,
            None => return Ok(None),
        };
        let payload = payload_bytes(fields, payload_field);
        let nested = self.nested()?;
        Ok(Some(Box::new(nested.decode(kind, &code, payload)?)))
    }
}

fn payload_bytes<'f>(fields: &'f Fields, name: &str) -> &'f [u8] {
    fields.get(name).and_then(FieldValue::as_bytes).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_depth() {
        let schemas = SchemaSet::default();
        let ctx = DecodeContext::new(&schemas).with_limits(DecodeLimits { max_depth: 2 });
        let one = ctx.nested().unwrap();
        let two = one.nested().unwrap();
        assert_eq!(two.depth(), 2);
        assert!(matches!(
            two.nested(),
            Err(TokenizedError::RecursionLimitExceeded { limit: 2 })
        ));
    }

    #[test]
    fn test_limits_config() {
        let limits: DecodeLimits = serde_json::from_str("{}").unwrap();
        assert_eq!(limits.max_depth, DEFAULT_MAX_DEPTH);
        let limits: DecodeLimits = serde_json::from_str(r#"{"max_depth": 7}"#).unwrap();
        assert_eq!(limits.max_depth, 7);
    }

    #[test]
    fn test_unknown_code_is_unresolved() {
        let schemas = SchemaSet::default();
        let value = DecodeContext::new(&schemas)
            .decode_action("C1", &[0xff, 0xff])
            .unwrap();
        assert!(!value.is_resolved());
        assert_eq!(value.code.as_str(), "C1");
    }
}
