//! Binary payload decoding.
//!
//! Payloads use the protobuf wire format. Field number `n` of a message maps
//! to the `n`-th field (1-based) of its schema entry, and the field's
//! resolved [`TypeDescriptor`] decides how the wire value is interpreted.
//! Field numbers the entry does not declare are skipped.

use prost::encoding::{decode_key, decode_varint, skip_field, DecodeContext, WireType};

use crate::schema::{Schema, SchemaEntry};
use crate::types::TypeDescriptor;
use crate::value::{FieldValue, Fields};
use crate::TokenizedError;

/// Nesting bound for composite fields inside one payload.
pub const DEFAULT_MAX_NESTING: usize = 32;

/// Simple type names decoded as UTF-8 text.
const TEXT_TYPES: [&str; 4] = ["varchar", "fixedchar", "text", "string"];

/// Decodes a payload into field values according to a schema entry.
///
/// The default is [`WireDecoder`]; callers with generated message types
/// can supply their own.
pub trait PayloadDecoder {
    /// Decode `payload` as an instance of `entry`.
    ///
    /// # Arguments
    /// * `schema` - The table `entry` belongs to, for resolving field types.
    /// * `entry` - The payload type.
    /// * `payload` - The encoded payload.
    fn decode(
        &self,
        schema: &Schema,
        entry: &SchemaEntry,
        payload: &[u8],
    ) -> Result<Fields, TokenizedError>;
}

/// Schema-driven protobuf wire format decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireDecoder {
    max_nesting: usize,
}

impl Default for WireDecoder {
    fn default() -> Self {
        WireDecoder::new()
    }
}

impl PayloadDecoder for WireDecoder {
    fn decode(
        &self,
        schema: &Schema,
        entry: &SchemaEntry,
        payload: &[u8],
    ) -> Result<Fields, TokenizedError> {
        self.decode_object(schema, entry, payload, 0)
    }
}

impl WireDecoder {
    pub const fn new() -> Self {
        WireDecoder {
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }

    /// Set the nesting bound for composite fields.
    pub const fn with_max_nesting(max_nesting: usize) -> Self {
        WireDecoder { max_nesting }
    }

    fn decode_object(
        &self,
        schema: &Schema,
        entry: &SchemaEntry,
        mut buf: &[u8],
        depth: usize,
    ) -> Result<Fields, TokenizedError> {
        if depth > self.max_nesting {
            return Err(TokenizedError::RecursionLimitExceeded {
                limit: self.max_nesting,
            });
        }

        let mut fields = Fields::new();
        while !buf.is_empty() {
            let (number, wire_type) = decode_key(&mut buf)?;
            let spec = match entry.field_by_number(number) {
                Some(spec) => spec,
                None => {
                    log::trace!("{}: skipping undeclared field {}", entry.name, number);
                    skip_field(wire_type, number, &mut buf, DecodeContext::default())?;
                    continue;
                }
            };

            match TypeDescriptor::resolve(schema, &spec.type_name) {
                TypeDescriptor::Array(item) => {
                    let items =
                        self.decode_repeated(schema, &spec.name, &item, wire_type, &mut buf, depth)?;
                    fields.extend_array(&spec.name, items);
                }
                ty => {
                    let value = self.decode_single(schema, &spec.name, &ty, wire_type, &mut buf, depth)?;
                    fields.insert(&spec.name, value);
                }
            }
        }
        Ok(fields)
    }

    /// One occurrence of a repeated field: a packed run or a single element.
    fn decode_repeated(
        &self,
        schema: &Schema,
        name: &str,
        item: &TypeDescriptor<'_>,
        wire_type: WireType,
        buf: &mut &[u8],
        depth: usize,
    ) -> Result<Vec<FieldValue>, TokenizedError> {
        let packed = match (wire_type, item.simple_name()) {
            (WireType::LengthDelimited, Some(simple)) => packed_wire_type(simple),
            _ => None,
        };

        match packed {
            Some(element_type) => {
                let mut run = take_delimited(buf, name)?;
                let mut items = Vec::new();
                while !run.is_empty() {
                    items.push(self.decode_single(schema, name, item, element_type, &mut run, depth)?);
                }
                Ok(items)
            }
            None => Ok(vec![self.decode_single(schema, name, item, wire_type, buf, depth)?]),
        }
    }

    fn decode_single(
        &self,
        schema: &Schema,
        name: &str,
        ty: &TypeDescriptor<'_>,
        wire_type: WireType,
        buf: &mut &[u8],
        depth: usize,
    ) -> Result<FieldValue, TokenizedError> {
        let simple = ty.simple_name().unwrap_or("");
        match wire_type {
            WireType::Varint => {
                let raw = decode_varint(buf)?;
                Ok(if simple == "bool" {
                    FieldValue::Bool(raw != 0)
                } else if simple.starts_with("int") {
                    FieldValue::Int(raw as i64)
                } else {
                    FieldValue::UInt(raw)
                })
            }
            WireType::SixtyFourBit => {
                let raw = u64::from_le_bytes(take_array(buf, name)?);
                Ok(if simple.starts_with("float") || simple == "double" {
                    FieldValue::Float(f64::from_bits(raw))
                } else if simple.starts_with("int") {
                    FieldValue::Int(raw as i64)
                } else {
                    FieldValue::UInt(raw)
                })
            }
            WireType::ThirtyTwoBit => {
                let raw = u32::from_le_bytes(take_array(buf, name)?);
                Ok(if simple.starts_with("float") {
                    FieldValue::Float(f64::from(f32::from_bits(raw)))
                } else if simple.starts_with("int") {
                    FieldValue::Int(i64::from(raw as i32))
                } else {
                    FieldValue::UInt(u64::from(raw))
                })
            }
            WireType::LengthDelimited => {
                let data = take_delimited(buf, name)?;
                Ok(match ty {
                    TypeDescriptor::Object(entry) => {
                        FieldValue::Object(self.decode_object(schema, entry, data, depth + 1)?)
                    }
                    _ if TEXT_TYPES.contains(&simple) => {
                        FieldValue::Text(String::from_utf8_lossy(data).into_owned())
                    }
                    _ => FieldValue::Bytes(data.to_vec()),
                })
            }
            WireType::StartGroup | WireType::EndGroup => Err(TokenizedError::WireTypeMismatch {
                field: name.to_string(),
                expected: "scalar or length-delimited",
                wire_type: wire_type as u8,
            }),
        }
    }
}

/// Element wire type of a packed repeated field of a simple type.
fn packed_wire_type(simple: &str) -> Option<WireType> {
    if simple == "float64" || simple == "double" {
        Some(WireType::SixtyFourBit)
    } else if simple.starts_with("float") {
        Some(WireType::ThirtyTwoBit)
    } else if simple == "bool" || simple.starts_with("int") || simple.starts_with("uint") {
        Some(WireType::Varint)
    } else {
        None
    }
}

fn take_delimited<'b>(buf: &mut &'b [u8], field: &str) -> Result<&'b [u8], TokenizedError> {
    let len = decode_varint(buf)?;
    let data: &'b [u8] = buf;
    let end = usize::try_from(len)
        .ok()
        .filter(|n| *n <= data.len())
        .ok_or_else(|| TokenizedError::LengthOverrun {
            field: field.to_string(),
            len,
            remaining: data.len(),
        })?;
    let (head, tail) = data.split_at(end);
    *buf = tail;
    Ok(head)
}

fn take_array<const N: usize>(buf: &mut &[u8], field: &str) -> Result<[u8; N], TokenizedError> {
    let data: &[u8] = buf;
    if data.len() < N {
        return Err(TokenizedError::LengthOverrun {
            field: field.to_string(),
            len: N as u64,
            remaining: data.len(),
        });
    }
    let (head, tail) = data.split_at(N);
    let mut out = [0u8; N];
    out.copy_from_slice(head);
    *buf = tail;
    Ok(out)
}
