//! Decoded Tokenized payloads and their derived views.

use serde::{Serialize, Serializer};

use crate::schema::{SchemaEntry, SchemaKind, SchemaSet, TypeCode};
use crate::types::TypeDescriptor;
use crate::value::{FieldValue, Fields};

/// Deprecated action codes and their replacements.
pub const ACTION_ALIASES: [(&str, &str); 3] = [("A1", "I1"), ("A2", "I2"), ("A3", "I3")];

/// Payload types with a one-line description, and the field providing it.
const DESCRIPTION_FIELDS: [(&str, &str); 2] = [
    ("ContractOffer", "ContractName"),
    ("ContractFormation", "ContractName"),
];

/// Messages carrying a serialized transaction in their `Payload` field.
const TRANSACTION_MESSAGES: [&str; 2] = ["Offer", "SignatureRequest"];

/// Apply the action alias table to a code.
pub fn canonical_action_code(code: &str) -> &str {
    ACTION_ALIASES
        .iter()
        .find(|(from, _)| *from == code)
        .map_or(code, |(_, to)| *to)
}

/// A payload decoded against its schema entry.
///
/// A code with no schema entry still yields a value, with no entry, fields,
/// description or sub-decodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedValue {
    pub kind: SchemaKind,
    /// The code after alias resolution.
    pub code: TypeCode,
    #[serde(rename = "type", serialize_with = "entry_name")]
    pub entry: Option<SchemaEntry>,
    pub fields: Option<Fields>,
    pub description: Option<String>,
    /// The message carried by a `Message` action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Box<DecodedValue>>,
    /// The instrument carried by an instrument creation or definition action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrument: Option<Box<DecodedValue>>,
}

fn entry_name<S: Serializer>(entry: &Option<SchemaEntry>, serializer: S) -> Result<S::Ok, S::Error> {
    match entry {
        Some(entry) => serializer.serialize_some(&entry.name),
        None => serializer.serialize_none(),
    }
}

impl DecodedValue {
    /// A value for a code the schema does not define.
    pub fn unresolved(kind: SchemaKind, code: &str) -> Self {
        DecodedValue {
            kind,
            code: TypeCode::from(code),
            entry: None,
            fields: None,
            description: None,
            message: None,
            instrument: None,
        }
    }

    /// Build a value from decoded fields, deriving its description.
    pub(crate) fn resolved(kind: SchemaKind, code: &str, entry: &SchemaEntry, fields: Fields) -> Self {
        let description = DESCRIPTION_FIELDS
            .iter()
            .find(|(name, _)| *name == entry.name)
            .and_then(|(_, field)| fields.get(field))
            .and_then(FieldValue::as_text)
            .map(|s| s.into_owned());
        DecodedValue {
            kind,
            code: TypeCode::from(code),
            entry: Some(entry.clone()),
            fields: Some(fields),
            description,
            message: None,
            instrument: None,
        }
    }

    /// Schema entry name, e.g. `ContractOffer`.
    pub fn name(&self) -> Option<&str> {
        self.entry.as_ref().map(|e| e.name.as_str())
    }

    pub fn label(&self) -> Option<&str> {
        self.entry.as_ref().map(|e| e.label.as_str())
    }

    pub fn is_resolved(&self) -> bool {
        self.entry.is_some()
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.as_ref().and_then(|f| f.get(name))
    }

    /// Resolve the declared type of one of this value's fields.
    pub fn field_type<'s>(&self, schemas: &'s SchemaSet, field: &str) -> Option<TypeDescriptor<'s>> {
        let entry = self.entry.as_ref()?;
        TypeDescriptor::of_field(schemas.get(self.kind), entry, field)
    }

    /// Serialized transaction embedded in an `Offer` or `SignatureRequest`
    /// message.
    pub fn embedded_transaction(&self) -> Option<&[u8]> {
        let name = self.name()?;
        if self.kind != SchemaKind::Messages || !TRANSACTION_MESSAGES.iter().any(|m| *m == name) {
            return None;
        }
        self.field("Payload").and_then(FieldValue::as_bytes)
    }

    /// Action script embedded in a `SettlementRequest` message.
    pub fn embedded_action_script(&self) -> Option<&[u8]> {
        if self.kind != SchemaKind::Messages || self.name()? != "SettlementRequest" {
            return None;
        }
        self.field("Settlement").and_then(FieldValue::as_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> SchemaEntry {
        SchemaEntry {
            code: None,
            name: name.to_string(),
            label: String::new(),
            description: String::new(),
            fields: Vec::new(),
        }
    }

    #[test]
    fn test_action_aliases() {
        assert_eq!(canonical_action_code("A1"), "I1");
        assert_eq!(canonical_action_code("A3"), "I3");
        assert_eq!(canonical_action_code("C1"), "C1");
    }

    #[test]
    fn test_description() {
        let mut fields = Fields::new();
        fields.insert("ContractName", FieldValue::Text("Widgets".to_string()));
        let value = DecodedValue::resolved(SchemaKind::Actions, "C2", &entry("ContractFormation"), fields.clone());
        assert_eq!(value.description.as_deref(), Some("Widgets"));

        let value = DecodedValue::resolved(SchemaKind::Actions, "T1", &entry("Transfer"), fields);
        assert_eq!(value.description, None);
    }

    #[test]
    fn test_embedded_payloads() {
        let mut fields = Fields::new();
        fields.insert("Payload", FieldValue::Bytes(vec![1, 2, 3]));
        fields.insert("Settlement", FieldValue::Bytes(vec![4]));

        let offer = DecodedValue::resolved(SchemaKind::Messages, "1001", &entry("Offer"), fields.clone());
        assert_eq!(offer.embedded_transaction(), Some(&[1, 2, 3][..]));
        assert_eq!(offer.embedded_action_script(), None);

        let request = DecodedValue::resolved(SchemaKind::Messages, "1003", &entry("SettlementRequest"), fields.clone());
        assert_eq!(request.embedded_action_script(), Some(&[4][..]));
        assert_eq!(request.embedded_transaction(), None);

        // same name in another table carries nothing
        let action = DecodedValue::resolved(SchemaKind::Actions, "X1", &entry("Offer"), fields);
        assert_eq!(action.embedded_transaction(), None);
    }

    #[test]
    fn test_unresolved() {
        let value = DecodedValue::unresolved(SchemaKind::Actions, "ZZ");
        assert!(!value.is_resolved());
        assert_eq!(value.name(), None);
        assert_eq!(value.field("Anything"), None);
        assert_eq!(value.description, None);

        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["kind"], "actions");
        assert_eq!(json["code"], "ZZ");
        assert!(json["type"].is_null());
        assert!(json.get("message").is_none());
    }
}
