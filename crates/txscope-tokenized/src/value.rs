//! Generic field values produced by payload decoding.

use std::borrow::Cow;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// One decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Object(Fields),
    Array(Vec<FieldValue>),
}

impl FieldValue {
    /// Text content of a text or byte value.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Text(s) => Some(Cow::Borrowed(s)),
            FieldValue::Bytes(b) => Some(String::from_utf8_lossy(b)),
            _ => None,
        }
    }

    /// Raw content of a byte or text value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Bytes(b) => Some(b),
            FieldValue::Text(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::UInt(n) => Some(*n),
            FieldValue::Int(n) => u64::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Fields> {
        match self {
            FieldValue::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Render as a schema code: numbers in decimal, text as is.
    pub fn as_code(&self) -> Option<String> {
        match self {
            FieldValue::UInt(n) => Some(n.to_string()),
            FieldValue::Int(n) => Some(n.to_string()),
            FieldValue::Text(_) | FieldValue::Bytes(_) => self.as_text().map(Cow::into_owned),
            _ => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Int(n) => serializer.serialize_i64(*n),
            FieldValue::UInt(n) => serializer.serialize_u64(*n),
            FieldValue::Float(x) => serializer.serialize_f64(*x),
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Bytes(b) => serializer.serialize_str(&format!("bytes:{}", hex::encode(b))),
            FieldValue::Object(fields) => fields.serialize(serializer),
            FieldValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// Named field values in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, FieldValue)>,
}

impl Fields {
    pub fn new() -> Self {
        Fields::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Set a field, replacing an earlier value in place.
    pub fn insert(&mut self, name: &str, value: FieldValue) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// Append items to an array field, creating it if absent.
    pub fn extend_array(&mut self, name: &str, items: impl IntoIterator<Item = FieldValue>) {
        if let Some((_, FieldValue::Array(existing))) = self.entries.iter_mut().find(|(n, _)| n == name) {
            existing.extend(items);
            return;
        }
        self.insert(name, FieldValue::Array(items.into_iter().collect()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut fields = Fields::new();
        fields.insert("A", FieldValue::UInt(1));
        fields.insert("B", FieldValue::UInt(2));
        fields.insert("A", FieldValue::UInt(3));
        let names: Vec<_> = fields.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(fields.get("A"), Some(&FieldValue::UInt(3)));
    }

    #[test]
    fn test_extend_array() {
        let mut fields = Fields::new();
        fields.extend_array("Codes", vec![FieldValue::UInt(1)]);
        fields.extend_array("Codes", vec![FieldValue::UInt(2), FieldValue::UInt(3)]);
        assert_eq!(
            fields.get("Codes"),
            Some(&FieldValue::Array(vec![
                FieldValue::UInt(1),
                FieldValue::UInt(2),
                FieldValue::UInt(3)
            ]))
        );
    }

    #[test]
    fn test_serialize_json() {
        let mut inner = Fields::new();
        inner.insert("Name", FieldValue::Text("Acme".to_string()));
        let mut fields = Fields::new();
        fields.insert("Issuer", FieldValue::Object(inner));
        fields.insert("Hash", FieldValue::Bytes(vec![0xde, 0xad]));
        fields.insert("Flags", FieldValue::Array(vec![FieldValue::Bool(true)]));

        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(
            json,
            r#"{"Issuer":{"Name":"Acme"},"Hash":"bytes:dead","Flags":[true]}"#
        );
    }

    #[test]
    fn test_as_code() {
        assert_eq!(FieldValue::UInt(1002).as_code(), Some("1002".to_string()));
        assert_eq!(FieldValue::Text("CCY".to_string()).as_code(), Some("CCY".to_string()));
        assert_eq!(FieldValue::Bytes(b"SHC".to_vec()).as_code(), Some("SHC".to_string()));
        assert_eq!(FieldValue::Bool(true).as_code(), None);
    }
}
