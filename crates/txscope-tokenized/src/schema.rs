//! Schema tables for Tokenized payloads.
//!
//! Each table is a JSON document of the shape
//!
//! ```json
//! { "messages":   [ { "code": "C1", "name": "ContractOffer", "fields": [ ... ] } ],
//!   "fieldTypes": [ { "name": "Entity", "fields": [ ... ] } ] }
//! ```
//!
//! `messages` are the top-level payload types addressed by code, `fieldTypes`
//! are the composite types fields may refer to by name. Unknown keys are
//! ignored so the published schema assets load unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::TokenizedError;

/// Which of the three schema tables an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Actions,
    Instruments,
    Messages,
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaKind::Actions => "actions",
            SchemaKind::Instruments => "instruments",
            SchemaKind::Messages => "messages",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// TypeCode
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCode {
    Text(String),
    Number(u64),
}

/// Code selecting a schema entry, e.g. `"C1"` or `"1002"`.
///
/// Schema documents write codes either as strings or as numbers; both load
/// as text. Two codes match when their text is equal or when both are
/// decimal numbers of equal value, so `"0002"` matches `2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawCode")]
pub struct TypeCode(pub String);

impl From<RawCode> for TypeCode {
    fn from(raw: RawCode) -> Self {
        match raw {
            RawCode::Text(s) => TypeCode(s),
            RawCode::Number(n) => TypeCode(n.to_string()),
        }
    }
}

impl From<&str> for TypeCode {
    fn from(s: &str) -> Self {
        TypeCode(s.to_string())
    }
}

impl TypeCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if `other` selects the same entry as this code.
    pub fn matches(&self, other: &str) -> bool {
        if self.0 == other {
            return true;
        }
        match (self.0.parse::<u64>(), other.parse::<u64>()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// One field of a schema entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    /// Declared type name: a simple name, a composite type name, or either
    /// followed by `[]`.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
}

/// A payload type or composite field type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaEntry {
    /// Present on top-level payload types only.
    #[serde(default)]
    pub code: Option<TypeCode>,
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl SchemaEntry {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a field by its wire field number (1-based position).
    pub fn field_by_number(&self, number: u32) -> Option<&FieldSpec> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        self.fields.get(index)
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// One schema table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default)]
    pub messages: Vec<SchemaEntry>,
    #[serde(default)]
    pub field_types: Vec<SchemaEntry>,
}

impl Schema {
    /// Parse a schema table from its JSON document.
    pub fn from_json(json: &str) -> Result<Self, TokenizedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Find the payload type for a code.
    pub fn find_code(&self, code: &str) -> Option<&SchemaEntry> {
        self.messages
            .iter()
            .find(|m| m.code.as_ref().map_or(false, |c| c.matches(code)))
    }

    /// Find a composite field type by name.
    pub fn find_field_type(&self, name: &str) -> Option<&SchemaEntry> {
        self.field_types.iter().find(|t| t.name == name)
    }
}

/// The three schema tables a decode runs against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSet {
    pub actions: Schema,
    pub instruments: Schema,
    pub messages: Schema,
}

impl SchemaSet {
    pub fn new(actions: Schema, instruments: Schema, messages: Schema) -> Self {
        SchemaSet { actions, instruments, messages }
    }

    /// Load all three tables from their JSON documents.
    ///
    /// # Arguments
    /// * `actions` - The actions schema document.
    /// * `instruments` - The instruments schema document.
    /// * `messages` - The messages schema document.
    ///
    /// # Returns
    /// The loaded set, or the first document's parse error.
    pub fn from_json(actions: &str, instruments: &str, messages: &str) -> Result<Self, TokenizedError> {
        Ok(SchemaSet {
            actions: Schema::from_json(actions)?,
            instruments: Schema::from_json(instruments)?,
            messages: Schema::from_json(messages)?,
        })
    }

    /// The table for a kind.
    pub fn get(&self, kind: SchemaKind) -> &Schema {
        match kind {
            SchemaKind::Actions => &self.actions,
            SchemaKind::Instruments => &self.instruments,
            SchemaKind::Messages => &self.messages,
        }
    }
}
