//! Lazily resolved field type descriptors.
//!
//! A descriptor is built for one field at a time, on request, by looking the
//! declared type name up in a schema table. Composite types refer back into
//! the table rather than expanding it, so self-referential schemas are fine.

use crate::schema::{Schema, SchemaEntry};

/// Suffix marking an array type name.
const ARRAY_SUFFIX: &str = "[]";

/// Shape of a schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor<'s> {
    /// A primitive type name such as `varchar` or `uint`.
    Simple(String),
    /// Repeated values of the item type.
    Array(Box<TypeDescriptor<'s>>),
    /// A composite type defined in the schema's field types.
    Object(&'s SchemaEntry),
}

impl<'s> TypeDescriptor<'s> {
    /// Resolve a declared type name against a schema table.
    ///
    /// # Arguments
    /// * `schema` - The table the name belongs to.
    /// * `type_name` - Declared type, e.g. `varchar`, `Entity`, `Entity[]`.
    pub fn resolve(schema: &'s Schema, type_name: &str) -> Self {
        if let Some(item) = type_name.strip_suffix(ARRAY_SUFFIX) {
            return TypeDescriptor::Array(Box::new(TypeDescriptor::resolve(schema, item)));
        }
        match schema.find_field_type(type_name) {
            Some(entry) => TypeDescriptor::Object(entry),
            None => TypeDescriptor::Simple(type_name.to_string()),
        }
    }

    /// Resolve the type of a named field of a composite entry.
    ///
    /// # Returns
    /// `None` if the entry has no such field.
    pub fn of_field(schema: &'s Schema, entry: &SchemaEntry, field_name: &str) -> Option<Self> {
        entry
            .field(field_name)
            .map(|f| TypeDescriptor::resolve(schema, &f.type_name))
    }

    /// The simple type name, if this is a simple type.
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Simple(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeDescriptor::Array(_))
    }
}
