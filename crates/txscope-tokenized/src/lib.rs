//! Decoding of Tokenized protocol payloads.
//!
//! Payloads are compact binary (protobuf wire format) messages whose shape is
//! described by externally supplied schema tables: one each for actions,
//! instruments and messages. This crate loads those tables, resolves field
//! types lazily against them, and turns a payload into a [`DecodedValue`],
//! including the nested message or instrument an action carries.

mod error;
pub mod schema;
pub mod types;
pub mod value;
pub mod wire;
pub mod action;
pub mod context;

pub use error::TokenizedError;
pub use schema::{FieldSpec, Schema, SchemaEntry, SchemaKind, SchemaSet, TypeCode};
pub use types::TypeDescriptor;
pub use value::{FieldValue, Fields};
pub use wire::{PayloadDecoder, WireDecoder};
pub use action::DecodedValue;
pub use context::{DecodeContext, DecodeLimits, DEFAULT_MAX_DEPTH};
