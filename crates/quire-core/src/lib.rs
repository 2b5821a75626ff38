#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for quire: the schema model queries are validated
//! against, plus naming utilities shared by the compiler and the CLI.

pub mod schema;
pub mod utils;

#[cfg(test)]
mod utils_tests;

pub use schema::{
    DirectiveDef, DirectiveLocation, FieldDef, InputValueDef, OperationKind, Schema,
    SchemaBuilder, TypeDef, TypeKind, TypeRef,
};

/// Errors raised while building a [`Schema`].
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid type reference `{0}`")]
    InvalidTypeRef(String),

    #[error("type `{0}` is defined more than once")]
    DuplicateType(String),

    #[error("unknown type `{name}` referenced by {context}")]
    UnknownType { name: String, context: String },

    #[error("root operation type `{0}` must be an object type")]
    InvalidRootType(String),
}
