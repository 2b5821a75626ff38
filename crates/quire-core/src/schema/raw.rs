//! Deserialization layer for `schema.json`.
//!
//! The format is a flattened form of introspection output: type references are
//! written in SDL notation (`"[User!]!"`) instead of nested `ofType` objects.

use indexmap::IndexMap;
use serde::Deserialize;

use super::{
    DirectiveDef, DirectiveLocation, FieldDef, InputValueDef, Schema, SchemaBuilder, TypeDef,
    TypeRef,
};
use crate::SchemaError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSchema {
    pub query_type: Option<String>,
    pub mutation_type: Option<String>,
    pub subscription_type: Option<String>,
    pub types: Vec<RawType>,
    #[serde(default)]
    pub directives: Vec<RawDirective>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RawType {
    Scalar {
        name: String,
    },
    Object {
        name: String,
        #[serde(default)]
        fields: Vec<RawField>,
        #[serde(default)]
        interfaces: Vec<String>,
    },
    Interface {
        name: String,
        #[serde(default)]
        fields: Vec<RawField>,
        #[serde(default)]
        interfaces: Vec<String>,
    },
    Union {
        name: String,
        #[serde(default)]
        members: Vec<String>,
    },
    Enum {
        name: String,
        #[serde(default)]
        values: Vec<String>,
    },
    InputObject {
        name: String,
        #[serde(default)]
        fields: Vec<RawInputValue>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawField {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: String,
    #[serde(default)]
    pub args: Vec<RawInputValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInputValue {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: String,
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDirective {
    pub name: String,
    pub locations: Vec<DirectiveLocation>,
    #[serde(default)]
    pub args: Vec<RawInputValue>,
    #[serde(default)]
    pub is_repeatable: bool,
}

/// Parse `schema.json` content and build the analysis layer.
pub fn parse_schema_json(json: &str) -> Result<Schema, SchemaError> {
    let raw: RawSchema = serde_json::from_str(json)?;
    raw.into_schema()
}

impl RawSchema {
    pub fn into_schema(self) -> Result<Schema, SchemaError> {
        let mut builder = SchemaBuilder::new();
        if let Some(name) = self.query_type {
            builder.query_type(name);
        }
        if let Some(name) = self.mutation_type {
            builder.mutation_type(name);
        }
        if let Some(name) = self.subscription_type {
            builder.subscription_type(name);
        }

        for ty in self.types {
            builder.add_type(ty.into_type_def()?)?;
        }

        for directive in self.directives {
            builder.add_directive(DirectiveDef {
                name: directive.name,
                args: input_values(directive.args)?,
                locations: directive.locations,
                repeatable: directive.is_repeatable,
            });
        }

        builder.build()
    }
}

impl RawType {
    fn into_type_def(self) -> Result<TypeDef, SchemaError> {
        Ok(match self {
            Self::Scalar { name } => TypeDef::Scalar { name },
            Self::Object {
                name,
                fields,
                interfaces,
            } => TypeDef::Object {
                name,
                fields: output_fields(fields)?,
                interfaces,
            },
            Self::Interface {
                name,
                fields,
                interfaces,
            } => TypeDef::Interface {
                name,
                fields: output_fields(fields)?,
                interfaces,
            },
            Self::Union { name, members } => TypeDef::Union { name, members },
            Self::Enum { name, values } => TypeDef::Enum { name, values },
            Self::InputObject { name, fields } => TypeDef::InputObject {
                name,
                fields: input_values(fields)?,
            },
        })
    }
}

fn output_fields(raw: Vec<RawField>) -> Result<IndexMap<String, FieldDef>, SchemaError> {
    let mut fields = IndexMap::with_capacity(raw.len());
    for field in raw {
        let ty: TypeRef = field.type_ref.parse()?;
        let def = FieldDef {
            name: field.name,
            args: input_values(field.args)?,
            ty,
        };
        fields.insert(def.name.clone(), def);
    }
    Ok(fields)
}

fn input_values(raw: Vec<RawInputValue>) -> Result<IndexMap<String, InputValueDef>, SchemaError> {
    let mut values = IndexMap::with_capacity(raw.len());
    for value in raw {
        let def = InputValueDef {
            ty: value.type_ref.parse()?,
            name: value.name,
            default_value: value.default_value,
        };
        values.insert(def.name.clone(), def);
    }
    Ok(values)
}
