//! Schema model used for validation.
//!
//! Two layers, as for every external input:
//! - **Deserialization layer** ([`raw`]): 1:1 mapping to `schema.json`
//! - **Analysis layer** ([`Schema`]): name-indexed lookups used by validation rules
//!
//! Schemas are built through [`SchemaBuilder`], which always provides the
//! built-in scalars and the `@include`, `@skip` and `@deprecated` directives.

mod raw;
mod type_ref;

#[cfg(test)]
mod raw_tests;
#[cfg(test)]
mod schema_tests;

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::SchemaError;

pub use raw::{RawSchema, parse_schema_json};
pub use type_ref::TypeRef;

pub const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// Meta field available on every composite type.
pub const TYPENAME_FIELD: &str = "__typename";

// ============================================================================
// Common Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectiveLocation {
    // Executable locations
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,

    // Type system locations
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

impl DirectiveLocation {
    const ALL: [DirectiveLocation; 19] = [
        Self::Query,
        Self::Mutation,
        Self::Subscription,
        Self::Field,
        Self::FragmentDefinition,
        Self::FragmentSpread,
        Self::InlineFragment,
        Self::VariableDefinition,
        Self::Schema,
        Self::Scalar,
        Self::Object,
        Self::FieldDefinition,
        Self::ArgumentDefinition,
        Self::Interface,
        Self::Union,
        Self::Enum,
        Self::EnumValue,
        Self::InputObject,
        Self::InputFieldDefinition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "QUERY",
            Self::Mutation => "MUTATION",
            Self::Subscription => "SUBSCRIPTION",
            Self::Field => "FIELD",
            Self::FragmentDefinition => "FRAGMENT_DEFINITION",
            Self::FragmentSpread => "FRAGMENT_SPREAD",
            Self::InlineFragment => "INLINE_FRAGMENT",
            Self::VariableDefinition => "VARIABLE_DEFINITION",
            Self::Schema => "SCHEMA",
            Self::Scalar => "SCALAR",
            Self::Object => "OBJECT",
            Self::FieldDefinition => "FIELD_DEFINITION",
            Self::ArgumentDefinition => "ARGUMENT_DEFINITION",
            Self::Interface => "INTERFACE",
            Self::Union => "UNION",
            Self::Enum => "ENUM",
            Self::EnumValue => "ENUM_VALUE",
            Self::InputObject => "INPUT_OBJECT",
            Self::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|loc| loc.as_str() == name)
    }

    pub fn for_operation(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Query => Self::Query,
            OperationKind::Mutation => Self::Mutation,
            OperationKind::Subscription => Self::Subscription,
        }
    }
}

impl fmt::Display for DirectiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Scalar => "scalar",
            Self::Object => "object",
            Self::Interface => "interface",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::InputObject => "input object",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Definitions
// ============================================================================

/// An argument or input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputValueDef {
    pub name: String,
    pub ty: TypeRef,
    /// Default value as written in the schema source.
    pub default_value: Option<String>,
}

impl InputValueDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Non-null without a default: callers must provide it.
    pub fn is_required(&self) -> bool {
        self.ty.is_non_null() && self.default_value.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub args: IndexMap<String, InputValueDef>,
    pub ty: TypeRef,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            args: IndexMap::new(),
            ty,
        }
    }

    pub fn with_arg(mut self, arg: InputValueDef) -> Self {
        self.args.insert(arg.name.clone(), arg);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveDef {
    pub name: String,
    pub args: IndexMap<String, InputValueDef>,
    pub locations: Vec<DirectiveLocation>,
    pub repeatable: bool,
}

impl DirectiveDef {
    pub fn new(name: impl Into<String>, locations: Vec<DirectiveLocation>) -> Self {
        Self {
            name: name.into(),
            args: IndexMap::new(),
            locations,
            repeatable: false,
        }
    }

    pub fn with_arg(mut self, arg: InputValueDef) -> Self {
        self.args.insert(arg.name.clone(), arg);
        self
    }

    pub fn repeatable(mut self, value: bool) -> Self {
        self.repeatable = value;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDef {
    Scalar {
        name: String,
    },
    Object {
        name: String,
        fields: IndexMap<String, FieldDef>,
        interfaces: Vec<String>,
    },
    Interface {
        name: String,
        fields: IndexMap<String, FieldDef>,
        interfaces: Vec<String>,
    },
    Union {
        name: String,
        members: Vec<String>,
    },
    Enum {
        name: String,
        values: Vec<String>,
    },
    InputObject {
        name: String,
        fields: IndexMap<String, InputValueDef>,
    },
}

impl TypeDef {
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar { name }
            | Self::Object { name, .. }
            | Self::Interface { name, .. }
            | Self::Union { name, .. }
            | Self::Enum { name, .. }
            | Self::InputObject { name, .. } => name,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Scalar { .. } => TypeKind::Scalar,
            Self::Object { .. } => TypeKind::Object,
            Self::Interface { .. } => TypeKind::Interface,
            Self::Union { .. } => TypeKind::Union,
            Self::Enum { .. } => TypeKind::Enum,
            Self::InputObject { .. } => TypeKind::InputObject,
        }
    }

    /// Object, interface or union: may carry a selection set.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::Object { .. } | Self::Interface { .. } | Self::Union { .. }
        )
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Interface { .. } | Self::Union { .. })
    }

    /// Scalar or enum: must not carry a selection set.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Scalar { .. } | Self::Enum { .. })
    }

    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Self::Scalar { .. } | Self::Enum { .. } | Self::InputObject { .. }
        )
    }

    /// Declared fields of an object or interface.
    pub fn fields(&self) -> Option<&IndexMap<String, FieldDef>> {
        match self {
            Self::Object { fields, .. } | Self::Interface { fields, .. } => Some(fields),
            _ => None,
        }
    }

    pub fn input_fields(&self) -> Option<&IndexMap<String, InputValueDef>> {
        match self {
            Self::InputObject { fields, .. } => Some(fields),
            _ => None,
        }
    }

    pub fn enum_values(&self) -> Option<&[String]> {
        match self {
            Self::Enum { values, .. } => Some(values),
            _ => None,
        }
    }

    pub fn interfaces(&self) -> &[String] {
        match self {
            Self::Object { interfaces, .. } | Self::Interface { interfaces, .. } => interfaces,
            _ => &[],
        }
    }
}

// ============================================================================
// Analysis Layer
// ============================================================================

#[derive(Debug, Clone)]
pub struct Schema {
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
    types: IndexMap<String, TypeDef>,
    directives: IndexMap<String, DirectiveDef>,
    /// Interface name → implementing object names, in declaration order.
    implementations: HashMap<String, Vec<String>>,
    typename_field: FieldDef,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    pub fn type_names(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).collect()
    }

    pub fn root_type(&self, kind: OperationKind) -> Option<&TypeDef> {
        let name = match kind {
            OperationKind::Query => self.query_type.as_deref(),
            OperationKind::Mutation => self.mutation_type.as_deref(),
            OperationKind::Subscription => self.subscription_type.as_deref(),
        }?;
        self.get_type(name)
    }

    pub fn directive(&self, name: &str) -> Option<&DirectiveDef> {
        self.directives.get(name)
    }

    pub fn directive_names(&self) -> Vec<&str> {
        self.directives.keys().map(String::as_str).collect()
    }

    /// Field lookup on a composite type, including the `__typename` meta field.
    pub fn field<'s>(&'s self, parent: &'s TypeDef, name: &str) -> Option<&'s FieldDef> {
        if name == TYPENAME_FIELD && parent.is_composite() {
            return Some(&self.typename_field);
        }
        parent.fields().and_then(|fields| fields.get(name))
    }

    /// Concrete object types a value of `ty` may have at runtime.
    pub fn possible_types<'s>(&'s self, ty: &'s TypeDef) -> Vec<&'s str> {
        match ty {
            TypeDef::Object { name, .. } => vec![name.as_str()],
            TypeDef::Interface { name, .. } => self
                .implementations
                .get(name)
                .map(|impls| impls.iter().map(String::as_str).collect())
                .unwrap_or_default(),
            TypeDef::Union { members, .. } => members.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_possible_type(&self, abstract_type: &TypeDef, object_name: &str) -> bool {
        self.possible_types(abstract_type).contains(&object_name)
    }

    /// Whether two composite types share at least one possible object type.
    pub fn do_types_overlap(&self, a: &TypeDef, b: &TypeDef) -> bool {
        if a.name() == b.name() {
            return true;
        }
        let b_possible = self.possible_types(b);
        self.possible_types(a)
            .iter()
            .any(|name| b_possible.contains(name))
    }

    /// Whether the named base type of `ty` exists and is an input type.
    pub fn is_input_type(&self, ty: &TypeRef) -> bool {
        self.get_type(ty.base_name()).is_some_and(TypeDef::is_input)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Accumulates type and directive definitions, then checks references on [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
    types: IndexMap<String, TypeDef>,
    directives: IndexMap<String, DirectiveDef>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    pub fn new() -> Self {
        let mut types = IndexMap::new();
        for name in BUILTIN_SCALARS {
            types.insert(
                name.to_string(),
                TypeDef::Scalar {
                    name: name.to_string(),
                },
            );
        }

        let condition = || InputValueDef::new("if", TypeRef::non_null(TypeRef::named("Boolean")));
        let conditional_locations = vec![
            DirectiveLocation::Field,
            DirectiveLocation::FragmentSpread,
            DirectiveLocation::InlineFragment,
        ];
        let mut directives = IndexMap::new();
        for def in [
            DirectiveDef::new("include", conditional_locations.clone()).with_arg(condition()),
            DirectiveDef::new("skip", conditional_locations).with_arg(condition()),
            DirectiveDef::new(
                "deprecated",
                vec![
                    DirectiveLocation::FieldDefinition,
                    DirectiveLocation::ArgumentDefinition,
                    DirectiveLocation::InputFieldDefinition,
                    DirectiveLocation::EnumValue,
                ],
            )
            .with_arg(
                InputValueDef::new("reason", TypeRef::named("String"))
                    .with_default("\"No longer supported\""),
            ),
        ] {
            directives.insert(def.name.clone(), def);
        }

        Self {
            query_type: None,
            mutation_type: None,
            subscription_type: None,
            types,
            directives,
        }
    }

    pub fn query_type(&mut self, name: impl Into<String>) -> &mut Self {
        self.query_type = Some(name.into());
        self
    }

    pub fn mutation_type(&mut self, name: impl Into<String>) -> &mut Self {
        self.mutation_type = Some(name.into());
        self
    }

    pub fn subscription_type(&mut self, name: impl Into<String>) -> &mut Self {
        self.subscription_type = Some(name.into());
        self
    }

    /// Adds a type. Redeclaring a built-in scalar as a scalar is accepted.
    pub fn add_type(&mut self, ty: TypeDef) -> Result<&mut Self, SchemaError> {
        let name = ty.name().to_string();
        if let Some(existing) = self.types.get(&name) {
            let builtin_scalar = BUILTIN_SCALARS.contains(&name.as_str())
                && existing.kind() == TypeKind::Scalar
                && ty.kind() == TypeKind::Scalar;
            if builtin_scalar {
                return Ok(self);
            }
            return Err(SchemaError::DuplicateType(name));
        }
        self.types.insert(name, ty);
        Ok(self)
    }

    /// Adds a directive, replacing a built-in one of the same name.
    pub fn add_directive(&mut self, def: DirectiveDef) -> &mut Self {
        self.directives.insert(def.name.clone(), def);
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        let root = |explicit: Option<String>, conventional: &str| {
            explicit.or_else(|| {
                self.types
                    .contains_key(conventional)
                    .then(|| conventional.to_string())
            })
        };
        let query_type = root(self.query_type.clone(), "Query");
        let mutation_type = root(self.mutation_type.clone(), "Mutation");
        let subscription_type = root(self.subscription_type.clone(), "Subscription");

        for name in [&query_type, &mutation_type, &subscription_type]
            .into_iter()
            .flatten()
        {
            match self.types.get(name) {
                Some(TypeDef::Object { .. }) => {}
                Some(_) => return Err(SchemaError::InvalidRootType(name.clone())),
                None => {
                    return Err(SchemaError::UnknownType {
                        name: name.clone(),
                        context: "schema root".to_string(),
                    });
                }
            }
        }

        self.check_references()?;

        let mut implementations: HashMap<String, Vec<String>> = HashMap::new();
        for ty in self.types.values() {
            if let TypeDef::Object {
                name, interfaces, ..
            } = ty
            {
                for interface in interfaces {
                    implementations
                        .entry(interface.clone())
                        .or_default()
                        .push(name.clone());
                }
            }
        }

        Ok(Schema {
            query_type,
            mutation_type,
            subscription_type,
            types: self.types,
            directives: self.directives,
            implementations,
            typename_field: FieldDef::new(
                TYPENAME_FIELD,
                TypeRef::non_null(TypeRef::named("String")),
            ),
        })
    }

    fn check_references(&self) -> Result<(), SchemaError> {
        let require = |name: &str, context: String| {
            if self.types.contains_key(name) {
                Ok(())
            } else {
                Err(SchemaError::UnknownType {
                    name: name.to_string(),
                    context,
                })
            }
        };

        for ty in self.types.values() {
            let owner = ty.name();
            if let Some(fields) = ty.fields() {
                for field in fields.values() {
                    require(field.ty.base_name(), format!("field `{owner}.{}`", field.name))?;
                    for arg in field.args.values() {
                        require(
                            arg.ty.base_name(),
                            format!("argument `{owner}.{}({}:)`", field.name, arg.name),
                        )?;
                    }
                }
            }
            for interface in ty.interfaces() {
                match self.types.get(interface) {
                    Some(TypeDef::Interface { .. }) => {}
                    _ => {
                        return Err(SchemaError::UnknownType {
                            name: interface.clone(),
                            context: format!("interfaces of `{owner}`"),
                        });
                    }
                }
            }
            match ty {
                TypeDef::Union { members, .. } => {
                    for member in members {
                        require(member, format!("members of union `{owner}`"))?;
                    }
                }
                TypeDef::InputObject { fields, .. } => {
                    for field in fields.values() {
                        require(
                            field.ty.base_name(),
                            format!("input field `{owner}.{}`", field.name),
                        )?;
                    }
                }
                _ => {}
            }
        }

        for directive in self.directives.values() {
            for arg in directive.args.values() {
                require(
                    arg.ty.base_name(),
                    format!("argument `@{}({}:)`", directive.name, arg.name),
                )?;
            }
        }

        Ok(())
    }
}
