//! Owned AST for executable GraphQL documents.
//!
//! Every node keeps the span it was parsed from. Spans are byte offsets into
//! the query text of one source; [`SourceMap`](crate::source::SourceMap)
//! turns them into file locations.

use quire_core::{OperationKind, TypeRef};

use crate::source::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub value: String,
    pub span: Span,
}

impl Name {
    pub fn new(value: impl Into<String>, span: Span) -> Self {
        Self {
            value: value.into(),
            span,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub definitions: Vec<Definition>,
}

impl Document {
    pub fn operations(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.definitions.iter().filter_map(Definition::as_operation)
    }

    pub fn fragments(&self) -> impl Iterator<Item = &FragmentDefinition> {
        self.definitions.iter().filter_map(Definition::as_fragment)
    }
}

/// Executable definitions only; type-system definitions are rejected while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    Operation(OperationDefinition),
    Fragment(FragmentDefinition),
}

impl Definition {
    pub fn name(&self) -> Option<&Name> {
        match self {
            Self::Operation(op) => op.name.as_ref(),
            Self::Fragment(frag) => Some(&frag.name),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Operation(op) => op.span,
            Self::Fragment(frag) => frag.span,
        }
    }

    pub fn selection_set(&self) -> &SelectionSet {
        match self {
            Self::Operation(op) => &op.selection_set,
            Self::Fragment(frag) => &frag.selection_set,
        }
    }

    pub fn as_operation(&self) -> Option<&OperationDefinition> {
        match self {
            Self::Operation(op) => Some(op),
            Self::Fragment(_) => None,
        }
    }

    pub fn as_fragment(&self) -> Option<&FragmentDefinition> {
        match self {
            Self::Fragment(frag) => Some(frag),
            Self::Operation(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDefinition {
    pub kind: OperationKind,
    pub name: Option<Name>,
    pub variables: Vec<VariableDefinition>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
    pub span: Span,
}

impl OperationDefinition {
    /// Operation keyword and name, or the opening brace of a shorthand query.
    pub fn head_span(&self) -> Span {
        match &self.name {
            Some(name) => Span::new(self.span.start, name.span.end),
            None if self.span.start == self.selection_set.span.start => {
                Span::new(self.span.start, self.span.start + 1)
            }
            None => Span::new(
                self.span.start,
                self.span.start + self.kind.as_str().len() as u32,
            ),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_ref().map_or("<anonymous>", Name::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentDefinition {
    pub name: Name,
    pub type_condition: Name,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDefinition {
    /// Variable name without `$`; the span covers the `$`.
    pub variable: Name,
    pub ty: TypeRef,
    pub ty_span: Span,
    pub default_value: Option<Value>,
    pub directives: Vec<Directive>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionSet {
    pub selections: Vec<Selection>,
    pub span: Span,
}

impl SelectionSet {
    /// All fragment spreads reachable without crossing a fragment boundary, in document order.
    pub fn fragment_spreads(&self) -> Vec<&FragmentSpread> {
        let mut spreads = Vec::new();
        let mut stack = vec![self.selections.iter()];
        while let Some(iter) = stack.last_mut() {
            let Some(selection) = iter.next() else {
                stack.pop();
                continue;
            };
            match selection {
                Selection::FragmentSpread(spread) => spreads.push(spread),
                Selection::Field(field) => {
                    if let Some(set) = &field.selection_set {
                        stack.push(set.selections.iter());
                    }
                }
                Selection::InlineFragment(inline) => {
                    stack.push(inline.selection_set.selections.iter());
                }
            }
        }
        spreads
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Field(Field),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

impl Selection {
    pub fn span(&self) -> Span {
        match self {
            Self::Field(field) => field.span,
            Self::FragmentSpread(spread) => spread.span,
            Self::InlineFragment(inline) => inline.span,
        }
    }

    pub fn directives(&self) -> &[Directive] {
        match self {
            Self::Field(field) => &field.directives,
            Self::FragmentSpread(spread) => &spread.directives,
            Self::InlineFragment(inline) => &inline.directives,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub alias: Option<Name>,
    pub name: Name,
    pub arguments: Vec<Argument>,
    pub directives: Vec<Directive>,
    pub selection_set: Option<SelectionSet>,
    pub span: Span,
}

impl Field {
    /// Key under which the field appears in the response.
    pub fn response_key(&self) -> &str {
        self.alias.as_ref().unwrap_or(&self.name).as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentSpread {
    pub name: Name,
    pub directives: Vec<Directive>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineFragment {
    pub type_condition: Option<Name>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: Name,
    pub value: Value,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: Name,
    pub arguments: Vec<Argument>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    pub kind: ValueKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    Variable(String),
    /// Integer literal as written.
    Int(String),
    /// Float literal as written.
    Float(String),
    /// Decoded string contents; block strings are dedented.
    String(String),
    Boolean(bool),
    Null,
    Enum(String),
    List(Vec<Value>),
    Object(Vec<ObjectField>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectField {
    pub name: Name,
    pub value: Value,
}

impl Value {
    /// Variables referenced anywhere inside this value, in document order.
    pub fn variables(&self) -> Vec<(&str, Span)> {
        let mut found = Vec::new();
        let mut stack = vec![self];
        while let Some(value) = stack.pop() {
            match &value.kind {
                ValueKind::Variable(name) => found.push((name.as_str(), value.span)),
                ValueKind::List(items) => stack.extend(items.iter().rev()),
                ValueKind::Object(fields) => stack.extend(fields.iter().rev().map(|f| &f.value)),
                _ => {}
            }
        }
        found
    }
}
