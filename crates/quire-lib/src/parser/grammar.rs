//! Grammar productions for executable documents.
//!
//! Recovery happens at definition boundaries: a malformed definition is
//! reported and the parser resynchronizes on the next `query`, `mutation`,
//! `subscription`, `fragment` or top-level `{`.

use quire_core::{OperationKind, TypeRef};

use super::core::Parser;
use super::lexer::{TokenKind, is_terminated_block_string};
use super::strings::{block_string_value, string_value};
use crate::ast::{
    Argument, Definition, Directive, Document, Field, FragmentDefinition, FragmentSpread,
    InlineFragment, Name, ObjectField, OperationDefinition, Selection, SelectionSet, Value,
    ValueKind, VariableDefinition,
};
use crate::diagnostics::DiagnosticKind;
use crate::source::Span;

const TYPE_SYSTEM_KEYWORDS: &[&str] = &[
    "schema",
    "scalar",
    "type",
    "interface",
    "union",
    "enum",
    "input",
    "directive",
    "extend",
];

const EXECUTABLE_KEYWORDS: &[&str] = &["query", "mutation", "subscription", "fragment"];

impl Parser<'_> {
    pub(super) fn parse_document(&mut self) -> Document {
        let mut definitions = Vec::new();

        while !self.should_stop() {
            if let Some(definition) = self.parse_definition() {
                definitions.push(definition);
            }
        }

        if definitions.is_empty() && self.diagnostics.is_empty() && !self.has_fatal_error() {
            self.error(DiagnosticKind::ExpectedDefinition);
        }

        Document { definitions }
    }

    fn at_definition_start(&self) -> bool {
        self.currently_is(TokenKind::LBrace) || self.at_definition_keyword()
    }

    fn at_definition_keyword(&self) -> bool {
        EXECUTABLE_KEYWORDS.iter().any(|k| self.at_keyword(k))
            || TYPE_SYSTEM_KEYWORDS.iter().any(|k| self.at_keyword(k))
            || self.at_description()
    }

    fn at_description(&self) -> bool {
        matches!(
            self.current(),
            Some(TokenKind::String | TokenKind::BlockString)
        )
    }

    fn parse_definition(&mut self) -> Option<Definition> {
        if self.currently_is(TokenKind::LBrace) {
            return self.parse_operation().map(Definition::Operation);
        }
        if self.at_keyword("fragment") {
            return self.parse_fragment().map(Definition::Fragment);
        }
        if ["query", "mutation", "subscription"]
            .iter()
            .any(|k| self.at_keyword(k))
        {
            return self.parse_operation().map(Definition::Operation);
        }
        if self.at_description() || TYPE_SYSTEM_KEYWORDS.iter().any(|k| self.at_keyword(k)) {
            self.skip_type_system_definition();
            return None;
        }

        match self.current() {
            Some(TokenKind::Garbage) => {
                self.error_and_bump(DiagnosticKind::InvalidCharacter, "not valid in GraphQL")
            }
            Some(TokenKind::UnterminatedString) => {
                self.error(DiagnosticKind::UnterminatedString);
                self.bump();
            }
            _ => {
                let found = self.found();
                self.error_and_bump(DiagnosticKind::ExpectedDefinition, format!("found {found}"));
            }
        }
        self.recover_to_definition();
        None
    }

    /// Skip tokens until something that can start a definition.
    fn recover_to_definition(&mut self) {
        while !self.should_stop() && !self.at_definition_start() {
            self.bump();
        }
    }

    /// Report and skip a schema definition found in a query document.
    fn skip_type_system_definition(&mut self) {
        let start = self.current_span().start;
        if self.at_description() {
            self.bump();
        }
        let keyword = self.current_text().to_string();
        let keyword_span = self.current_span();
        self.bump();

        let mut depth = 0u32;
        while !self.should_stop() {
            if depth == 0 && self.at_definition_keyword() {
                break;
            }
            match self.current() {
                Some(TokenKind::LBrace | TokenKind::LParen) => depth += 1,
                Some(TokenKind::RBrace | TokenKind::RParen) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 && self.currently_is(TokenKind::RBrace) {
                        self.bump();
                        break;
                    }
                }
                _ => {}
            }
            self.bump();
        }

        let span = Span::new(start, self.last_end().max(keyword_span.end));
        self.error_at(
            DiagnosticKind::NonExecutableDefinition,
            span,
            format!("`{keyword}` definitions describe a schema and cannot appear in a query document"),
        );
    }

    fn parse_operation(&mut self) -> Option<OperationDefinition> {
        let start = self.current_span().start;

        if self.currently_is(TokenKind::LBrace) {
            let selection_set = self.parse_selection_set()?;
            return Some(OperationDefinition {
                kind: OperationKind::Query,
                name: None,
                variables: Vec::new(),
                directives: Vec::new(),
                span: Span::new(start, selection_set.span.end),
                selection_set,
            });
        }

        let kind = match self.current_text() {
            "mutation" => OperationKind::Mutation,
            "subscription" => OperationKind::Subscription,
            _ => OperationKind::Query,
        };
        self.bump();

        let name = if self.currently_is(TokenKind::Name) {
            self.expect_name()
        } else {
            None
        };
        let variables = if self.currently_is(TokenKind::LParen) {
            self.parse_variable_definitions()
        } else {
            Vec::new()
        };
        let directives = self.parse_directives(false);

        if !self.currently_is(TokenKind::LBrace) {
            let found = self.found();
            self.error_msg(DiagnosticKind::ExpectedSelectionSet, format!("found {found}"));
            self.recover_to_definition();
            return None;
        }
        let selection_set = self.parse_selection_set()?;

        Some(OperationDefinition {
            kind,
            name,
            variables,
            directives,
            span: Span::new(start, selection_set.span.end),
            selection_set,
        })
    }

    fn parse_fragment(&mut self) -> Option<FragmentDefinition> {
        let start = self.current_span().start;
        self.bump();

        if self.at_keyword("on") {
            self.error_msg(DiagnosticKind::ExpectedName, "fragments cannot be named `on`");
            self.recover_to_definition();
            return None;
        }
        let Some(name) = self.expect_name() else {
            self.recover_to_definition();
            return None;
        };
        if self.expect_keyword("on").is_none() {
            self.recover_to_definition();
            return None;
        }
        let Some(type_condition) = self.expect_name() else {
            self.recover_to_definition();
            return None;
        };
        let directives = self.parse_directives(false);

        if !self.currently_is(TokenKind::LBrace) {
            let found = self.found();
            self.error_msg(DiagnosticKind::ExpectedSelectionSet, format!("found {found}"));
            self.recover_to_definition();
            return None;
        }
        let selection_set = self.parse_selection_set()?;

        Some(FragmentDefinition {
            name,
            type_condition,
            directives,
            span: Span::new(start, selection_set.span.end),
            selection_set,
        })
    }

    fn parse_variable_definitions(&mut self) -> Vec<VariableDefinition> {
        let open = self.bump().span;
        let mut variables = Vec::new();

        while !self.should_stop()
            && !self.currently_is(TokenKind::RParen)
            && !self.currently_is(TokenKind::LBrace)
        {
            if !self.currently_is(TokenKind::Dollar) {
                let found = self.found();
                self.error_and_bump(
                    DiagnosticKind::UnexpectedToken,
                    format!("expected a variable definition, found {found}"),
                );
                continue;
            }
            if let Some(variable) = self.parse_variable_definition() {
                variables.push(variable);
            }
        }

        if self.eat(TokenKind::RParen).is_none() {
            self.error_unclosed(")", open);
        }
        variables
    }

    fn parse_variable_definition(&mut self) -> Option<VariableDefinition> {
        let variable = self.parse_variable_name()?;
        self.expect(TokenKind::Colon)?;
        let (ty, ty_span) = self.parse_type()?;
        let default_value = if self.eat(TokenKind::Equals).is_some() {
            Some(self.parse_value(true)?)
        } else {
            None
        };
        let directives = self.parse_directives(true);

        Some(VariableDefinition {
            span: Span::new(variable.span.start, self.last_end()),
            variable,
            ty,
            ty_span,
            default_value,
            directives,
        })
    }

    /// `$name`, returned without the `$` but spanning it.
    fn parse_variable_name(&mut self) -> Option<Name> {
        let dollar = self.expect(TokenKind::Dollar)?;
        let name = self.expect_name()?;
        Some(Name::new(name.value, Span::new(dollar.span.start, name.span.end)))
    }

    pub(super) fn parse_type(&mut self) -> Option<(TypeRef, Span)> {
        let start = self.current_span().start;
        if !self.enter_recursion() {
            return None;
        }
        let inner = if let Some(open) = self.eat(TokenKind::LBracket) {
            let item = self.parse_type();
            if self.eat(TokenKind::RBracket).is_none() {
                self.error_unclosed("]", open.span);
            }
            item.map(|(ty, _)| TypeRef::list(ty))
        } else if self.currently_is(TokenKind::Name) {
            self.expect_name().map(|name| TypeRef::named(name.value))
        } else {
            let found = self.found();
            self.error_msg(DiagnosticKind::ExpectedType, format!("found {found}"));
            None
        };
        self.exit_recursion();

        let ty = inner?;
        let ty = if self.eat(TokenKind::Bang).is_some() {
            TypeRef::non_null(ty)
        } else {
            ty
        };
        Some((ty, Span::new(start, self.last_end())))
    }

    pub(super) fn parse_directives(&mut self, is_const: bool) -> Vec<Directive> {
        let mut directives = Vec::new();
        while self.currently_is(TokenKind::At) && !self.has_fatal_error() {
            let at = self.bump();
            let Some(name) = self.expect_name() else {
                continue;
            };
            let arguments = if self.currently_is(TokenKind::LParen) {
                self.parse_arguments(is_const)
            } else {
                Vec::new()
            };
            directives.push(Directive {
                name,
                arguments,
                span: Span::new(at.span.start, self.last_end()),
            });
        }
        directives
    }

    pub(super) fn parse_arguments(&mut self, is_const: bool) -> Vec<Argument> {
        let open = self.bump().span;
        let mut arguments = Vec::new();

        while !self.should_stop()
            && !self.currently_is(TokenKind::RParen)
            && !self.currently_is(TokenKind::LBrace)
            && !self.currently_is(TokenKind::RBrace)
        {
            if !self.currently_is(TokenKind::Name) {
                let found = self.found();
                self.error_and_bump(
                    DiagnosticKind::ExpectedName,
                    format!("expected an argument name, found {found}"),
                );
                continue;
            }
            let Some(name) = self.expect_name() else {
                continue;
            };
            if self.expect(TokenKind::Colon).is_none() {
                continue;
            }
            let Some(value) = self.parse_value(is_const) else {
                continue;
            };
            arguments.push(Argument {
                span: name.span.cover(value.span),
                name,
                value,
            });
        }

        if self.eat(TokenKind::RParen).is_none() {
            self.error_unclosed(")", open);
        }
        arguments
    }

    fn parse_selection_set(&mut self) -> Option<SelectionSet> {
        if !self.enter_recursion() {
            return None;
        }
        let open = self.bump().span;
        let mut selections = Vec::new();

        while !self.should_stop() && !self.currently_is(TokenKind::RBrace) {
            match self.current() {
                Some(TokenKind::Name) => {
                    if let Some(field) = self.parse_field() {
                        selections.push(Selection::Field(field));
                    }
                }
                Some(TokenKind::Spread) => {
                    if let Some(selection) = self.parse_spread() {
                        selections.push(selection);
                    }
                }
                _ => {
                    let found = self.found();
                    self.error_and_bump(
                        DiagnosticKind::UnexpectedToken,
                        format!("expected a field or fragment spread, found {found}"),
                    );
                }
            }
        }

        if self.eat(TokenKind::RBrace).is_none() {
            self.error_unclosed("}", open);
        }
        self.exit_recursion();

        if selections.is_empty() && !self.has_fatal_error() {
            self.error_at(
                DiagnosticKind::ExpectedSelectionSet,
                Span::new(open.start, self.last_end()),
                "selection sets cannot be empty",
            );
        }

        Some(SelectionSet {
            selections,
            span: Span::new(open.start, self.last_end()),
        })
    }

    fn parse_field(&mut self) -> Option<Field> {
        let first = self.expect_name()?;
        let (alias, name) = if self.eat(TokenKind::Colon).is_some() {
            (Some(first), self.expect_name()?)
        } else {
            (None, first)
        };
        let start = alias.as_ref().map_or(name.span.start, |a| a.span.start);

        let arguments = if self.currently_is(TokenKind::LParen) {
            self.parse_arguments(false)
        } else {
            Vec::new()
        };
        let directives = self.parse_directives(false);
        let selection_set = if self.currently_is(TokenKind::LBrace) {
            Some(self.parse_selection_set()?)
        } else {
            None
        };

        Some(Field {
            alias,
            name,
            arguments,
            directives,
            selection_set,
            span: Span::new(start, self.last_end()),
        })
    }

    fn parse_spread(&mut self) -> Option<Selection> {
        let spread = self.bump().span;

        if self.currently_is(TokenKind::Name) && !self.at_keyword("on") {
            let name = self.expect_name()?;
            let directives = self.parse_directives(false);
            return Some(Selection::FragmentSpread(FragmentSpread {
                name,
                directives,
                span: Span::new(spread.start, self.last_end()),
            }));
        }

        let type_condition = if self.eat_keyword("on").is_some() {
            Some(self.expect_name()?)
        } else {
            None
        };
        let directives = self.parse_directives(false);
        if !self.currently_is(TokenKind::LBrace) {
            let found = self.found();
            self.error_msg(DiagnosticKind::ExpectedSelectionSet, format!("found {found}"));
            return None;
        }
        let selection_set = self.parse_selection_set()?;

        Some(Selection::InlineFragment(InlineFragment {
            type_condition,
            directives,
            span: Span::new(spread.start, selection_set.span.end),
            selection_set,
        }))
    }

    /// Values; `is_const` rejects variables (default values, schema defaults).
    pub(super) fn parse_value(&mut self, is_const: bool) -> Option<Value> {
        if !self.enter_recursion() {
            return None;
        }
        let value = self.parse_value_inner(is_const);
        self.exit_recursion();
        value
    }

    fn parse_value_inner(&mut self, is_const: bool) -> Option<Value> {
        let span = self.current_span();
        let text = self.current_text();

        let kind = match self.current() {
            Some(TokenKind::Dollar) => {
                let name = self.parse_variable_name()?;
                if is_const {
                    self.error_at(
                        DiagnosticKind::UnexpectedToken,
                        name.span,
                        "variables are not allowed in constant values",
                    );
                }
                return Some(Value {
                    kind: ValueKind::Variable(name.value),
                    span: name.span,
                });
            }
            Some(TokenKind::Int) => {
                self.bump();
                ValueKind::Int(text.to_string())
            }
            Some(TokenKind::Float) => {
                self.bump();
                ValueKind::Float(text.to_string())
            }
            Some(TokenKind::String) => {
                self.bump();
                match string_value(text) {
                    Ok(value) => ValueKind::String(value),
                    Err(escape) => {
                        self.error_at(
                            DiagnosticKind::UnexpectedToken,
                            span,
                            format!("invalid escape sequence `{escape}`"),
                        );
                        ValueKind::String(String::new())
                    }
                }
            }
            Some(TokenKind::BlockString) => {
                if !is_terminated_block_string(text) {
                    self.error(DiagnosticKind::UnterminatedString);
                }
                self.bump();
                ValueKind::String(block_string_value(text))
            }
            Some(TokenKind::UnterminatedString) => {
                self.error(DiagnosticKind::UnterminatedString);
                self.bump();
                return None;
            }
            Some(TokenKind::Name) => {
                self.bump();
                match text {
                    "true" => ValueKind::Boolean(true),
                    "false" => ValueKind::Boolean(false),
                    "null" => ValueKind::Null,
                    _ => ValueKind::Enum(text.to_string()),
                }
            }
            Some(TokenKind::LBracket) => {
                let open = self.bump().span;
                let mut items = Vec::new();
                while !self.should_stop() && !self.currently_is(TokenKind::RBracket) {
                    match self.parse_value(is_const) {
                        Some(item) => items.push(item),
                        None => {
                            if !self.should_stop() && !self.currently_is(TokenKind::RBracket) {
                                self.bump();
                            }
                        }
                    }
                }
                if self.eat(TokenKind::RBracket).is_none() {
                    self.error_unclosed("]", open);
                }
                ValueKind::List(items)
            }
            Some(TokenKind::LBrace) => {
                let open = self.bump().span;
                let mut fields = Vec::new();
                while !self.should_stop() && !self.currently_is(TokenKind::RBrace) {
                    let Some(name) = self.expect_name() else {
                        self.bump();
                        continue;
                    };
                    if self.expect(TokenKind::Colon).is_none() {
                        continue;
                    }
                    if let Some(value) = self.parse_value(is_const) {
                        fields.push(ObjectField { name, value });
                    }
                }
                if self.eat(TokenKind::RBrace).is_none() {
                    self.error_unclosed("}", open);
                }
                ValueKind::Object(fields)
            }
            _ => {
                let found = self.found();
                self.error_msg(DiagnosticKind::ExpectedValue, format!("found {found}"));
                return None;
            }
        };

        Some(Value {
            kind,
            span: Span::new(span.start, self.last_end()),
        })
    }
}
