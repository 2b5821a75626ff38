//! Grammar productions for schema SDL.
//!
//! Descriptions and applied directives are parsed and dropped; type
//! extensions are rejected.

use indexmap::IndexMap;
use quire_core::{
    DirectiveDef, DirectiveLocation, FieldDef, InputValueDef, SchemaBuilder, SchemaError, TypeDef,
};

use super::core::Parser;
use super::lexer::TokenKind;
use crate::ast::Name;
use crate::diagnostics::DiagnosticKind;
use crate::printer::print_value;

impl Parser<'_> {
    pub(super) fn parse_schema_document(&mut self) -> Result<SchemaBuilder, SchemaError> {
        let mut builder = SchemaBuilder::new();

        while !self.should_stop() {
            self.skip_description();
            let keyword = self.current_text();
            match (self.current(), keyword) {
                (Some(TokenKind::Name), "schema") => self.parse_schema_definition(&mut builder),
                (Some(TokenKind::Name), "directive") => {
                    if let Some(def) = self.parse_directive_definition() {
                        builder.add_directive(def);
                    }
                }
                (
                    Some(TokenKind::Name),
                    "scalar" | "type" | "interface" | "union" | "enum" | "input",
                ) => {
                    if let Some(def) = self.parse_type_definition() {
                        builder.add_type(def)?;
                    }
                }
                (Some(TokenKind::Name), "extend") => {
                    self.error_and_bump(
                        DiagnosticKind::UnexpectedToken,
                        "type extensions are not supported",
                    );
                    self.skip_to_schema_definition();
                }
                _ => {
                    let found = self.found();
                    self.error_and_bump(
                        DiagnosticKind::ExpectedDefinition,
                        format!("expected a type system definition, found {found}"),
                    );
                    self.skip_to_schema_definition();
                }
            }
        }

        Ok(builder)
    }

    fn skip_description(&mut self) {
        if matches!(
            self.current(),
            Some(TokenKind::String | TokenKind::BlockString)
        ) {
            self.bump();
        }
    }

    fn at_schema_keyword(&self) -> bool {
        [
            "schema",
            "scalar",
            "type",
            "interface",
            "union",
            "enum",
            "input",
            "directive",
            "extend",
        ]
        .iter()
        .any(|k| self.at_keyword(k))
    }

    fn skip_to_schema_definition(&mut self) {
        let mut depth = 0u32;
        while !self.should_stop() {
            match self.current() {
                Some(TokenKind::LBrace) => depth += 1,
                Some(TokenKind::RBrace) => depth = depth.saturating_sub(1),
                _ if depth == 0 && self.at_schema_keyword() => break,
                _ => {}
            }
            self.bump();
        }
    }

    fn parse_schema_definition(&mut self, builder: &mut SchemaBuilder) {
        self.bump();
        self.parse_directives(true);
        let Some(open) = self.expect(TokenKind::LBrace) else {
            return;
        };
        while !self.should_stop() && !self.currently_is(TokenKind::RBrace) {
            let Some(operation) = self.expect_name() else {
                self.bump();
                continue;
            };
            if self.expect(TokenKind::Colon).is_none() {
                continue;
            }
            let Some(ty) = self.expect_name() else {
                continue;
            };
            match operation.as_str() {
                "query" => builder.query_type(ty.value),
                "mutation" => builder.mutation_type(ty.value),
                "subscription" => builder.subscription_type(ty.value),
                other => {
                    self.error_at(
                        DiagnosticKind::UnexpectedToken,
                        operation.span,
                        format!("`{other}` is not an operation type"),
                    );
                    continue;
                }
            };
        }
        if self.eat(TokenKind::RBrace).is_none() {
            self.error_unclosed("}", open.span);
        }
    }

    fn parse_type_definition(&mut self) -> Option<TypeDef> {
        let source = self.source;
        let keyword = &source[self.bump().span.range()];
        let name = self.expect_name()?.value;

        let def = match keyword {
            "scalar" => {
                self.parse_directives(true);
                TypeDef::Scalar { name }
            }
            "type" | "interface" => {
                let interfaces = self.parse_implements();
                self.parse_directives(true);
                let fields = if self.currently_is(TokenKind::LBrace) {
                    self.parse_fields_definition()
                } else {
                    IndexMap::new()
                };
                if keyword == "type" {
                    TypeDef::Object {
                        name,
                        fields,
                        interfaces,
                    }
                } else {
                    TypeDef::Interface {
                        name,
                        fields,
                        interfaces,
                    }
                }
            }
            "union" => {
                self.parse_directives(true);
                let mut members = Vec::new();
                if self.eat(TokenKind::Equals).is_some() {
                    self.eat(TokenKind::Pipe);
                    members.extend(self.expect_name().map(|n| n.value));
                    while self.eat(TokenKind::Pipe).is_some() {
                        members.extend(self.expect_name().map(|n| n.value));
                    }
                }
                TypeDef::Union { name, members }
            }
            "enum" => {
                self.parse_directives(true);
                let values = if self.currently_is(TokenKind::LBrace) {
                    self.parse_enum_values()
                } else {
                    Vec::new()
                };
                TypeDef::Enum { name, values }
            }
            _ => {
                self.parse_directives(true);
                let fields = if self.currently_is(TokenKind::LBrace) {
                    self.parse_input_values(TokenKind::RBrace)
                } else {
                    IndexMap::new()
                };
                TypeDef::InputObject { name, fields }
            }
        };
        Some(def)
    }

    fn parse_implements(&mut self) -> Vec<String> {
        let mut interfaces = Vec::new();
        if self.eat_keyword("implements").is_none() {
            return interfaces;
        }
        self.eat(TokenKind::Amp);
        interfaces.extend(self.expect_name().map(|n| n.value));
        while self.eat(TokenKind::Amp).is_some() {
            interfaces.extend(self.expect_name().map(|n| n.value));
        }
        interfaces
    }

    fn parse_fields_definition(&mut self) -> IndexMap<String, FieldDef> {
        let open = self.bump().span;
        let mut fields = IndexMap::new();

        while !self.should_stop() && !self.currently_is(TokenKind::RBrace) {
            self.skip_description();
            let Some(name) = self.expect_name() else {
                self.bump();
                continue;
            };
            let args = if self.currently_is(TokenKind::LParen) {
                self.bump();
                self.parse_input_values(TokenKind::RParen)
            } else {
                IndexMap::new()
            };
            if self.expect(TokenKind::Colon).is_none() {
                continue;
            }
            let Some((ty, _)) = self.parse_type() else {
                continue;
            };
            self.parse_directives(true);
            fields.insert(
                name.value.clone(),
                FieldDef {
                    name: name.value,
                    args,
                    ty,
                },
            );
        }

        if self.eat(TokenKind::RBrace).is_none() {
            self.error_unclosed("}", open);
        }
        fields
    }

    /// Input values up to `close`. The opening delimiter must already be consumed
    /// unless `close` is `}` and the current token is `{`.
    fn parse_input_values(&mut self, close: TokenKind) -> IndexMap<String, InputValueDef> {
        let open = if close == TokenKind::RBrace {
            self.bump().span
        } else {
            self.current_span()
        };
        let mut values = IndexMap::new();

        while !self.should_stop() && !self.currently_is(close) {
            self.skip_description();
            let Some(name) = self.expect_name() else {
                self.bump();
                continue;
            };
            if let Some(def) = self.parse_input_value(name) {
                values.insert(def.name.clone(), def);
            }
        }

        if self.eat(close).is_none() {
            let delimiter = if close == TokenKind::RBrace { "}" } else { ")" };
            self.error_unclosed(delimiter, open);
        }
        values
    }

    fn parse_input_value(&mut self, name: Name) -> Option<InputValueDef> {
        self.expect(TokenKind::Colon)?;
        let (ty, _) = self.parse_type()?;
        let default_value = if self.eat(TokenKind::Equals).is_some() {
            Some(print_value(&self.parse_value(true)?))
        } else {
            None
        };
        self.parse_directives(true);
        Some(InputValueDef {
            name: name.value,
            ty,
            default_value,
        })
    }

    fn parse_enum_values(&mut self) -> Vec<String> {
        let open = self.bump().span;
        let mut values = Vec::new();
        while !self.should_stop() && !self.currently_is(TokenKind::RBrace) {
            self.skip_description();
            let Some(name) = self.expect_name() else {
                self.bump();
                continue;
            };
            self.parse_directives(true);
            values.push(name.value);
        }
        if self.eat(TokenKind::RBrace).is_none() {
            self.error_unclosed("}", open);
        }
        values
    }

    fn parse_directive_definition(&mut self) -> Option<DirectiveDef> {
        self.bump();
        self.expect(TokenKind::At)?;
        let name = self.expect_name()?;
        let args = if self.currently_is(TokenKind::LParen) {
            self.bump();
            self.parse_input_values(TokenKind::RParen)
        } else {
            IndexMap::new()
        };
        let repeatable = self.eat_keyword("repeatable").is_some();
        self.expect_keyword("on")?;
        self.eat(TokenKind::Pipe);

        let mut locations = Vec::new();
        loop {
            let location = self.expect_name()?;
            match DirectiveLocation::from_name(location.as_str()) {
                Some(loc) => locations.push(loc),
                None => self.error_at(
                    DiagnosticKind::UnexpectedToken,
                    location.span,
                    format!("`{}` is not a directive location", location.value),
                ),
            }
            if self.eat(TokenKind::Pipe).is_none() {
                break;
            }
        }

        Some(DirectiveDef {
            name: name.value,
            args,
            locations,
            repeatable,
        })
    }
}
