//! Parser infrastructure for GraphQL documents and schema SDL.
//!
//! # Architecture
//!
//! This parser produces an owned AST directly:
//! 1. Lexer (`lexer.rs`) tokenizes source into span-based tokens
//! 2. Parser (`core.rs`) tracks position, fuel and diagnostics
//! 3. Grammar productions (`grammar.rs`, `schema.rs`) build AST nodes
//!
//! # Recovery Strategy
//!
//! The parser is resilient: it always produces a document. Errors are
//! collected and parsing continues at the next definition boundary.

mod core;
mod grammar;
pub mod lexer;
mod schema;
mod strings;

#[cfg(test)]
mod grammar_tests;
#[cfg(test)]
mod schema_tests;

pub use core::Parser;
pub use lexer::{Token, TokenKind, lex, token_text};

use quire_core::Schema;

use crate::ast::Document;
use crate::config::ParseLimits;
use crate::diagnostics::Diagnostics;
use crate::{Error, Result};

#[derive(Debug)]
pub struct ParseResult {
    pub document: Document,
    pub diagnostics: Diagnostics,
    pub exec_fuel_consumed: u32,
}

impl ParseResult {
    /// The document, or every syntax error if there was any.
    pub fn into_result(self) -> Result<Document> {
        if self.diagnostics.is_empty() {
            Ok(self.document)
        } else {
            Err(Error::SyntaxError(self.diagnostics))
        }
    }
}

/// Parse an executable document with default limits.
pub fn parse(source: &str) -> Result<ParseResult> {
    parse_with_limits(source, ParseLimits::default())
}

pub fn parse_with_limits(source: &str, limits: ParseLimits) -> Result<ParseResult> {
    let mut parser = Parser::new(source, lex(source)).with_limits(limits);
    let document = parser.parse_document();
    let (diagnostics, exec_fuel_consumed) = parser.finish()?;
    Ok(ParseResult {
        document,
        diagnostics,
        exec_fuel_consumed,
    })
}

/// Parse schema SDL and build a [`Schema`], built-ins included.
pub fn parse_schema_sdl(source: &str) -> Result<Schema> {
    let mut parser = Parser::new(source, lex(source)).with_limits(ParseLimits::default());
    let builder = parser.parse_schema_document();
    let (diagnostics, _) = parser.finish()?;
    if !diagnostics.is_empty() {
        return Err(Error::SchemaSyntaxError(diagnostics));
    }
    Ok(builder?.build()?)
}
