//! Parser state machine and low-level operations.

use super::lexer::{Token, TokenKind, token_text};
use crate::Error;
use crate::ast::Name;
use crate::config::ParseLimits;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::source::{SourceId, Span};

/// Trivia tokens are skipped; every other token is consumed through [`Parser::bump`].
pub struct Parser<'src> {
    pub(super) source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    pub(super) diagnostics: Diagnostics,
    depth: u32,
    last_diagnostic_pos: Option<u32>,
    exec_fuel_initial: Option<u32>,
    exec_fuel_remaining: Option<u32>,
    recursion_fuel_limit: Option<u32>,
    fatal_error: Option<Error>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        let tokens = tokens.into_iter().filter(|t| !t.kind.is_trivia()).collect();
        Self {
            source,
            tokens,
            pos: 0,
            diagnostics: Diagnostics::new(),
            depth: 0,
            last_diagnostic_pos: None,
            exec_fuel_initial: None,
            exec_fuel_remaining: None,
            recursion_fuel_limit: None,
            fatal_error: None,
        }
    }

    pub fn with_limits(mut self, limits: ParseLimits) -> Self {
        self.exec_fuel_initial = limits.exec_fuel;
        self.exec_fuel_remaining = limits.exec_fuel;
        self.recursion_fuel_limit = limits.recursion_fuel;
        self
    }

    /// Consume the parser, yielding diagnostics and consumed exec fuel, or the fatal error.
    pub(super) fn finish(self) -> Result<(Diagnostics, u32), Error> {
        if let Some(err) = self.fatal_error {
            return Err(err);
        }
        let exec_fuel_consumed = match (self.exec_fuel_initial, self.exec_fuel_remaining) {
            (Some(initial), Some(remaining)) => initial.saturating_sub(remaining),
            _ => 0,
        };
        Ok((self.diagnostics, exec_fuel_consumed))
    }

    pub(super) fn has_fatal_error(&self) -> bool {
        self.fatal_error.is_some()
    }

    pub(super) fn eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(super) fn should_stop(&self) -> bool {
        self.eof() || self.has_fatal_error()
    }

    pub(super) fn current(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    pub(super) fn currently_is(&self, kind: TokenKind) -> bool {
        self.current() == Some(kind)
    }

    pub(super) fn current_text(&self) -> &'src str {
        self.tokens
            .get(self.pos)
            .map_or("", |t| token_text(self.source, t))
    }

    /// Current token is a name with exactly this text.
    pub(super) fn at_keyword(&self, keyword: &str) -> bool {
        self.currently_is(TokenKind::Name) && self.current_text() == keyword
    }

    pub(super) fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map_or_else(|| Span::empty(self.eof_offset()), |t| t.span)
    }

    pub(super) fn eof_offset(&self) -> u32 {
        self.source.len() as u32
    }

    /// End of the last consumed token.
    pub(super) fn last_end(&self) -> u32 {
        self.pos
            .checked_sub(1)
            .and_then(|p| self.tokens.get(p))
            .map_or(0, |t| t.span.end)
    }

    fn consume_exec_fuel(&mut self) {
        if let Some(ref mut remaining) = self.exec_fuel_remaining {
            if *remaining == 0 {
                if self.fatal_error.is_none() {
                    self.fatal_error = Some(Error::ExecFuelExhausted);
                }
                return;
            }
            *remaining -= 1;
        }
    }

    /// Consume the current token and return it.
    pub(super) fn bump(&mut self) -> Token {
        self.consume_exec_fuel();
        let token = self.tokens.get(self.pos).copied().unwrap_or(Token::new(
            TokenKind::Garbage,
            Span::empty(self.eof_offset()),
        ));
        if !self.eof() {
            self.pos += 1;
        }
        token
    }

    pub(super) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.currently_is(kind) {
            Some(self.bump())
        } else {
            None
        }
    }

    pub(super) fn eat_keyword(&mut self, keyword: &str) -> Option<Token> {
        if self.at_keyword(keyword) {
            Some(self.bump())
        } else {
            None
        }
    }

    /// On mismatch: emit diagnostic but don't consume.
    pub(super) fn expect(&mut self, kind: TokenKind) -> Option<Token> {
        if let Some(token) = self.eat(kind) {
            return Some(token);
        }
        self.error_msg(
            DiagnosticKind::UnexpectedToken,
            format!("expected {}, found {}", kind.describe(), self.found()),
        );
        None
    }

    pub(super) fn expect_keyword(&mut self, keyword: &str) -> Option<Token> {
        if let Some(token) = self.eat_keyword(keyword) {
            return Some(token);
        }
        self.error_msg(
            DiagnosticKind::UnexpectedToken,
            format!("expected `{keyword}`, found {}", self.found()),
        );
        None
    }

    pub(super) fn expect_name(&mut self) -> Option<Name> {
        if self.currently_is(TokenKind::Name) {
            let text = self.current_text();
            let token = self.bump();
            return Some(Name::new(text, token.span));
        }
        self.error_msg(
            DiagnosticKind::ExpectedName,
            format!("found {}", self.found()),
        );
        None
    }

    /// Human-readable description of the current token for error messages.
    pub(super) fn found(&self) -> String {
        match self.current() {
            None => "end of input".to_string(),
            Some(TokenKind::Name) => format!("`{}`", self.current_text()),
            Some(kind) => kind.describe().to_string(),
        }
    }

    fn should_report(&mut self, pos: u32) -> bool {
        if self.last_diagnostic_pos == Some(pos) {
            return false;
        }
        self.last_diagnostic_pos = Some(pos);
        true
    }

    pub(super) fn error(&mut self, kind: DiagnosticKind) {
        let span = self.current_span();
        if !self.should_report(span.start) {
            return;
        }
        self.diagnostics
            .report(SourceId::default(), kind, span)
            .emit();
    }

    pub(super) fn error_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(kind, span, message);
    }

    pub(super) fn error_at(&mut self, kind: DiagnosticKind, span: Span, message: impl Into<String>) {
        if !self.should_report(span.start) {
            return;
        }
        self.diagnostics
            .report(SourceId::default(), kind, span)
            .message(message)
            .emit();
    }

    pub(super) fn error_and_bump(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.error_msg(kind, message);
        self.bump();
    }

    pub(super) fn error_unclosed(&mut self, close: &str, open: Span) {
        let current = self.current_span();
        if !self.should_report(current.start) {
            return;
        }
        self.diagnostics
            .report(SourceId::default(), DiagnosticKind::UnclosedDelimiter, current)
            .message(close)
            .related_to(SourceId::default(), open, "opened here")
            .emit();
    }

    pub(super) fn enter_recursion(&mut self) -> bool {
        if let Some(limit) = self.recursion_fuel_limit
            && self.depth >= limit
        {
            if self.fatal_error.is_none() {
                self.fatal_error = Some(Error::RecursionLimitExceeded);
            }
            return false;
        }
        self.depth += 1;
        true
    }

    pub(super) fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
