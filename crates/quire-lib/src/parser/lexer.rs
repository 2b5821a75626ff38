//! Lexer for GraphQL documents.
//!
//! Produces span-based tokens without storing text; text is sliced from source only when needed.
//!
//! ## Error handling
//!
//! The lexer coalesces consecutive error characters into single `Garbage` tokens rather
//! than producing one error per character. This keeps the token stream manageable for malformed input.

use logos::Logos;

use crate::source::Span;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    #[token("!")]
    Bang,
    #[token("$")]
    Dollar,
    #[token("&")]
    Amp,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("...")]
    Spread,
    #[token(":")]
    Colon,
    #[token("=")]
    Equals,
    #[token("@")]
    At,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("|")]
    Pipe,
    #[token("}")]
    RBrace,

    #[regex(r"[_A-Za-z][_0-9A-Za-z]*")]
    Name,

    #[regex(r"-?(?:0|[1-9][0-9]*)")]
    Int,

    #[regex(r"-?(?:0|[1-9][0-9]*)(?:\.[0-9]+(?:[eE][+-]?[0-9]+)?|[eE][+-]?[0-9]+)")]
    Float,

    #[regex(r#""(?:[^"\\\n\r]|\\.)*""#, allow_greedy = true)]
    String,

    /// Opening quote with no closing quote on the same line.
    #[regex(r#""(?:[^"\\\n\r]|\\.)*"#, allow_greedy = true)]
    UnterminatedString,

    /// Triple-quoted string; may be unterminated, see [`is_terminated_block_string`].
    #[token(r#"""""#, block_string)]
    BlockString,

    #[regex(r"#[^\n\r]*", allow_greedy = true)]
    Comment,

    #[regex(r"[ \t\r\n\u{FEFF}]+")]
    Whitespace,

    /// Commas are insignificant in GraphQL.
    #[token(",")]
    Comma,

    /// Coalesced unrecognized characters.
    Garbage,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comma | Self::Comment)
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Bang => "`!`",
            Self::Dollar => "`$`",
            Self::Amp => "`&`",
            Self::LParen => "`(`",
            Self::RParen => "`)`",
            Self::Spread => "`...`",
            Self::Colon => "`:`",
            Self::Equals => "`=`",
            Self::At => "`@`",
            Self::LBracket => "`[`",
            Self::RBracket => "`]`",
            Self::LBrace => "`{`",
            Self::Pipe => "`|`",
            Self::RBrace => "`}`",
            Self::Name => "name",
            Self::Int => "integer",
            Self::Float => "float",
            Self::String | Self::UnterminatedString | Self::BlockString => "string",
            Self::Comment => "comment",
            Self::Whitespace => "whitespace",
            Self::Comma => "`,`",
            Self::Garbage => "invalid character",
        }
    }
}

/// Consumes a block string body up to and including the closing `"""`.
///
/// `\"""` inside the body is an escaped delimiter. Without a closing
/// delimiter the token extends to the end of input.
fn block_string(lex: &mut logos::Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i..].starts_with(br#"\""""#) {
            i += 4;
            continue;
        }
        if bytes[i..].starts_with(br#"""""#) {
            lex.bump(i + 3);
            return true;
        }
        i += 1;
    }
    lex.bump(rest.len());
    true
}

pub fn is_terminated_block_string(text: &str) -> bool {
    text.len() >= 6 && text.ends_with(r#"""""#) && !text.ends_with(r#"\""""#)
}

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Tokenizes source into a vector of span-based tokens.
///
/// Consecutive lexer errors are coalesced into single `Garbage` tokens.
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    let end = lexer.span().start;
                    tokens.push(Token::new(TokenKind::Garbage, Span::from(start..end)));
                }
                tokens.push(Token::new(kind, Span::from(lexer.span())));
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token::new(TokenKind::Garbage, Span::from(start..source.len())));
                }
                break;
            }
        }
    }

    tokens
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'q>(source: &'q str, token: &Token) -> &'q str {
    &source[token.span.range()]
}
