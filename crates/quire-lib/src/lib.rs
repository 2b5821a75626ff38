//! Quire: validating compiler for GraphQL queries embedded across a source tree.
//!
//! # Example
//!
//! ```
//! use quire_lib::compile::Compiler;
//! use quire_lib::config::CompilerConfig;
//! use quire_lib::parser::parse_schema_sdl;
//! use quire_lib::report::NullReporter;
//! use quire_lib::source::RawDocument;
//!
//! let schema = parse_schema_sdl("type Query { hello: String }").expect("valid schema");
//! let doc = RawDocument::parse("src/pages/index.js", "query Hello { hello }").expect("parses");
//!
//! let compiler = Compiler::new(&schema, CompilerConfig::default());
//! let output = compiler.compile(&[doc], &mut NullReporter).expect("no fatal error");
//! assert_eq!(output.queries["src/pages/index.js"].text, "query Hello {\n  hello\n}");
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod ast;
pub mod compile;
pub mod config;
pub mod diagnostics;
pub mod parser;
pub mod printer;
pub mod report;
pub mod source;
pub mod validation;

#[cfg(test)]
mod printer_tests;
#[cfg(test)]
pub(crate) mod test_utils;

pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter};
pub use quire_core::{Schema, SchemaError};

/// Errors that stop a parse or a compilation run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Execution fuel exhausted (too many parser operations).
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    /// Recursion fuel exhausted (input nested too deeply).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error("query parsing failed with {} errors", .0.len())]
    SyntaxError(Diagnostics),

    #[error("schema parsing failed with {} errors", .0.len())]
    SchemaSyntaxError(Diagnostics),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A hook query was found while building for a runtime without hook support.
    #[error(
        "`{path}` uses a static query hook, which requires a runtime with hook support; \
         upgrade the runtime or replace the hook with a static query"
    )]
    UnsupportedHookRuntime { path: String },
}

impl Error {
    /// Machine-readable id for errors that surface to users of the build.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::SyntaxError(_) | Self::SchemaSyntaxError(_) => Some("85911"),
            Self::UnsupportedHookRuntime { .. } => Some("85920"),
            _ => None,
        }
    }
}

/// Result type for parsing and compilation.
pub type Result<T> = std::result::Result<T, Error>;
