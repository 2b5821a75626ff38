//! Hand-off of diagnostics to the surrounding build.
//!
//! The compiler never prints. It normalizes diagnostics into
//! [`ReportedError`]s and passes them to a [`Reporter`], which the embedding
//! build implements: failing the build, marking a file's query as
//! unavailable, or pushing errors to a development overlay.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::diagnostics::{DiagnosticMessage, Diagnostics};
use crate::source::{Location, SourceMap};

/// Overlay channel the compiler publishes on in develop mode.
pub const OVERLAY_CHANNEL: &str = "graphql-compiler";

/// A diagnostic in the shape the build and the overlay consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedError {
    /// Machine-readable error id, e.g. `85908`.
    pub id: String,
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub message: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub context: IndexMap<String, String>,
}

/// Receiver of compilation outcomes.
pub trait Reporter {
    /// The query of `path` could not be extracted or compiled.
    fn extraction_failed(&mut self, path: &str);

    /// The batch produced at least one diagnostic.
    fn batch_failed(&mut self, errors: &[ReportedError]);

    /// Publish on an overlay channel; `None` clears what the channel shows.
    fn publish(&mut self, channel: &str, errors: Option<&[ReportedError]>);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn extraction_failed(&mut self, _path: &str) {}

    fn batch_failed(&mut self, _errors: &[ReportedError]) {}

    fn publish(&mut self, _channel: &str, _errors: Option<&[ReportedError]>) {}
}

/// Forwards everything to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn extraction_failed(&mut self, path: &str) {
        warn!(path, "query extraction failed");
    }

    fn batch_failed(&mut self, errors: &[ReportedError]) {
        warn!(errors = errors.len(), "batch failed");
        for err in errors {
            debug!(id = %err.id, file = %err.file_path, "{}", err.message);
        }
    }

    fn publish(&mut self, channel: &str, errors: Option<&[ReportedError]>) {
        match errors {
            Some(errors) => info!(channel, count = errors.len(), "publishing errors"),
            None => info!(channel, "clearing errors"),
        }
    }
}

/// Normalizes diagnostics against the batch sources.
pub struct ErrorReporter<'s> {
    sources: &'s SourceMap,
}

impl<'s> ErrorReporter<'s> {
    pub fn new(sources: &'s SourceMap) -> Self {
        Self { sources }
    }

    pub fn normalize(&self, diagnostics: &Diagnostics) -> Vec<ReportedError> {
        diagnostics.iter().map(|diag| self.convert(diag)).collect()
    }

    /// One diagnostic with its location in file coordinates.
    ///
    /// The structured context keeps the diagnostic's own entries and adds
    /// `sourceMessage`, the diagnostic rendered with surrounding source.
    pub fn convert(&self, diag: &DiagnosticMessage) -> ReportedError {
        let known = diag.source().index() < self.sources.len();
        let mut context: IndexMap<String, String> = diag
            .context()
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        if known {
            let single: Diagnostics = std::iter::once(diag.clone()).collect();
            context.insert(
                "sourceMessage".to_string(),
                single.printer().sources(self.sources).render(),
            );
        }

        ReportedError {
            id: diag.code().to_string(),
            file_path: if known {
                self.sources.path(diag.source()).to_string()
            } else {
                String::new()
            },
            location: known.then(|| self.sources.location(diag.source(), diag.span().start)),
            message: diag.message().to_string(),
            context,
        }
    }
}
