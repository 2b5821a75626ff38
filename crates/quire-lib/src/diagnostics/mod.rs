mod message;
mod printer;

#[cfg(test)]
mod tests;

pub use message::{DiagnosticKind, DiagnosticMessage, DiagnosticPhase, Fix, RelatedInfo};
pub use printer::DiagnosticsPrinter;

use crate::source::{SourceId, Span};

/// Collection of diagnostic messages from parsing, validation and compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Create a diagnostic with the given kind and span.
    ///
    /// Uses the kind's default message. Call `.message()` on the builder to override.
    pub fn report(
        &mut self,
        source: SourceId,
        kind: DiagnosticKind,
        span: Span,
    ) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::with_default_message(source, kind, span),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[DiagnosticMessage] {
        &self.messages
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.messages.iter().filter(|d| d.kind == kind).count()
    }

    pub fn has_source(&self, source: SourceId) -> bool {
        self.messages.iter().any(|d| d.source == source)
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }
}

impl FromIterator<DiagnosticMessage> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = DiagnosticMessage>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Diagnostics {
    type Item = DiagnosticMessage;
    type IntoIter = std::vec::IntoIter<DiagnosticMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a DiagnosticMessage;
    type IntoIter = std::slice::Iter<'a, DiagnosticMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl<'a> DiagnosticBuilder<'a> {
    /// Provide custom detail for this diagnostic, rendered using the kind's template.
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        let detail = msg.into();
        self.message.message = self.message.kind.message(Some(&detail));
        self
    }

    pub fn related_to(mut self, source: SourceId, span: Span, msg: impl Into<String>) -> Self {
        self.message
            .related
            .push(RelatedInfo::new(source, span, msg));
        self
    }

    pub fn fix(mut self, description: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.message.fix = Some(Fix::new(replacement, description));
        self
    }

    /// Attach a structured detail, e.g. `("fragmentName", "UserFields")`.
    pub fn context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.message.context.insert(key, value.into());
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}
