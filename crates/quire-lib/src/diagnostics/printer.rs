//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Patch, Renderer, Snippet};

use super::Diagnostics;
use super::message::DiagnosticMessage;
use crate::source::{SourceMap, Span};

/// Builder for rendering diagnostics with various options.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    sources: Option<&'s SourceMap>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            sources: None,
            colored: false,
        }
    }

    /// Render against the batch sources; without them output is one line per diagnostic.
    ///
    /// Snippets start at the template line in the host file. Columns stay
    /// relative to the template text, so on its first line they differ from
    /// the host-file column in [`ReportedError`](crate::report::ReportedError).
    pub fn sources(mut self, sources: &'s SourceMap) -> Self {
        self.sources = Some(sources);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let Some(sources) = self.sources else {
            return self.format_plain(w);
        };

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            if diag.source.index() >= sources.len() {
                write!(w, "{}", diag)?;
                continue;
            }
            let report = build_report(diag, sources);
            write!(w, "{}", renderer.render(&report))?;
        }

        Ok(())
    }

    fn format_plain(&self, w: &mut impl Write) -> std::fmt::Result {
        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", diag)?;
        }
        Ok(())
    }
}

/// Only the line is shifted into the host file; see [`DiagnosticsPrinter::sources`].
fn build_report<'a>(diag: &'a DiagnosticMessage, sources: &'a SourceMap) -> Vec<Group<'a>> {
    let source = sources.content(diag.source);
    let line_start = sources.offset(diag.source).line as usize;
    let range = adjust_range(diag.span, source.len());

    let mut snippet = Snippet::source(source)
        .line_start(line_start)
        .path(sources.path(diag.source))
        .annotation(
            AnnotationKind::Primary
                .span(range.clone())
                .label(&diag.message),
        );

    for related in diag.related.iter().filter(|r| r.source == diag.source) {
        snippet = snippet.annotation(
            AnnotationKind::Context
                .span(adjust_range(related.span, source.len()))
                .label(&related.message),
        );
    }

    let mut title_group = Level::ERROR.primary_title(&diag.message).element(snippet);

    // Related spans in other files get a snippet of their own.
    for related in diag.related.iter().filter(|r| r.source != diag.source) {
        if related.source.index() >= sources.len() {
            continue;
        }
        let other = sources.content(related.source);
        title_group = title_group.element(
            Snippet::source(other)
                .line_start(sources.offset(related.source).line as usize)
                .path(sources.path(related.source))
                .annotation(
                    AnnotationKind::Context
                        .span(adjust_range(related.span, other.len()))
                        .label(&related.message),
                ),
        );
    }

    let mut report: Vec<Group> = vec![title_group];

    if let Some(fix) = &diag.fix {
        report.push(
            Level::HELP.secondary_title(&fix.description).element(
                Snippet::source(source)
                    .line_start(line_start)
                    .patch(Patch::new(range, &fix.replacement)),
            ),
        );
    }

    report
}

fn adjust_range(span: Span, limit: usize) -> std::ops::Range<usize> {
    let start = (span.start as usize).min(limit);
    let end = (span.end as usize).min(limit);

    if start == end {
        return start..(start + 1).min(limit);
    }

    start..end
}
