use super::*;
use crate::source::{Position, SourceMap};

fn single_source(text: &str) -> SourceMap {
    let mut sources = SourceMap::new();
    sources.add("a.graphql", text, Position::default());
    sources
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(SourceId::default(), DiagnosticKind::ExpectedName, Span::new(0, 5))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    let diag = &diagnostics.as_slice()[0];
    assert_eq!(diag.message(), "expected a name");
    assert_eq!(diag.code(), "85911");
}

#[test]
fn report_with_custom_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(SourceId::default(), DiagnosticKind::UnknownType, Span::new(0, 5))
        .message("Usr")
        .emit();

    insta::assert_snapshot!(diagnostics.printer().render(), @"error[85907] at 0..5: unknown type `Usr`");
}

#[test]
fn builder_with_context_and_fix() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(SourceId::default(), DiagnosticKind::UndefinedFragment, Span::new(3, 12))
        .message("UserField")
        .context("fragmentName", "UserField")
        .context("closestFragment", "UserFields")
        .fix("did you mean `UserFields`?", "UserFields")
        .emit();

    let diag = &diagnostics.as_slice()[0];
    assert_eq!(diag.code(), "85908");
    assert_eq!(diag.context()["fragmentName"], "UserField");
    assert_eq!(diag.context()["closestFragment"], "UserFields");
    assert_eq!(diag.fix().map(Fix::replacement), Some("UserFields"));
    insta::assert_snapshot!(
        diag.to_string(),
        @"error[85908] at 3..12: unknown fragment `UserField` (fix: did you mean `UserFields`?)"
    );
}

#[test]
fn codes_follow_phase() {
    assert_eq!(DiagnosticKind::LoneAnonymousOperation.code(), "85907");
    assert_eq!(DiagnosticKind::VariableInWrongPosition.code(), "85907");
    assert_eq!(DiagnosticKind::DuplicateFragmentName.code(), "85901");
    assert_eq!(DiagnosticKind::InvalidFragmentDependency.code(), "85901");
    assert_eq!(DiagnosticKind::UndefinedFragment.code(), "85908");
    assert_eq!(DiagnosticKind::MultipleRootQueries.code(), "85910");
    assert_eq!(DiagnosticKind::NonExecutableDefinition.code(), "85911");
}

#[test]
fn message_rendering() {
    assert_eq!(DiagnosticKind::UnknownType.message(None), "unknown type");
    assert_eq!(
        DiagnosticKind::UnknownType.message(Some("Usr")),
        "unknown type `Usr`"
    );
    assert_eq!(
        DiagnosticKind::ExpectedValue.message(Some("found `)`")),
        "expected a value: found `)`"
    );
    assert_eq!(
        DiagnosticKind::FieldsConflict.message(Some("whole sentence")),
        "whole sentence"
    );
}

#[test]
fn printer_with_sources() {
    let sources = single_source("hello world");
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(SourceId::default(), DiagnosticKind::UnknownType, Span::new(0, 5))
        .message("hello")
        .emit();

    let result = diagnostics.printer().sources(&sources).render();
    insta::assert_snapshot!(result, @r"
    error: unknown type `hello`
     --> a.graphql:1:1
      |
    1 | hello world
      | ^^^^^ unknown type `hello`
    ");
}

#[test]
fn printer_uses_template_line() {
    let mut sources = SourceMap::new();
    sources.add("src/pages/index.js", "query {\n  usr\n}", Position::new(12, 24));
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(SourceId::default(), DiagnosticKind::UnknownField, Span::new(10, 13))
        .message("`usr` on type `Query`")
        .fix("did you mean `user`?", "user")
        .emit();

    let result = diagnostics.printer().sources(&sources).render();
    assert!(result.contains("cannot query field `usr` on type `Query`"));
    assert!(result.contains("src/pages/index.js:13"));
    assert!(result.contains("13 |   usr"));
    assert!(result.contains("help: did you mean `user`?"));
}

#[test]
fn printer_keeps_template_columns_on_first_line() {
    let mut sources = SourceMap::new();
    sources.add("src/pages/index.js", "query {\n  usr\n}", Position::new(12, 24));
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(SourceId::default(), DiagnosticKind::UnexpectedToken, Span::new(0, 5))
        .emit();

    let result = diagnostics.printer().sources(&sources).render();
    assert!(result.contains("src/pages/index.js:12:1"));

    let errors = crate::report::ErrorReporter::new(&sources).normalize(&diagnostics);
    let location = errors[0].location.as_ref().expect("known source");
    assert_eq!((location.line, location.column), (12, 25));
}

#[test]
fn printer_related_in_other_source() {
    let mut sources = SourceMap::new();
    sources.add("a.js", "fragment F on User { id }", Position::default());
    sources.add("b.js", "fragment F on User { name }", Position::default());
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(SourceId(1), DiagnosticKind::DuplicateFragmentName, Span::new(9, 10))
        .message("F")
        .related_to(SourceId(0), Span::new(9, 10), "first defined here")
        .emit();

    let result = diagnostics.printer().sources(&sources).render();
    assert!(result.contains("there can be only one fragment named `F`"));
    assert!(result.contains("b.js:1:10"));
    assert!(result.contains("a.js"));
    assert!(result.contains("first defined here"));
}

#[test]
fn printer_colored() {
    let sources = single_source("hello");
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(SourceId::default(), DiagnosticKind::InvalidCharacter, Span::new(0, 5))
        .emit();

    let result = diagnostics.printer().sources(&sources).colored(true).render();
    assert!(result.contains("invalid character"));
    assert!(result.contains('\x1b'));
}

#[test]
fn printer_empty_diagnostics() {
    let sources = single_source("source");
    let diagnostics = Diagnostics::new();
    assert!(diagnostics.printer().sources(&sources).render().is_empty());
}

#[test]
fn printer_zero_width_span() {
    let sources = single_source("hello");
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(SourceId::default(), DiagnosticKind::ExpectedSelectionSet, Span::empty(5))
        .emit();

    let result = diagnostics.printer().sources(&sources).render();
    assert!(result.contains("expected a selection set"));
}
