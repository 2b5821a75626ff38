use indoc::indoc;
use quire_core::{OperationKind, TypeRef};

use super::{ParseResult, parse, parse_with_limits};
use crate::Error;
use crate::ast::{Definition, Selection, ValueKind};
use crate::config::ParseLimits;
use crate::diagnostics::DiagnosticKind;
use crate::printer::print_document;

fn parse_ok(source: &str) -> ParseResult {
    let result = parse(source).expect("no fatal error");
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics:\n{}",
        result.diagnostics.printer().render()
    );
    result
}

fn errors(source: &str) -> String {
    let result = parse(source).expect("no fatal error");
    assert!(!result.diagnostics.is_empty(), "expected diagnostics");
    result.diagnostics.printer().render()
}

#[test]
fn named_query_with_variables() {
    let input = indoc! {r#"
    query UserPage($id: ID!, $first: Int = 10) @live {
      user(id: $id) {
        name
        friends(first: $first) { edges { node { id } } }
      }
    }
    "#};

    let result = parse_ok(input);
    let op = result.document.operations().next().expect("one operation");
    assert_eq!(op.kind, OperationKind::Query);
    assert_eq!(op.display_name(), "UserPage");
    assert_eq!(op.variables.len(), 2);
    assert_eq!(op.variables[0].variable.as_str(), "id");
    assert_eq!(op.variables[0].ty, TypeRef::non_null(TypeRef::named("ID")));
    assert_eq!(
        op.variables[1].default_value.as_ref().map(|v| &v.kind),
        Some(&ValueKind::Int("10".into()))
    );
    assert_eq!(op.directives[0].name.as_str(), "live");
}

#[test]
fn variable_span_includes_dollar() {
    let input = "query Q($id: ID) { a }";
    let result = parse_ok(input);
    let op = result.document.operations().next().expect("operation");
    let var = &op.variables[0];
    assert_eq!(&input[var.variable.span.range()], "$id");
    assert_eq!(&input[var.ty_span.range()], "ID");
}

#[test]
fn shorthand_query() {
    let result = parse_ok("{ hello }");
    let op = result.document.operations().next().expect("operation");
    assert_eq!(op.kind, OperationKind::Query);
    assert!(op.name.is_none());
    assert_eq!(op.display_name(), "<anonymous>");
    assert_eq!(op.head_span().range(), 0..1);
}

#[test]
fn fragments_and_inline_fragments() {
    let input = indoc! {r#"
    fragment Avatar on User @include(if: true) {
      avatar: picture(size: 64)
      ... on Admin { level }
      ... @skip(if: false) { id }
      ...Other
    }
    "#};

    let result = parse_ok(input);
    let frag = result.document.fragments().next().expect("fragment");
    assert_eq!(frag.name.as_str(), "Avatar");
    assert_eq!(frag.type_condition.as_str(), "User");

    let selections = &frag.selection_set.selections;
    assert_eq!(selections.len(), 4);
    let Selection::Field(field) = &selections[0] else {
        panic!("expected a field");
    };
    assert_eq!(field.response_key(), "avatar");
    assert_eq!(field.name.as_str(), "picture");
    assert!(matches!(
        &selections[1],
        Selection::InlineFragment(inline) if inline.type_condition.as_ref().map(|n| n.as_str()) == Some("Admin")
    ));
    assert!(matches!(
        &selections[2],
        Selection::InlineFragment(inline) if inline.type_condition.is_none()
    ));
    assert!(matches!(&selections[3], Selection::FragmentSpread(s) if s.name.as_str() == "Other"));
}

#[test]
fn fragment_spreads_in_document_order() {
    let input = "{ a { ...One ... on T { ...Two } } ...Three }";
    let result = parse_ok(input);
    let op = result.document.operations().next().expect("operation");
    let names: Vec<_> = op
        .selection_set
        .fragment_spreads()
        .into_iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, ["One", "Two", "Three"]);
}

#[test]
fn values() {
    let input = r#"{ f(a: [1, 2.5, "s", true, null, RED], b: {x: $v, y: {z: []}}, c: """block""") }"#;
    let result = parse_ok(input);
    let op = result.document.operations().next().expect("operation");
    let Selection::Field(field) = &op.selection_set.selections[0] else {
        panic!("expected a field");
    };

    let ValueKind::List(items) = &field.arguments[0].value.kind else {
        panic!("expected a list");
    };
    assert_eq!(
        items.iter().map(|v| v.kind.clone()).collect::<Vec<_>>(),
        vec![
            ValueKind::Int("1".into()),
            ValueKind::Float("2.5".into()),
            ValueKind::String("s".into()),
            ValueKind::Boolean(true),
            ValueKind::Null,
            ValueKind::Enum("RED".into()),
        ]
    );

    let vars = field.arguments[1].value.variables();
    assert_eq!(vars.len(), 1);
    assert_eq!(vars[0].0, "v");

    assert_eq!(
        field.arguments[2].value.kind,
        ValueKind::String("block".into())
    );
}

#[test]
fn mutation_and_subscription_keywords() {
    let result = parse_ok("mutation M { a } subscription S { b }");
    let kinds: Vec<_> = result.document.operations().map(|op| op.kind).collect();
    assert_eq!(kinds, [OperationKind::Mutation, OperationKind::Subscription]);
}

#[test]
fn printed_document_is_canonical() {
    let input = "query Q($a:Int=1){x:f(a:$a,b:[1,2]){id ...F}} fragment F on T{id}";
    let result = parse_ok(input);
    insta::assert_snapshot!(print_document(&result.document), @r"
    query Q($a: Int = 1) {
      x: f(a: $a, b: [1, 2]) {
        id
        ...F
      }
    }

    fragment F on T {
      id
    }
    ");
}

#[test]
fn empty_document() {
    insta::assert_snapshot!(errors("   # only a comment"), @"error[85911] at 19..19: expected an operation or fragment definition");
}

#[test]
fn empty_selection_set() {
    insta::assert_snapshot!(errors("{ }"), @"error[85911] at 0..3: expected a selection set: selection sets cannot be empty");
}

#[test]
fn unclosed_selection_set() {
    insta::assert_snapshot!(errors("query Q { a"), @"error[85911] at 11..11: missing closing `}` (related: opened here at 8..9)");
}

#[test]
fn missing_fragment_type_condition() {
    insta::assert_snapshot!(errors("fragment F User { id }"), @"error[85911] at 11..15: unexpected token: expected `on`, found `User`");
}

#[test]
fn fragment_named_on() {
    insta::assert_snapshot!(errors("fragment on on T { id }"), @"error[85911] at 9..11: expected a name: fragments cannot be named `on`");
}

#[test]
fn variables_in_const_position() {
    insta::assert_snapshot!(
        errors("query Q($a: Int = $b) { f }"),
        @"error[85911] at 18..20: unexpected token: variables are not allowed in constant values"
    );
}

#[test]
fn invalid_escape() {
    insta::assert_snapshot!(
        errors(r#"{ f(a: "\q") }"#),
        @r#"error[85911] at 7..11: unexpected token: invalid escape sequence `\q`"#
    );
}

#[test]
fn invalid_character() {
    insta::assert_snapshot!(errors("^ { a }"), @"error[85911] at 0..1: invalid character: not valid in GraphQL");
}

#[test]
fn type_system_definition_is_rejected() {
    let input = indoc! {r#"
    type User { id: ID }
    query Q { a }
    "#};

    let result = parse(input).expect("no fatal error");
    assert_eq!(
        result
            .diagnostics
            .count_of(DiagnosticKind::NonExecutableDefinition),
        1
    );
    insta::assert_snapshot!(
        result.diagnostics.printer().render(),
        @"error[85911] at 0..20: `type` definitions describe a schema and cannot appear in a query document"
    );
    // Parsing continues after the rejected definition.
    assert_eq!(result.document.operations().count(), 1);
}

#[test]
fn recovers_at_next_definition() {
    let input = indoc! {r#"
    fragment Broken on { a }
    query Fine { b }
    "#};

    let result = parse(input).expect("no fatal error");
    assert!(!result.diagnostics.is_empty());
    let names: Vec<_> = result
        .document
        .definitions
        .iter()
        .filter_map(Definition::name)
        .map(|n| n.as_str().to_string())
        .collect();
    assert!(names.contains(&"Fine".to_string()));
}

#[test]
fn into_result_returns_syntax_error() {
    let err = parse("{ }")
        .expect("no fatal error")
        .into_result()
        .expect_err("syntax error");
    assert!(matches!(err, Error::SyntaxError(ref d) if d.len() == 1));
    assert_eq!(err.code(), Some("85911"));
}

#[test]
fn recursion_limit() {
    let depth = 20;
    let input = format!("{}{}", "{ a ".repeat(depth), "}".repeat(depth));
    let limits = ParseLimits::default().with_recursion_fuel(Some(5));
    let err = parse_with_limits(&input, limits).expect_err("too deep");
    assert!(matches!(err, Error::RecursionLimitExceeded));
}

#[test]
fn exec_fuel_limit() {
    let limits = ParseLimits::default().with_exec_fuel(Some(3));
    let err = parse_with_limits("query Q { a b c d e }", limits).expect_err("out of fuel");
    assert!(matches!(err, Error::ExecFuelExhausted));
}

#[test]
fn exec_fuel_is_reported() {
    let result = parse("{ a }").expect("no fatal error");
    assert_eq!(result.exec_fuel_consumed, 3);
}
