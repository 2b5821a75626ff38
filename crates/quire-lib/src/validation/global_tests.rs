use indexmap::IndexSet;

use crate::source::SourceId;
use crate::test_utils::global;
use crate::validation::GlobalValidation;

fn render(result: &GlobalValidation) -> String {
    result.diagnostics.printer().render()
}

fn errors(texts: &[&str]) -> String {
    render(&global(texts))
}

#[test]
fn valid_batch_passes() {
    let result = global(&[
        "query Profile($id: ID!) { user(id: $id) { ...UserFields } }",
        "query Feed { posts { id author { ...UserFields } } }",
        "fragment UserFields on User { id name @skip(if: false) friends(first: 3) { id } }",
    ]);

    assert_eq!(render(&result), "");
    assert!(result.rejected_operations.is_empty());
    assert!(result.tainted_fragments.is_empty());
}

#[test]
fn duplicate_operation_names_across_files() {
    let result = global(&["query A { me { id } }", "query A { me { name } }"]);

    insta::assert_snapshot!(
        render(&result),
        @"error[85901] at 6..7: there can be only one operation named `A` (related: first defined here at 6..7)"
    );
    assert_eq!(result.diagnostics.as_slice()[0].source(), SourceId(1));
    assert_eq!(result.rejected_operations, IndexSet::from([1]));
}

#[test]
fn subscription_with_two_root_fields() {
    insta::assert_snapshot!(
        errors(&["subscription S { postAdded { id } userJoined { id } }"]),
        @"error[85901] at 34..51: subscription `S` must select only one top-level field"
    );
}

#[test]
fn aliased_subscription_root_fields() {
    insta::assert_snapshot!(
        errors(&["subscription { postAdded { id } again: postAdded { title } }"]),
        @"error[85901] at 32..58: anonymous subscription must select only one top-level field"
    );
}

#[test]
fn unknown_field_is_suggested() {
    insta::assert_snapshot!(
        errors(&["{ me { nme } }"]),
        @"error[85901] at 7..10: cannot query field `nme` on type `User` (fix: did you mean `name`?)"
    );
}

#[test]
fn conflicting_fragment_definitions() {
    let result = global(&[
        "fragment F on User { id }",
        "fragment F on User { name }",
        "query Q { me { ...F } }",
    ]);

    insta::assert_snapshot!(
        render(&result),
        @"error[85901] at 9..10: there can be only one fragment named `F` (related: first defined here at 9..10)"
    );
    assert!(result.is_tainted("F"));
    assert!(!result.is_rejected(0));
}

#[test]
fn fragment_cycle() {
    let result = global(&["fragment A on User { ...B }\nfragment B on User { ...A }"]);

    insta::assert_snapshot!(
        render(&result),
        @"error[85901] at 21..25: cannot spread fragment `A` within itself (related: spreads `A` at 49..53)"
    );
    assert!(result.is_tainted("A"));
    assert!(result.is_tainted("B"));
}

#[test]
fn duplicate_variable() {
    insta::assert_snapshot!(
        errors(&["query Q($a: Int, $a: Int) { me { friends(first: $a) { id } } }"]),
        @"error[85901] at 17..19: there can be only one variable named `$a` (related: first defined here at 8..10)"
    );
}

#[test]
fn undefined_variable() {
    let result = global(&["query Q { user(id: $id) { id } }"]);

    insta::assert_snapshot!(
        render(&result),
        @"error[85901] at 19..22: variable `$id` is not defined by operation `Q` (related: operation defined here at 0..7)"
    );
    assert!(result.is_rejected(0));
}

#[test]
fn undefined_variable_inside_fragment_rejects_only_the_operation() {
    let result = global(&[
        "query Q { ...F }",
        "fragment F on Query { user(id: $id) { id } }",
    ]);

    insta::assert_snapshot!(
        render(&result),
        @"error[85901] at 31..34: variable `$id` is not defined by operation `Q` (related: operation defined here at 0..7)"
    );
    assert_eq!(result.diagnostics.as_slice()[0].source(), SourceId(1));
    assert!(result.is_rejected(0));
    assert!(!result.is_tainted("F"));
}

#[test]
fn variable_used_only_through_fragment() {
    let result = global(&[
        "query Q($id: ID!) { ...F }",
        "fragment F on Query { user(id: $id) { id } }",
    ]);

    assert_eq!(render(&result), "");
}

#[test]
fn unused_variable() {
    insta::assert_snapshot!(
        errors(&["query Q($id: ID!) { me { id } }"]),
        @"error[85901] at 8..11: variable `$id` is never used in operation `Q`"
    );
}

#[test]
fn unknown_directive_is_suggested() {
    insta::assert_snapshot!(
        errors(&["{ me @liv { id } }"]),
        @"error[85901] at 6..9: unknown directive `@liv` (fix: did you mean `live`?)"
    );
}

#[test]
fn misplaced_directive() {
    insta::assert_snapshot!(
        errors(&["{ me @live { id } }"]),
        @"error[85901] at 5..10: directive `@live` may not be used on FIELD"
    );
}

#[test]
fn repeated_directive() {
    insta::assert_snapshot!(
        errors(&["{ me @skip(if: true) @skip(if: false) { id } }"]),
        @"error[85901] at 21..37: directive `@skip` is used more than once here (related: first used here at 5..20)"
    );
}

#[test]
fn repeatable_directive() {
    assert_eq!(
        errors(&[r#"{ me @tag(name: "a") @tag(name: "b") { id } }"#]),
        ""
    );
}

#[test]
fn unknown_and_missing_arguments() {
    insta::assert_snapshot!(
        errors(&["{ user(idd: 1) { id } }"]),
        @r"
    error[85901] at 7..10: unknown argument `idd` on field `Query.user` (fix: did you mean `id`?)
    error[85901] at 2..21: field `user` argument `id` of type `ID!` is required, but it was not provided
    "
    );
}

#[test]
fn duplicate_argument() {
    insta::assert_snapshot!(
        errors(&["{ user(id: 1, id: 2) { id } }"]),
        @"error[85901] at 14..16: there can be only one argument named `id` (related: first provided here at 7..9)"
    );
}

#[test]
fn directive_missing_required_argument() {
    insta::assert_snapshot!(
        errors(&["{ me @include { id } }"]),
        @"error[85901] at 5..13: directive `@include` argument `if` of type `Boolean!` is required, but it was not provided"
    );
}

#[test]
fn alias_hides_a_different_field() {
    insta::assert_snapshot!(
        errors(&["{ me { name: email name } }"]),
        @"error[85901] at 19..23: fields `name` conflict because `email` and `name` are different fields; use different aliases on the fields to fetch both if this was intentional (related: conflicts with this field at 7..18)"
    );
}

#[test]
fn same_field_with_differing_arguments() {
    insta::assert_snapshot!(
        errors(&["{ me { friends(first: 1) { id } friends(first: 2) { id } } }"]),
        @"error[85901] at 32..56: fields `friends` conflict because they have differing arguments; use different aliases on the fields to fetch both if this was intentional (related: conflicts with this field at 7..31)"
    );
}

#[test]
fn exclusive_parents_still_need_compatible_types() {
    insta::assert_snapshot!(
        errors(&["{ node(id: 1) { ... on User { title: name } ... on Post { title } } }"]),
        @"error[85901] at 58..63: fields `title` conflict because they return conflicting types `String` and `String!`; use different aliases on the fields to fetch both if this was intentional (related: conflicts with this field at 30..41)"
    );
    assert_eq!(
        errors(&["{ node(id: 1) { ... on User { key: id } ... on Post { key: id } } }"]),
        ""
    );
}

#[test]
fn conflicting_subfields() {
    insta::assert_snapshot!(
        errors(&["{ me { friends { id } friends { id: name } } }"]),
        @"error[85901] at 22..42: fields `friends` conflict because subfields `id` conflict because `id` and `name` are different fields; use different aliases on the fields to fetch both if this was intentional (related: conflicts with this field at 7..21)"
    );
}

#[test]
fn conflict_in_shared_fragment_is_reported_once() {
    let result = global(&[
        "query A { me { ...F } }",
        "query B { me { ...F } }",
        "fragment F on User { name: email name }",
    ]);

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics.as_slice()[0].source(), SourceId(2));
    assert!(result.is_rejected(0));
    assert!(result.is_rejected(1));
    assert!(result.is_tainted("F"));
}

#[test]
fn duplicate_input_field() {
    insta::assert_snapshot!(
        errors(&["{ posts(filter: {authorId: 1, authorId: 2}) { id } }"]),
        @"error[85901] at 30..38: there can be only one input field named `authorId` (related: first provided here at 17..25)"
    );
}

#[test]
fn only_offending_operations_are_rejected() {
    let result = global(&[
        "query Good { me { id } }",
        "query Bad { me { nme } }",
        "query AlsoGood { me { name } }",
    ]);

    assert_eq!(result.rejected_operations, IndexSet::from([1]));
}
