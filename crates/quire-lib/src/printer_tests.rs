use indoc::indoc;

use crate::parser::parse;
use crate::printer::{print_definition, print_document};

fn reprint(source: &str) -> String {
    let document = parse(source)
        .expect("no fatal error")
        .into_result()
        .expect("valid syntax");
    print_document(&document)
}

#[test]
fn shorthand_query_prints_bare_selection_set() {
    insta::assert_snapshot!(reprint("{a b{c}}"), @r"
    {
      a
      b {
        c
      }
    }
    ");
}

#[test]
fn anonymous_query_with_variables_keeps_keyword() {
    insta::assert_snapshot!(reprint("query($id:ID!){node(id:$id){id}}"), @r"
    query ($id: ID!) {
      node(id: $id) {
        id
      }
    }
    ");
}

#[test]
fn directives_fragments_and_values() {
    let input = indoc! {r#"
    query Q @live {
      list(filter: {tags: ["a", "b"], nested: {on: true}}, order: DESC, f: 1.5, nothing: null)
      ...Frag @include(if: $show)
      ... on User @skip(if: false) { name }
      ... { id }
    }
    fragment Frag on Query @tag {
      viewer { id }
    }
    "#};

    insta::assert_snapshot!(reprint(input), @r#"
    query Q @live {
      list(filter: {tags: ["a", "b"], nested: {on: true}}, order: DESC, f: 1.5, nothing: null)
      ...Frag @include(if: $show)
      ... on User @skip(if: false) {
        name
      }
      ... {
        id
      }
    }

    fragment Frag on Query @tag {
      viewer {
        id
      }
    }
    "#);
}

#[test]
fn strings_are_escaped() {
    let input = r#"{ f(a: "line\nbreak \"quoted\" \u0001", b: """block "with" quotes""") }"#;
    insta::assert_snapshot!(reprint(input), @r#"
    {
      f(a: "line\nbreak \"quoted\" \u0001", b: "block \"with\" quotes")
    }
    "#);
}

#[test]
fn formatting_does_not_change_printed_text() {
    let compact = "fragment F on User{id name}";
    let spread = indoc! {r#"
    fragment F on User {
        # a comment
        id,
        name
    }
    "#};
    assert_eq!(reprint(compact), reprint(spread));
}

#[test]
fn variable_default_and_directives() {
    let document = parse("query Q($n: Int = 3 @deprecated, $l: [String!]) { a }")
        .expect("no fatal error")
        .into_result()
        .expect("valid syntax");
    insta::assert_snapshot!(print_definition(&document.definitions[0]), @r"
    query Q($n: Int = 3 @deprecated, $l: [String!]) {
      a
    }
    ");
}
