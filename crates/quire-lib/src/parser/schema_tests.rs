use indoc::indoc;
use quire_core::{DirectiveLocation, OperationKind, SchemaError, TypeKind, TypeRef};

use super::parse_schema_sdl;
use crate::Error;

#[test]
fn object_interface_union_enum_input() {
    let sdl = indoc! {r#"
    """
    Entry point.
    """
    type Query {
      "The viewer"
      me: User
      node(id: ID!): Node
      search(term: String = "x", limit: Int = 10): [SearchResult!]!
    }

    interface Node { id: ID! }

    type User implements Node & Named @key(fields: "id") {
      id: ID!
      name: String
      role: Role
    }

    interface Named { name: String }

    type Post implements Node { id: ID! }

    union SearchResult = | User | Post

    enum Role { ADMIN @deprecated MEMBER }

    input UserFilter {
      role: Role = MEMBER
      names: [String!]
    }

    scalar Date
    directive @key(fields: String!) repeatable on OBJECT | INTERFACE
    "#};

    let schema = parse_schema_sdl(sdl).expect("valid schema");

    let query = schema.root_type(OperationKind::Query).expect("query root");
    assert_eq!(query.name(), "Query");
    let search = schema.field(query, "search").expect("search field");
    assert_eq!(search.ty.to_string(), "[SearchResult!]!");
    assert_eq!(search.args["term"].default_value.as_deref(), Some("\"x\""));
    assert_eq!(search.args["limit"].default_value.as_deref(), Some("10"));

    let node = schema.get_type("Node").expect("Node");
    assert_eq!(node.kind(), TypeKind::Interface);
    assert_eq!(schema.possible_types(node), ["User", "Post"]);

    let user = schema.get_type("User").expect("User");
    assert_eq!(user.interfaces(), ["Node", "Named"]);

    let union = schema.get_type("SearchResult").expect("union");
    assert_eq!(schema.possible_types(union), ["User", "Post"]);

    let role = schema.get_type("Role").expect("enum");
    assert_eq!(role.enum_values(), Some(&["ADMIN".to_string(), "MEMBER".to_string()][..]));

    let filter = schema.get_type("UserFilter").expect("input");
    let fields = filter.input_fields().expect("input fields");
    assert_eq!(fields["role"].default_value.as_deref(), Some("MEMBER"));
    assert_eq!(
        fields["names"].ty,
        TypeRef::list(TypeRef::non_null(TypeRef::named("String")))
    );

    assert_eq!(schema.get_type("Date").map(|t| t.kind()), Some(TypeKind::Scalar));

    let key = schema.directive("key").expect("custom directive");
    assert!(key.repeatable);
    assert_eq!(
        key.locations,
        [DirectiveLocation::Object, DirectiveLocation::Interface]
    );
    assert!(schema.directive("include").is_some());
}

#[test]
fn explicit_schema_definition() {
    let sdl = indoc! {r#"
    schema { query: Root mutation: Change }
    type Root { a: Int }
    type Change { b: Int }
    "#};

    let schema = parse_schema_sdl(sdl).expect("valid schema");
    assert_eq!(
        schema.root_type(OperationKind::Query).map(|t| t.name()),
        Some("Root")
    );
    assert_eq!(
        schema.root_type(OperationKind::Mutation).map(|t| t.name()),
        Some("Change")
    );
    assert!(schema.root_type(OperationKind::Subscription).is_none());
}

#[test]
fn builtin_scalar_redeclaration_is_accepted() {
    let schema = parse_schema_sdl("scalar String\ntype Query { a: String }").expect("valid");
    assert_eq!(
        schema.get_type("String").map(|t| t.kind()),
        Some(TypeKind::Scalar)
    );
}

#[test]
fn unknown_field_type() {
    let err = parse_schema_sdl("type Query { me: Usr }").expect_err("unknown type");
    insta::assert_snapshot!(err.to_string(), @"unknown type `Usr` referenced by field `Query.me`");
}

#[test]
fn duplicate_type() {
    let err = parse_schema_sdl("type Query { a: Int }\ntype Query { b: Int }").expect_err("dup");
    assert!(matches!(err, Error::Schema(SchemaError::DuplicateType(ref name)) if name == "Query"));
}

#[test]
fn extensions_are_rejected() {
    let err = parse_schema_sdl("type Query { a: Int }\nextend type Query { b: Int }")
        .expect_err("extension");
    let Error::SchemaSyntaxError(diagnostics) = err else {
        panic!("expected a syntax error, got {err:?}");
    };
    insta::assert_snapshot!(
        diagnostics.printer().render(),
        @"error[85911] at 22..28: unexpected token: type extensions are not supported"
    );
}

#[test]
fn unknown_directive_location() {
    let err = parse_schema_sdl("type Query { a: Int }\ndirective @d on NOWHERE")
        .expect_err("bad location");
    let Error::SchemaSyntaxError(diagnostics) = err else {
        panic!("expected a syntax error, got {err:?}");
    };
    insta::assert_snapshot!(
        diagnostics.printer().render(),
        @"error[85911] at 38..45: unexpected token: `NOWHERE` is not a directive location"
    );
}

#[test]
fn executable_definition_in_schema() {
    let err = parse_schema_sdl("type Query { a: Int }\nquery Q { a }").expect_err("not sdl");
    assert!(matches!(err, Error::SchemaSyntaxError(ref d) if !d.is_empty()));
}
