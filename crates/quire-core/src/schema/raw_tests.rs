use indoc::indoc;

use crate::SchemaError;
use crate::schema::{DirectiveLocation, OperationKind, TypeKind, parse_schema_json};

#[test]
fn parse_minimal_schema() {
    let json = indoc! {r#"
        {
          "queryType": "Query",
          "types": [
            { "kind": "OBJECT", "name": "Query", "fields": [
              { "name": "user", "type": "User", "args": [
                { "name": "id", "type": "ID!" }
              ] }
            ] },
            { "kind": "OBJECT", "name": "User", "fields": [
              { "name": "id", "type": "ID!" },
              { "name": "role", "type": "Role" }
            ] },
            { "kind": "ENUM", "name": "Role", "values": ["ADMIN", "MEMBER"] },
            { "kind": "INPUT_OBJECT", "name": "Filter", "fields": [
              { "name": "limit", "type": "Int", "defaultValue": "10" }
            ] }
          ],
          "directives": [
            { "name": "cached", "locations": ["QUERY", "FIELD"], "isRepeatable": true }
          ]
        }
    "#};
    let schema = parse_schema_json(json).unwrap();

    let query = schema.root_type(OperationKind::Query).unwrap();
    let user_field = schema.field(query, "user").unwrap();
    assert_eq!(user_field.ty.to_string(), "User");
    assert_eq!(user_field.args["id"].ty.to_string(), "ID!");

    let role = schema.get_type("Role").unwrap();
    assert_eq!(role.kind(), TypeKind::Enum);
    assert_eq!(role.enum_values().unwrap(), ["ADMIN", "MEMBER"]);

    let filter = schema.get_type("Filter").unwrap();
    let limit = &filter.input_fields().unwrap()["limit"];
    assert_eq!(limit.default_value.as_deref(), Some("10"));

    let cached = schema.directive("cached").unwrap();
    assert!(cached.repeatable);
    assert_eq!(
        cached.locations,
        [DirectiveLocation::Query, DirectiveLocation::Field]
    );
    // built-ins survive user directives
    assert!(schema.directive("skip").is_some());
}

#[test]
fn malformed_json_is_json_error() {
    let err = parse_schema_json("{ \"types\": 3 }").unwrap_err();
    assert!(matches!(err, SchemaError::Json(_)));
}

#[test]
fn bad_type_reference_reported() {
    let json = r#"{ "types": [ { "kind": "OBJECT", "name": "Query", "fields": [ { "name": "x", "type": "[Int" } ] } ] }"#;
    let err = parse_schema_json(json).unwrap_err();
    assert_eq!(err.to_string(), "invalid type reference `[Int`");
}
