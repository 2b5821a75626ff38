use indexmap::IndexMap;

use crate::SchemaError;
use crate::schema::{
    DirectiveLocation, FieldDef, InputValueDef, OperationKind, Schema, SchemaBuilder, TypeDef,
    TypeRef,
};

fn fields(defs: impl IntoIterator<Item = FieldDef>) -> IndexMap<String, FieldDef> {
    defs.into_iter().map(|f| (f.name.clone(), f)).collect()
}

fn object(name: &str, defs: Vec<FieldDef>, interfaces: &[&str]) -> TypeDef {
    TypeDef::Object {
        name: name.to_string(),
        fields: fields(defs),
        interfaces: interfaces.iter().map(|s| s.to_string()).collect(),
    }
}

fn sample() -> Schema {
    let mut builder = SchemaBuilder::new();
    builder
        .add_type(TypeDef::Interface {
            name: "Node".into(),
            fields: fields([FieldDef::new("id", TypeRef::non_null(TypeRef::named("ID")))]),
            interfaces: vec![],
        })
        .unwrap()
        .add_type(object(
            "User",
            vec![
                FieldDef::new("id", TypeRef::non_null(TypeRef::named("ID"))),
                FieldDef::new("name", TypeRef::named("String")),
            ],
            &["Node"],
        ))
        .unwrap()
        .add_type(object(
            "Post",
            vec![FieldDef::new("id", TypeRef::non_null(TypeRef::named("ID")))],
            &["Node"],
        ))
        .unwrap()
        .add_type(object("Comment", vec![], &[]))
        .unwrap()
        .add_type(TypeDef::Union {
            name: "Feed".into(),
            members: vec!["Post".into(), "Comment".into()],
        })
        .unwrap()
        .add_type(object(
            "Query",
            vec![
                FieldDef::new("node", TypeRef::named("Node"))
                    .with_arg(InputValueDef::new("id", TypeRef::non_null(TypeRef::named("ID")))),
            ],
            &[],
        ))
        .unwrap();
    builder.build().unwrap()
}

#[test]
fn builtins_are_present() {
    let schema = Schema::builder().build().unwrap();
    for name in ["Int", "Float", "String", "Boolean", "ID"] {
        assert!(schema.get_type(name).is_some_and(TypeDef::is_leaf), "{name}");
    }
    for name in ["include", "skip", "deprecated"] {
        assert!(schema.directive(name).is_some(), "{name}");
    }
    let include = schema.directive("include").unwrap();
    assert!(include.args["if"].is_required());
    assert!(include.locations.contains(&DirectiveLocation::InlineFragment));
}

#[test]
fn conventional_root_names() {
    let schema = sample();
    assert_eq!(schema.root_type(OperationKind::Query).unwrap().name(), "Query");
    assert!(schema.root_type(OperationKind::Mutation).is_none());
}

#[test]
fn explicit_root_must_exist() {
    let mut builder = SchemaBuilder::new();
    builder.query_type("Root");
    let err = builder.build().unwrap_err();
    assert!(matches!(err, SchemaError::UnknownType { ref name, .. } if name == "Root"));
}

#[test]
fn root_must_be_object() {
    let mut builder = SchemaBuilder::new();
    builder.query_type("String");
    let err = builder.build().unwrap_err();
    assert!(matches!(err, SchemaError::InvalidRootType(ref name) if name == "String"));
}

#[test]
fn duplicate_type_rejected() {
    let mut builder = SchemaBuilder::new();
    builder.add_type(object("User", vec![], &[])).unwrap();
    let err = builder.add_type(object("User", vec![], &[])).unwrap_err();
    assert_eq!(err.to_string(), "type `User` is defined more than once");
}

#[test]
fn builtin_scalar_redeclaration_accepted() {
    let mut builder = SchemaBuilder::new();
    builder
        .add_type(TypeDef::Scalar {
            name: "String".into(),
        })
        .unwrap();
    assert!(builder.build().is_ok());
}

#[test]
fn unknown_field_type_rejected() {
    let mut builder = SchemaBuilder::new();
    builder
        .add_type(object(
            "Query",
            vec![FieldDef::new("me", TypeRef::named("Viewer"))],
            &[],
        ))
        .unwrap();
    let err = builder.build().unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown type `Viewer` referenced by field `Query.me`"
    );
}

#[test]
fn typename_meta_field() {
    let schema = sample();
    let user = schema.get_type("User").unwrap();
    let typename = schema.field(user, "__typename").unwrap();
    assert_eq!(typename.ty.to_string(), "String!");

    let int = schema.get_type("Int").unwrap();
    assert!(schema.field(int, "__typename").is_none());
}

#[test]
fn possible_types_and_overlap() {
    let schema = sample();
    let node = schema.get_type("Node").unwrap();
    let feed = schema.get_type("Feed").unwrap();
    let user = schema.get_type("User").unwrap();
    let comment = schema.get_type("Comment").unwrap();

    assert_eq!(schema.possible_types(node), vec!["User", "Post"]);
    assert_eq!(schema.possible_types(feed), vec!["Post", "Comment"]);
    assert!(schema.is_possible_type(node, "User"));
    assert!(!schema.is_possible_type(node, "Comment"));

    assert!(schema.do_types_overlap(node, feed));
    assert!(schema.do_types_overlap(node, user));
    assert!(!schema.do_types_overlap(user, comment));
    assert!(!schema.do_types_overlap(user, feed));
}

#[test]
fn input_type_check() {
    let schema = sample();
    assert!(schema.is_input_type(&TypeRef::named("ID")));
    assert!(!schema.is_input_type(&TypeRef::named("User")));
    assert!(!schema.is_input_type(&TypeRef::named("Missing")));
}
