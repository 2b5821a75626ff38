use std::fs;
use std::path::Path;

use indoc::indoc;
use quire_lib::compile::Compiler;
use quire_lib::config::CompilerConfig;
use quire_lib::report::NullReporter;
use quire_lib::source::{Position, RawDocument};
use tempfile::tempdir;

use super::compile::render_json;
use super::loader::{Input, LoadError, load_documents, load_schema};

fn file_names(documents: &[RawDocument]) -> Vec<String> {
    documents
        .iter()
        .filter_map(|doc| Path::new(&doc.path).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn directory_walk_is_sorted_and_filtered() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("b.graphql"), "query B { b }").unwrap();
    fs::write(dir.path().join("a.gql"), "query A { a }").unwrap();
    fs::write(dir.path().join("nested/c.graphql"), "query C { c }").unwrap();
    fs::write(dir.path().join("notes.txt"), "not a query").unwrap();

    let documents = load_documents(&Input::Directory(dir.path().to_path_buf())).unwrap();

    assert_eq!(file_names(&documents), ["a.gql", "b.graphql", "c.graphql"]);
    assert_eq!(documents[0].text, "query A { a }");
    assert_eq!(documents[0].template_offset, Position::default());
}

#[test]
fn empty_directory_is_an_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("readme.md"), "# nothing here").unwrap();

    let err = load_documents(&Input::Directory(dir.path().to_path_buf())).unwrap_err();

    assert!(matches!(err, LoadError::Empty(_)));
}

#[test]
fn manifest_carries_extraction_metadata() {
    let dir = tempdir().unwrap();
    let manifest = dir.path().join("queries.json");
    fs::write(
        &manifest,
        indoc! {r#"
            [
              {
                "path": "src/pages/index.js",
                "text": "query Index { hello }",
                "templateOffset": { "line": 12, "column": 20 },
                "hash": 7,
                "isStaticQuery": true
              },
              {
                "path": "src/hooks/use-hello.js",
                "text": "query UseHello { hello }",
                "isHook": true
              }
            ]
        "#},
    )
    .unwrap();

    let documents = load_documents(&Input::Manifest(manifest)).unwrap();

    let [index, hook] = documents.as_slice() else {
        panic!("expected two documents, got {}", documents.len());
    };
    assert_eq!(index.path, "src/pages/index.js");
    assert_eq!(index.template_offset, Position::new(12, 20));
    assert_eq!(index.hash, 7);
    assert!(index.is_static_query);
    assert!(!index.is_hook);
    assert!(hook.is_hook);
    assert_eq!(hook.template_offset, Position::default());
    assert_ne!(hook.hash, 0);
}

#[test]
fn malformed_manifest_is_an_error() {
    let dir = tempdir().unwrap();
    let manifest = dir.path().join("queries.json");
    fs::write(&manifest, r#"[{ "path": "a.js" }]"#).unwrap();

    let err = load_documents(&Input::Manifest(manifest)).unwrap_err();

    assert!(matches!(err, LoadError::Manifest { .. }));
}

#[test]
fn syntax_errors_render_against_the_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("broken.graphql"), "query Broken {").unwrap();

    let err = load_documents(&Input::Directory(dir.path().to_path_buf())).unwrap_err();

    assert!(matches!(err, LoadError::Syntax { .. }));
    assert!(err.to_string().starts_with("syntax errors in '"));
    let rendered = err.render_diagnostics(false).expect("syntax diagnostics");
    assert!(rendered.contains("broken.graphql"), "{rendered}");
}

#[test]
fn schema_loads_from_sdl_or_json() {
    let dir = tempdir().unwrap();
    let sdl = dir.path().join("schema.graphql");
    let json = dir.path().join("schema.json");
    fs::write(&sdl, "type Query { hello: String }").unwrap();
    fs::write(
        &json,
        r#"{ "queryType": "Query", "types": [{ "kind": "OBJECT", "name": "Query", "fields": [{ "name": "hello", "type": "String" }] }] }"#,
    )
    .unwrap();

    for path in [sdl, json] {
        let schema = load_schema(&path).unwrap();
        assert!(schema.get_type("Query").is_some(), "{}", path.display());
    }
}

#[test]
fn schema_syntax_errors_render_against_the_schema() {
    let dir = tempdir().unwrap();
    let sdl = dir.path().join("schema.graphql");
    fs::write(&sdl, "type Query {").unwrap();

    let err = load_schema(&sdl).unwrap_err();

    assert!(matches!(
        err,
        LoadError::Schema {
            source: quire_lib::Error::SchemaSyntaxError(_),
            ..
        }
    ));
    assert!(err.render_diagnostics(false).is_some());
}

#[test]
fn compiled_queries_render_as_json() {
    let dir = tempdir().unwrap();
    let manifest = dir.path().join("queries.json");
    fs::write(
        &manifest,
        r#"[{ "path": "src/pages/index.js", "text": "query Index { hello }", "hash": 7, "isStaticQuery": true }]"#,
    )
    .unwrap();
    let documents = load_documents(&Input::Manifest(manifest)).unwrap();
    let schema = quire_lib::parser::parse_schema_sdl("type Query { hello: String }").unwrap();

    let output = Compiler::new(&schema, CompilerConfig::default())
        .compile(&documents, &mut NullReporter)
        .unwrap();

    insta::assert_snapshot!(
        render_json(&output, true).unwrap(),
        @r#"{"src/pages/index.js":{"name":"Index","text":"query Index {\n  hello\n}","originalText":"query Index { hello }","path":"src/pages/index.js","hash":7,"isHook":false,"isStaticQuery":true,"id":"sq--src-pages-index-js"}}"#
    );
}
