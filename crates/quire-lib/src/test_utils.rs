//! Fixture schema and helpers shared by the validation and compile tests.

use indoc::indoc;

use crate::ast::Document;
use crate::parser::{parse, parse_schema_sdl};
use crate::source::{RawDocument, SourceId};
use crate::validation::{GlobalValidation, validate_global, validate_structural};
use crate::Schema;

pub const SCHEMA_SDL: &str = indoc! {r#"
    scalar DateTime

    directive @live on QUERY
    directive @tag(name: String!) repeatable on FIELD | FRAGMENT_SPREAD

    enum Role {
      ADMIN
      EDITOR
      VIEWER
    }

    interface Node {
      id: ID!
    }

    type User implements Node {
      id: ID!
      name: String
      email: String
      role: Role
      friends(first: Int = 10, after: String): [User!]!
      avatar(size: Int! = 64): String
      posts: [Post!]
    }

    type Post implements Node {
      id: ID!
      title: String!
      author: User
      createdAt: DateTime
    }

    union SearchResult = User | Post

    input PostFilter {
      authorId: ID!
      tags: [String!]
      limit: Int = 20
    }

    type Query {
      me: User
      user(id: ID!): User
      node(id: ID!): Node
      search(term: String!, role: Role): [SearchResult!]!
      posts(filter: PostFilter): [Post!]!
    }

    type Mutation {
      createPost(title: String!, body: String): Post
    }

    type Subscription {
      postAdded: Post
      userJoined: User
    }
"#};

pub fn schema() -> Schema {
    parse_schema_sdl(SCHEMA_SDL).expect("fixture schema is valid")
}

pub fn document(text: &str) -> Document {
    parse(text)
        .expect("no fatal error")
        .into_result()
        .expect("fixture document parses")
}

pub fn raw(path: &str, text: &str) -> RawDocument {
    RawDocument::parse(path, text).expect("fixture document parses")
}

/// Structural diagnostics of one document, one line each.
pub fn structural(text: &str) -> String {
    let schema = schema();
    let document = document(text);
    validate_structural(&schema, SourceId::default(), &document)
        .printer()
        .render()
}

/// Global validation over documents numbered by position.
pub fn global(texts: &[&str]) -> GlobalValidation {
    let schema = schema();
    let documents: Vec<Document> = texts.iter().map(|text| document(text)).collect();
    let mut operations = Vec::new();
    let mut fragments = Vec::new();
    for (idx, doc) in documents.iter().enumerate() {
        let source = SourceId(idx as u32);
        operations.extend(doc.operations().map(|op| (source, op)));
        fragments.extend(doc.fragments().map(|frag| (source, frag)));
    }
    validate_global(&schema, &operations, &fragments)
}
