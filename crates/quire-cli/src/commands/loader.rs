//! Batch input: every `.graphql`/`.gql` file under a directory, or an
//! extraction manifest listing documents already pulled out of host files.

use std::fs;
use std::path::{Path, PathBuf};

use quire_core::schema::parse_schema_json;
use quire_lib::Schema;
use quire_lib::diagnostics::Diagnostics;
use quire_lib::parser::{parse, parse_schema_sdl};
use quire_lib::source::{Position, RawDocument, SourceMap};
use serde::Deserialize;
use tracing::debug;
use walkdir::WalkDir;

const EXTENSIONS: &[&str] = &["graphql", "gql"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Directory(PathBuf),
    Manifest(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to walk '{}': {source}", path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("invalid manifest '{}': {source}", path.display())]
    Manifest {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("no .graphql or .gql files found in '{}'", .0.display())]
    Empty(PathBuf),

    #[error("failed to parse '{path}': {source}")]
    Parse {
        path: String,
        source: quire_lib::Error,
    },

    #[error("syntax errors in '{path}'")]
    Syntax {
        path: String,
        text: String,
        offset: Position,
        diagnostics: Diagnostics,
    },

    #[error("invalid schema '{}': {source}", path.display())]
    Schema {
        path: PathBuf,
        text: String,
        source: quire_lib::Error,
    },
}

impl LoadError {
    /// Source-annotated diagnostics behind the error, if it has any.
    pub fn render_diagnostics(&self, colored: bool) -> Option<String> {
        let (path, text, offset, diagnostics) = match self {
            Self::Syntax {
                path,
                text,
                offset,
                diagnostics,
            } => (path.clone(), text, *offset, diagnostics),
            Self::Schema {
                path,
                text,
                source: quire_lib::Error::SchemaSyntaxError(diagnostics),
            } => (path.display().to_string(), text, Position::default(), diagnostics),
            _ => return None,
        };
        let mut sources = SourceMap::new();
        sources.add(&path, text, offset);
        Some(
            diagnostics
                .printer()
                .sources(&sources)
                .colored(colored)
                .render(),
        )
    }
}

/// One document of an extraction manifest.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestEntry {
    path: String,
    text: String,
    #[serde(default)]
    template_offset: Option<ManifestPosition>,
    #[serde(default)]
    hash: Option<u32>,
    #[serde(default)]
    is_hook: bool,
    #[serde(default)]
    is_static_query: bool,
}

#[derive(Debug, Deserialize)]
struct ManifestPosition {
    line: u32,
    column: u32,
}

pub fn load_documents(input: &Input) -> Result<Vec<RawDocument>, LoadError> {
    match input {
        Input::Directory(dir) => load_directory(dir),
        Input::Manifest(path) => load_manifest(path),
    }
}

/// Schema from SDL, or from JSON when the file ends in `.json`.
pub fn load_schema(path: &Path) -> Result<Schema, LoadError> {
    let text = read(path)?;
    let parsed = if path.extension().is_some_and(|ext| ext == "json") {
        parse_schema_json(&text).map_err(quire_lib::Error::from)
    } else {
        parse_schema_sdl(&text)
    };
    parsed.map_err(|source| LoadError::Schema {
        path: path.to_path_buf(),
        text,
        source,
    })
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_directory(dir: &Path) -> Result<Vec<RawDocument>, LoadError> {
    let mut documents = Vec::new();
    // Sorted walk keeps the merge order stable across platforms.
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|source| LoadError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_document = entry.file_type().is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| EXTENSIONS.contains(&ext));
        if !is_document {
            continue;
        }
        let text = read(path)?;
        documents.push(parse_document(
            path.to_string_lossy().into_owned(),
            text,
            Position::default(),
        )?);
    }

    if documents.is_empty() {
        return Err(LoadError::Empty(dir.to_path_buf()));
    }
    debug!(dir = %dir.display(), documents = documents.len(), "discovered documents");
    Ok(documents)
}

fn load_manifest(path: &Path) -> Result<Vec<RawDocument>, LoadError> {
    let text = read(path)?;
    let entries: Vec<ManifestEntry> =
        serde_json::from_str(&text).map_err(|source| LoadError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(manifest = %path.display(), documents = entries.len(), "read manifest");

    entries
        .into_iter()
        .map(|entry| {
            let offset = entry
                .template_offset
                .map_or_else(Position::default, |pos| Position::new(pos.line, pos.column));
            let document = parse_document(entry.path, entry.text, offset)?
                .with_hook(entry.is_hook)
                .with_static_query(entry.is_static_query);
            Ok(match entry.hash {
                Some(hash) => document.with_hash(hash),
                None => document,
            })
        })
        .collect()
}

fn parse_document(path: String, text: String, offset: Position) -> Result<RawDocument, LoadError> {
    let parsed = match parse(&text) {
        Ok(parsed) => parsed,
        Err(source) => return Err(LoadError::Parse { path, source }),
    };
    if !parsed.diagnostics.is_empty() {
        return Err(LoadError::Syntax {
            path,
            text,
            offset,
            diagnostics: parsed.diagnostics,
        });
    }
    Ok(RawDocument::new(path, text, parsed.document).with_template_offset(offset))
}
