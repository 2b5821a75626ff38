//! Source storage for a compilation batch.
//!
//! Every document in a batch keeps its host-file path and the position of the
//! embedded query text inside that file, so spans measured in query
//! coordinates can be reported in file coordinates.

use std::ops::Range;

use serde::Serialize;

use crate::Result;
use crate::ast::Document;
use crate::parser::parse;

/// Byte range into one source's query text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn empty(offset: u32) -> Self {
        Self::new(offset, offset)
    }

    /// Smallest span containing both.
    pub fn cover(self, other: Span) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start as u32, range.end as u32)
    }
}

/// Lightweight handle to a source in a batch: the index of its document.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct SourceId(pub(crate) u32);

impl SourceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Start of the embedded query inside its host file.
///
/// `line` is 1-based and `column` is 0-based, as reported by JS tooling.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 0 }
    }
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A point in file coordinates: 1-based line and column.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

/// One extracted document, as handed over by the extraction step.
#[derive(Clone, Debug)]
pub struct RawDocument {
    /// Host file path; also the key of the compiled output.
    pub path: String,
    pub text: String,
    pub template_offset: Position,
    pub hash: u32,
    pub is_hook: bool,
    pub is_static_query: bool,
    pub document: Document,
}

impl RawDocument {
    pub fn new(path: impl Into<String>, text: impl Into<String>, document: Document) -> Self {
        let text = text.into();
        Self {
            path: path.into(),
            hash: content_hash(&text),
            text,
            template_offset: Position::default(),
            is_hook: false,
            is_static_query: false,
            document,
        }
    }

    /// Parse `text` and wrap it. Syntax errors fail with [`Error::SyntaxError`](crate::Error::SyntaxError).
    pub fn parse(path: impl Into<String>, text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let document = parse(&text)?.into_result()?;
        Ok(Self::new(path, text, document))
    }

    pub fn with_template_offset(mut self, offset: Position) -> Self {
        self.template_offset = offset;
        self
    }

    pub fn with_hash(mut self, hash: u32) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_hook(mut self, value: bool) -> Self {
        self.is_hook = value;
        self
    }

    pub fn with_static_query(mut self, value: bool) -> Self {
        self.is_static_query = value;
        self
    }
}

/// Content hash used when the extraction step supplies none.
pub fn content_hash(text: &str) -> u32 {
    crc32fast::hash(text.as_bytes())
}

#[derive(Clone, Debug)]
struct SourceEntry {
    path: String,
    content: String,
    offset: Position,
    /// Byte offset of each line start.
    line_starts: Vec<u32>,
}

impl SourceEntry {
    /// 1-based line and column of a byte offset, in query coordinates.
    fn line_col(&self, offset: u32) -> (u32, u32) {
        let line_idx = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts.get(line_idx).copied().unwrap_or(0);
        let clamped = (offset as usize).min(self.content.len());
        let column = self
            .content
            .get(line_start as usize..clamped)
            .map_or(0, |prefix| prefix.chars().count());
        (line_idx as u32 + 1, column as u32 + 1)
    }
}

/// Registry of all sources in a batch, indexed by [`SourceId`].
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    entries: Vec<SourceEntry>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: &[RawDocument]) -> Self {
        let mut map = Self::new();
        for doc in documents {
            map.add(&doc.path, &doc.text, doc.template_offset);
        }
        map
    }

    pub fn add(&mut self, path: &str, content: &str, offset: Position) -> SourceId {
        let id = SourceId(self.entries.len() as u32);
        let line_starts = std::iter::once(0)
            .chain(
                content
                    .match_indices('\n')
                    .map(|(idx, _)| idx as u32 + 1),
            )
            .collect();
        self.entries.push(SourceEntry {
            path: path.to_owned(),
            content: content.to_owned(),
            offset,
            line_starts,
        });
        id
    }

    pub fn path(&self, id: SourceId) -> &str {
        &self.entries[id.index()].path
    }

    pub fn content(&self, id: SourceId) -> &str {
        &self.entries[id.index()].content
    }

    pub fn offset(&self, id: SourceId) -> Position {
        self.entries[id.index()].offset
    }

    /// Translate a byte offset in query coordinates to file coordinates.
    ///
    /// The template column only shifts positions on the query's first line;
    /// later lines start at column zero of the host file.
    pub fn location(&self, id: SourceId, offset: u32) -> Location {
        let entry = &self.entries[id.index()];
        let (q_line, q_column) = entry.line_col(offset);
        let column = if q_line == 1 {
            q_column + entry.offset.column
        } else {
            q_column
        };
        Location {
            file: entry.path.clone(),
            line: q_line + entry.offset.line - 1,
            column,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = SourceId> + use<> {
        (0..self.entries.len() as u32).map(SourceId)
    }
}
