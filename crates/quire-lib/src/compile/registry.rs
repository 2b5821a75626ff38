//! Batch-wide fragment namespace.
//!
//! Files are merged in order. A fragment whose name is already registered
//! with identical printed text is dropped. A same-name fragment with other
//! text is kept as a raw definition next to the first (canonical) one, so
//! the uniqueness rule sees both; nothing here picks a winner.

use indexmap::IndexMap;
use tracing::trace;

use crate::ast::{Definition, FragmentDefinition, OperationDefinition};
use crate::printer::print_fragment;
use crate::source::{RawDocument, SourceId};

/// A registered fragment and its canonical text.
#[derive(Debug, Clone)]
pub struct FragmentEntry<'d> {
    pub source: SourceId,
    pub definition: &'d FragmentDefinition,
    pub text: String,
}

impl FragmentEntry<'_> {
    pub fn name(&self) -> &str {
        self.definition.name.as_str()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OperationEntry<'d> {
    pub source: SourceId,
    pub document: &'d RawDocument,
    pub definition: &'d OperationDefinition,
}

#[derive(Debug, Default)]
pub struct FragmentRegistry<'d> {
    /// Every fragment that survived deduplication, in merge order.
    fragments: Vec<FragmentEntry<'d>>,
    /// Name → index of the first fragment registered under it.
    canonical: IndexMap<String, usize>,
    operations: Vec<OperationEntry<'d>>,
    /// Name → file that first defined an operation or fragment of that name.
    definition_files: IndexMap<String, SourceId>,
    dropped: usize,
}

impl<'d> FragmentRegistry<'d> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every definition of one admitted file.
    pub fn merge(&mut self, source: SourceId, document: &'d RawDocument) {
        for definition in &document.document.definitions {
            match definition {
                Definition::Fragment(frag) => self.merge_fragment(source, frag),
                Definition::Operation(op) => {
                    if let Some(name) = &op.name {
                        self.definition_files
                            .entry(name.value.clone())
                            .or_insert(source);
                    }
                    self.operations.push(OperationEntry {
                        source,
                        document,
                        definition: op,
                    });
                }
            }
        }
    }

    fn merge_fragment(&mut self, source: SourceId, frag: &'d FragmentDefinition) {
        let name = frag.name.as_str();
        let text = print_fragment(frag);
        if let Some(&idx) = self.canonical.get(name) {
            if self.fragments[idx].text == text {
                trace!(fragment = name, "dropping identical redefinition");
                self.dropped += 1;
                return;
            }
            trace!(fragment = name, "keeping conflicting redefinition");
        } else {
            self.canonical.insert(name.to_string(), self.fragments.len());
        }
        self.definition_files
            .entry(name.to_string())
            .or_insert(source);
        self.fragments.push(FragmentEntry {
            source,
            definition: frag,
            text,
        });
    }

    /// The canonical fragment of `name`.
    pub fn get(&self, name: &str) -> Option<&FragmentEntry<'d>> {
        let &idx = self.canonical.get(name)?;
        self.fragments.get(idx)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.canonical.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.canonical.keys().map(String::as_str)
    }

    /// Canonical fragments in registration order.
    pub fn canonical(&self) -> impl Iterator<Item = &FragmentEntry<'d>> {
        self.canonical.values().filter_map(|&idx| self.fragments.get(idx))
    }

    /// Every kept fragment, conflicting redefinitions included.
    pub fn fragments(&self) -> &[FragmentEntry<'d>] {
        &self.fragments
    }

    pub fn operations(&self) -> &[OperationEntry<'d>] {
        &self.operations
    }

    pub fn defining_file(&self, name: &str) -> Option<SourceId> {
        self.definition_files.get(name).copied()
    }

    /// Number of identical redefinitions dropped so far.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}
