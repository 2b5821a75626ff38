//! Transitive fragment resolution with a per-run dependency cache.
//!
//! Spreads are discovered with an explicit work stack. The first time an
//! operation spreads a fragment, the fragment's whole closure is computed
//! and stored; any later spread of it, from any operation or from inside
//! another closure, reuses the stored set.

use std::collections::HashMap;

use indexmap::IndexSet;
use tracing::trace;

use super::registry::FragmentRegistry;
use crate::ast::SelectionSet;
use crate::source::{SourceId, Span};

/// A spread naming no registered fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingSpread {
    pub name: String,
    /// Where the spread is written, which may be inside another fragment.
    pub source: SourceId,
    pub span: Span,
}

/// Everything reachable from one body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentDeps {
    pub fragments: IndexSet<String>,
    pub missing: Vec<MissingSpread>,
}

impl FragmentDeps {
    fn absorb(&mut self, name: &str, deps: &FragmentDeps) {
        self.fragments.insert(name.to_string());
        self.fragments.extend(deps.fragments.iter().cloned());
        for missing in &deps.missing {
            if !self.missing.contains(missing) {
                self.missing.push(missing.clone());
            }
        }
    }
}

/// Fragment name → closure of the fragment's body.
///
/// Filled lazily and never invalidated; the registry is frozen before the
/// first lookup.
#[derive(Debug, Default)]
pub struct DependencyCache {
    entries: HashMap<String, FragmentDeps>,
    hits: usize,
}

impl DependencyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FragmentDeps> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Closure of the registered fragment `name`, computed on first use.
    pub fn get_or_compute(&mut self, registry: &FragmentRegistry<'_>, name: &str) -> Option<&FragmentDeps> {
        if self.entries.contains_key(name) {
            self.hits += 1;
            trace!(fragment = name, "dependency cache hit");
        } else {
            let entry = registry.get(name)?;
            let deps = self.walk(registry, entry.source, &entry.definition.selection_set);
            trace!(fragment = name, deps = deps.fragments.len(), "dependency cache fill");
            self.entries.insert(name.to_string(), deps);
        }
        self.entries.get(name)
    }

    /// Closure of `body` without touching the entries of its own spreads.
    fn walk(&mut self, registry: &FragmentRegistry<'_>, source: SourceId, body: &SelectionSet) -> FragmentDeps {
        let mut deps = FragmentDeps::default();
        let mut stack = vec![(source, body)];
        while let Some((source, body)) = stack.pop() {
            for spread in body.fragment_spreads() {
                let name = spread.name.as_str();
                if let Some(cached) = self.entries.get(name) {
                    self.hits += 1;
                    deps.absorb(name, cached);
                } else if let Some(entry) = registry.get(name) {
                    if deps.fragments.insert(name.to_string()) {
                        stack.push((entry.source, &entry.definition.selection_set));
                    }
                } else {
                    let missing = MissingSpread {
                        name: name.to_string(),
                        source,
                        span: spread.name.span,
                    };
                    if !deps.missing.contains(&missing) {
                        deps.missing.push(missing);
                    }
                }
            }
        }
        deps
    }
}

/// Resolve every fragment `body` depends on, directly or transitively.
pub fn resolve(
    registry: &FragmentRegistry<'_>,
    cache: &mut DependencyCache,
    source: SourceId,
    body: &SelectionSet,
) -> FragmentDeps {
    let mut resolved = FragmentDeps::default();
    for spread in body.fragment_spreads() {
        let name = spread.name.as_str();
        match cache.get_or_compute(registry, name) {
            Some(deps) => resolved.absorb(name, deps),
            None => {
                let missing = MissingSpread {
                    name: name.to_string(),
                    source,
                    span: spread.name.span,
                };
                if !resolved.missing.contains(&missing) {
                    resolved.missing.push(missing);
                }
            }
        }
    }
    resolved
}
