//! Whole-batch compilation: `{file → document}` in, `{file → query}` out.
//!
//! # Phases
//!
//! 1. Structural validation per file, merging each admitted file into the
//!    [`FragmentRegistry`]. The first failing file aborts the batch.
//! 2. Global validation over every operation and registered fragment.
//! 3. Per operation, in merge order: fragment resolution through the
//!    [`DependencyCache`], the invalid-dependency check, duplicate-root
//!    detection, then assembly of the [`CompiledQuery`].
//! 4. Outcomes go to the [`Reporter`].

pub mod query;
pub mod registry;
pub mod resolve;

#[cfg(test)]
mod resolve_tests;

use std::collections::HashSet;

use indexmap::IndexMap;
use quire_core::Schema;
use quire_core::utils::closest_match;
use tracing::{debug, info_span, warn};

use crate::Result;
use crate::config::CompilerConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::report::{ErrorReporter, OVERLAY_CHANNEL, Reporter};
use crate::source::{RawDocument, SourceId, SourceMap, Span};
use crate::validation::{SUGGESTION_THRESHOLD, validate_global, validate_structural};

pub use query::{CompiledQuery, STATIC_QUERY_PREFIX, static_query_id};
pub use registry::{FragmentEntry, FragmentRegistry, OperationEntry};
pub use resolve::{DependencyCache, FragmentDeps, MissingSpread};

/// How far a batch got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    /// Every admitted file was processed.
    Complete,
    /// Structural validation failed in `path`; later files were not visited.
    Aborted { path: String },
}

#[derive(Debug)]
pub struct CompileOutput {
    /// Compiled queries keyed by file path, in merge order.
    pub queries: IndexMap<String, CompiledQuery>,
    pub diagnostics: Diagnostics,
    /// Sources of the batch, for rendering `diagnostics`.
    pub sources: SourceMap,
    pub status: BatchStatus,
}

impl CompileOutput {
    pub fn is_success(&self) -> bool {
        self.status == BatchStatus::Complete && self.diagnostics.is_empty()
    }

    pub fn render_diagnostics(&self, colored: bool) -> String {
        self.diagnostics
            .printer()
            .sources(&self.sources)
            .colored(colored)
            .render()
    }
}

pub struct Compiler<'s> {
    schema: &'s Schema,
    config: CompilerConfig,
}

impl<'s> Compiler<'s> {
    pub fn new(schema: &'s Schema, config: CompilerConfig) -> Self {
        Self { schema, config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile one batch, files in merge order.
    ///
    /// Diagnostics never fail the call; only a terminal condition such as
    /// [`Error::UnsupportedHookRuntime`](crate::Error::UnsupportedHookRuntime) does.
    pub fn compile(
        &self,
        documents: &[RawDocument],
        reporter: &mut dyn Reporter,
    ) -> Result<CompileOutput> {
        let _span = info_span!("compile", files = documents.len()).entered();
        let sources = SourceMap::from_documents(documents);
        let mut diagnostics = Diagnostics::new();
        let mut registry = FragmentRegistry::new();

        for (source, document) in sources.ids().zip(documents) {
            let found = validate_structural(self.schema, source, &document.document);
            if !found.is_empty() {
                warn!(
                    path = %document.path,
                    errors = found.len(),
                    "structural validation failed, aborting batch"
                );
                reporter.extraction_failed(&document.path);
                diagnostics.extend(found);
                let output = CompileOutput {
                    queries: IndexMap::new(),
                    diagnostics,
                    sources,
                    status: BatchStatus::Aborted {
                        path: document.path.clone(),
                    },
                };
                self.finish(&output, reporter);
                return Ok(output);
            }
            registry.merge(source, document);
        }
        debug!(
            operations = registry.operations().len(),
            fragments = registry.fragments().len(),
            dropped = registry.dropped(),
            "merged"
        );

        let operations: Vec<_> = registry
            .operations()
            .iter()
            .map(|entry| (entry.source, entry.definition))
            .collect();
        let fragments: Vec<_> = registry
            .fragments()
            .iter()
            .map(|entry| (entry.source, entry.definition))
            .collect();
        let mut global = {
            let _span = info_span!("validate_global").entered();
            validate_global(self.schema, &operations, &fragments)
        };
        debug!(
            errors = global.diagnostics.len(),
            rejected = global.rejected_operations.len(),
            "global validation done"
        );
        diagnostics.extend(std::mem::take(&mut global.diagnostics));

        let mut cache = DependencyCache::new();
        let mut queries: IndexMap<String, CompiledQuery> = IndexMap::new();
        // File → operation index of the query compiled for it.
        let mut roots: IndexMap<SourceId, usize> = IndexMap::new();
        let mut reported_spreads: HashSet<(SourceId, Span)> = HashSet::new();

        for (idx, entry) in registry.operations().iter().enumerate() {
            let op = entry.definition;
            if global.is_rejected(idx) {
                debug!(operation = op.display_name(), "skipping rejected operation");
                continue;
            }

            let resolved = resolve::resolve(&registry, &mut cache, entry.source, &op.selection_set);
            if !resolved.missing.is_empty() {
                let mut reported_here = false;
                for missing in &resolved.missing {
                    if !reported_spreads.insert((missing.source, missing.span)) {
                        continue;
                    }
                    reported_here = true;
                    let mut builder = diagnostics
                        .report(missing.source, DiagnosticKind::UndefinedFragment, missing.span)
                        .message(&missing.name)
                        .context("fragmentName", &missing.name);
                    if let Some(closest) =
                        closest_match(&missing.name, registry.names(), SUGGESTION_THRESHOLD)
                    {
                        builder = builder
                            .context("closestFragment", closest)
                            .fix(format!("did you mean `{closest}`?"), closest);
                    }
                    builder.emit();
                }
                // Spreads already reported for another operation still reject this one.
                if !reported_here && let Some(missing) = resolved.missing.first() {
                    diagnostics
                        .report(entry.source, DiagnosticKind::UndefinedFragment, op.head_span())
                        .message(&missing.name)
                        .context("fragmentName", &missing.name)
                        .related_to(missing.source, missing.span, "spread here")
                        .emit();
                }
                reporter.extraction_failed(&entry.document.path);
                continue;
            }

            if let Some(tainted) = resolved.fragments.iter().find(|name| global.is_tainted(name)) {
                let mut builder = diagnostics
                    .report(entry.source, DiagnosticKind::InvalidFragmentDependency, op.head_span())
                    .message(tainted.as_str());
                if let Some(frag) = registry.get(tainted) {
                    builder = builder.related_to(
                        frag.source,
                        frag.definition.name.span,
                        "fragment defined here",
                    );
                }
                builder.emit();
                continue;
            }

            if let Some(&first_idx) = roots.get(&entry.source) {
                let first = registry.operations()[first_idx];
                diagnostics
                    .report(entry.source, DiagnosticKind::MultipleRootQueries, op.head_span())
                    .message(format!(
                        "`{}` contains multiple root queries, `{}` and `{}`; only the first is compiled",
                        entry.document.path,
                        first.definition.display_name(),
                        op.display_name()
                    ))
                    .related_to(
                        first.source,
                        first.definition.head_span(),
                        "first root query defined here",
                    )
                    .emit();
                continue;
            }

            let text = query::minimal_document(&registry, &resolved, op);
            let compiled = query::compile_query(&self.config, entry.document, op, text)?;
            roots.insert(entry.source, idx);
            queries.insert(entry.document.path.clone(), compiled);
        }
        debug!(
            compiled = queries.len(),
            cached = cache.len(),
            cache_hits = cache.hits(),
            "compiled"
        );

        let output = CompileOutput {
            queries,
            diagnostics,
            sources,
            status: BatchStatus::Complete,
        };
        self.finish(&output, reporter);
        Ok(output)
    }

    fn finish(&self, output: &CompileOutput, reporter: &mut dyn Reporter) {
        let errors = ErrorReporter::new(&output.sources).normalize(&output.diagnostics);
        if !errors.is_empty() {
            reporter.batch_failed(&errors);
        }
        if self.config.is_develop() {
            let published = (!errors.is_empty()).then_some(errors.as_slice());
            reporter.publish(OVERLAY_CHANNEL, published);
        }
    }
}
