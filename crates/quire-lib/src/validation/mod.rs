//! Schema validation of executable definitions.
//!
//! Two rule sets run over the same walker:
//! - **structural** rules only need one document and the schema, so they
//!   run per file before anything is merged;
//! - **global** rules need every operation and every registered fragment of
//!   the batch at once (name uniqueness, cycles, variable usage through
//!   fragments, field merging).
//!
//! Every reported diagnostic rejects the operation or fragment it belongs to.
//! Rules report everything they find; nothing stops early.

mod arguments;
mod directives;
mod fields;
mod fragments;
mod operations;
mod overlap;
mod types;
mod values;
mod variables;
pub mod visitor;

#[cfg(test)]
mod global_tests;

use indexmap::{IndexMap, IndexSet};
use quire_core::{Schema, TypeDef};
use quire_core::utils::closest_match;

use crate::ast::{Document, FragmentDefinition, OperationDefinition, SelectionSet};
use crate::diagnostics::{DiagnosticBuilder, DiagnosticKind, Diagnostics};
use crate::source::{SourceId, Span};

/// Candidates further away than this are never suggested.
pub(crate) const SUGGESTION_THRESHOLD: usize = 10;

/// Which definition of the validated set a diagnostic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    /// Index into the validated operations.
    Operation(usize),
    /// Index into the validated fragments.
    Fragment(usize),
}

#[derive(Debug, Clone, Copy)]
pub enum DefinitionRef<'a> {
    Operation(&'a OperationDefinition),
    Fragment(&'a FragmentDefinition),
}

impl<'a> DefinitionRef<'a> {
    pub fn selection_set(self) -> &'a SelectionSet {
        match self {
            Self::Operation(op) => &op.selection_set,
            Self::Fragment(frag) => &frag.selection_set,
        }
    }
}

/// One definition under validation, with the source it came from.
#[derive(Debug, Clone, Copy)]
pub struct Unit<'a> {
    pub owner: Owner,
    pub source: SourceId,
    pub definition: DefinitionRef<'a>,
}

/// Result of the global rule set.
#[derive(Debug, Default)]
pub struct GlobalValidation {
    pub diagnostics: Diagnostics,
    /// Indices of operations with at least one diagnostic.
    pub rejected_operations: IndexSet<usize>,
    /// Names of fragments with at least one diagnostic, conflicting duplicates included.
    pub tainted_fragments: IndexSet<String>,
}

impl GlobalValidation {
    pub fn is_rejected(&self, operation: usize) -> bool {
        self.rejected_operations.contains(&operation)
    }

    pub fn is_tainted(&self, fragment: &str) -> bool {
        self.tainted_fragments.contains(fragment)
    }
}

/// Shared state of one validation run.
pub struct Context<'a> {
    pub schema: &'a Schema,
    units: Vec<Unit<'a>>,
    /// First fragment of each name; later same-name fragments are only reachable through `units`.
    fragments: IndexMap<&'a str, Unit<'a>>,
    current: Option<Unit<'a>>,
    diagnostics: Diagnostics,
    rejected: IndexSet<Owner>,
}

impl<'a> Context<'a> {
    pub fn new(
        schema: &'a Schema,
        operations: &[(SourceId, &'a OperationDefinition)],
        fragments: &[(SourceId, &'a FragmentDefinition)],
    ) -> Self {
        let mut units = Vec::with_capacity(operations.len() + fragments.len());
        for (idx, &(source, op)) in operations.iter().enumerate() {
            units.push(Unit {
                owner: Owner::Operation(idx),
                source,
                definition: DefinitionRef::Operation(op),
            });
        }
        let mut by_name = IndexMap::new();
        for (idx, &(source, frag)) in fragments.iter().enumerate() {
            let unit = Unit {
                owner: Owner::Fragment(idx),
                source,
                definition: DefinitionRef::Fragment(frag),
            };
            by_name.entry(frag.name.as_str()).or_insert(unit);
            units.push(unit);
        }

        Self {
            schema,
            units,
            fragments: by_name,
            current: None,
            diagnostics: Diagnostics::new(),
            rejected: IndexSet::new(),
        }
    }

    fn for_document(schema: &'a Schema, source: SourceId, document: &'a Document) -> Self {
        let operations: Vec<_> = document.operations().map(|op| (source, op)).collect();
        let fragments: Vec<_> = document.fragments().map(|frag| (source, frag)).collect();
        Self::new(schema, &operations, &fragments)
    }

    pub fn units(&self) -> &[Unit<'a>] {
        &self.units
    }

    pub fn operations(&self) -> impl Iterator<Item = (Unit<'a>, &'a OperationDefinition)> + '_ {
        self.units.iter().filter_map(|unit| match unit.definition {
            DefinitionRef::Operation(op) => Some((*unit, op)),
            DefinitionRef::Fragment(_) => None,
        })
    }

    pub fn fragment_units(&self) -> impl Iterator<Item = (Unit<'a>, &'a FragmentDefinition)> + '_ {
        self.units.iter().filter_map(|unit| match unit.definition {
            DefinitionRef::Fragment(frag) => Some((*unit, frag)),
            DefinitionRef::Operation(_) => None,
        })
    }

    /// The fragment a spread of `name` refers to.
    pub fn fragment(&self, name: &str) -> Option<(Unit<'a>, &'a FragmentDefinition)> {
        let unit = *self.fragments.get(name)?;
        match unit.definition {
            DefinitionRef::Fragment(frag) => Some((unit, frag)),
            DefinitionRef::Operation(_) => None,
        }
    }

    pub fn fragment_names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.fragments.keys().copied()
    }

    /// Fragments transitively spread from `set`, each once, in discovery order.
    pub fn reachable_fragments(
        &self,
        set: &'a SelectionSet,
    ) -> Vec<(Unit<'a>, &'a FragmentDefinition)> {
        let mut seen: IndexSet<&str> = IndexSet::new();
        let mut found = Vec::new();
        let mut stack = vec![set];
        while let Some(set) = stack.pop() {
            for spread in set.fragment_spreads() {
                let name = spread.name.as_str();
                if !seen.insert(name) {
                    continue;
                }
                if let Some((unit, frag)) = self.fragment(name) {
                    found.push((unit, frag));
                    stack.push(&frag.selection_set);
                }
            }
        }
        found
    }

    pub fn current(&self) -> Option<Unit<'a>> {
        self.current
    }

    pub(crate) fn set_current(&mut self, unit: Option<Unit<'a>>) {
        self.current = unit;
    }

    pub fn get_type(&self, name: &str) -> Option<&'a TypeDef> {
        self.schema.get_type(name)
    }

    /// Report against the definition being walked.
    pub fn report(&mut self, kind: DiagnosticKind, span: Span) -> DiagnosticBuilder<'_> {
        match self.current {
            Some(unit) => self.report_in(unit, kind, span),
            None => self.diagnostics.report(SourceId::default(), kind, span),
        }
    }

    /// Report in the source of `unit` and reject it.
    pub fn report_in(&mut self, unit: Unit<'a>, kind: DiagnosticKind, span: Span) -> DiagnosticBuilder<'_> {
        self.rejected.insert(unit.owner);
        self.diagnostics.report(unit.source, kind, span)
    }

    /// Report in `source` but reject only `owner`.
    ///
    /// Used when the offending text sits in a shared fragment that is fine on
    /// its own, e.g. a variable usage only the operation can define.
    pub fn report_for(
        &mut self,
        owner: Unit<'a>,
        source: SourceId,
        kind: DiagnosticKind,
        span: Span,
    ) -> DiagnosticBuilder<'_> {
        self.rejected.insert(owner.owner);
        self.diagnostics.report(source, kind, span)
    }

    /// Reject the current definition without a new diagnostic.
    pub fn reject_current(&mut self) {
        if let Some(unit) = self.current {
            self.reject(unit);
        }
    }

    pub fn reject(&mut self, unit: Unit<'a>) {
        self.rejected.insert(unit.owner);
    }

    pub fn into_parts(self) -> (Diagnostics, IndexSet<Owner>) {
        (self.diagnostics, self.rejected)
    }
}

/// Appends a "did you mean" fix when a candidate is close enough.
pub(crate) fn suggest<'b, 'c>(
    builder: DiagnosticBuilder<'b>,
    name: &str,
    candidates: impl IntoIterator<Item = &'c str>,
) -> DiagnosticBuilder<'b> {
    match closest_match(name, candidates, SUGGESTION_THRESHOLD) {
        Some(candidate) => builder.fix(format!("did you mean `{candidate}`?"), candidate),
        None => builder,
    }
}

/// Run the rules that need nothing beyond one document.
pub fn validate_structural(schema: &Schema, source: SourceId, document: &Document) -> Diagnostics {
    let mut cx = Context::for_document(schema, source, document);

    operations::check_lone_anonymous(&mut cx);
    types::check_known_types(&mut cx);
    types::check_fragments_on_composite_types(&mut cx);
    types::check_variables_are_input_types(&mut cx);
    fields::check_scalar_leafs(&mut cx);
    fields::check_possible_fragment_spreads(&mut cx);
    values::check_values_of_correct_type(&mut cx);
    variables::check_variables_in_allowed_position(&mut cx);

    cx.into_parts().0
}

/// Run the rules that need the whole batch.
///
/// `fragments` holds every registered fragment, conflicting duplicates included;
/// spreads resolve to the first fragment of a name.
pub fn validate_global(
    schema: &Schema,
    operations: &[(SourceId, &OperationDefinition)],
    fragments: &[(SourceId, &FragmentDefinition)],
) -> GlobalValidation {
    let mut cx = Context::new(schema, operations, fragments);

    operations::check_unique_operation_names(&mut cx);
    operations::check_single_field_subscriptions(&mut cx);
    fields::check_fields_on_correct_type(&mut cx);
    fragments::check_unique_fragment_names(&mut cx);
    fragments::check_no_cycles(&mut cx);
    variables::check_unique_variable_names(&mut cx);
    variables::check_no_undefined_variables(&mut cx);
    variables::check_no_unused_variables(&mut cx);
    directives::check_known_directives(&mut cx);
    directives::check_unique_directives(&mut cx);
    arguments::check_known_arguments(&mut cx);
    arguments::check_unique_arguments(&mut cx);
    arguments::check_required_arguments(&mut cx);
    overlap::check_overlapping_fields(&mut cx);
    values::check_unique_input_fields(&mut cx);

    let (diagnostics, rejected) = cx.into_parts();
    let mut result = GlobalValidation {
        diagnostics,
        ..Default::default()
    };
    for owner in rejected {
        match owner {
            Owner::Operation(idx) => {
                result.rejected_operations.insert(idx);
            }
            Owner::Fragment(idx) => {
                if let Some((_, frag)) = fragments.get(idx) {
                    result.tainted_fragments.insert(frag.name.value.clone());
                }
            }
        }
    }
    result
}
