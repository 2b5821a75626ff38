//! Fragment definition rules: unique names and cycle freedom.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use super::{Context, Unit};
use crate::ast::{FragmentDefinition, FragmentSpread};
use crate::diagnostics::DiagnosticKind;
use crate::source::Span;

/// Same-name fragments that survived deduplication have different text; all
/// but the first are reported here.
pub fn check_unique_fragment_names(cx: &mut Context<'_>) {
    let mut seen: IndexMap<String, (Unit<'_>, Span)> = IndexMap::new();
    let fragments: Vec<_> = cx.fragment_units().collect();
    for (unit, frag) in fragments {
        let name = &frag.name;
        match seen.get(name.as_str()) {
            Some(&(first, first_span)) => {
                cx.report_in(unit, DiagnosticKind::DuplicateFragmentName, name.span)
                    .message(name.as_str())
                    .related_to(first.source, first_span, "first defined here")
                    .emit();
                // Spreads resolve to the first definition, which is ambiguous now.
                cx.reject(first);
            }
            None => {
                seen.insert(name.value.clone(), (unit, name.span));
            }
        }
    }
}

pub fn check_no_cycles(cx: &mut Context<'_>) {
    let mut detector = CycleDetector::default();
    let names: Vec<_> = cx.fragment_names().collect();
    for name in names {
        if let Some((unit, frag)) = cx.fragment(name) {
            detector.detect(cx, unit, frag);
        }
    }

    for cycle in detector.cycles {
        let Some(&(unit, first)) = cycle.first() else {
            continue;
        };
        let Some(&(_, closing)) = cycle.last() else {
            continue;
        };
        let mut builder = cx
            .report_in(unit, DiagnosticKind::FragmentCycle, first.span)
            .message(closing.name.as_str());
        for &(via_unit, spread) in &cycle[1..] {
            builder = builder.related_to(
                via_unit.source,
                spread.span,
                format!("spreads `{}`", spread.name.as_str()),
            );
        }
        builder.emit();
        for &(via_unit, _) in &cycle[1..] {
            cx.reject(via_unit);
        }
    }
}

/// Depth-first search over spreads; each fragment is entered once.
#[derive(Default)]
struct CycleDetector<'a> {
    visited: HashSet<&'a str>,
    /// Spreads on the current path, with the fragment unit containing each.
    path: Vec<(Unit<'a>, &'a FragmentSpread)>,
    /// Fragment name → position in `path` where its body starts.
    path_index: HashMap<&'a str, usize>,
    cycles: Vec<Vec<(Unit<'a>, &'a FragmentSpread)>>,
}

impl<'a> CycleDetector<'a> {
    fn detect(&mut self, cx: &Context<'a>, unit: Unit<'a>, frag: &'a FragmentDefinition) {
        let name = frag.name.as_str();
        if !self.visited.insert(name) {
            return;
        }
        let spreads = frag.selection_set.fragment_spreads();
        if spreads.is_empty() {
            return;
        }

        self.path_index.insert(name, self.path.len());
        for spread in spreads {
            let target = spread.name.as_str();
            match self.path_index.get(target) {
                Some(&start) => {
                    let mut cycle = self.path[start..].to_vec();
                    cycle.push((unit, spread));
                    self.cycles.push(cycle);
                }
                None => {
                    self.path.push((unit, spread));
                    if let Some((target_unit, target_frag)) = cx.fragment(target) {
                        self.detect(cx, target_unit, target_frag);
                    }
                    self.path.pop();
                }
            }
        }
        self.path_index.remove(name);
    }
}
