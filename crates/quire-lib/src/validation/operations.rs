//! Operation-level rules: anonymous placement, name uniqueness, subscriptions.

use indexmap::{IndexMap, IndexSet};
use quire_core::OperationKind;

use super::{Context, Unit};
use crate::ast::{Field, Selection, SelectionSet};
use crate::diagnostics::DiagnosticKind;
use crate::source::Span;

pub fn check_lone_anonymous(cx: &mut Context<'_>) {
    let operations: Vec<_> = cx.operations().collect();
    if operations.len() < 2 {
        return;
    }
    for (unit, op) in operations {
        if op.name.is_none() {
            cx.report_in(unit, DiagnosticKind::LoneAnonymousOperation, op.head_span())
                .message("this anonymous operation must be the only operation in its document")
                .emit();
        }
    }
}

pub fn check_unique_operation_names(cx: &mut Context<'_>) {
    let mut seen: IndexMap<String, (Unit<'_>, Span)> = IndexMap::new();
    let operations: Vec<_> = cx.operations().collect();
    for (unit, op) in operations {
        let Some(name) = &op.name else {
            continue;
        };
        match seen.get(name.as_str()) {
            Some(&(first, first_span)) => {
                cx.report_in(unit, DiagnosticKind::DuplicateOperationName, name.span)
                    .message(name.as_str())
                    .related_to(first.source, first_span, "first defined here")
                    .emit();
            }
            None => {
                seen.insert(name.value.clone(), (unit, name.span));
            }
        }
    }
}

pub fn check_single_field_subscriptions(cx: &mut Context<'_>) {
    let operations: Vec<_> = cx
        .operations()
        .filter(|(_, op)| op.kind == OperationKind::Subscription)
        .collect();

    for (unit, op) in operations {
        let mut fields = Vec::new();
        let mut visited = IndexSet::new();
        collect_root_fields(cx, &op.selection_set, &mut visited, &mut fields);

        let Some(first_key) = fields.first().map(|f| f.response_key()) else {
            continue;
        };
        let extra: Vec<&Field> = fields
            .iter()
            .copied()
            .filter(|field| field.response_key() != first_key)
            .collect();
        let Some(first_extra) = extra.first() else {
            continue;
        };
        let subject = match &op.name {
            Some(name) => format!("subscription `{}`", name.as_str()),
            None => "anonymous subscription".to_string(),
        };
        let span = extra
            .iter()
            .skip(1)
            .fold(first_extra.span, |acc, field| acc.cover(field.span));
        cx.report_in(unit, DiagnosticKind::SubscriptionMultipleRootFields, span)
            .message(format!("{subject} must select only one top-level field"))
            .emit();
    }
}

/// Root fields of a selection set, looking through inline fragments and spreads.
fn collect_root_fields<'a>(
    cx: &Context<'a>,
    set: &'a SelectionSet,
    visited: &mut IndexSet<&'a str>,
    out: &mut Vec<&'a Field>,
) {
    for selection in &set.selections {
        match selection {
            Selection::Field(field) => out.push(field),
            Selection::InlineFragment(inline) => {
                collect_root_fields(cx, &inline.selection_set, visited, out);
            }
            Selection::FragmentSpread(spread) => {
                let name = spread.name.as_str();
                if !visited.insert(name) {
                    continue;
                }
                if let Some((_, frag)) = cx.fragment(name) {
                    collect_root_fields(cx, &frag.selection_set, visited, out);
                }
            }
        }
    }
}
