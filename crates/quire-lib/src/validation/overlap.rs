//! Fields that share a response key must be mergeable.
//!
//! Every selection set is checked with its inline fragments and spreads
//! flattened in. Sub-selections of two same-key fields are compared
//! pairwise, one side against the other. A conflict inside a fragment is
//! reported once, in the fragment's own source, and rejects every
//! definition that pulls it in.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use quire_core::{FieldDef, TypeDef, TypeKind, TypeRef};

use super::visitor::{Visitor, walk_all};
use super::{Context, Owner, Unit};
use crate::ast::{Argument, Field, Selection, SelectionSet};
use crate::diagnostics::DiagnosticKind;
use crate::printer::print_value;
use crate::source::Span;

pub fn check_overlapping_fields(cx: &mut Context<'_>) {
    walk_all(&mut OverlappingFields::default(), cx);
}

/// A field as it appears in a flattened selection set.
#[derive(Clone, Copy)]
struct FieldEntry<'a> {
    /// The definition whose text contains the field.
    unit: Unit<'a>,
    parent: Option<&'a TypeDef>,
    field: &'a Field,
    def: Option<&'a FieldDef>,
}

impl FieldEntry<'_> {
    fn id(&self) -> (Owner, Span) {
        (self.unit.owner, self.field.span)
    }
}

type FieldMap<'a> = IndexMap<&'a str, Vec<FieldEntry<'a>>>;

struct Conflict<'a> {
    key: &'a str,
    reason: String,
    first: FieldEntry<'a>,
    second: FieldEntry<'a>,
}

#[derive(Default)]
struct OverlappingFields {
    reported: HashSet<((Owner, Span), (Owner, Span))>,
}

impl<'a> Visitor<'a> for OverlappingFields {
    fn selection_set(
        &mut self,
        cx: &mut Context<'a>,
        parent: Option<&'a TypeDef>,
        set: &'a SelectionSet,
    ) {
        let Some(unit) = cx.current() else {
            return;
        };
        let mut fields = FieldMap::new();
        collect_fields(cx, unit, parent, set, &mut IndexSet::new(), &mut fields);

        let mut conflicts = Vec::new();
        for (key, entries) in &fields {
            for (i, first) in entries.iter().enumerate() {
                for second in &entries[i + 1..] {
                    if let Some(conflict) =
                        find_conflict(cx, *key, *first, *second, false, &IndexSet::new())
                    {
                        conflicts.push(conflict);
                    }
                }
            }
        }

        for conflict in conflicts {
            let pair = (conflict.second.id(), conflict.first.id());
            let mirrored = (pair.1, pair.0);
            if self.reported.contains(&pair) || self.reported.contains(&mirrored) {
                cx.reject_current();
                continue;
            }
            self.reported.insert(pair);
            cx.report_in(
                conflict.second.unit,
                DiagnosticKind::FieldsConflict,
                conflict.second.field.span,
            )
            .message(format!(
                "fields `{}` conflict because {}; use different aliases on the fields to fetch both if this was intentional",
                conflict.key, conflict.reason
            ))
            .related_to(
                conflict.first.unit.source,
                conflict.first.field.span,
                "conflicts with this field",
            )
            .emit();
            cx.reject(conflict.first.unit);
            cx.reject_current();
        }
    }
}

/// Flatten `set` into response key → fields, expanding inline fragments and
/// each named fragment once.
fn collect_fields<'a>(
    cx: &Context<'a>,
    unit: Unit<'a>,
    parent: Option<&'a TypeDef>,
    set: &'a SelectionSet,
    visited: &mut IndexSet<&'a str>,
    out: &mut FieldMap<'a>,
) {
    for selection in &set.selections {
        match selection {
            Selection::Field(field) => {
                let def = parent.and_then(|p| cx.schema.field(p, field.name.as_str()));
                out.entry(field.response_key()).or_default().push(FieldEntry {
                    unit,
                    parent,
                    field,
                    def,
                });
            }
            Selection::InlineFragment(inline) => {
                let condition = match &inline.type_condition {
                    Some(name) => cx.get_type(name.as_str()),
                    None => parent,
                };
                collect_fields(cx, unit, condition, &inline.selection_set, visited, out);
            }
            Selection::FragmentSpread(spread) => {
                let name = spread.name.as_str();
                if !visited.insert(name) {
                    continue;
                }
                let Some((frag_unit, frag)) = cx.fragment(name) else {
                    continue;
                };
                let condition = cx.get_type(frag.type_condition.as_str());
                collect_fields(cx, frag_unit, condition, &frag.selection_set, visited, out);
            }
        }
    }
}

/// `path` holds the fragments already expanded above this comparison, which
/// keeps cyclic spreads from recursing forever.
fn find_conflict<'a>(
    cx: &Context<'a>,
    key: &'a str,
    first: FieldEntry<'a>,
    second: FieldEntry<'a>,
    parents_exclusive: bool,
    path: &IndexSet<&'a str>,
) -> Option<Conflict<'a>> {
    if std::ptr::eq(first.field, second.field) {
        return None;
    }
    let conflict = |reason: String| Conflict {
        key,
        reason,
        first,
        second,
    };

    // Different concrete object types can never both apply to one response.
    let exclusive = parents_exclusive
        || match (first.parent, second.parent) {
            (Some(a), Some(b)) => {
                a.kind() == TypeKind::Object && b.kind() == TypeKind::Object && a.name() != b.name()
            }
            _ => false,
        };

    if !exclusive {
        let (a, b) = (first.field.name.as_str(), second.field.name.as_str());
        if a != b {
            return Some(conflict(format!("`{a}` and `{b}` are different fields")));
        }
        if !same_arguments(&first.field.arguments, &second.field.arguments) {
            return Some(conflict("they have differing arguments".to_string()));
        }
    }

    if let (Some(a), Some(b)) = (first.def, second.def)
        && types_conflict(cx, &a.ty, &b.ty)
    {
        return Some(conflict(format!(
            "they return conflicting types `{}` and `{}`",
            a.ty, b.ty
        )));
    }

    let (Some(first_set), Some(second_set)) =
        (&first.field.selection_set, &second.field.selection_set)
    else {
        return None;
    };
    let child_parent = |entry: FieldEntry<'a>| entry.def.and_then(|d| cx.get_type(d.ty.base_name()));

    let mut first_visited = path.clone();
    let mut first_children = FieldMap::new();
    collect_fields(
        cx,
        first.unit,
        child_parent(first),
        first_set,
        &mut first_visited,
        &mut first_children,
    );
    let mut second_visited = path.clone();
    let mut second_children = FieldMap::new();
    collect_fields(
        cx,
        second.unit,
        child_parent(second),
        second_set,
        &mut second_visited,
        &mut second_children,
    );
    let mut deeper = first_visited;
    deeper.extend(second_visited);

    let mut reasons = Vec::new();
    for (child_key, left) in &first_children {
        let Some(right) = second_children.get(child_key) else {
            continue;
        };
        for a in left {
            for b in right {
                if let Some(sub) = find_conflict(cx, *child_key, *a, *b, exclusive, &deeper) {
                    reasons.push(format!(
                        "subfields `{}` conflict because {}",
                        sub.key, sub.reason
                    ));
                }
            }
        }
    }
    if reasons.is_empty() {
        None
    } else {
        Some(conflict(reasons.join(" and ")))
    }
}

/// Same argument names with the same printed values, in any order.
fn same_arguments(a: &[Argument], b: &[Argument]) -> bool {
    a.len() == b.len()
        && a.iter().all(|arg| {
            b.iter().any(|other| {
                other.name.as_str() == arg.name.as_str()
                    && print_value(&other.value) == print_value(&arg.value)
            })
        })
}

/// Whether two return types cannot be merged into one response shape.
fn types_conflict(cx: &Context<'_>, a: &TypeRef, b: &TypeRef) -> bool {
    match (a, b) {
        (TypeRef::List(a), TypeRef::List(b)) => types_conflict(cx, a, b),
        (TypeRef::List(_), _) | (_, TypeRef::List(_)) => true,
        (TypeRef::NonNull(a), TypeRef::NonNull(b)) => types_conflict(cx, a, b),
        (TypeRef::NonNull(_), _) | (_, TypeRef::NonNull(_)) => true,
        (TypeRef::Named(a), TypeRef::Named(b)) => {
            let is_leaf = |name: &str| cx.get_type(name).is_some_and(TypeDef::is_leaf);
            (is_leaf(a) || is_leaf(b)) && a != b
        }
    }
}
