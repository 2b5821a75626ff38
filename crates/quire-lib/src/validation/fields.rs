//! Field selection rules.

use quire_core::{FieldDef, TypeDef};

use super::visitor::{Visitor, walk_all};
use super::{Context, suggest};
use crate::ast::{Field, FragmentSpread, InlineFragment};
use crate::diagnostics::DiagnosticKind;

pub fn check_scalar_leafs(cx: &mut Context<'_>) {
    walk_all(&mut ScalarLeafs, cx);
}

pub fn check_fields_on_correct_type(cx: &mut Context<'_>) {
    walk_all(&mut FieldsOnCorrectType, cx);
}

pub fn check_possible_fragment_spreads(cx: &mut Context<'_>) {
    walk_all(&mut PossibleSpreads, cx);
}

struct ScalarLeafs;

impl<'a> Visitor<'a> for ScalarLeafs {
    fn field(
        &mut self,
        cx: &mut Context<'a>,
        _parent: Option<&'a TypeDef>,
        field: &'a Field,
        def: Option<&'a FieldDef>,
    ) {
        let Some(def) = def else {
            return;
        };
        let Some(ty) = cx.get_type(def.ty.base_name()) else {
            return;
        };
        match (&field.selection_set, ty.is_leaf()) {
            (Some(set), true) => {
                cx.report(DiagnosticKind::SelectionOnLeafField, set.span)
                    .message(format!(
                        "field `{}` must not have a selection since type `{}` has no subfields",
                        field.name.as_str(),
                        def.ty
                    ))
                    .emit();
            }
            (None, false) => {
                cx.report(DiagnosticKind::MissingSelectionSet, field.span)
                    .message(format!(
                        "field `{}` of type `{}` must have a selection of subfields",
                        field.name.as_str(),
                        def.ty
                    ))
                    .emit();
            }
            _ => {}
        }
    }
}

struct FieldsOnCorrectType;

impl<'a> Visitor<'a> for FieldsOnCorrectType {
    fn field(
        &mut self,
        cx: &mut Context<'a>,
        parent: Option<&'a TypeDef>,
        field: &'a Field,
        def: Option<&'a FieldDef>,
    ) {
        let Some(parent) = parent else {
            return;
        };
        if def.is_some() {
            return;
        }
        let name = field.name.as_str();
        let candidates: Vec<&str> = parent
            .fields()
            .map(|fields| fields.keys().map(String::as_str).collect())
            .unwrap_or_default();
        let builder = cx
            .report(DiagnosticKind::UnknownField, field.name.span)
            .message(format!("`{name}` on type `{}`", parent.name()));
        suggest(builder, name, candidates).emit();
    }
}

struct PossibleSpreads;

impl PossibleSpreads {
    fn overlaps(cx: &Context<'_>, parent: &TypeDef, condition: &TypeDef) -> bool {
        !parent.is_composite() || !condition.is_composite() || cx.schema.do_types_overlap(parent, condition)
    }
}

impl<'a> Visitor<'a> for PossibleSpreads {
    fn inline_fragment(
        &mut self,
        cx: &mut Context<'a>,
        parent: Option<&'a TypeDef>,
        inline: &'a InlineFragment,
    ) {
        let (Some(parent), Some(condition)) = (parent, inline.type_condition.as_ref()) else {
            return;
        };
        let Some(condition_ty) = cx.get_type(condition.as_str()) else {
            return;
        };
        if Self::overlaps(cx, parent, condition_ty) {
            return;
        }
        cx.report(DiagnosticKind::ImpossibleFragmentSpread, inline.span)
            .message(format!(
                "fragment cannot be spread here as objects of type `{}` can never be of type `{}`",
                parent.name(),
                condition_ty.name()
            ))
            .emit();
    }

    fn fragment_spread(
        &mut self,
        cx: &mut Context<'a>,
        parent: Option<&'a TypeDef>,
        spread: &'a FragmentSpread,
    ) {
        let Some(parent) = parent else {
            return;
        };
        let Some((_, frag)) = cx.fragment(spread.name.as_str()) else {
            return;
        };
        let Some(condition_ty) = cx.get_type(frag.type_condition.as_str()) else {
            return;
        };
        if Self::overlaps(cx, parent, condition_ty) {
            return;
        }
        cx.report(DiagnosticKind::ImpossibleFragmentSpread, spread.span)
            .message(format!(
                "fragment `{}` cannot be spread here as objects of type `{}` can never be of type `{}`",
                spread.name.as_str(),
                parent.name(),
                condition_ty.name()
            ))
            .emit();
    }
}
