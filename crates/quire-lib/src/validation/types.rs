//! Rules about type names used in definitions.

use quire_core::{TypeDef, TypeRef};

use super::visitor::{Visitor, walk_all};
use super::{Context, suggest};
use crate::ast::{FragmentDefinition, InlineFragment, Name, VariableDefinition};
use crate::diagnostics::DiagnosticKind;
use crate::source::Span;

pub fn check_known_types(cx: &mut Context<'_>) {
    walk_all(&mut KnownTypes, cx);
}

pub fn check_fragments_on_composite_types(cx: &mut Context<'_>) {
    walk_all(&mut CompositeConditions, cx);
}

pub fn check_variables_are_input_types(cx: &mut Context<'_>) {
    walk_all(&mut InputVariables, cx);
}

struct KnownTypes;

impl KnownTypes {
    fn check(&self, cx: &mut Context<'_>, name: &str, span: Span, exact_span: bool) {
        if cx.get_type(name).is_some() {
            return;
        }
        let schema = cx.schema;
        let builder = cx.report(DiagnosticKind::UnknownType, span).message(name);
        let builder = if exact_span {
            suggest(builder, name, schema.type_names())
        } else {
            builder
        };
        builder.emit();
    }

    fn check_name(&self, cx: &mut Context<'_>, name: &Name) {
        self.check(cx, name.as_str(), name.span, true);
    }
}

impl<'a> Visitor<'a> for KnownTypes {
    fn enter_fragment(&mut self, cx: &mut Context<'a>, frag: &'a FragmentDefinition) {
        self.check_name(cx, &frag.type_condition);
    }

    fn variable_definition(&mut self, cx: &mut Context<'a>, var: &'a VariableDefinition) {
        let name = var.ty.base_name();
        // The span is exact when the type is not wrapped in a list.
        match var.ty.nullable() {
            TypeRef::Named(_) => {
                let span = Span::new(var.ty_span.start, var.ty_span.start + name.len() as u32);
                self.check(cx, name, span, true);
            }
            _ => self.check(cx, name, var.ty_span, false),
        }
    }

    fn inline_fragment(
        &mut self,
        cx: &mut Context<'a>,
        _parent: Option<&'a TypeDef>,
        inline: &'a InlineFragment,
    ) {
        if let Some(name) = &inline.type_condition {
            self.check_name(cx, name);
        }
    }
}

struct CompositeConditions;

impl<'a> Visitor<'a> for CompositeConditions {
    fn enter_fragment(&mut self, cx: &mut Context<'a>, frag: &'a FragmentDefinition) {
        let condition = &frag.type_condition;
        if cx.get_type(condition.as_str()).is_some_and(|ty| !ty.is_composite()) {
            cx.report(DiagnosticKind::FragmentOnNonCompositeType, condition.span)
                .message(format!(
                    "fragment `{}` cannot condition on non-composite type `{}`",
                    frag.name.as_str(),
                    condition.as_str()
                ))
                .emit();
        }
    }

    fn inline_fragment(
        &mut self,
        cx: &mut Context<'a>,
        _parent: Option<&'a TypeDef>,
        inline: &'a InlineFragment,
    ) {
        let Some(condition) = &inline.type_condition else {
            return;
        };
        if cx.get_type(condition.as_str()).is_some_and(|ty| !ty.is_composite()) {
            cx.report(DiagnosticKind::FragmentOnNonCompositeType, condition.span)
                .message(format!(
                    "fragment cannot condition on non-composite type `{}`",
                    condition.as_str()
                ))
                .emit();
        }
    }
}

struct InputVariables;

impl<'a> Visitor<'a> for InputVariables {
    fn variable_definition(&mut self, cx: &mut Context<'a>, var: &'a VariableDefinition) {
        let known_non_input = cx
            .get_type(var.ty.base_name())
            .is_some_and(|ty| !ty.is_input());
        if known_non_input {
            cx.report(DiagnosticKind::VariableNotInputType, var.ty_span)
                .message(format!(
                    "variable `${}` cannot be non-input type `{}`",
                    var.variable.as_str(),
                    var.ty
                ))
                .emit();
        }
    }
}
