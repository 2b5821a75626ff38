//! Variable rules: uniqueness, definition, use, and position.
//!
//! Usages are collected per unit and followed through fragment spreads, so an
//! operation is responsible for every variable its fragments use.

use std::collections::HashMap;

use indexmap::IndexMap;
use quire_core::{InputValueDef, TypeDef, TypeRef};

use super::visitor::{ArgumentSite, Visitor, walk_unit};
use super::{Context, Owner, Unit};
use crate::ast::{Argument, OperationDefinition, Value, ValueKind, VariableDefinition};
use crate::diagnostics::DiagnosticKind;
use crate::source::{SourceId, Span};

/// One `$name` occurrence with what its position expects.
#[derive(Debug, Clone, Copy)]
struct Usage<'a> {
    name: &'a str,
    span: Span,
    unit: Unit<'a>,
    /// Type of the argument or input field the variable is passed to.
    expected: Option<&'a TypeRef>,
    location_has_default: bool,
}

pub fn check_unique_variable_names(cx: &mut Context<'_>) {
    let operations: Vec<_> = cx.operations().collect();
    for (unit, op) in operations {
        let mut seen: IndexMap<&str, Span> = IndexMap::new();
        for var in &op.variables {
            let name = var.variable.as_str();
            match seen.get(name) {
                Some(&first) => {
                    cx.report_in(unit, DiagnosticKind::DuplicateVariable, var.variable.span)
                        .message(name)
                        .related_to(unit.source, first, "first defined here")
                        .emit();
                }
                None => {
                    seen.insert(name, var.variable.span);
                }
            }
        }
    }
}

pub fn check_no_undefined_variables(cx: &mut Context<'_>) {
    let mut usages = UsageIndex::default();
    let operations: Vec<_> = cx.operations().collect();
    for (unit, op) in operations {
        let defined: Vec<&str> = op.variables.iter().map(|v| v.variable.as_str()).collect();
        let mut reported: Vec<(&str, SourceId, Span)> = Vec::new();
        for usage in usages.for_operation(cx, unit, op) {
            let key = (usage.name, usage.unit.source, usage.span);
            if defined.contains(&usage.name) || reported.contains(&key) {
                continue;
            }
            reported.push(key);
            cx.report_for(unit, usage.unit.source, DiagnosticKind::UndefinedVariable, usage.span)
                .message(format!(
                    "variable `${}` is not defined by {}",
                    usage.name,
                    describe_operation(op)
                ))
                .related_to(unit.source, op.head_span(), "operation defined here")
                .emit();
        }
    }
}

pub fn check_no_unused_variables(cx: &mut Context<'_>) {
    let mut usages = UsageIndex::default();
    let operations: Vec<_> = cx.operations().collect();
    for (unit, op) in operations {
        let used = usages.for_operation(cx, unit, op);
        for var in &op.variables {
            let name = var.variable.as_str();
            if used.iter().any(|usage| usage.name == name) {
                continue;
            }
            cx.report_in(unit, DiagnosticKind::UnusedVariable, var.variable.span)
                .message(format!(
                    "variable `${name}` is never used in {}",
                    describe_operation(op)
                ))
                .emit();
        }
    }
}

pub fn check_variables_in_allowed_position(cx: &mut Context<'_>) {
    let mut usages = UsageIndex::default();
    let operations: Vec<_> = cx.operations().collect();
    for (unit, op) in operations {
        let defined: HashMap<&str, &VariableDefinition> = op
            .variables
            .iter()
            .map(|v| (v.variable.as_str(), v))
            .collect();
        for usage in usages.for_operation(cx, unit, op) {
            let (Some(var), Some(expected)) = (defined.get(usage.name), usage.expected) else {
                continue;
            };
            if allowed_in_position(var, expected, usage.location_has_default) {
                continue;
            }
            cx.report_for(
                unit,
                usage.unit.source,
                DiagnosticKind::VariableInWrongPosition,
                usage.span,
            )
            .message(format!(
                "variable `${}` of type `{}` used in position expecting type `{expected}`",
                usage.name, var.ty
            ))
            .related_to(unit.source, var.span, "variable defined here")
            .emit();
        }
    }
}

fn describe_operation(op: &OperationDefinition) -> String {
    match &op.name {
        Some(name) => format!("operation `{}`", name.as_str()),
        None => "the anonymous operation".to_string(),
    }
}

/// A nullable variable may still feed a non-null position when either side
/// supplies a default.
fn allowed_in_position(var: &VariableDefinition, expected: &TypeRef, location_has_default: bool) -> bool {
    if expected.is_non_null() && !var.ty.is_non_null() {
        let var_has_default = var
            .default_value
            .as_ref()
            .is_some_and(|d| d.kind != ValueKind::Null);
        if !var_has_default && !location_has_default {
            return false;
        }
        return var.ty.is_subtype_of(expected.nullable());
    }
    var.ty.is_subtype_of(expected)
}

/// Memoized usages per unit.
#[derive(Default)]
struct UsageIndex<'a> {
    by_owner: HashMap<Owner, Vec<Usage<'a>>>,
}

impl<'a> UsageIndex<'a> {
    fn of_unit(&mut self, cx: &mut Context<'a>, unit: Unit<'a>) -> Vec<Usage<'a>> {
        if let Some(cached) = self.by_owner.get(&unit.owner) {
            return cached.clone();
        }
        let mut collector = UsageCollector { usages: Vec::new() };
        walk_unit(&mut collector, cx, unit);
        self.by_owner.insert(unit.owner, collector.usages.clone());
        collector.usages
    }

    /// The operation's own usages followed by those of every fragment it reaches.
    fn for_operation(
        &mut self,
        cx: &mut Context<'a>,
        unit: Unit<'a>,
        op: &'a OperationDefinition,
    ) -> Vec<Usage<'a>> {
        let mut all = self.of_unit(cx, unit);
        for (fragment_unit, _) in cx.reachable_fragments(&op.selection_set) {
            all.extend(self.of_unit(cx, fragment_unit));
        }
        all
    }
}

struct UsageCollector<'a> {
    usages: Vec<Usage<'a>>,
}

impl<'a> UsageCollector<'a> {
    fn collect(
        &mut self,
        cx: &Context<'a>,
        value: &'a Value,
        expected: Option<&'a TypeRef>,
        location_has_default: bool,
    ) {
        let Some(unit) = cx.current() else {
            return;
        };
        match &value.kind {
            ValueKind::Variable(name) => self.usages.push(Usage {
                name,
                span: value.span,
                unit,
                expected,
                location_has_default,
            }),
            ValueKind::List(items) => {
                let item = expected.and_then(TypeRef::list_item);
                for element in items {
                    self.collect(cx, element, item, false);
                }
            }
            ValueKind::Object(fields) => {
                let input_fields = expected
                    .filter(|ty| !ty.is_list())
                    .and_then(|ty| cx.get_type(ty.base_name()))
                    .and_then(TypeDef::input_fields);
                for field in fields {
                    let def: Option<&'a InputValueDef> =
                        input_fields.and_then(|f| f.get(field.name.as_str()));
                    self.collect(
                        cx,
                        &field.value,
                        def.map(|d| &d.ty),
                        def.is_some_and(|d| d.default_value.is_some()),
                    );
                }
            }
            _ => {}
        }
    }
}

impl<'a> Visitor<'a> for UsageCollector<'a> {
    fn argument(
        &mut self,
        cx: &mut Context<'a>,
        _site: ArgumentSite<'a>,
        argument: &'a Argument,
        def: Option<&'a InputValueDef>,
    ) {
        self.collect(
            cx,
            &argument.value,
            def.map(|d| &d.ty),
            def.is_some_and(|d| d.default_value.is_some()),
        );
    }
}

