//! Literal values against their expected input types.
//!
//! Variables are skipped here; whether a variable fits its position is
//! checked in `variables`.

use indexmap::IndexMap;
use quire_core::{InputValueDef, TypeDef, TypeRef};

use super::visitor::{ArgumentSite, Visitor, walk_all};
use super::{Context, suggest};
use crate::ast::{Argument, Value, ValueKind, VariableDefinition};
use crate::diagnostics::DiagnosticKind;
use crate::printer::print_value;
use crate::source::Span;

pub fn check_values_of_correct_type(cx: &mut Context<'_>) {
    walk_all(&mut ValuesOfCorrectType, cx);
}

pub fn check_unique_input_fields(cx: &mut Context<'_>) {
    walk_all(&mut UniqueInputFields, cx);
}

struct ValuesOfCorrectType;

impl<'a> Visitor<'a> for ValuesOfCorrectType {
    fn variable_definition(&mut self, cx: &mut Context<'a>, var: &'a VariableDefinition) {
        if let Some(default) = &var.default_value {
            check_value(cx, default, &var.ty);
        }
    }

    fn argument(
        &mut self,
        cx: &mut Context<'a>,
        _site: ArgumentSite<'a>,
        argument: &'a Argument,
        def: Option<&'a InputValueDef>,
    ) {
        if let Some(def) = def {
            check_value(cx, &argument.value, &def.ty);
        }
    }
}

fn report_mismatch(cx: &mut Context<'_>, value: &Value, ty: &TypeRef) {
    cx.report(DiagnosticKind::InvalidValue, value.span)
        .message(format!(
            "expected value of type `{ty}`, found {}",
            print_value(value)
        ))
        .emit();
}

fn check_value(cx: &mut Context<'_>, value: &Value, ty: &TypeRef) {
    if matches!(value.kind, ValueKind::Variable(_)) {
        return;
    }
    match ty {
        TypeRef::NonNull(inner) => {
            if value.kind == ValueKind::Null {
                report_mismatch(cx, value, ty);
            } else {
                check_value(cx, value, inner);
            }
        }
        _ if value.kind == ValueKind::Null => {}
        TypeRef::List(item) => match &value.kind {
            ValueKind::List(items) => {
                for element in items {
                    check_value(cx, element, item);
                }
            }
            // A single item is coerced to a one-element list.
            _ => check_value(cx, value, item),
        },
        TypeRef::Named(name) => {
            let Some(def) = cx.get_type(name) else {
                return;
            };
            match def {
                TypeDef::Scalar { name } => check_scalar(cx, value, name, ty),
                TypeDef::Enum { values, .. } => check_enum(cx, value, values, ty),
                TypeDef::InputObject { name, fields } => {
                    check_input_object(cx, value, name, fields, ty)
                }
                // Output types never reach input positions in a valid schema.
                _ => {}
            }
        }
    }
}

fn check_scalar(cx: &mut Context<'_>, value: &Value, scalar: &str, ty: &TypeRef) {
    let accepted = match (scalar, &value.kind) {
        ("Int", ValueKind::Int(raw)) => {
            if raw.parse::<i32>().is_err() {
                cx.report(DiagnosticKind::InvalidValue, value.span)
                    .message(format!(
                        "`Int` cannot represent non 32-bit signed integer value {raw}"
                    ))
                    .emit();
            }
            true
        }
        ("Float", ValueKind::Int(_) | ValueKind::Float(_)) => true,
        ("String", ValueKind::String(_)) => true,
        ("Boolean", ValueKind::Boolean(_)) => true,
        ("ID", ValueKind::String(_) | ValueKind::Int(_)) => true,
        ("Int" | "Float" | "String" | "Boolean" | "ID", _) => false,
        // Custom scalars accept any literal.
        _ => true,
    };
    if !accepted {
        report_mismatch(cx, value, ty);
    }
}

fn check_enum(cx: &mut Context<'_>, value: &Value, values: &[String], ty: &TypeRef) {
    let ValueKind::Enum(name) = &value.kind else {
        report_mismatch(cx, value, ty);
        return;
    };
    if values.iter().any(|v| v == name) {
        return;
    }
    let builder = cx
        .report(DiagnosticKind::InvalidValue, value.span)
        .message(format!(
            "value `{name}` does not exist in `{}` enum",
            ty.base_name()
        ));
    suggest(builder, name, values.iter().map(String::as_str)).emit();
}

fn check_input_object(
    cx: &mut Context<'_>,
    value: &Value,
    type_name: &str,
    fields: &IndexMap<String, InputValueDef>,
    ty: &TypeRef,
) {
    let ValueKind::Object(provided) = &value.kind else {
        report_mismatch(cx, value, ty);
        return;
    };

    for field in provided {
        let name = field.name.as_str();
        match fields.get(name) {
            Some(def) => check_value(cx, &field.value, &def.ty),
            None => {
                let builder = cx
                    .report(DiagnosticKind::InvalidValue, field.name.span)
                    .message(format!(
                        "field `{name}` is not defined by type `{type_name}`"
                    ));
                suggest(builder, name, fields.keys().map(String::as_str)).emit();
            }
        }
    }

    for def in fields.values() {
        let present = provided.iter().any(|f| f.name.as_str() == def.name);
        if !present && def.is_required() {
            cx.report(DiagnosticKind::InvalidValue, value.span)
                .message(format!(
                    "field `{type_name}.{}` of required type `{}` was not provided",
                    def.name, def.ty
                ))
                .emit();
        }
    }
}

struct UniqueInputFields;

impl UniqueInputFields {
    fn check(cx: &mut Context<'_>, value: &Value) {
        let source = cx.current().map(|unit| unit.source).unwrap_or_default();
        let mut stack = vec![value];
        while let Some(value) = stack.pop() {
            match &value.kind {
                ValueKind::List(items) => stack.extend(items.iter().rev()),
                ValueKind::Object(fields) => {
                    let mut seen: IndexMap<&str, Span> = IndexMap::new();
                    for field in fields {
                        let name = field.name.as_str();
                        match seen.get(name) {
                            Some(&first) => {
                                cx.report(DiagnosticKind::DuplicateInputField, field.name.span)
                                    .message(name)
                                    .related_to(source, first, "first provided here")
                                    .emit();
                            }
                            None => {
                                seen.insert(name, field.name.span);
                            }
                        }
                    }
                    stack.extend(fields.iter().rev().map(|f| &f.value));
                }
                _ => {}
            }
        }
    }
}

impl<'a> Visitor<'a> for UniqueInputFields {
    fn variable_definition(&mut self, cx: &mut Context<'a>, var: &'a VariableDefinition) {
        if let Some(default) = &var.default_value {
            Self::check(cx, default);
        }
    }

    fn argument(
        &mut self,
        cx: &mut Context<'a>,
        _site: ArgumentSite<'a>,
        argument: &'a Argument,
        _def: Option<&'a InputValueDef>,
    ) {
        Self::check(cx, &argument.value);
    }
}
