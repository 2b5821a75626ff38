//! Canonical printer for executable documents.
//!
//! Output follows the conventional GraphQL print format: two-space
//! indentation, one selection per line, arguments joined by `, `, and
//! definitions separated by a blank line. The same AST always prints to the
//! same text, which makes printed text usable as a fragment identity.

use crate::ast::{
    Argument, Definition, Directive, Document, FragmentDefinition, OperationDefinition,
    Selection, SelectionSet, Value, ValueKind, VariableDefinition,
};
use quire_core::OperationKind;

pub fn print_document(document: &Document) -> String {
    document
        .definitions
        .iter()
        .map(print_definition)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn print_definition(definition: &Definition) -> String {
    match definition {
        Definition::Operation(op) => print_operation(op),
        Definition::Fragment(frag) => print_fragment(frag),
    }
}

pub fn print_operation(op: &OperationDefinition) -> String {
    let mut out = String::new();
    let shorthand = op.kind == OperationKind::Query
        && op.name.is_none()
        && op.variables.is_empty()
        && op.directives.is_empty();

    if !shorthand {
        out.push_str(op.kind.as_str());
        if let Some(name) = &op.name {
            out.push(' ');
            out.push_str(name.as_str());
        }
        if !op.variables.is_empty() {
            if op.name.is_none() {
                out.push(' ');
            }
            out.push('(');
            let vars: Vec<String> = op.variables.iter().map(print_variable_definition).collect();
            out.push_str(&vars.join(", "));
            out.push(')');
        }
        push_directives(&mut out, &op.directives);
        out.push(' ');
    }

    print_selection_set(&mut out, &op.selection_set, 0);
    out
}

pub fn print_fragment(frag: &FragmentDefinition) -> String {
    let mut out = format!(
        "fragment {} on {}",
        frag.name.as_str(),
        frag.type_condition.as_str()
    );
    push_directives(&mut out, &frag.directives);
    out.push(' ');
    print_selection_set(&mut out, &frag.selection_set, 0);
    out
}

fn print_variable_definition(var: &VariableDefinition) -> String {
    let mut out = format!("${}: {}", var.variable.as_str(), var.ty);
    if let Some(default) = &var.default_value {
        out.push_str(" = ");
        out.push_str(&print_value(default));
    }
    push_directives(&mut out, &var.directives);
    out
}

fn print_selection_set(out: &mut String, set: &SelectionSet, level: usize) {
    out.push('{');
    for selection in &set.selections {
        out.push('\n');
        push_indent(out, level + 1);
        print_selection(out, selection, level + 1);
    }
    out.push('\n');
    push_indent(out, level);
    out.push('}');
}

fn print_selection(out: &mut String, selection: &Selection, level: usize) {
    match selection {
        Selection::Field(field) => {
            if let Some(alias) = &field.alias {
                out.push_str(alias.as_str());
                out.push_str(": ");
            }
            out.push_str(field.name.as_str());
            push_arguments(out, &field.arguments);
            push_directives(out, &field.directives);
            if let Some(set) = &field.selection_set {
                out.push(' ');
                print_selection_set(out, set, level);
            }
        }
        Selection::FragmentSpread(spread) => {
            out.push_str("...");
            out.push_str(spread.name.as_str());
            push_directives(out, &spread.directives);
        }
        Selection::InlineFragment(inline) => {
            out.push_str("...");
            if let Some(ty) = &inline.type_condition {
                out.push_str(" on ");
                out.push_str(ty.as_str());
            }
            push_directives(out, &inline.directives);
            out.push(' ');
            print_selection_set(out, &inline.selection_set, level);
        }
    }
}

fn push_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

fn push_arguments(out: &mut String, arguments: &[Argument]) {
    if arguments.is_empty() {
        return;
    }
    let args: Vec<String> = arguments
        .iter()
        .map(|arg| format!("{}: {}", arg.name.as_str(), print_value(&arg.value)))
        .collect();
    out.push('(');
    out.push_str(&args.join(", "));
    out.push(')');
}

fn push_directives(out: &mut String, directives: &[Directive]) {
    for directive in directives {
        out.push_str(" @");
        out.push_str(directive.name.as_str());
        push_arguments(out, &directive.arguments);
    }
}

pub fn print_value(value: &Value) -> String {
    match &value.kind {
        ValueKind::Variable(name) => format!("${name}"),
        ValueKind::Int(raw) | ValueKind::Float(raw) | ValueKind::Enum(raw) => raw.clone(),
        ValueKind::String(s) => print_string(s),
        ValueKind::Boolean(b) => b.to_string(),
        ValueKind::Null => "null".to_string(),
        ValueKind::List(items) => {
            let items: Vec<String> = items.iter().map(print_value).collect();
            format!("[{}]", items.join(", "))
        }
        ValueKind::Object(fields) => {
            let fields: Vec<String> = fields
                .iter()
                .map(|f| format!("{}: {}", f.name.as_str(), print_value(&f.value)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
    }
}

fn print_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 || c == '\u{007F}' => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
