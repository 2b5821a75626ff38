//! Argument rules for fields and directives.
//!
//! Arguments of unknown fields or directives are skipped: the unknown
//! definition is already reported.

use indexmap::IndexMap;

use super::visitor::{ArgumentSite, Visitor, walk_all};
use super::{Context, suggest};
use crate::ast::Argument;
use crate::diagnostics::DiagnosticKind;
use crate::source::Span;

pub fn check_known_arguments(cx: &mut Context<'_>) {
    walk_all(&mut KnownArguments, cx);
}

pub fn check_unique_arguments(cx: &mut Context<'_>) {
    walk_all(&mut UniqueArguments, cx);
}

pub fn check_required_arguments(cx: &mut Context<'_>) {
    walk_all(&mut RequiredArguments, cx);
}

struct KnownArguments;

impl<'a> Visitor<'a> for KnownArguments {
    fn arguments(&mut self, cx: &mut Context<'a>, site: ArgumentSite<'a>, arguments: &'a [Argument]) {
        let Some(declared) = site.declared() else {
            return;
        };
        for argument in arguments {
            let name = argument.name.as_str();
            if declared.contains_key(name) {
                continue;
            }
            let builder = cx
                .report(DiagnosticKind::UnknownArgument, argument.name.span)
                .message(format!("`{name}` on {}", site.describe()));
            suggest(builder, name, declared.keys().map(String::as_str)).emit();
        }
    }
}

struct UniqueArguments;

impl<'a> Visitor<'a> for UniqueArguments {
    fn arguments(&mut self, cx: &mut Context<'a>, _site: ArgumentSite<'a>, arguments: &'a [Argument]) {
        let source = cx.current().map(|unit| unit.source).unwrap_or_default();
        let mut seen: IndexMap<&str, Span> = IndexMap::new();
        for argument in arguments {
            let name = argument.name.as_str();
            match seen.get(name) {
                Some(&first) => {
                    cx.report(DiagnosticKind::DuplicateArgument, argument.name.span)
                        .message(name)
                        .related_to(source, first, "first provided here")
                        .emit();
                }
                None => {
                    seen.insert(name, argument.name.span);
                }
            }
        }
    }
}

struct RequiredArguments;

impl<'a> Visitor<'a> for RequiredArguments {
    fn arguments(&mut self, cx: &mut Context<'a>, site: ArgumentSite<'a>, arguments: &'a [Argument]) {
        let Some(declared) = site.declared() else {
            return;
        };
        let (span, subject) = match site {
            ArgumentSite::Field { field, .. } => {
                (field.span, format!("field `{}`", field.name.as_str()))
            }
            ArgumentSite::Directive { directive, .. } => {
                (directive.span, format!("directive `@{}`", directive.name.as_str()))
            }
        };
        for def in declared.values() {
            if !def.is_required() {
                continue;
            }
            // An explicit `null` is caught by value checking, not here.
            if arguments.iter().any(|a| a.name.as_str() == def.name) {
                continue;
            }
            cx.report(DiagnosticKind::MissingRequiredArgument, span)
                .message(format!(
                    "{subject} argument `{}` of type `{}` is required, but it was not provided",
                    def.name, def.ty
                ))
                .emit();
        }
    }
}
