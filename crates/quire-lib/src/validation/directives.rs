//! Directive rules: known, placed where declared, not repeated.

use indexmap::IndexMap;
use quire_core::DirectiveLocation;

use super::visitor::{Visitor, walk_all};
use super::{Context, suggest};
use crate::ast::Directive;
use crate::diagnostics::DiagnosticKind;
use crate::source::Span;

pub fn check_known_directives(cx: &mut Context<'_>) {
    walk_all(&mut KnownDirectives, cx);
}

pub fn check_unique_directives(cx: &mut Context<'_>) {
    walk_all(&mut UniqueDirectives, cx);
}

struct KnownDirectives;

impl<'a> Visitor<'a> for KnownDirectives {
    fn directives(
        &mut self,
        cx: &mut Context<'a>,
        location: DirectiveLocation,
        directives: &'a [Directive],
    ) {
        let schema = cx.schema;
        for directive in directives {
            let name = directive.name.as_str();
            let Some(def) = schema.directive(name) else {
                let builder = cx
                    .report(DiagnosticKind::UnknownDirective, directive.name.span)
                    .message(name);
                suggest(builder, name, schema.directive_names()).emit();
                continue;
            };
            if !def.locations.contains(&location) {
                cx.report(DiagnosticKind::MisplacedDirective, directive.span)
                    .message(format!("directive `@{name}` may not be used on {location}"))
                    .emit();
            }
        }
    }
}

struct UniqueDirectives;

impl<'a> Visitor<'a> for UniqueDirectives {
    fn directives(
        &mut self,
        cx: &mut Context<'a>,
        _location: DirectiveLocation,
        directives: &'a [Directive],
    ) {
        let source = cx.current().map(|unit| unit.source).unwrap_or_default();
        let schema = cx.schema;
        let mut seen: IndexMap<&str, Span> = IndexMap::new();
        for directive in directives {
            let name = directive.name.as_str();
            // Unknown directives are reported once, by the rule above.
            let Some(def) = schema.directive(name) else {
                continue;
            };
            if def.repeatable {
                continue;
            }
            match seen.get(name) {
                Some(&first) => {
                    cx.report(DiagnosticKind::DuplicateDirective, directive.span)
                        .message(name)
                        .related_to(source, first, "first used here")
                        .emit();
                }
                None => {
                    seen.insert(name, directive.span);
                }
            }
        }
    }
}
