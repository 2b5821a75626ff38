//! Type-aware walk over executable definitions.
//!
//! # Usage
//!
//! Implement `Visitor` for a rule and override the hooks it needs; the
//! walker tracks the parent type of every selection set and looks up field,
//! argument and directive definitions on the way down. Fragment spreads are
//! reported but not followed: every fragment is walked as its own unit.

use indexmap::IndexMap;
use quire_core::{DirectiveDef, DirectiveLocation, FieldDef, InputValueDef, TypeDef};

use super::{Context, DefinitionRef, Unit};
use crate::ast::{
    Argument, Directive, Field, FragmentDefinition, FragmentSpread, InlineFragment,
    OperationDefinition, Selection, SelectionSet, VariableDefinition,
};

/// Where a list of arguments is applied.
#[derive(Debug, Clone, Copy)]
pub enum ArgumentSite<'a> {
    Field {
        parent: Option<&'a TypeDef>,
        field: &'a Field,
        def: Option<&'a FieldDef>,
    },
    Directive {
        directive: &'a Directive,
        def: Option<&'a DirectiveDef>,
    },
}

impl<'a> ArgumentSite<'a> {
    /// Declared arguments, if the field or directive itself is known.
    pub fn declared(&self) -> Option<&'a IndexMap<String, InputValueDef>> {
        match *self {
            Self::Field { def, .. } => def.map(|d| &d.args),
            Self::Directive { def, .. } => def.map(|d| &d.args),
        }
    }

    pub fn argument(&self, name: &str) -> Option<&'a InputValueDef> {
        self.declared()?.get(name)
    }

    /// Owner of the arguments as phrased in messages.
    pub fn describe(&self) -> String {
        match *self {
            Self::Field { parent, field, .. } => match parent {
                Some(parent) => format!("field `{}.{}`", parent.name(), field.name.as_str()),
                None => format!("field `{}`", field.name.as_str()),
            },
            Self::Directive { directive, .. } => format!("directive `@{}`", directive.name.as_str()),
        }
    }
}

#[allow(unused_variables)]
pub trait Visitor<'a> {
    fn enter_operation(&mut self, cx: &mut Context<'a>, op: &'a OperationDefinition) {}

    fn leave_operation(&mut self, cx: &mut Context<'a>, op: &'a OperationDefinition) {}

    fn enter_fragment(&mut self, cx: &mut Context<'a>, frag: &'a FragmentDefinition) {}

    fn leave_fragment(&mut self, cx: &mut Context<'a>, frag: &'a FragmentDefinition) {}

    fn variable_definition(&mut self, cx: &mut Context<'a>, var: &'a VariableDefinition) {}

    fn selection_set(
        &mut self,
        cx: &mut Context<'a>,
        parent: Option<&'a TypeDef>,
        set: &'a SelectionSet,
    ) {
    }

    fn field(
        &mut self,
        cx: &mut Context<'a>,
        parent: Option<&'a TypeDef>,
        field: &'a Field,
        def: Option<&'a FieldDef>,
    ) {
    }

    fn inline_fragment(
        &mut self,
        cx: &mut Context<'a>,
        parent: Option<&'a TypeDef>,
        inline: &'a InlineFragment,
    ) {
    }

    fn fragment_spread(
        &mut self,
        cx: &mut Context<'a>,
        parent: Option<&'a TypeDef>,
        spread: &'a FragmentSpread,
    ) {
    }

    fn directives(
        &mut self,
        cx: &mut Context<'a>,
        location: DirectiveLocation,
        directives: &'a [Directive],
    ) {
    }

    fn arguments(&mut self, cx: &mut Context<'a>, site: ArgumentSite<'a>, arguments: &'a [Argument]) {}

    /// One argument, with its declaration if the field or directive declares it.
    fn argument(
        &mut self,
        cx: &mut Context<'a>,
        site: ArgumentSite<'a>,
        argument: &'a Argument,
        def: Option<&'a InputValueDef>,
    ) {
    }
}

/// Walk every unit of the run in order.
pub fn walk_all<'a, V: Visitor<'a>>(visitor: &mut V, cx: &mut Context<'a>) {
    let units = cx.units().to_vec();
    for unit in units {
        walk_unit(visitor, cx, unit);
    }
}

pub fn walk_unit<'a, V: Visitor<'a>>(visitor: &mut V, cx: &mut Context<'a>, unit: Unit<'a>) {
    let previous = cx.current();
    cx.set_current(Some(unit));
    match unit.definition {
        DefinitionRef::Operation(op) => walk_operation(visitor, cx, op),
        DefinitionRef::Fragment(frag) => walk_fragment(visitor, cx, frag),
    }
    cx.set_current(previous);
}

fn walk_operation<'a, V: Visitor<'a>>(
    visitor: &mut V,
    cx: &mut Context<'a>,
    op: &'a OperationDefinition,
) {
    visitor.enter_operation(cx, op);
    for var in &op.variables {
        visitor.variable_definition(cx, var);
        walk_directives(visitor, cx, DirectiveLocation::VariableDefinition, &var.directives);
    }
    walk_directives(
        visitor,
        cx,
        DirectiveLocation::for_operation(op.kind),
        &op.directives,
    );
    let root = cx.schema.root_type(op.kind);
    walk_selection_set(visitor, cx, root, &op.selection_set);
    visitor.leave_operation(cx, op);
}

fn walk_fragment<'a, V: Visitor<'a>>(
    visitor: &mut V,
    cx: &mut Context<'a>,
    frag: &'a FragmentDefinition,
) {
    visitor.enter_fragment(cx, frag);
    walk_directives(
        visitor,
        cx,
        DirectiveLocation::FragmentDefinition,
        &frag.directives,
    );
    let parent = cx.get_type(frag.type_condition.as_str());
    walk_selection_set(visitor, cx, parent, &frag.selection_set);
    visitor.leave_fragment(cx, frag);
}

pub fn walk_selection_set<'a, V: Visitor<'a>>(
    visitor: &mut V,
    cx: &mut Context<'a>,
    parent: Option<&'a TypeDef>,
    set: &'a SelectionSet,
) {
    visitor.selection_set(cx, parent, set);
    for selection in &set.selections {
        match selection {
            Selection::Field(field) => {
                let def = parent.and_then(|p| cx.schema.field(p, field.name.as_str()));
                visitor.field(cx, parent, field, def);
                walk_arguments(
                    visitor,
                    cx,
                    ArgumentSite::Field { parent, field, def },
                    &field.arguments,
                );
                walk_directives(visitor, cx, DirectiveLocation::Field, &field.directives);
                if let Some(set) = &field.selection_set {
                    let child = def.and_then(|d| cx.get_type(d.ty.base_name()));
                    walk_selection_set(visitor, cx, child, set);
                }
            }
            Selection::InlineFragment(inline) => {
                visitor.inline_fragment(cx, parent, inline);
                walk_directives(
                    visitor,
                    cx,
                    DirectiveLocation::InlineFragment,
                    &inline.directives,
                );
                let child = match &inline.type_condition {
                    Some(name) => cx.get_type(name.as_str()),
                    None => parent,
                };
                walk_selection_set(visitor, cx, child, &inline.selection_set);
            }
            Selection::FragmentSpread(spread) => {
                visitor.fragment_spread(cx, parent, spread);
                walk_directives(
                    visitor,
                    cx,
                    DirectiveLocation::FragmentSpread,
                    &spread.directives,
                );
            }
        }
    }
}

fn walk_directives<'a, V: Visitor<'a>>(
    visitor: &mut V,
    cx: &mut Context<'a>,
    location: DirectiveLocation,
    directives: &'a [Directive],
) {
    if directives.is_empty() {
        return;
    }
    visitor.directives(cx, location, directives);
    for directive in directives {
        let def = cx.schema.directive(directive.name.as_str());
        walk_arguments(
            visitor,
            cx,
            ArgumentSite::Directive { directive, def },
            &directive.arguments,
        );
    }
}

fn walk_arguments<'a, V: Visitor<'a>>(
    visitor: &mut V,
    cx: &mut Context<'a>,
    site: ArgumentSite<'a>,
    arguments: &'a [Argument],
) {
    visitor.arguments(cx, site, arguments);
    for argument in arguments {
        let def = site.argument(argument.name.as_str());
        visitor.argument(cx, site, argument, def);
    }
}
