use std::{
    fmt::{Display, Formatter as FmtFormatter, Result as FmtResult},
    sync::Arc,
};

use graphql_parser::query as query_ast;

use crate::{
    ast::{
        arguments::Directive,
        selection_set::{
            FieldSelection, FragmentSpreadSelection, InlineFragmentSelection, SelectionSet,
        },
    },
    utils::pretty_display::PrettyDisplay,
};

/// A single node of a selection tree.
///
/// Fields with an empty child set are leaves. Fragments are markers: inline
/// fragments are looked through when addressing paths, spreads are opaque.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionItem {
    Field(Arc<FieldSelection>),
    InlineFragment(Arc<InlineFragmentSelection>),
    FragmentSpread(Arc<FragmentSpreadSelection>),
}

impl SelectionItem {
    /// Shorthand for a leaf field without alias or arguments.
    pub fn leaf(name: impl Into<String>) -> Self {
        FieldSelection::new(name).into()
    }

    pub fn is_fragment(&self) -> bool {
        !self.is_field()
    }

    pub fn is_field(&self) -> bool {
        matches!(self, SelectionItem::Field(_))
    }

    pub fn as_field(&self) -> Option<&FieldSelection> {
        match self {
            SelectionItem::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn selection_set(&self) -> Option<&SelectionSet> {
        match self {
            SelectionItem::Field(field) => Some(&field.selections),
            SelectionItem::InlineFragment(fragment) => Some(&fragment.selections),
            SelectionItem::FragmentSpread(_) => None,
        }
    }

    /// Returns a copy of this node with its child set replaced.
    /// Fragment spreads have no children and are returned as is.
    pub fn with_selection_set(&self, selections: SelectionSet) -> Self {
        match self {
            SelectionItem::Field(field) => FieldSelection {
                selections,
                ..field.as_ref().clone()
            }
            .into(),
            SelectionItem::InlineFragment(fragment) => InlineFragmentSelection {
                selections,
                ..fragment.as_ref().clone()
            }
            .into(),
            SelectionItem::FragmentSpread(_) => self.clone(),
        }
    }

    /// Whether both items point at the same allocation.
    pub fn ptr_eq(&self, other: &SelectionItem) -> bool {
        match (self, other) {
            (SelectionItem::Field(a), SelectionItem::Field(b)) => Arc::ptr_eq(a, b),
            (SelectionItem::InlineFragment(a), SelectionItem::InlineFragment(b)) => {
                Arc::ptr_eq(a, b)
            }
            (SelectionItem::FragmentSpread(a), SelectionItem::FragmentSpread(b)) => {
                Arc::ptr_eq(a, b)
            }
            _ => false,
        }
    }
}

impl Display for SelectionItem {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        match self {
            SelectionItem::Field(field) => write!(f, "{}", field),
            SelectionItem::InlineFragment(fragment) => write!(f, "{}", fragment),
            SelectionItem::FragmentSpread(spread) => write!(f, "{}", spread),
        }
    }
}

impl PrettyDisplay for SelectionItem {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        match self {
            SelectionItem::Field(field) => field.pretty_fmt(f, depth),
            SelectionItem::InlineFragment(fragment) => fragment.pretty_fmt(f, depth),
            SelectionItem::FragmentSpread(spread) => spread.pretty_fmt(f, depth),
        }
    }
}

impl From<&query_ast::SelectionSet<'_, String>> for SelectionSet {
    fn from(selection_set: &query_ast::SelectionSet<'_, String>) -> Self {
        selection_set.items.iter().map(SelectionItem::from).collect()
    }
}

impl From<&query_ast::Selection<'_, String>> for SelectionItem {
    fn from(selection: &query_ast::Selection<'_, String>) -> Self {
        match selection {
            query_ast::Selection::Field(field) => FieldSelection::from(field).into(),
            query_ast::Selection::InlineFragment(fragment) => {
                InlineFragmentSelection::from(fragment).into()
            }
            query_ast::Selection::FragmentSpread(spread) => {
                FragmentSpreadSelection::from(spread).into()
            }
        }
    }
}

impl From<&query_ast::Field<'_, String>> for FieldSelection {
    fn from(field: &query_ast::Field<'_, String>) -> Self {
        Self {
            name: field.name.clone(),
            alias: field.alias.clone(),
            arguments: match field.arguments.len() {
                0 => None,
                _ => Some((&field.arguments).into()),
            },
            directives: field.directives.iter().map(Directive::from).collect(),
            selections: (&field.selection_set).into(),
        }
    }
}

impl From<&query_ast::InlineFragment<'_, String>> for InlineFragmentSelection {
    fn from(fragment: &query_ast::InlineFragment<'_, String>) -> Self {
        Self {
            type_condition: fragment
                .type_condition
                .as_ref()
                .map(|query_ast::TypeCondition::On(type_name)| type_name.clone()),
            directives: fragment.directives.iter().map(Directive::from).collect(),
            selections: (&fragment.selection_set).into(),
        }
    }
}

impl From<&query_ast::FragmentSpread<'_, String>> for FragmentSpreadSelection {
    fn from(spread: &query_ast::FragmentSpread<'_, String>) -> Self {
        Self {
            fragment_name: spread.fragment_name.clone(),
            directives: spread.directives.iter().map(Directive::from).collect(),
        }
    }
}
