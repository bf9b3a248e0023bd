use std::{
    collections::BTreeSet,
    fmt::{Display, Formatter as FmtFormatter, Result as FmtResult},
    sync::Arc,
};

use crate::{
    ast::{
        arguments::{ArgumentsMap, Directive},
        selection_item::SelectionItem,
    },
    utils::pretty_display::{get_indent, PrettyDisplay},
};

/// An ordered list of selections. Items are `Arc`-shared, so cloning a set
/// is shallow and untouched subtrees survive rewrites pointer-identical.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    pub items: Vec<SelectionItem>,
}

impl SelectionSet {
    pub fn new(items: Vec<SelectionItem>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SelectionItem> {
        self.items.iter()
    }

    /// Names of all fragment spreads used in this set, including nested ones.
    pub fn fragment_spreads(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_fragment_spreads(&mut names);
        names
    }

    /// Names of all variables referenced by arguments and directives in this
    /// set, including nested ones. Fragment spreads are not followed.
    pub fn variable_usages(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    pub fn collect_variables(&self, names: &mut BTreeSet<String>) {
        for item in &self.items {
            match item {
                SelectionItem::Field(field) => {
                    if let Some(arguments) = &field.arguments {
                        arguments.collect_variables(names);
                    }
                    field
                        .directives
                        .iter()
                        .for_each(|directive| directive.collect_variables(names));
                    field.selections.collect_variables(names);
                }
                SelectionItem::InlineFragment(fragment) => {
                    fragment
                        .directives
                        .iter()
                        .for_each(|directive| directive.collect_variables(names));
                    fragment.selections.collect_variables(names);
                }
                SelectionItem::FragmentSpread(spread) => spread
                    .directives
                    .iter()
                    .for_each(|directive| directive.collect_variables(names)),
            }
        }
    }

    fn collect_fragment_spreads(&self, names: &mut BTreeSet<String>) {
        for item in &self.items {
            match item {
                SelectionItem::FragmentSpread(spread) => {
                    names.insert(spread.fragment_name.clone());
                }
                SelectionItem::Field(field) => field.selections.collect_fragment_spreads(names),
                SelectionItem::InlineFragment(fragment) => {
                    fragment.selections.collect_fragment_spreads(names)
                }
            }
        }
    }
}

impl FromIterator<SelectionItem> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = SelectionItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a SelectionItem;
    type IntoIter = std::slice::Iter<'a, SelectionItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Display for SelectionSet {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        if self.items.is_empty() {
            return Ok(());
        }

        write!(f, "{{")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "}}")
    }
}

impl PrettyDisplay for SelectionSet {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        for item in &self.items {
            item.pretty_fmt(f, depth)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSelection {
    pub name: String,
    pub alias: Option<String>,
    pub arguments: Option<ArgumentsMap>,
    pub directives: Vec<Directive>,
    pub selections: SelectionSet,
}

impl FieldSelection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            arguments: None,
            directives: Vec::new(),
            selections: SelectionSet::default(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_arguments(mut self, arguments: ArgumentsMap) -> Self {
        self.arguments = match arguments.is_empty() {
            true => None,
            false => Some(arguments),
        };
        self
    }

    pub fn with_selections(mut self, selections: SelectionSet) -> Self {
        self.selections = selections;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.selections.is_empty()
    }

    /// The key this field's value is stored under in a response.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    fn fmt_head(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        if let Some(alias) = &self.alias {
            write!(f, "{}: ", alias)?;
        }
        write!(f, "{}", self.name)?;
        if let Some(arguments) = &self.arguments {
            write!(f, "({})", arguments)?;
        }
        for directive in &self.directives {
            write!(f, " {}", directive)?;
        }

        Ok(())
    }
}

impl Display for FieldSelection {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        self.fmt_head(f)?;
        if !self.selections.is_empty() {
            write!(f, " {}", self.selections)?;
        }

        Ok(())
    }
}

impl PrettyDisplay for FieldSelection {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        let indent = get_indent(depth);
        write!(f, "{indent}")?;
        self.fmt_head(f)?;

        if self.selections.is_empty() {
            return writeln!(f);
        }

        writeln!(f, " {{")?;
        self.selections.pretty_fmt(f, depth + 1)?;
        writeln!(f, "{indent}}}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlineFragmentSelection {
    pub type_condition: Option<String>,
    pub directives: Vec<Directive>,
    pub selections: SelectionSet,
}

impl InlineFragmentSelection {
    pub fn new(type_condition: Option<String>, selections: SelectionSet) -> Self {
        Self {
            type_condition,
            directives: Vec::new(),
            selections,
        }
    }

    fn fmt_head(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        write!(f, "...")?;
        if let Some(type_condition) = &self.type_condition {
            write!(f, " on {}", type_condition)?;
        }
        for directive in &self.directives {
            write!(f, " {}", directive)?;
        }

        Ok(())
    }
}

impl Display for InlineFragmentSelection {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        self.fmt_head(f)?;
        write!(f, " {}", self.selections)
    }
}

impl PrettyDisplay for InlineFragmentSelection {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        let indent = get_indent(depth);
        write!(f, "{indent}")?;
        self.fmt_head(f)?;
        writeln!(f, " {{")?;
        self.selections.pretty_fmt(f, depth + 1)?;
        writeln!(f, "{indent}}}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentSpreadSelection {
    pub fragment_name: String,
    pub directives: Vec<Directive>,
}

impl Display for FragmentSpreadSelection {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        write!(f, "...{}", self.fragment_name)?;
        for directive in &self.directives {
            write!(f, " {}", directive)?;
        }

        Ok(())
    }
}

impl PrettyDisplay for FragmentSpreadSelection {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        writeln!(f, "{}{}", get_indent(depth), self)
    }
}

impl From<FieldSelection> for SelectionItem {
    fn from(field: FieldSelection) -> Self {
        SelectionItem::Field(Arc::new(field))
    }
}

impl From<InlineFragmentSelection> for SelectionItem {
    fn from(fragment: InlineFragmentSelection) -> Self {
        SelectionItem::InlineFragment(Arc::new(fragment))
    }
}

impl From<FragmentSpreadSelection> for SelectionItem {
    fn from(spread: FragmentSpreadSelection) -> Self {
        SelectionItem::FragmentSpread(Arc::new(spread))
    }
}
