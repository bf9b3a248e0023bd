use std::fmt::{Display, Formatter as FmtFormatter, Result as FmtResult};

use graphql_parser::query as query_ast;

use crate::{
    ast::{arguments::Directive, selection_set::SelectionSet},
    utils::pretty_display::{get_indent, PrettyDisplay},
};

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentDefinition {
    pub name: String,
    pub type_condition: String,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
}

impl Display for FragmentDefinition {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        write!(f, "fragment {} on {}", self.name, self.type_condition)?;
        for directive in &self.directives {
            write!(f, " {}", directive)?;
        }
        write!(f, " {}", self.selection_set)
    }
}

impl PrettyDisplay for FragmentDefinition {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        let indent = get_indent(depth);
        write!(f, "{indent}fragment {} on {}", self.name, self.type_condition)?;
        for directive in &self.directives {
            write!(f, " {}", directive)?;
        }
        writeln!(f, " {{")?;
        self.selection_set.pretty_fmt(f, depth + 1)?;
        writeln!(f, "{indent}}}")
    }
}

impl From<&query_ast::FragmentDefinition<'_, String>> for FragmentDefinition {
    fn from(fragment: &query_ast::FragmentDefinition<'_, String>) -> Self {
        let query_ast::TypeCondition::On(type_condition) = &fragment.type_condition;

        Self {
            name: fragment.name.clone(),
            type_condition: type_condition.clone(),
            directives: fragment.directives.iter().map(Directive::from).collect(),
            selection_set: (&fragment.selection_set).into(),
        }
    }
}
