use std::fmt::{Display, Formatter as FmtFormatter, Result as FmtResult};

use graphql_parser::query as query_ast;
use serde::{Deserialize, Serialize};

use crate::{
    ast::{selection_set::SelectionSet, value::Value},
    utils::pretty_display::{get_indent, PrettyDisplay},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OperationKind {
    #[default]
    #[serde(rename = "query")]
    Query,
    #[serde(rename = "mutation")]
    Mutation,
    #[serde(rename = "subscription")]
    Subscription,
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        match self {
            OperationKind::Query => write!(f, "query"),
            OperationKind::Mutation => write!(f, "mutation"),
            OperationKind::Subscription => write!(f, "subscription"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationDefinition {
    pub name: Option<String>,
    pub operation_kind: OperationKind,
    pub variable_definitions: Vec<VariableDefinition>,
    pub selection_set: SelectionSet,
}

impl OperationDefinition {
    pub fn new(operation_kind: OperationKind, selection_set: SelectionSet) -> Self {
        Self {
            name: None,
            operation_kind,
            variable_definitions: Vec::new(),
            selection_set,
        }
    }

    pub fn with_variable_definitions(mut self, variable_definitions: Vec<VariableDefinition>) -> Self {
        self.variable_definitions = variable_definitions;
        self
    }

    fn fmt_head(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        write!(f, "{}", self.operation_kind)?;
        if let Some(name) = &self.name {
            write!(f, " {}", name)?;
        }

        if !self.variable_definitions.is_empty() {
            write!(f, "(")?;
            for (i, variable_definition) in self.variable_definitions.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", variable_definition)?;
            }
            write!(f, ")")?;
        }

        Ok(())
    }
}

impl Display for OperationDefinition {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        self.fmt_head(f)?;
        write!(f, " {}", self.selection_set)
    }
}

impl PrettyDisplay for OperationDefinition {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        let indent = get_indent(depth);
        write!(f, "{indent}")?;
        self.fmt_head(f)?;
        writeln!(f, " {{")?;
        self.selection_set.pretty_fmt(f, depth + 1)?;
        writeln!(f, "{indent}}}")
    }
}

/// A variable declared by an operation, `$id: ID! = "u1"`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub name: String,
    pub variable_type: TypeNode,
    pub default_value: Option<Value>,
}

impl Display for VariableDefinition {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        write!(f, "${}: {}", self.name, self.variable_type)?;
        if let Some(default_value) = &self.default_value {
            write!(f, " = {}", default_value)?;
        }

        Ok(())
    }
}

impl From<&query_ast::VariableDefinition<'_, String>> for VariableDefinition {
    fn from(value: &query_ast::VariableDefinition<'_, String>) -> Self {
        VariableDefinition {
            name: value.name.clone(),
            variable_type: (&value.var_type).into(),
            default_value: value.default_value.as_ref().map(Value::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeNode {
    List(Box<TypeNode>),
    NonNull(Box<TypeNode>),
    Named(String),
}

impl Display for TypeNode {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        match self {
            TypeNode::List(inner) => write!(f, "[{}]", inner),
            TypeNode::NonNull(inner) => write!(f, "{}!", inner),
            TypeNode::Named(name) => write!(f, "{}", name),
        }
    }
}

impl From<&query_ast::Type<'_, String>> for TypeNode {
    fn from(input_type: &query_ast::Type<'_, String>) -> Self {
        match input_type {
            query_ast::Type::NamedType(name) => TypeNode::Named(name.clone()),
            query_ast::Type::ListType(inner) => TypeNode::List(Box::new(inner.as_ref().into())),
            query_ast::Type::NonNullType(inner) => {
                TypeNode::NonNull(Box::new(inner.as_ref().into()))
            }
        }
    }
}
