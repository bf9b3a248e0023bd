use graphql_parser::query::{self as query_ast, Definition};

use crate::ast::{
    document::Document,
    fragment::FragmentDefinition,
    operation::{OperationDefinition, OperationKind, VariableDefinition},
    selection_set::SelectionSet,
};

#[derive(Debug, thiserror::Error)]
pub enum ParsingError {
    #[error("Failed to parse the operation: {0}")]
    InvalidSyntax(#[from] query_ast::ParseError),

    #[error("An operation was expected, but none were present.")]
    OperationNotFound,

    #[error("Multiple operations found, but no operation name was specified.")]
    MultipleMatchingOperationsFound,

    #[error("Specified operation '{operation_name}' not found.")]
    SpecifiedOperationNotFound { operation_name: String },
}

/// Parses an executable document and picks the operation to run.
///
/// When `operation_name` is `None`, the document must contain exactly one operation.
pub fn parse_operation(
    source: &str,
    operation_name: Option<&str>,
) -> Result<Document, ParsingError> {
    let document = query_ast::parse_query::<String>(source)?;

    let mut operations = Vec::new();
    let mut fragments = Vec::new();

    for definition in &document.definitions {
        match definition {
            Definition::Operation(operation) => operations.push(operation),
            Definition::Fragment(fragment) => fragments.push(FragmentDefinition::from(fragment)),
        }
    }

    let operation = match operation_name {
        Some(operation_name) => operations
            .into_iter()
            .find(|operation| operation_name_of(operation) == Some(operation_name))
            .ok_or_else(|| ParsingError::SpecifiedOperationNotFound {
                operation_name: operation_name.to_string(),
            })?,
        None => match operations.len() {
            0 => return Err(ParsingError::OperationNotFound),
            1 => operations[0],
            _ => return Err(ParsingError::MultipleMatchingOperationsFound),
        },
    };

    Ok(Document {
        operation: operation.into(),
        fragments,
    })
}

/// Parses a bare selection set, `{ a b { c } }`.
pub fn parse_selection_set(source: &str) -> Result<SelectionSet, ParsingError> {
    parse_operation(source, None).map(|document| document.operation.selection_set)
}

fn operation_name_of<'a>(operation: &'a query_ast::OperationDefinition<'_, String>) -> Option<&'a str> {
    match operation {
        query_ast::OperationDefinition::SelectionSet(_) => None,
        query_ast::OperationDefinition::Query(query) => query.name.as_deref(),
        query_ast::OperationDefinition::Mutation(mutation) => mutation.name.as_deref(),
        query_ast::OperationDefinition::Subscription(subscription) => subscription.name.as_deref(),
    }
}

impl From<&query_ast::OperationDefinition<'_, String>> for OperationDefinition {
    fn from(operation: &query_ast::OperationDefinition<'_, String>) -> Self {
        let (operation_kind, name, variable_definitions, selection_set) = match operation {
            query_ast::OperationDefinition::SelectionSet(selection_set) => {
                (OperationKind::Query, None, &[][..], selection_set)
            }
            query_ast::OperationDefinition::Query(query) => (
                OperationKind::Query,
                query.name.clone(),
                &query.variable_definitions[..],
                &query.selection_set,
            ),
            query_ast::OperationDefinition::Mutation(mutation) => (
                OperationKind::Mutation,
                mutation.name.clone(),
                &mutation.variable_definitions[..],
                &mutation.selection_set,
            ),
            query_ast::OperationDefinition::Subscription(subscription) => (
                OperationKind::Subscription,
                subscription.name.clone(),
                &subscription.variable_definitions[..],
                &subscription.selection_set,
            ),
        };

        OperationDefinition {
            name,
            operation_kind,
            variable_definitions: variable_definitions
                .iter()
                .map(VariableDefinition::from)
                .collect(),
            selection_set: selection_set.into(),
        }
    }
}
