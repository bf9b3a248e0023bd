use serde_json::{Map, Value};

use crate::{
    ast::{
        document::Document, fragment::FragmentDefinition, operation::VariableDefinition,
        path::SelectionPath, selection_set::SelectionSet,
    },
    locator::{locate, LocateError, PathPolicy},
};

/// What the caller's execution engine knows about the field being resolved.
#[derive(Debug, Clone, Default)]
pub struct ResolveInfo {
    /// Response path of the field in the caller's operation.
    pub path: SelectionPath,
    /// The selection requested beneath the field.
    pub selection_set: SelectionSet,
    /// Fragment definitions of the caller's document.
    pub fragments: Vec<FragmentDefinition>,
    /// Variables declared by the caller's operation.
    pub variable_definitions: Vec<VariableDefinition>,
    /// Coerced values of the caller's variables.
    pub variable_values: Map<String, Value>,
}

impl ResolveInfo {
    pub fn new(path: impl Into<SelectionPath>, selection_set: SelectionSet) -> Self {
        Self {
            path: path.into(),
            selection_set,
            ..Default::default()
        }
    }

    pub fn with_fragments(mut self, fragments: Vec<FragmentDefinition>) -> Self {
        self.fragments = fragments;
        self
    }

    pub fn with_variable_definitions(mut self, variable_definitions: Vec<VariableDefinition>) -> Self {
        self.variable_definitions = variable_definitions;
        self
    }

    pub fn with_variable_values(mut self, variable_values: Map<String, Value>) -> Self {
        self.variable_values = variable_values;
        self
    }

    /// Builds the info for the field at `path` of a caller's document.
    /// Variable values are left empty.
    pub fn from_document(
        document: &Document,
        path: &SelectionPath,
        policy: PathPolicy,
    ) -> Result<Self, LocateError> {
        let located = locate(&document.operation.selection_set, path, policy)?;

        Ok(Self {
            path: located.response_path().to_vec().into(),
            selection_set: located.subtree().clone(),
            fragments: document.fragments.clone(),
            variable_definitions: document.operation.variable_definitions.clone(),
            variable_values: Map::new(),
        })
    }
}
