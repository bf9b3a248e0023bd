pub mod context;
pub mod error;
pub mod info;

use std::{collections::BTreeSet, future::Future};

use graphql_wrapping_config::delegation::DelegationConfig;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::{
    ast::{
        arguments::ArgumentsMap,
        document::Document,
        fragment::FragmentDefinition,
        operation::{OperationDefinition, OperationKind, VariableDefinition},
        selection_set::{FieldSelection, SelectionSet},
    },
    delegation::{context::DelegationContext, error::DelegationError, info::ResolveInfo},
    executors::{
        common::{SourceRequest, SourceResponse},
        error::ResolutionError,
        map::SourceExecutorMap,
    },
    pipeline::TransformPipeline,
    response::graphql_error::GraphQLError,
};

pub struct DelegationRequest<'a> {
    /// Name of the source executor to dispatch to.
    pub source_name: &'a str,
    pub operation_kind: OperationKind,
    /// Root field of the source schema to call.
    pub field_name: &'a str,
    pub args: &'a Map<String, Value>,
    pub context: &'a DelegationContext,
    pub info: &'a ResolveInfo,
    pub pipeline: &'a TransformPipeline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DelegatedResult {
    /// The value for the caller's field, in the caller's shape.
    pub data: Value,
    /// Errors the source reported next to its data.
    pub errors: Vec<GraphQLError>,
}

/// Forwards the resolution of a caller's field to a source schema.
pub struct Delegator {
    executors: SourceExecutorMap,
    config: DelegationConfig,
}

impl Delegator {
    pub fn new(executors: SourceExecutorMap, config: DelegationConfig) -> Self {
        Self { executors, config }
    }

    pub fn executors(&self) -> &SourceExecutorMap {
        &self.executors
    }

    /// Builds `{ field_name(args) { <caller selection> } }`, rewrites it with
    /// the request's pipeline, dispatches it and reshapes the returned data
    /// for the caller.
    ///
    /// When the dispatch fails, no `extract_result` function is called.
    #[instrument(
        level = "debug",
        skip_all,
        fields(
            source = request.source_name,
            field = request.field_name,
            path = %request.info.path,
        )
    )]
    pub async fn delegate(
        &self,
        request: DelegationRequest<'_>,
    ) -> Result<DelegatedResult, DelegationError> {
        let executor = self
            .executors
            .get(request.source_name)
            .ok_or_else(|| DelegationError::SourceNotFound(request.source_name.to_string()))?;

        let root_field = FieldSelection::new(request.field_name)
            .with_arguments(ArgumentsMap::from(request.args))
            .with_selections(request.info.selection_set.clone());
        let outbound = SelectionSet::new(vec![root_field.into()]);

        let forward = request
            .pipeline
            .apply_forward(&outbound, self.config.path_policy)
            .map_err(|source| DelegationError::Transform {
                field_name: request.field_name.to_string(),
                source,
            })?;

        let fragments = referenced_fragments(&forward.selection_set, &request.info.fragments)?;
        let (variable_definitions, variables) =
            forwarded_variables(&forward.selection_set, &fragments, request.info);
        let document = Document {
            operation: OperationDefinition::new(request.operation_kind, forward.selection_set)
                .with_variable_definitions(variable_definitions),
            fragments,
        };
        let query = document.to_string();
        debug!(query = %query, applied = forward.applied.len(), "dispatching delegated operation");

        let dispatch = executor.execute(SourceRequest {
            operation_kind: request.operation_kind,
            root_field: request.field_name,
            document: &document,
            query: &query,
            variables: &variables,
            context: request.context,
        });

        let dispatch_error = |source: ResolutionError| DelegationError::Dispatch {
            path: request.info.path.to_string(),
            source,
        };

        let response = self
            .dispatch_with_limits(dispatch, request.context)
            .await
            .map_err(dispatch_error)?;

        let SourceResponse { data, errors } = response;
        let data = match data {
            Some(data) if !data.is_null() => data,
            _ if !errors.is_empty() => {
                return Err(dispatch_error(ResolutionError::GraphQLErrors(errors)));
            }
            _ => {
                return Ok(DelegatedResult {
                    data: Value::Null,
                    errors,
                });
            }
        };

        let mut data = request
            .pipeline
            .apply_backward(&forward.applied, data)
            .map_err(|source| DelegationError::Transform {
                field_name: request.field_name.to_string(),
                source,
            })?;

        let value = data
            .get_mut(request.field_name)
            .map(Value::take)
            .ok_or_else(|| DelegationError::MissingRootField(request.field_name.to_string()))?;

        Ok(DelegatedResult {
            data: value,
            errors,
        })
    }

    async fn dispatch_with_limits<F>(
        &self,
        dispatch: F,
        context: &DelegationContext,
    ) -> Result<SourceResponse, ResolutionError>
    where
        F: Future<Output = Result<SourceResponse, ResolutionError>>,
    {
        let bounded = async {
            match self.config.timeout {
                Some(timeout) => tokio::time::timeout(timeout, dispatch)
                    .await
                    .map_err(|_| ResolutionError::RequestTimeout(timeout))?,
                None => dispatch.await,
            }
        };

        tokio::select! {
            biased;
            _ = context.cancellation_token.cancelled() => {
                debug!("caller operation cancelled, dropping the dispatch");
                Err(ResolutionError::Cancelled)
            }
            result = bounded => result,
        }
    }
}

/// Fragment definitions spread by `selection_set`, directly or through other
/// fragments, in the order the caller defined them.
fn referenced_fragments(
    selection_set: &SelectionSet,
    available: &[FragmentDefinition],
) -> Result<Vec<FragmentDefinition>, DelegationError> {
    let mut pending: Vec<String> = selection_set.fragment_spreads().into_iter().collect();
    let mut seen = BTreeSet::new();

    while let Some(name) = pending.pop() {
        if !seen.insert(name.clone()) {
            continue;
        }
        let fragment = available
            .iter()
            .find(|fragment| fragment.name == name)
            .ok_or_else(|| {
                debug!(
                    fragment = name.as_str(),
                    "spread fragment has no definition in the caller's document"
                );
                DelegationError::FragmentNotFound(name.clone())
            })?;
        pending.extend(fragment.selection_set.fragment_spreads());
    }

    Ok(available
        .iter()
        .filter(|fragment| seen.contains(&fragment.name))
        .cloned()
        .collect())
}

/// Declarations and values of the caller's variables that the outbound
/// operation still references, in the caller's declaration order.
fn forwarded_variables(
    selection_set: &SelectionSet,
    fragments: &[FragmentDefinition],
    info: &ResolveInfo,
) -> (Vec<VariableDefinition>, Map<String, Value>) {
    let mut used = selection_set.variable_usages();
    for fragment in fragments {
        fragment
            .directives
            .iter()
            .for_each(|directive| directive.collect_variables(&mut used));
        fragment.selection_set.collect_variables(&mut used);
    }

    let definitions: Vec<VariableDefinition> = info
        .variable_definitions
        .iter()
        .filter(|definition| used.contains(&definition.name))
        .cloned()
        .collect();

    for name in &used {
        if !definitions.iter().any(|definition| &definition.name == name) {
            debug!(
                variable = name.as_str(),
                "variable is not declared by the caller's operation"
            );
        }
    }

    let values = info
        .variable_values
        .iter()
        .filter(|(name, _)| used.contains(name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    (definitions, values)
}
