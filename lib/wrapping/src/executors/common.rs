use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    ast::{document::Document, operation::OperationKind},
    delegation::context::DelegationContext,
    executors::error::ResolutionError,
    response::graphql_error::GraphQLError,
};

/// Runs an operation against one source schema: a local schema, a remote
/// one behind some transport, or an in-process resolver map.
#[async_trait]
pub trait SourceExecutor {
    async fn execute<'a>(
        &self,
        request: SourceRequest<'a>,
    ) -> Result<SourceResponse, ResolutionError>;

    fn to_boxed_arc<'a>(self) -> Arc<Box<dyn SourceExecutor + Send + Sync + 'a>>
    where
        Self: Sized + Send + Sync + 'a,
    {
        Arc::new(Box::new(self))
    }
}

pub type SourceExecutorType = dyn SourceExecutor + Send + Sync;

pub type SourceExecutorBoxedArc = Arc<Box<SourceExecutorType>>;

pub struct SourceRequest<'a> {
    pub operation_kind: OperationKind,
    /// Name of the single root field of the operation.
    pub root_field: &'a str,
    /// The rewritten operation, with the fragment definitions it spreads.
    pub document: &'a Document,
    /// `document` printed as GraphQL.
    pub query: &'a str,
    /// Values of the variables `document` declares.
    pub variables: &'a Map<String, Value>,
    pub context: &'a DelegationContext,
}

/// A GraphQL response as returned by a source.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceResponse {
    pub data: Option<Value>,
    pub errors: Vec<GraphQLError>,
}

impl SourceResponse {
    pub fn with_data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn with_errors(errors: Vec<GraphQLError>) -> Self {
        Self { data: None, errors }
    }
}
