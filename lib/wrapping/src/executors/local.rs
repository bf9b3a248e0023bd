use std::future::Future;

use async_trait::async_trait;

use crate::{
    ast::document::Document,
    executors::{
        common::{SourceExecutor, SourceRequest, SourceResponse},
        error::ResolutionError,
    },
};

/// Resolves delegated operations in process, by handing the outbound
/// document to an async function.
pub struct FnSourceExecutor<F> {
    resolve: F,
}

impl<F, Fut> FnSourceExecutor<F>
where
    F: Fn(Document) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<SourceResponse, ResolutionError>> + Send + 'static,
{
    pub fn new(resolve: F) -> Self {
        Self { resolve }
    }
}

#[async_trait]
impl<F, Fut> SourceExecutor for FnSourceExecutor<F>
where
    F: Fn(Document) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<SourceResponse, ResolutionError>> + Send + 'static,
{
    async fn execute<'a>(
        &self,
        request: SourceRequest<'a>,
    ) -> Result<SourceResponse, ResolutionError> {
        (self.resolve)(request.document.clone()).await
    }
}
