use std::time::Duration;

use crate::response::graphql_error::GraphQLError;

#[derive(thiserror::Error, Debug, Clone)]
pub enum ResolutionError {
    #[error("Failed to send request to source \"{0}\": {1}")]
    RequestFailure(String, String),
    #[error(
        "Source responded without data: {}",
        .0.iter().map(|error| error.message.as_str()).collect::<Vec<_>>().join(", ")
    )]
    GraphQLErrors(Vec<GraphQLError>),
    #[error("Request timed out after {0:?}")]
    RequestTimeout(Duration),
    #[error("Request was cancelled")]
    Cancelled,
}
