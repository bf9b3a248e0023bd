use crate::{executors::error::ResolutionError, transform::TransformError};

#[derive(thiserror::Error, Debug)]
pub enum DelegationError {
    #[error("No source executor is registered as \"{0}\"")]
    SourceNotFound(String),
    #[error("Failed to transform the delegation of \"{field_name}\": {source}")]
    Transform {
        field_name: String,
        source: TransformError,
    },
    #[error("Delegation at \"{path}\" failed: {source}")]
    Dispatch {
        path: String,
        source: ResolutionError,
    },
    #[error("Fragment \"{0}\" is spread but not defined in the caller's document")]
    FragmentNotFound(String),
    #[error("Source response is missing the root field \"{0}\"")]
    MissingRootField(String),
}
