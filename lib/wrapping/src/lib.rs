pub mod ast;
pub mod delegation;
pub mod executors;
pub mod locator;
pub mod pipeline;
pub mod response;
pub mod transform;
pub mod utils;

#[cfg(test)]
mod tests;

pub use delegation::{DelegatedResult, DelegationRequest, Delegator};
pub use executors::map::SourceExecutorMap;
pub use pipeline::TransformPipeline;
pub use transform::TreeTransform;
