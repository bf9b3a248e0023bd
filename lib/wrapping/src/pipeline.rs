use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    ast::selection_set::SelectionSet,
    locator::{LocateError, PathPolicy},
    transform::{TransformError, TreeTransform},
};

/// An ordered list of transforms applied around one delegation.
///
/// Outbound, transforms run in order, each against the tree produced by the
/// previous one. Inbound, the transforms that were applied run in reverse
/// order, so nested paths compose like nested function calls.
#[derive(Debug, Clone, Default)]
pub struct TransformPipeline {
    transforms: Vec<TreeTransform>,
}

/// A transform that matched during the outbound pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedTransform {
    /// Position of the transform in the pipeline.
    pub index: usize,
    pub response_path: Vec<String>,
}

#[derive(Debug)]
pub struct ForwardApplication {
    pub selection_set: SelectionSet,
    pub applied: Vec<AppliedTransform>,
}

impl TransformPipeline {
    pub fn new(transforms: Vec<TreeTransform>) -> Self {
        Self { transforms }
    }

    pub fn transforms(&self) -> &[TreeTransform] {
        &self.transforms
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Rewrites the outbound tree.
    ///
    /// A transform whose path does not resolve in the current tree is skipped:
    /// an earlier rewrite may have dropped the subtree it targets. It is then
    /// left out of the inbound pass as well.
    #[instrument(level = "debug", skip_all, fields(transforms = self.transforms.len()))]
    pub fn apply_forward(
        &self,
        selection_set: &SelectionSet,
        policy: PathPolicy,
    ) -> Result<ForwardApplication, TransformError> {
        let mut current = selection_set.clone();
        let mut applied = Vec::with_capacity(self.transforms.len());

        for (index, transform) in self.transforms.iter().enumerate() {
            match transform.apply_forward(&current, policy) {
                Ok(step) => {
                    current = step.selection_set;
                    applied.push(AppliedTransform {
                        index,
                        response_path: step.response_path,
                    });
                }
                Err(TransformError::Locate(LocateError::PathNotFound { path, segment })) => {
                    debug!(
                        index,
                        path = %path,
                        segment,
                        "transform path not found in the outbound selection, skipping"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        Ok(ForwardApplication {
            selection_set: current,
            applied,
        })
    }

    /// Reshapes `data` (the `data` object of the source's response) back into
    /// what the caller asked for.
    #[instrument(level = "debug", skip_all, fields(applied = applied.len()))]
    pub fn apply_backward(
        &self,
        applied: &[AppliedTransform],
        mut data: Value,
    ) -> Result<Value, TransformError> {
        for step in applied.iter().rev() {
            // `applied` always comes from this pipeline's own forward pass
            let Some(transform) = self.transforms.get(step.index) else {
                continue;
            };
            transform.apply_backward(&mut data, &step.response_path)?;
        }

        Ok(data)
    }
}

impl From<Vec<TreeTransform>> for TransformPipeline {
    fn from(transforms: Vec<TreeTransform>) -> Self {
        Self::new(transforms)
    }
}

impl FromIterator<TreeTransform> for TransformPipeline {
    fn from_iter<T: IntoIterator<Item = TreeTransform>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
