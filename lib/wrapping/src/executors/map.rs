use std::collections::HashMap;

use crate::executors::common::{SourceExecutor, SourceExecutorBoxedArc};

/// Source executors by the name delegations refer to them with.
#[derive(Default)]
pub struct SourceExecutorMap {
    inner: HashMap<String, SourceExecutorBoxedArc>,
}

impl SourceExecutorMap {
    pub fn new() -> Self {
        SourceExecutorMap {
            inner: HashMap::new(),
        }
    }

    pub fn get(&self, source_name: &str) -> Option<&SourceExecutorBoxedArc> {
        self.inner.get(source_name)
    }

    pub fn insert<E>(&mut self, source_name: impl Into<String>, executor: E)
    where
        E: SourceExecutor + Send + Sync + 'static,
    {
        self.insert_boxed_arc(source_name.into(), executor.to_boxed_arc());
    }

    pub fn insert_boxed_arc(&mut self, source_name: String, boxed_arc: SourceExecutorBoxedArc) {
        self.inner.insert(source_name, boxed_arc);
    }

    pub fn contains(&self, source_name: &str) -> bool {
        self.inner.contains_key(source_name)
    }
}
