use std::{
    fmt::{Debug, Display},
    sync::Arc,
};

/// An ordered list of field names, addressing a field from the operation root.
/// Fragments are never part of a path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)] // Clone is cheap with Arc inside
pub struct SelectionPath {
    inner: Arc<[String]>,
}

impl SelectionPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self {
            inner: segments.into(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.inner
    }

    pub fn first(&self) -> Option<&str> {
        self.inner.first().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.inner.last().map(String::as_str)
    }

    /// Inserts a segment at the end of the path
    pub fn push(&self, segment: impl Into<String>) -> Self {
        let mut new_segments = Vec::with_capacity(self.inner.len() + 1);
        new_segments.extend_from_slice(&self.inner);
        new_segments.push(segment.into());
        Self::new(new_segments)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn common_prefix_len(&self, other: &SelectionPath) -> usize {
        self.inner
            .iter()
            .zip(other.inner.iter())
            .take_while(|(s, o)| s == o)
            .count()
    }

    pub fn starts_with(&self, other: &SelectionPath) -> bool {
        if other.len() > self.len() {
            return false;
        }
        self.common_prefix_len(other) == other.len()
    }
}

impl Display for SelectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner.join("."))
    }
}

impl From<&[&str]> for SelectionPath {
    fn from(segments: &[&str]) -> Self {
        Self::new(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for SelectionPath {
    fn from(segments: [&str; N]) -> Self {
        Self::new(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Vec<String>> for SelectionPath {
    fn from(segments: Vec<String>) -> Self {
        Self::new(segments)
    }
}

/// Parses a dotted path, `"userById.address"`. Empty segments are dropped.
impl From<&str> for SelectionPath {
    fn from(dotted: &str) -> Self {
        Self::new(
            dotted
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

impl From<&SelectionPath> for Vec<String> {
    fn from(path: &SelectionPath) -> Self {
        path.inner.to_vec()
    }
}
