use std::{collections::HashMap, fmt::Debug, sync::Arc};

use serde_json::Value;

use crate::{
    ast::{
        path::SelectionPath,
        selection_item::SelectionItem,
        selection_set::{FieldSelection, SelectionSet},
    },
    locator::{locate, LocateError, PathPolicy},
};

/// Error raised from inside a user supplied rewrite or extract function.
pub type TransformFnError = Box<dyn std::error::Error + Send + Sync>;

pub type RewriteSelectionFn =
    dyn Fn(&SelectionSet) -> Result<SelectionSet, TransformFnError> + Send + Sync;

pub type ExtractResultFn = dyn Fn(Value) -> Result<Value, TransformFnError> + Send + Sync;

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error("Failed to rewrite the selection at '{path}': {source}")]
    RewriteSelection {
        path: SelectionPath,
        source: TransformFnError,
    },

    #[error("Failed to extract the result at '{path}': {source}")]
    ExtractResult {
        path: SelectionPath,
        source: TransformFnError,
    },
}

/// A pair of pure functions scoped to one path of an operation.
///
/// `rewrite_selection` receives the child set of the field at `path` and
/// returns the set to send to the source instead. `extract_result` receives
/// the value the source returned for that field and returns the value the
/// caller gets. Both must be free of side effects, a transform may be
/// applied any number of times and from several tasks at once.
///
/// `extract_result` is not called when the source returned `null` for the
/// field (or when the field is missing): the `null` reaches the caller as is,
/// following GraphQL null propagation. A transform cannot map `null` to a
/// default value.
#[derive(Clone)]
pub struct TreeTransform {
    path: SelectionPath,
    rewrite_selection: Arc<RewriteSelectionFn>,
    extract_result: Arc<ExtractResultFn>,
}

/// Outcome of applying one transform to an outbound tree.
#[derive(Debug)]
pub struct ForwardStep {
    pub selection_set: SelectionSet,
    /// Where the value for the rewritten field will be found in the response.
    pub response_path: Vec<String>,
}

impl TreeTransform {
    pub fn new<R, E>(path: impl Into<SelectionPath>, rewrite_selection: R, extract_result: E) -> Self
    where
        R: Fn(&SelectionSet) -> Result<SelectionSet, TransformFnError> + Send + Sync + 'static,
        E: Fn(Value) -> Result<Value, TransformFnError> + Send + Sync + 'static,
    {
        Self {
            path: path.into(),
            rewrite_selection: Arc::new(rewrite_selection),
            extract_result: Arc::new(extract_result),
        }
    }

    /// Declares a path as passed through without changing the selection or the result.
    pub fn identity(path: impl Into<SelectionPath>) -> Self {
        Self::new(
            path,
            |selection_set| Ok(selection_set.clone()),
            |value| Ok(value),
        )
    }

    /// Renames direct child fields of the field at `path`.
    ///
    /// `renames` maps the caller's field names to the source's field names.
    /// Outbound, matching fields are renamed and keep their alias; fragments
    /// are passed through. Inbound, response keys are renamed back,
    /// element-wise for lists.
    ///
    /// When several pairs share a caller name or a source name, the first
    /// pair in `renames` wins in that direction.
    pub fn rename_fields<K, V>(
        path: impl Into<SelectionPath>,
        renames: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let pairs: Vec<(String, String)> = renames
            .into_iter()
            .map(|(from, to)| (from.into(), to.into()))
            .collect();

        let mut outbound: HashMap<String, String> = HashMap::with_capacity(pairs.len());
        let mut inbound: HashMap<String, String> = HashMap::with_capacity(pairs.len());
        for (from, to) in pairs {
            inbound.entry(to.clone()).or_insert_with(|| from.clone());
            outbound.entry(from).or_insert(to);
        }

        Self::new(
            path,
            move |selection_set| Ok(rename_selections(selection_set, &outbound)),
            move |value| Ok(rename_keys(value, &inbound)),
        )
    }

    pub fn path(&self) -> &SelectionPath {
        &self.path
    }

    pub fn rewrite_selection(
        &self,
        selection_set: &SelectionSet,
    ) -> Result<SelectionSet, TransformError> {
        (self.rewrite_selection)(selection_set).map_err(|source| {
            TransformError::RewriteSelection {
                path: self.path.clone(),
                source,
            }
        })
    }

    pub fn extract_result(&self, value: Value) -> Result<Value, TransformError> {
        (self.extract_result)(value).map_err(|source| TransformError::ExtractResult {
            path: self.path.clone(),
            source,
        })
    }

    /// Locates this transform's path in `selection_set`, rewrites the subtree
    /// found there and splices the rewritten subtree into a new tree.
    pub fn apply_forward(
        &self,
        selection_set: &SelectionSet,
        policy: PathPolicy,
    ) -> Result<ForwardStep, TransformError> {
        let located = locate(selection_set, &self.path, policy)?;
        let rewritten = self.rewrite_selection(located.subtree())?;

        Ok(ForwardStep {
            selection_set: located.splice(rewritten),
            response_path: located.response_path().to_vec(),
        })
    }

    /// Replaces the value found at `response_path` in `data` with the
    /// extracted one.
    ///
    /// Lists met on the way are walked element by element. Nothing happens
    /// when the path leads to `null`, to a missing key or to a scalar.
    pub fn apply_backward(
        &self,
        data: &mut Value,
        response_path: &[String],
    ) -> Result<(), TransformError> {
        match data {
            Value::Array(items) => {
                for item in items {
                    self.apply_backward(item, response_path)?;
                }
                Ok(())
            }
            Value::Object(map) => {
                let Some((key, rest)) = response_path.split_first() else {
                    return Ok(());
                };
                let Some(entry) = map.get_mut(key) else {
                    return Ok(());
                };

                if !rest.is_empty() {
                    return self.apply_backward(entry, rest);
                }

                if entry.is_null() {
                    return Ok(());
                }

                *entry = self.extract_result(entry.take())?;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl Debug for TreeTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeTransform")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn rename_selections(
    selection_set: &SelectionSet,
    renames: &HashMap<String, String>,
) -> SelectionSet {
    selection_set
        .iter()
        .map(|item| match item {
            SelectionItem::Field(field) => match renames.get(&field.name) {
                Some(renamed) => FieldSelection {
                    name: renamed.clone(),
                    ..field.as_ref().clone()
                }
                .into(),
                None => item.clone(),
            },
            _ => item.clone(),
        })
        .collect()
}

fn rename_keys(value: Value, renames: &HashMap<String, String>) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| rename_keys(item, renames))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| match renames.get(&key) {
                    Some(renamed) => (renamed.clone(), value),
                    None => (key, value),
                })
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use serde_json::{json, Value};

    use crate::{
        ast::path::SelectionPath,
        locator::{LocateError, PathPolicy},
        transform::{TransformError, TreeTransform},
        utils::parsing::parse_selection_set,
    };

    #[test]
    fn rename_fields_keeps_aliases_and_fragments() {
        let tree = parse_selection_set(
            "{ userById { streetAddress z: zip ... on User { zip } } }",
        )
        .expect("to parse");
        let transform = TreeTransform::rename_fields(
            ["userById"],
            [("streetAddress", "addressStreetAddress"), ("zip", "addressZip")],
        );

        let step = transform
            .apply_forward(&tree, PathPolicy::FirstMatch)
            .expect("to apply");

        assert_eq!(
            step.selection_set.to_string(),
            "{userById {addressStreetAddress z: addressZip ... on User {zip}}}"
        );
        assert_eq!(step.response_path, ["userById"]);
    }

    #[test]
    fn rename_fields_result_lists() {
        let transform = TreeTransform::rename_fields(["users"], [("zip", "addressZip")]);
        let mut data = json!({ "users": [{ "addressZip": "1" }, { "addressZip": "2" }] });

        transform
            .apply_backward(&mut data, &["users".to_string()])
            .expect("to extract");

        assert_eq!(data, json!({ "users": [{ "zip": "1" }, { "zip": "2" }] }));
    }

    #[test]
    fn rename_fields_first_pair_wins() {
        let tree = parse_selection_set("{ userById { zip } }").expect("to parse");

        // fresh hash maps each time, the outcome must not depend on their seed
        for _ in 0..32 {
            let transform = TreeTransform::rename_fields(
                ["userById"],
                [
                    ("street", "address"),
                    ("streetAddress", "address"),
                    ("zip", "addressZip"),
                    ("zip", "postalCode"),
                ],
            );

            let step = transform
                .apply_forward(&tree, PathPolicy::FirstMatch)
                .expect("to apply");
            assert_eq!(step.selection_set.to_string(), "{userById {addressZip}}");

            let mut data = json!({ "userById": { "address": "Windy Shore 21 A 7" } });
            transform
                .apply_backward(&mut data, &["userById".to_string()])
                .expect("to extract");
            assert_eq!(data, json!({ "userById": { "street": "Windy Shore 21 A 7" } }));
        }
    }

    #[test]
    fn backward_walks_lists_along_the_path() {
        let transform = TreeTransform::new(
            ["users", "name"],
            |selection_set| Ok(selection_set.clone()),
            |value| Ok(Value::String(value.as_str().unwrap_or_default().to_uppercase())),
        );
        let mut data = json!({ "users": [{ "name": "ada" }, { "name": "bob" }, null] });

        transform
            .apply_backward(&mut data, &["users".to_string(), "name".to_string()])
            .expect("to extract");

        assert_eq!(
            data,
            json!({ "users": [{ "name": "ADA" }, { "name": "BOB" }, null] })
        );
    }

    #[test]
    fn backward_skips_null_and_missing_values() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let transform = TreeTransform::new(
            ["userById"],
            |selection_set| Ok(selection_set.clone()),
            move |value| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            },
        );

        let mut null_data = json!({ "userById": null });
        transform
            .apply_backward(&mut null_data, &["userById".to_string()])
            .expect("to extract");
        let mut missing_data = json!({});
        transform
            .apply_backward(&mut missing_data, &["userById".to_string()])
            .expect("to extract");

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(null_data, json!({ "userById": null }));
    }

    #[test]
    fn function_errors_propagate() {
        let tree = parse_selection_set("{ userById { id } }").expect("to parse");
        let transform = TreeTransform::new(
            ["userById"],
            |_| Err("unsupported selection".into()),
            |value| Ok(value),
        );

        let error = transform
            .apply_forward(&tree, PathPolicy::FirstMatch)
            .unwrap_err();

        assert!(matches!(error, TransformError::RewriteSelection { .. }));
        assert_eq!(
            error.to_string(),
            "Failed to rewrite the selection at 'userById': unsupported selection"
        );
    }

    #[test]
    fn missing_path_is_reported() {
        let tree = parse_selection_set("{ userById { id } }").expect("to parse");
        let transform = TreeTransform::identity(["userById", "zip"]);

        assert!(matches!(
            transform.apply_forward(&tree, PathPolicy::FirstMatch),
            Err(TransformError::Locate(LocateError::PathNotFound { .. }))
        ));
        assert_eq!(transform.path(), &SelectionPath::from("userById.zip"));
    }
}
