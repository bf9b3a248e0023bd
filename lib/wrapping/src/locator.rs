use tracing::trace;

use crate::ast::{
    path::SelectionPath,
    selection_item::SelectionItem,
    selection_set::{FieldSelection, SelectionSet},
};

pub use graphql_wrapping_config::delegation::PathPolicy;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocateError {
    #[error("Cannot locate an empty path.")]
    EmptyPath,

    #[error("Path '{path}' not found: no field named '{segment}' at that level.")]
    PathNotFound {
        path: SelectionPath,
        segment: String,
    },

    #[error("Path '{path}' is ambiguous: {matches} sibling fields are named '{segment}'.")]
    AmbiguousPath {
        path: SelectionPath,
        segment: String,
        matches: usize,
    },
}

/// A field found by [`locate`], together with what is needed to splice a
/// replacement of its child set back into the tree it was found in.
#[derive(Debug)]
pub struct LocatedSelection<'a> {
    root: &'a SelectionSet,
    field: &'a FieldSelection,
    // Item indices from the root down to the located field, one per nested
    // set entered (inline fragments included).
    trail: Vec<usize>,
    response_path: Vec<String>,
}

impl<'a> LocatedSelection<'a> {
    pub fn field(&self) -> &'a FieldSelection {
        self.field
    }

    /// The child set of the located field.
    pub fn subtree(&self) -> &'a SelectionSet {
        &self.field.selections
    }

    /// Response keys (alias or name) of every field along the path.
    pub fn response_path(&self) -> &[String] {
        &self.response_path
    }

    /// Builds a new tree where the located field's children are `replacement`.
    ///
    /// Only the nodes along the path are recreated; every other node is shared
    /// with the tree the selection was located in.
    pub fn splice(&self, replacement: SelectionSet) -> SelectionSet {
        splice_at(self.root, &self.trail, replacement)
    }
}

/// Resolves `path` against `root`, one field name per segment.
///
/// Inline fragments are looked through without consuming a segment, fragment
/// spreads are never entered. When several fields share a segment's name, the
/// first one in document order is used, unless `policy` asks for uniqueness.
pub fn locate<'a>(
    root: &'a SelectionSet,
    path: &SelectionPath,
    policy: PathPolicy,
) -> Result<LocatedSelection<'a>, LocateError> {
    if path.is_empty() {
        return Err(LocateError::EmptyPath);
    }

    let mut current = root;
    let mut trail = Vec::new();
    let mut response_path = Vec::with_capacity(path.len());
    let mut located: Option<&'a FieldSelection> = None;

    for segment in path.segments() {
        let mut matches = Vec::new();
        collect_matching_fields(current, segment, &mut Vec::new(), &mut matches);

        if policy == PathPolicy::Unique && matches.len() > 1 {
            return Err(LocateError::AmbiguousPath {
                path: path.clone(),
                segment: segment.clone(),
                matches: matches.len(),
            });
        }

        let (steps, field) =
            matches
                .into_iter()
                .next()
                .ok_or_else(|| LocateError::PathNotFound {
                    path: path.clone(),
                    segment: segment.clone(),
                })?;

        trail.extend(steps);
        response_path.push(field.response_key().to_string());
        current = &field.selections;
        located = Some(field);
    }

    let field = located.ok_or(LocateError::EmptyPath)?;
    trace!(path = %path, trail = ?trail, "located selection");

    Ok(LocatedSelection {
        root,
        field,
        trail,
        response_path,
    })
}

fn collect_matching_fields<'a>(
    selection_set: &'a SelectionSet,
    name: &str,
    prefix: &mut Vec<usize>,
    matches: &mut Vec<(Vec<usize>, &'a FieldSelection)>,
) {
    for (index, item) in selection_set.items.iter().enumerate() {
        match item {
            SelectionItem::Field(field) if field.name == name => {
                let mut steps = prefix.clone();
                steps.push(index);
                matches.push((steps, field.as_ref()));
            }
            SelectionItem::InlineFragment(fragment) => {
                prefix.push(index);
                collect_matching_fields(&fragment.selections, name, prefix, matches);
                prefix.pop();
            }
            SelectionItem::Field(_) | SelectionItem::FragmentSpread(_) => {}
        }
    }
}

fn splice_at(
    selection_set: &SelectionSet,
    trail: &[usize],
    replacement: SelectionSet,
) -> SelectionSet {
    let Some((index, rest)) = trail.split_first() else {
        return replacement;
    };

    let mut items = selection_set.items.clone();
    let item = &selection_set.items[*index];
    let children = match item.selection_set() {
        Some(children) => splice_at(children, rest, replacement),
        None => replacement,
    };
    items[*index] = item.with_selection_set(children);

    SelectionSet::new(items)
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{path::SelectionPath, selection_item::SelectionItem, selection_set::SelectionSet},
        locator::{locate, LocateError, PathPolicy},
        utils::parsing::parse_selection_set,
    };

    fn selection(source: &str) -> SelectionSet {
        parse_selection_set(source).expect("to parse")
    }

    #[test]
    fn locates_nested_field() {
        let tree = selection("{ userById { id address { zip } } }");
        let located = locate(
            &tree,
            &SelectionPath::from(["userById", "address"]),
            PathPolicy::FirstMatch,
        )
        .expect("path to resolve");

        assert_eq!(located.field().name, "address");
        assert_eq!(located.subtree().to_string(), "{zip}");
        assert_eq!(located.response_path(), ["userById", "address"]);
    }

    #[test]
    fn inline_fragments_are_transparent() {
        let tree = selection("{ node { ... on User { address { zip } } } }");
        let located = locate(
            &tree,
            &SelectionPath::from(["node", "address"]),
            PathPolicy::FirstMatch,
        )
        .expect("path to resolve through the fragment");

        assert_eq!(located.subtree().to_string(), "{zip}");

        let spliced = located.splice(selection("{ postalCode }"));
        assert_eq!(
            spliced.to_string(),
            "{node {... on User {address {postalCode}}}}"
        );
    }

    #[test]
    fn fragment_spreads_are_opaque() {
        let tree = selection("{ node { ...UserFields } }");

        assert_eq!(
            locate(
                &tree,
                &SelectionPath::from(["node", "address"]),
                PathPolicy::FirstMatch
            )
            .unwrap_err(),
            LocateError::PathNotFound {
                path: SelectionPath::from(["node", "address"]),
                segment: "address".to_string(),
            }
        );
    }

    #[test]
    fn missing_segment() {
        let tree = selection("{ userById { id } }");

        assert!(matches!(
            locate(&tree, &SelectionPath::from(["userById", "zip"]), PathPolicy::FirstMatch),
            Err(LocateError::PathNotFound { segment, .. }) if segment == "zip"
        ));
        assert!(matches!(
            locate(&tree, &SelectionPath::default(), PathPolicy::FirstMatch),
            Err(LocateError::EmptyPath)
        ));
    }

    #[test]
    fn path_cannot_pass_through_a_leaf() {
        let tree = selection("{ userById { id } }");

        assert!(matches!(
            locate(&tree, &SelectionPath::from(["userById", "id", "value"]), PathPolicy::FirstMatch),
            Err(LocateError::PathNotFound { segment, .. }) if segment == "value"
        ));
    }

    #[test]
    fn duplicate_siblings_first_match_wins() {
        let tree = selection("{ a: user { id } b: user { name } }");
        let located = locate(&tree, &SelectionPath::from(["user"]), PathPolicy::FirstMatch)
            .expect("first match to be used");

        assert_eq!(located.response_path(), ["a"]);
        assert_eq!(located.subtree().to_string(), "{id}");
    }

    #[test]
    fn duplicate_siblings_fail_when_uniqueness_is_required() {
        let tree = selection("{ a: user { id } ... on Query { b: user { name } } }");

        assert_eq!(
            locate(&tree, &SelectionPath::from(["user"]), PathPolicy::Unique).unwrap_err(),
            LocateError::AmbiguousPath {
                path: SelectionPath::from(["user"]),
                segment: "user".to_string(),
                matches: 2,
            }
        );
    }

    #[test]
    fn names_are_case_sensitive() {
        let tree = selection("{ UserById { id } }");

        assert!(locate(&tree, &SelectionPath::from(["userById"]), PathPolicy::FirstMatch).is_err());
    }

    #[test]
    fn splice_shares_untouched_nodes() {
        let tree = selection("{ before { a } target { b } after { c } }");
        let located = locate(&tree, &SelectionPath::from(["target"]), PathPolicy::FirstMatch)
            .expect("path to resolve");

        let spliced = located.splice(selection("{ replaced }"));

        assert_eq!(spliced.to_string(), "{before {a} target {replaced} after {c}}");
        assert!(spliced.items[0].ptr_eq(&tree.items[0]));
        assert!(!spliced.items[1].ptr_eq(&tree.items[1]));
        assert!(spliced.items[2].ptr_eq(&tree.items[2]));
        // the input tree is left as it was
        assert_eq!(tree.to_string(), "{before {a} target {b} after {c}}");
    }

    #[test]
    fn splice_keeps_field_attributes() {
        let tree = selection(r#"{ t: target(id: "1") @include(if: $on) { b } }"#);
        let located = locate(&tree, &SelectionPath::from(["target"]), PathPolicy::FirstMatch)
            .expect("path to resolve");

        let spliced = located.splice(SelectionSet::new(vec![SelectionItem::leaf("c")]));

        assert_eq!(
            spliced.to_string(),
            r#"{t: target(id: "1") @include(if: $on) {c}}"#
        );
    }
}
