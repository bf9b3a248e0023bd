use std::error::Error;

use graphql_wrapping_config::delegation::DelegationConfig;
use serde_json::{json, Map, Value};

use crate::{
    ast::{
        operation::OperationKind,
        path::SelectionPath,
        selection_item::SelectionItem,
        selection_set::{FieldSelection, SelectionSet},
    },
    delegation::{context::DelegationContext, info::ResolveInfo},
    locator::PathPolicy,
    tests::testkit::{init_logger, InMemorySource, RecordsById},
    transform::TransformFnError,
    utils::parsing::parse_operation,
    DelegationRequest, Delegator, SourceExecutorMap, TransformPipeline, TreeTransform,
};

fn users_source() -> InMemorySource<RecordsById> {
    let records = json!({
        "u1": {
            "id": "user1",
            "addressStreetAddress": "Windy Shore 21 A 7",
            "addressZip": "12345"
        }
    });

    InMemorySource::new(RecordsById {
        field_name: "userById",
        records: records.as_object().cloned().unwrap_or_default(),
    })
}

fn id_args(id: &str) -> Map<String, Value> {
    let mut args = Map::new();
    args.insert("id".to_string(), Value::String(id.to_string()));
    args
}

/// `streetAddress` becomes `addressStreetAddress` and so on.
fn prefix_with_address(subtree: &SelectionSet) -> Result<SelectionSet, TransformFnError> {
    Ok(subtree
        .iter()
        .map(|item| match item {
            SelectionItem::Field(field) => {
                let mut chars = field.name.chars();
                let capitalized = match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                };
                FieldSelection::new(format!("address{}", capitalized)).into()
            }
            fragment => fragment.clone(),
        })
        .collect())
}

fn address_transform() -> TreeTransform {
    TreeTransform::new(["userById"], prefix_with_address, |result| {
        Ok(json!({
            "streetAddress": result["addressStreetAddress"].clone(),
            "zip": result["addressZip"].clone(),
        }))
    })
}

fn address_pipeline() -> TransformPipeline {
    TransformPipeline::new(vec![
        address_transform(),
        // second level field, gone once `userById` is rewritten
        TreeTransform::identity(["userById", "zip"]),
    ])
}

#[tokio::test]
async fn wrapping_delegation_returning_selection_set() -> Result<(), Box<dyn Error>> {
    init_logger();
    let caller = parse_operation(
        r#"
        query {
          addressByUser(id: "u1") {
            streetAddress
            zip
          }
        }
        "#,
        None,
    )?;
    let info = ResolveInfo::from_document(
        &caller,
        &SelectionPath::from(["addressByUser"]),
        PathPolicy::FirstMatch,
    )?;

    let source = users_source();
    let received = source.received_queries();
    let mut executors = SourceExecutorMap::new();
    executors.insert("users", source);
    let delegator = Delegator::new(executors, DelegationConfig::default());

    let result = delegator
        .delegate(DelegationRequest {
            source_name: "users",
            operation_kind: OperationKind::Query,
            field_name: "userById",
            args: &id_args("u1"),
            context: &DelegationContext::new(),
            info: &info,
            pipeline: &address_pipeline(),
        })
        .await?;

    assert_eq!(
        result.data,
        json!({
            "streetAddress": "Windy Shore 21 A 7",
            "zip": "12345"
        })
    );
    assert!(result.errors.is_empty());
    assert_eq!(
        *received.lock().unwrap(),
        vec![r#"query {userById(id: "u1") {addressStreetAddress addressZip}}"#.to_string()]
    );

    Ok(())
}

#[tokio::test]
async fn rename_fields_keeps_caller_aliases() -> Result<(), Box<dyn Error>> {
    init_logger();
    let caller = parse_operation(
        r#"{ addressByUser(id: "u1") { street: streetAddress zip } }"#,
        None,
    )?;
    let info = ResolveInfo::from_document(
        &caller,
        &SelectionPath::from(["addressByUser"]),
        PathPolicy::FirstMatch,
    )?;

    let source = users_source();
    let received = source.received_queries();
    let mut executors = SourceExecutorMap::new();
    executors.insert("users", source);
    let delegator = Delegator::new(executors, DelegationConfig::default());
    let pipeline = TransformPipeline::new(vec![TreeTransform::rename_fields(
        ["userById"],
        [("streetAddress", "addressStreetAddress"), ("zip", "addressZip")],
    )]);

    let result = delegator
        .delegate(DelegationRequest {
            source_name: "users",
            operation_kind: OperationKind::Query,
            field_name: "userById",
            args: &id_args("u1"),
            context: &DelegationContext::new(),
            info: &info,
            pipeline: &pipeline,
        })
        .await?;

    assert_eq!(
        result.data,
        json!({ "street": "Windy Shore 21 A 7", "zip": "12345" })
    );
    assert_eq!(
        *received.lock().unwrap(),
        vec![
            r#"query {userById(id: "u1") {street: addressStreetAddress addressZip}}"#
                .to_string()
        ]
    );

    Ok(())
}

#[tokio::test]
async fn inline_fragments_pass_through_the_rewrite() -> Result<(), Box<dyn Error>> {
    init_logger();
    let caller = parse_operation(
        r#"{ addressByUser(id: "u1") { streetAddress ... on Address { zip } } }"#,
        None,
    )?;
    let info = ResolveInfo::from_document(
        &caller,
        &SelectionPath::from(["addressByUser"]),
        PathPolicy::FirstMatch,
    )?;

    // tree level: the fragment node is the caller's own node
    let outbound = SelectionSet::new(vec![FieldSelection::new("userById")
        .with_selections(info.selection_set.clone())
        .into()]);
    let forward = address_transform().apply_forward(&outbound, PathPolicy::FirstMatch)?;
    let rewritten = forward.selection_set.items[0]
        .selection_set()
        .ok_or("root field to have children")?;
    assert_eq!(
        rewritten.to_string(),
        "{addressStreetAddress ... on Address {zip}}"
    );
    assert!(rewritten.items[1].ptr_eq(&info.selection_set.items[1]));

    // delegation level: the fragment reaches the source untouched
    let source = users_source();
    let received = source.received_queries();
    let mut executors = SourceExecutorMap::new();
    executors.insert("users", source);
    let delegator = Delegator::new(executors, DelegationConfig::default());

    let result = delegator
        .delegate(DelegationRequest {
            source_name: "users",
            operation_kind: OperationKind::Query,
            field_name: "userById",
            args: &id_args("u1"),
            context: &DelegationContext::new(),
            info: &info,
            pipeline: &address_pipeline(),
        })
        .await?;

    assert_eq!(
        *received.lock().unwrap(),
        vec![r#"query {userById(id: "u1") {addressStreetAddress ... on Address {zip}}}"#.to_string()]
    );
    assert_eq!(result.data["streetAddress"], json!("Windy Shore 21 A 7"));

    Ok(())
}
