//! Tests for IncrementalMerger and IncrementalPayload.

use crate::tests::utils::computers_operation;
use crate::tests::utils::json;
use crate::tests::utils::path;
use crate::DeferredFragment;
use crate::FieldDescriptor;
use crate::FieldType;
use crate::GraphQLResponse;
use crate::IncrementalError;
use crate::IncrementalMerger;
use crate::IncrementalPayload;
use crate::MergerState;
use crate::ObjectShape;
use crate::Operation;
use crate::ScalarAdapterRegistry;
use crate::Value;
use libgraphql_json::JsonObject;
use std::sync::Arc;

fn merger_for(operation: Operation) -> IncrementalMerger {
    IncrementalMerger::new(
        Arc::new(operation),
        Arc::new(ScalarAdapterRegistry::empty()),
        JsonObject::new(),
    )
}

fn value_at<'a>(response: &'a GraphQLResponse, at: &str) -> Option<&'a Value> {
    response.data.as_ref()?.pointer(&path(at))
}

/// ```graphql
/// query Computer {
///   computer {
///     id
///     ... @defer(label: "specs") { cpu ram }
///     ... @defer(label: "owner") { owner { name } }
///   }
/// }
/// ```
fn labeled_operation() -> Operation {
    let computer = ObjectShape::new(vec![FieldDescriptor::new("id", FieldType::id().non_null())])
        .with_deferred_fragment(DeferredFragment::new(
            Some("specs"),
            vec![
                FieldDescriptor::new("cpu", FieldType::string().non_null()),
                FieldDescriptor::new("ram", FieldType::int()),
            ],
        ))
        .with_deferred_fragment(DeferredFragment::new(
            Some("owner"),
            vec![FieldDescriptor::new(
                "owner",
                FieldType::object(ObjectShape::new(vec![FieldDescriptor::new(
                    "name",
                    FieldType::string().non_null(),
                )]))
                .non_null(),
            )],
        ));
    Operation::new(
        "Computer",
        ObjectShape::new(vec![FieldDescriptor::new(
            "computer",
            FieldType::object(computer).non_null(),
        )]),
    )
}

/// ```graphql
/// query Users {
///   users @stream { name }
/// }
/// ```
fn streamed_operation() -> Operation {
    Operation::new(
        "Users",
        ObjectShape::new(vec![FieldDescriptor::new(
            "users",
            FieldType::list(
                FieldType::object(ObjectShape::new(vec![FieldDescriptor::new(
                    "name",
                    FieldType::string().non_null(),
                )]))
                .non_null(),
            )
            .non_null(),
        )]),
    )
}

const COMPUTER_INITIAL: &str = r#"{"data": {"computer": {"id": "c1"}}, "hasNext": true}"#;

// =============================================================================
// @defer
// =============================================================================

/// Verifies the initial payload and one patch of a deferred fragment.
#[test]
fn test_deferred_fragment_is_merged() {
    let mut merger = merger_for(computers_operation());
    assert_eq!(merger.state(), MergerState::Initial);

    let first = merger
        .apply_json(r#"{"data":{"computers":[{"__typename":"Computer","id":"Computer1"}]},"hasNext":true}"#)
        .unwrap();
    assert!(first.has_next);
    assert_eq!(value_at(&first, r#"["computers", 0, "id"]"#), Some(&Value::from("Computer1")));
    assert_eq!(value_at(&first, r#"["computers", 0, "cpu"]"#), Some(&Value::Null));
    assert_eq!(merger.state(), MergerState::AwaitingPatch);

    let second = merger
        .apply_json(r#"{"incremental":[{"data":{"cpu":"386"},"path":["computers",0]}],"hasNext":false}"#)
        .unwrap();
    assert!(!second.has_next);
    assert_eq!(value_at(&second, r#"["computers", 0, "cpu"]"#), Some(&Value::from("386")));
    assert_eq!(value_at(&second, r#"["computers", 0, "id"]"#), Some(&Value::from("Computer1")));
    assert!(merger.is_terminal());
}

/// Verifies that nothing is accepted after the final payload.
#[test]
fn test_payload_after_terminal() {
    let mut merger = merger_for(labeled_operation());
    merger
        .apply_json(r#"{"data": {"computer": {"id": "c1"}}, "hasNext": false}"#)
        .unwrap();
    assert!(matches!(
        merger.apply_json(r#"{"incremental": [], "hasNext": false}"#).unwrap_err(),
        IncrementalError::AlreadyTerminated,
    ));
}

/// Verifies that every entry of a payload is applied before the payload's
/// response is decoded.
#[test]
fn test_entries_of_one_payload_apply_together() {
    let mut merger = merger_for(labeled_operation());
    merger.apply_json(COMPUTER_INITIAL).unwrap();
    let response = merger
        .apply_json(
            r#"{"incremental": [
                {"data": {"owner": {"name": "Ada"}}, "path": ["computer"], "label": "owner"},
                {"data": {"cpu": "386", "ram": 4}, "path": ["computer"], "label": "specs"}
            ], "hasNext": false}"#,
        )
        .unwrap();
    assert_eq!(value_at(&response, r#"["computer", "cpu"]"#), Some(&Value::from("386")));
    assert_eq!(value_at(&response, r#"["computer", "ram"]"#), Some(&Value::Int(4)));
    assert_eq!(value_at(&response, r#"["computer", "owner", "name"]"#), Some(&Value::from("Ada")));
    assert!(!response.has_errors());
}

/// Verifies that fragments delivered in separate payloads each surface in
/// turn.
#[test]
fn test_labeled_fragments_in_separate_payloads() {
    let mut merger = merger_for(labeled_operation());
    let initial = merger.apply_json(COMPUTER_INITIAL).unwrap();
    assert_eq!(value_at(&initial, r#"["computer", "owner"]"#), Some(&Value::Null));

    let specs = merger
        .apply_json(r#"{"incremental": [{"data": {"cpu": "386"}, "path": ["computer"], "label": "specs"}], "hasNext": true}"#)
        .unwrap();
    assert_eq!(value_at(&specs, r#"["computer", "cpu"]"#), Some(&Value::from("386")));
    assert_eq!(value_at(&specs, r#"["computer", "ram"]"#), Some(&Value::Null));
    assert_eq!(value_at(&specs, r#"["computer", "owner"]"#), Some(&Value::Null));

    let owner = merger
        .apply_json(r#"{"incremental": [{"data": {"owner": {"name": "Ada"}}, "path": ["computer"], "label": "owner"}], "hasNext": false}"#)
        .unwrap();
    assert_eq!(value_at(&owner, r#"["computer", "cpu"]"#), Some(&Value::from("386")));
    assert_eq!(value_at(&owner, r#"["computer", "owner", "name"]"#), Some(&Value::from("Ada")));
}

/// Verifies that a nullable patch field that fails to decode becomes null
/// and is reported, while the rest of the fragment is delivered.
#[test]
fn test_nullable_patch_field_failure() {
    let mut merger = merger_for(labeled_operation());
    merger.apply_json(COMPUTER_INITIAL).unwrap();
    let response = merger
        .apply_json(r#"{"incremental": [{"data": {"cpu": "386", "ram": "lots"}, "path": ["computer"], "label": "specs"}], "hasNext": true}"#)
        .unwrap();
    assert_eq!(value_at(&response, r#"["computer", "cpu"]"#), Some(&Value::from("386")));
    assert_eq!(value_at(&response, r#"["computer", "ram"]"#), Some(&Value::Null));
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].path, Some(path(r#"["computer", "ram"]"#)));
    assert_eq!(merger.state(), MergerState::AwaitingPatch);
}

/// Verifies that a non-nullable patch field that fails to decode drops the
/// whole fragment without ending the sequence.
#[test]
fn test_non_nullable_patch_field_failure() {
    let mut merger = merger_for(labeled_operation());
    merger.apply_json(COMPUTER_INITIAL).unwrap();
    let response = merger
        .apply_json(r#"{"incremental": [{"data": {"cpu": null, "ram": 4}, "path": ["computer"], "label": "specs"}], "hasNext": true}"#)
        .unwrap();
    assert_eq!(value_at(&response, r#"["computer", "cpu"]"#), Some(&Value::Null));
    assert_eq!(value_at(&response, r#"["computer", "ram"]"#), Some(&Value::Null));
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].path, Some(path(r#"["computer", "cpu"]"#)));
    assert!(response.errors[0].message.contains("computer.cpu"), "{}", response.errors[0]);

    let owner = merger
        .apply_json(r#"{"incremental": [{"data": {"owner": {"name": "Ada"}}, "path": ["computer"], "label": "owner"}], "hasNext": false}"#)
        .unwrap();
    assert_eq!(value_at(&owner, r#"["computer", "owner", "name"]"#), Some(&Value::from("Ada")));
    assert_eq!(value_at(&owner, r#"["computer", "cpu"]"#), Some(&Value::Null));
    assert_eq!(owner.errors.len(), 1);
}

/// Verifies that a patch without a label is checked against the fragment
/// whose fields it carries, so a failing non-nullable field drops it
/// without ending the sequence.
#[test]
fn test_unlabeled_patch_for_labeled_fragment() {
    let mut merger = merger_for(labeled_operation());
    merger.apply_json(COMPUTER_INITIAL).unwrap();
    let response = merger
        .apply_json(r#"{"incremental": [{"data": {"cpu": null}, "path": ["computer"]}], "hasNext": true}"#)
        .unwrap();
    assert_eq!(value_at(&response, r#"["computer", "cpu"]"#), Some(&Value::Null));
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].path, Some(path(r#"["computer", "cpu"]"#)));
    assert_eq!(merger.state(), MergerState::AwaitingPatch);

    let response = merger
        .apply_json(r#"{"incremental": [{"data": {"cpu": "386", "ram": 4}, "path": ["computer"]}], "hasNext": false}"#)
        .unwrap();
    assert_eq!(value_at(&response, r#"["computer", "cpu"]"#), Some(&Value::from("386")));
    assert_eq!(value_at(&response, r#"["computer", "ram"]"#), Some(&Value::Int(4)));
    assert_eq!(value_at(&response, r#"["computer", "owner"]"#), Some(&Value::Null));
    assert_eq!(merger.state(), MergerState::Terminal);
}

/// Verifies that a patch whose label names no fragment is matched by the
/// fields it carries.
#[test]
fn test_unknown_label_matches_by_fields() {
    let mut merger = merger_for(labeled_operation());
    merger.apply_json(COMPUTER_INITIAL).unwrap();
    let response = merger
        .apply_json(r#"{"incremental": [{"data": {"owner": {"name": "Ada"}}, "path": ["computer"], "label": "renamed"}], "hasNext": false}"#)
        .unwrap();
    assert_eq!(value_at(&response, r#"["computer", "owner", "name"]"#), Some(&Value::from("Ada")));
    assert!(response.errors.is_empty());
}

/// Verifies that a patch addressed to an object without deferred fragments
/// is fatal rather than overwriting delivered fields.
#[test]
fn test_patch_outside_deferred_fragment() {
    let mut merger = merger_for(labeled_operation());
    merger.apply_json(COMPUTER_INITIAL).unwrap();
    let err = merger
        .apply_json(r#"{"incremental": [{"data": {"computer": {"id": "c2"}}, "path": [], "label": "specs"}], "hasNext": false}"#)
        .unwrap_err();
    assert!(
        matches!(&err, IncrementalError::UnresolvablePath { path: at } if at.elements().is_empty()),
        "{err:?}",
    );
    assert!(merger.is_terminal());
}

/// Verifies that only members selected by the delivered fragment are
/// merged.
#[test]
fn test_patch_members_outside_fragment_are_ignored() {
    let mut merger = merger_for(labeled_operation());
    merger.apply_json(COMPUTER_INITIAL).unwrap();
    let response = merger
        .apply_json(r#"{"incremental": [{"data": {"cpu": "386", "id": "c2"}, "path": ["computer"], "label": "specs"}], "hasNext": false}"#)
        .unwrap();
    assert_eq!(value_at(&response, r#"["computer", "id"]"#), Some(&Value::from("c1")));
    assert_eq!(value_at(&response, r#"["computer", "cpu"]"#), Some(&Value::from("386")));
}

/// Verifies that the path of a failing streamed item names the member
/// inside the item.
#[test]
fn test_stream_item_error_path() {
    let mut merger = merger_for(streamed_operation());
    merger
        .apply_json(r#"{"data": {"users": [{"name": "a"}]}, "hasNext": true}"#)
        .unwrap();
    let response = merger
        .apply_json(r#"{"incremental": [{"items": [{"name": "b"}, {"name": 7}], "path": ["users"]}], "hasNext": false}"#)
        .unwrap();
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].path, Some(path(r#"["users", 2, "name"]"#)));
    assert_eq!(value_at(&response, r#"["users", 1]"#), None);
}

/// Verifies that entry errors are kept, scoped to the entry path when they
/// carry no path of their own.
#[test]
fn test_entry_errors() {
    let mut merger = merger_for(labeled_operation());
    merger.apply_json(COMPUTER_INITIAL).unwrap();
    let response = merger
        .apply_json(
            r#"{"incremental": [{
                "data": null,
                "path": ["computer"],
                "label": "owner",
                "errors": [
                    {"message": "owner unavailable"},
                    {"message": "name redacted", "path": ["computer", "owner", "name"]}
                ]
            }], "hasNext": false}"#,
        )
        .unwrap();
    assert_eq!(value_at(&response, r#"["computer", "owner"]"#), Some(&Value::Null));
    let paths: Vec<_> = response.errors.iter().map(|error| error.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            Some(path(r#"["computer"]"#)),
            Some(path(r#"["computer", "owner", "name"]"#)),
        ],
    );
}

/// Verifies that a patch addressed to a location that does not exist is
/// fatal.
#[test]
fn test_unresolvable_path() {
    let mut merger = merger_for(computers_operation());
    merger
        .apply_json(r#"{"data":{"computers":[{"__typename":"Computer","id":"Computer1"}]},"hasNext":true}"#)
        .unwrap();
    let err = merger
        .apply_json(r#"{"incremental":[{"data":{"cpu":"386"},"path":["computers",5]}],"hasNext":false}"#)
        .unwrap_err();
    assert!(
        matches!(&err, IncrementalError::UnresolvablePath { path: at } if *at == path(r#"["computers", 5]"#)),
        "{err:?}",
    );
    assert!(merger.is_terminal());
}

/// Verifies that a subsequent payload may not replace `data`.
#[test]
fn test_subsequent_payload_with_data() {
    let mut merger = merger_for(labeled_operation());
    merger.apply_json(COMPUTER_INITIAL).unwrap();
    assert!(matches!(
        merger.apply_json(COMPUTER_INITIAL).unwrap_err(),
        IncrementalError::MalformedPayload { .. },
    ));
    assert!(merger.is_terminal());
}

/// Verifies that response-level errors accumulate across payloads.
#[test]
fn test_errors_accumulate() {
    let mut merger = merger_for(labeled_operation());
    let initial = merger
        .apply_json(r#"{"data": {"computer": {"id": "c1"}}, "errors": [{"message": "slow"}], "hasNext": true}"#)
        .unwrap();
    assert_eq!(initial.errors.len(), 1);
    let last = merger
        .apply_json(r#"{"incremental": [], "errors": [{"message": "slower"}], "extensions": {"cost": 3}, "hasNext": false}"#)
        .unwrap();
    let messages: Vec<_> = last.errors.iter().map(|error| error.message.as_str()).collect();
    assert_eq!(messages, vec!["slow", "slower"]);
    assert_eq!(last.extensions.get("cost"), Some(&json("3")));
}

/// Verifies that an initial payload without data still completes.
#[test]
fn test_initial_payload_without_data() {
    let mut merger = merger_for(labeled_operation());
    let response = merger
        .apply_json(r#"{"data": null, "errors": [{"message": "boom"}], "hasNext": false}"#)
        .unwrap();
    assert_eq!(response.data, None);
    assert_eq!(response.errors[0].message, "boom");
    assert!(merger.is_terminal());
}

/// Verifies that the same payloads always produce the same responses,
/// whatever order the members of each payload arrive in.
#[test]
fn test_merge_is_deterministic() {
    let in_order = [
        r#"{"data": {"computer": {"id": "c1"}}, "hasNext": true}"#,
        r#"{"incremental": [{"data": {"cpu": "386", "ram": 4}, "path": ["computer"], "label": "specs"}], "hasNext": true}"#,
        r#"{"incremental": [{"label": "owner", "path": ["computer"], "data": {"owner": {"name": "Ada"}}}], "hasNext": false}"#,
    ];
    let reordered = [
        r#"{"hasNext": true, "data": {"computer": {"id": "c1"}}}"#,
        r#"{"hasNext": true, "incremental": [{"label": "specs", "path": ["computer"], "data": {"ram": 4, "cpu": "386"}}]}"#,
        r#"{"hasNext": false, "incremental": [{"path": ["computer"], "data": {"owner": {"name": "Ada"}}, "label": "owner"}]}"#,
    ];

    let run = |payloads: &[&str]| {
        let mut merger = merger_for(labeled_operation());
        payloads
            .iter()
            .map(|payload| merger.apply_json(payload).unwrap())
            .collect::<Vec<_>>()
    };
    let expected = run(&in_order);
    assert_eq!(run(&in_order), expected);
    assert_eq!(run(&reordered), expected);
}

// =============================================================================
// @stream
// =============================================================================

/// Verifies that streamed items are appended whether the entry path names
/// the list or the index of the first new item.
#[test]
fn test_stream_items_are_appended() {
    let mut merger = merger_for(streamed_operation());
    merger
        .apply_json(r#"{"data": {"users": [{"name": "a"}]}, "hasNext": true}"#)
        .unwrap();
    merger
        .apply_json(r#"{"incremental": [{"items": [{"name": "b"}], "path": ["users", 1]}], "hasNext": true}"#)
        .unwrap();
    let response = merger
        .apply_json(r#"{"incremental": [{"items": [{"name": "c"}, {"name": "d"}], "path": ["users"]}], "hasNext": false}"#)
        .unwrap();

    let names: Vec<_> = response
        .data
        .as_ref()
        .and_then(|data| data.get("users"))
        .and_then(Value::as_list)
        .unwrap()
        .iter()
        .map(|user| user.get("name").and_then(Value::as_str).unwrap())
        .collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);
}

/// Verifies that an item failing a non-nullable item type drops the
/// entry and is reported.
#[test]
fn test_invalid_stream_item() {
    let mut merger = merger_for(streamed_operation());
    merger
        .apply_json(r#"{"data": {"users": [{"name": "a"}]}, "hasNext": true}"#)
        .unwrap();
    let response = merger
        .apply_json(r#"{"incremental": [{"items": [{"name": "b"}, {"name": null}], "path": ["users", 1]}], "hasNext": false}"#)
        .unwrap();
    assert_eq!(
        response.data.as_ref().and_then(|data| data.get("users")).and_then(Value::as_list).map(<[Value]>::len),
        Some(1),
    );
    assert_eq!(response.errors[0].path, Some(path(r#"["users", 2, "name"]"#)));
}

/// Verifies that streaming into something that is not a list is fatal.
#[test]
fn test_stream_into_non_list() {
    let mut merger = merger_for(labeled_operation());
    merger.apply_json(COMPUTER_INITIAL).unwrap();
    assert!(matches!(
        merger
            .apply_json(r#"{"incremental": [{"items": [1], "path": ["computer", "id"]}], "hasNext": false}"#)
            .unwrap_err(),
        IncrementalError::UnresolvablePath { .. },
    ));
}

// =============================================================================
// Payload parsing
// =============================================================================

/// Verifies that the single-patch payload form reads as one entry.
#[test]
fn test_legacy_payload_form() {
    let payload = IncrementalPayload::parse(
        r#"{"data": {"cpu": "386"}, "path": ["computers", 0], "label": "specs", "hasNext": false}"#,
    )
    .unwrap();
    assert_eq!(payload.data, None);
    assert_eq!(payload.incremental.len(), 1);
    assert_eq!(payload.incremental[0].path, path(r#"["computers", 0]"#));
    assert_eq!(payload.incremental[0].label.as_deref(), Some("specs"));
    assert_eq!(payload.incremental[0].data, Some(json(r#"{"cpu": "386"}"#)));
}

/// Verifies that malformed payloads are rejected.
#[test]
fn test_malformed_payloads() {
    for text in [
        "[]",
        r#"{"hasNext": "yes"}"#,
        r#"{"incremental": {}}"#,
        r#"{"incremental": [{"data": {}}]}"#,
        r#"{"incremental": [{"items": 1, "path": []}]}"#,
        r#"{"errors": [{"no": "message"}]}"#,
    ] {
        assert!(
            matches!(IncrementalPayload::parse(text), Err(IncrementalError::MalformedPayload { .. })),
            "{text}",
        );
    }
    assert!(matches!(IncrementalPayload::parse("{"), Err(IncrementalError::Json(_))));
}

/// Verifies that a missing `hasNext` reads as `false`.
#[test]
fn test_missing_has_next() {
    let payload = IncrementalPayload::parse(r#"{"data": {}}"#).unwrap();
    assert!(!payload.has_next);
}
