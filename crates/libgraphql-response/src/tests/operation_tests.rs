//! Tests for Operation: descriptor loading, envelopes, and codec lookup.

use crate::tests::utils::computers_operation;
use crate::tests::utils::json;
use crate::tests::utils::path;
use crate::tests::utils::pets_operation;
use crate::CodecError;
use crate::Condition;
use crate::DecodeContext;
use crate::DeferredFragment;
use crate::FieldDescriptor;
use crate::FieldType;
use crate::GraphQLError;
use crate::GraphQLErrorLocation;
use crate::ObjectShape;
use crate::Operation;
use crate::ScalarAdapterRegistry;
use crate::ScalarKind;
use crate::Value;
use crate::ValueCodec;
use libgraphql_json::JsonObject;

const DESCRIPTOR: &str = r#"{
    "name": "Profile",
    "root": {
        "fields": [
            {
                "responseKey": "viewer",
                "fieldType": {
                    "kind": "object",
                    "nullable": false,
                    "shape": {
                        "fields": [
                            {"responseKey": "id", "fieldType": {"kind": "scalar", "scalar": "ID", "nullable": false}},
                            {
                                "responseKey": "avatar",
                                "schemaName": "profilePicture",
                                "fieldType": {"kind": "customScalar", "name": "URL"},
                                "conditions": [{"variable": "withAvatar"}]
                            },
                            {
                                "responseKey": "tags",
                                "fieldType": {"kind": "list", "ofType": {"kind": "scalar", "scalar": "String", "nullable": false}}
                            }
                        ],
                        "deferredFragments": [
                            {"label": "stats", "fields": [{"responseKey": "joinedAt", "fieldType": {"kind": "customScalar", "name": "DateTime"}}]}
                        ]
                    }
                }
            }
        ]
    }
}"#;

fn profile_operation() -> Operation {
    Operation::new(
        "Profile",
        ObjectShape::new(vec![FieldDescriptor::new(
            "viewer",
            FieldType::object(
                ObjectShape::new(vec![
                    FieldDescriptor::new("id", FieldType::id().non_null()),
                    FieldDescriptor::new("avatar", FieldType::custom("URL"))
                        .with_schema_name("profilePicture")
                        .with_condition(Condition::include_if("withAvatar")),
                    FieldDescriptor::new("tags", FieldType::list(FieldType::string().non_null())),
                ])
                .with_deferred_fragment(DeferredFragment::new(
                    Some("stats"),
                    vec![FieldDescriptor::new("joinedAt", FieldType::custom("DateTime"))],
                )),
            )
            .non_null(),
        )]),
    )
}

/// Verifies that descriptor JSON loads into the same shape the builders
/// produce.
#[test]
fn test_load_descriptor_json() {
    let operation = Operation::from_descriptor_json(DESCRIPTOR).unwrap();
    let expected = profile_operation();
    assert_eq!(operation.name(), "Profile");
    assert_eq!(operation.root(), expected.root());
}

/// Verifies that an operation serializes back to descriptor JSON it can be
/// reloaded from.
#[test]
fn test_descriptor_json_round_trip() {
    let operation = profile_operation();
    let text = serde_json::to_string(&operation).unwrap();
    let reloaded = Operation::from_descriptor_json(&text).unwrap();
    assert_eq!(reloaded.root(), operation.root());
    assert_eq!(reloaded.name(), operation.name());
}

/// Verifies that custom scalars are collected from every selection,
/// deferred fragments included, in first-seen order.
#[test]
fn test_required_custom_scalars() {
    let names: Vec<_> = profile_operation().required_custom_scalars().into_iter().collect();
    assert_eq!(names, vec!["URL".to_string(), "DateTime".to_string()]);
    assert!(pets_operation().required_custom_scalars().is_empty());
}

/// Verifies GraphQL renderings of declared types.
#[test]
fn test_field_type_rendering() {
    assert_eq!(FieldType::list(FieldType::int()).non_null().to_graphql_string(), "[Int]!");
    assert_eq!(
        FieldType::list(FieldType::custom("URL").non_null()).to_graphql_string(),
        "[URL!]",
    );
    assert_eq!(FieldType::scalar(ScalarKind::Id).non_null().to_graphql_string(), "ID!");
}

/// Verifies that codec lookup follows lists, and type conditions by the
/// `__typename` found in the raw tree.
#[test]
fn test_codec_at() {
    let operation = pets_operation();
    let raw = json(r#"{"pets": [{"__typename": "Cat", "name": "Tom", "lives": 9}]}"#);

    let lives = operation.codec_at(&path(r#"["pets", 0, "lives"]"#), &raw);
    assert!(matches!(lives, Some(ValueCodec::Leaf(ScalarKind::Int))));
    assert!(operation.codec_at(&path(r#"["pets", 0, "barks"]"#), &raw).is_none());
    assert!(operation.codec_at(&path(r#"["pets", "name"]"#), &raw).is_none());
    assert!(
        operation
            .codec_at(&path(r#"["pets", 0]"#), &raw)
            .and_then(ValueCodec::as_composite)
            .is_some_and(|composite| composite.is_polymorphic()),
    );

    let computers = computers_operation();
    let raw = json(r#"{"computers": [{"__typename": "Computer", "id": "1"}]}"#);
    assert!(computers.codec_at(&path(r#"["computers", 0, "cpu"]"#), &raw).is_some());
}

/// Verifies a full envelope decode: data, errors, extensions, `hasNext`.
#[test]
fn test_decode_response() {
    let registry = ScalarAdapterRegistry::empty();
    let variables = JsonObject::new();
    let ctx = DecodeContext::new(&registry, &variables);
    let response = pets_operation()
        .decode_response(
            r#"{
                "extensions": {"traceId": "t1"},
                "errors": [{
                    "message": "pet store degraded",
                    "locations": [{"line": 2, "column": 3}],
                    "path": ["pets", 0],
                    "extensions": {"code": "DEGRADED"},
                    "severity": "warning"
                }],
                "data": {"pets": [{"__typename": "Dog", "name": "Rex", "barks": false}]}
            }"#,
            &ctx,
        )
        .unwrap();

    assert!(!response.has_next);
    assert!(response.has_errors());
    assert_eq!(response.extensions.get("traceId"), Some(&json(r#""t1""#)));
    assert_eq!(
        response.data.as_ref().and_then(|data| data.pointer(&path(r#"["pets", 0, "barks"]"#))),
        Some(&Value::Boolean(false)),
    );

    let error = &response.errors[0];
    assert_eq!(error.message, "pet store degraded");
    assert_eq!(error.locations, vec![GraphQLErrorLocation { line: 2, column: 3 }]);
    assert_eq!(error.path, Some(path(r#"["pets", 0]"#)));
    assert_eq!(error.extensions.get("code"), Some(&json(r#""DEGRADED""#)));
    assert_eq!(error.other_fields.get("severity"), Some(&json(r#""warning""#)));
    assert_eq!(error.to_string(), "pet store degraded (at `pets[0]`)");
    assert_eq!(GraphQLError::from_json_value(&error.to_json_value()).as_ref(), Some(error));
}

/// Verifies that `"data": null` decodes as absent data.
#[test]
fn test_decode_response_with_null_data() {
    let registry = ScalarAdapterRegistry::empty();
    let variables = JsonObject::new();
    let ctx = DecodeContext::new(&registry, &variables);
    let response = pets_operation()
        .decode_response(r#"{"data": null, "errors": [{"message": "boom"}], "hasNext": false}"#, &ctx)
        .unwrap();
    assert_eq!(response.data, None);
    assert_eq!(response.errors, vec![GraphQLError::new("boom")]);
}

/// Verifies that malformed envelopes are rejected.
#[test]
fn test_malformed_envelopes() {
    let registry = ScalarAdapterRegistry::empty();
    let variables = JsonObject::new();
    let ctx = DecodeContext::new(&registry, &variables);
    let operation = pets_operation();

    for text in [r#"{"errors": 5}"#, r#"{"errors": [{"path": []}]}"#, r#"{"extensions": []}"#] {
        assert!(
            matches!(
                operation.decode_response(text, &ctx),
                Err(CodecError::MalformedEnvelope { .. }),
            ),
            "{text}",
        );
    }
    assert!(matches!(
        operation.decode_response(r#"{"data": {"pets": []}} trailing"#, &ctx),
        Err(CodecError::Json(_)),
    ));
}
