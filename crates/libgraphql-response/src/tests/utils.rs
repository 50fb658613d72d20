//! Various test utils.

use crate::DecodeContext;
use crate::DeferredFragment;
use crate::FieldDescriptor;
use crate::FieldType;
use crate::ObjectShape;
use crate::Operation;
use crate::ResponseObject;
use crate::Result;
use crate::ScalarAdapterRegistry;
use libgraphql_json::JsonObject;
use libgraphql_json::JsonValue;
use libgraphql_json::StrJsonReader;

/// Parses a JSON fixture, panicking on malformed input.
pub fn json(text: &str) -> JsonValue {
    JsonValue::parse(text).unwrap()
}

/// Parses a JSON object fixture (e.g. operation variables).
pub fn json_object(text: &str) -> JsonObject {
    json(text).as_object().cloned().unwrap()
}

/// Decodes `text` as the `data` of `operation` without variables or custom
/// scalar adapters.
pub fn decode_data(operation: &Operation, text: &str) -> Result<ResponseObject> {
    decode_data_with(operation, &ScalarAdapterRegistry::empty(), &JsonObject::new(), text)
}

pub fn decode_data_with(
    operation: &Operation,
    registry: &ScalarAdapterRegistry,
    variables: &JsonObject,
    text: &str,
) -> Result<ResponseObject> {
    let ctx = DecodeContext::new(registry, variables);
    let mut reader = StrJsonReader::new(text);
    operation.decode_data(&mut reader, &ctx)
}

/// An operation with a single root field.
pub fn single_field_operation(response_key: &str, field_type: FieldType) -> Operation {
    Operation::new(
        "SingleField",
        ObjectShape::new(vec![FieldDescriptor::new(response_key, field_type)]),
    )
}

/// ```graphql
/// query Computers {
///   computers {
///     __typename
///     id
///     ... @defer { cpu }
///   }
/// }
/// ```
pub fn computers_operation() -> Operation {
    let computer = ObjectShape::new(vec![
        FieldDescriptor::new("__typename", FieldType::string().non_null()),
        FieldDescriptor::new("id", FieldType::id().non_null()),
    ])
    .with_deferred_fragment(DeferredFragment::new(
        None,
        vec![FieldDescriptor::new("cpu", FieldType::string().non_null())],
    ));
    Operation::new(
        "Computers",
        ObjectShape::new(vec![FieldDescriptor::new(
            "computers",
            FieldType::list(FieldType::object(computer).non_null()).non_null(),
        )]),
    )
}

/// ```graphql
/// query Pets {
///   pets {
///     __typename
///     name
///     ... on Dog { barks }
///     ... on Cat { lives }
///   }
/// }
/// ```
pub fn pets_operation() -> Operation {
    let base = || {
        vec![
            FieldDescriptor::new("__typename", FieldType::string().non_null()),
            FieldDescriptor::new("name", FieldType::string().non_null()),
        ]
    };
    let with_field = |field: FieldDescriptor| {
        let mut fields = base();
        fields.push(field);
        fields
    };
    let pet = ObjectShape::new(base())
        .with_possible_type(
            "Dog",
            with_field(FieldDescriptor::new("barks", FieldType::boolean().non_null())),
        )
        .with_possible_type(
            "Cat",
            with_field(FieldDescriptor::new("lives", FieldType::int().non_null())),
        );
    Operation::new(
        "Pets",
        ObjectShape::new(vec![FieldDescriptor::new(
            "pets",
            FieldType::list(FieldType::object(pet).non_null()).non_null(),
        )]),
    )
}

/// Parses a path fixture such as `["computers", 0, "cpu"]`.
pub fn path(text: &str) -> libgraphql_json::JsonPath {
    libgraphql_json::JsonPath::from_json_value(&json(text)).unwrap()
}
