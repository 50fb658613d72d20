use crate::GraphQLError;
use crate::IncrementalError;
use libgraphql_json::JsonObject;
use libgraphql_json::JsonPath;
use libgraphql_json::JsonValue;

type Result<T> = std::result::Result<T, IncrementalError>;

/// One patch within an incremental payload.
///
/// `@defer` patches carry `data` to merge into the object at `path`.
/// `@stream` patches carry `items` to append to the list at `path` (or, when
/// `path` ends in an index, to the list containing that index).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IncrementalEntry {
    pub data: Option<JsonValue>,
    pub errors: Vec<GraphQLError>,
    pub extensions: JsonObject,
    pub items: Option<Vec<JsonValue>>,
    pub label: Option<String>,
    pub path: JsonPath,
}
impl IncrementalEntry {
    fn from_json_object(entry: &JsonObject) -> Result<Self> {
        let path = entry
            .get("path")
            .and_then(JsonPath::from_json_value)
            .ok_or_else(|| IncrementalError::malformed_payload("incremental entry without a valid `path`"))?;
        let items = match entry.get("items") {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::List(items)) => Some(items.clone()),
            Some(_) => return Err(IncrementalError::malformed_payload("`items` must be a list")),
        };
        Ok(Self {
            data: entry.get("data").cloned(),
            errors: read_errors(entry)?,
            extensions: read_extensions(entry)?,
            items,
            label: entry
                .get("label")
                .and_then(JsonValue::as_str)
                .map(str::to_string),
            path,
        })
    }
}

/// One payload of an incremental response: the initial envelope, or a
/// subsequent envelope of patches.
///
/// The legacy subsequent-payload form that carries a single patch's
/// `data`, `path`, and `label` at the top level is read as a payload with
/// one entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IncrementalPayload {
    pub data: Option<JsonValue>,
    pub errors: Vec<GraphQLError>,
    pub extensions: JsonObject,
    pub has_next: bool,
    pub incremental: Vec<IncrementalEntry>,
}
impl IncrementalPayload {
    pub fn from_json_value(value: &JsonValue) -> Result<Self> {
        let payload = value
            .as_object()
            .ok_or_else(|| IncrementalError::malformed_payload("payload is not a JSON object"))?;
        let has_next = match payload.get("hasNext") {
            None | Some(JsonValue::Null) => false,
            Some(JsonValue::Bool(has_next)) => *has_next,
            Some(_) => return Err(IncrementalError::malformed_payload("`hasNext` must be a boolean")),
        };

        if payload.contains_key("path") {
            return Ok(Self {
                data: None,
                errors: vec![],
                extensions: JsonObject::new(),
                has_next,
                incremental: vec![IncrementalEntry::from_json_object(payload)?],
            });
        }

        let incremental = match payload.get("incremental") {
            None | Some(JsonValue::Null) => vec![],
            Some(JsonValue::List(entries)) => entries
                .iter()
                .map(|entry| {
                    entry
                        .as_object()
                        .ok_or_else(|| IncrementalError::malformed_payload("incremental entry is not an object"))
                        .and_then(IncrementalEntry::from_json_object)
                })
                .collect::<Result<Vec<_>>>()?,
            Some(_) => return Err(IncrementalError::malformed_payload("`incremental` must be a list")),
        };

        Ok(Self {
            data: payload.get("data").cloned(),
            errors: read_errors(payload)?,
            extensions: read_extensions(payload)?,
            has_next,
            incremental,
        })
    }

    pub fn parse(text: &str) -> Result<Self> {
        Self::from_json_value(&JsonValue::parse(text)?)
    }
}

fn read_errors(object: &JsonObject) -> Result<Vec<GraphQLError>> {
    match object.get("errors") {
        None => Ok(vec![]),
        Some(errors) => GraphQLError::list_from_json_value(errors)
            .ok_or_else(|| IncrementalError::malformed_payload("`errors` must be a list of error objects")),
    }
}

fn read_extensions(object: &JsonObject) -> Result<JsonObject> {
    match object.get("extensions") {
        None | Some(JsonValue::Null) => Ok(JsonObject::new()),
        Some(JsonValue::Object(extensions)) => Ok(extensions.clone()),
        Some(_) => Err(IncrementalError::malformed_payload("`extensions` must be an object")),
    }
}
