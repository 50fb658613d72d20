use crate::JsonNumber;
use crate::JsonPath;
use crate::JsonPathElement;
use crate::JsonReader;
use crate::JsonTokenKind;
use crate::JsonWriter;
use crate::StrJsonReader;
use crate::StrJsonWriter;
use indexmap::IndexMap;

pub type JsonObject = IndexMap<String, JsonValue>;

/// A fully materialized JSON value.
///
/// Objects preserve member order, which both the name-selection fast path
/// and deterministic re-encoding rely on.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum JsonValue {
    #[default]
    Null,
    Bool(bool),
    Number(JsonNumber),
    String(String),
    List(Vec<JsonValue>),
    Object(JsonObject),
}
impl JsonValue {
    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().and_then(JsonNumber::as_f64)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(JsonNumber::as_i64)
    }

    pub fn as_list(&self) -> Option<&Vec<JsonValue>> {
        if let Self::List(items) = self {
            Some(items)
        } else {
            None
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<JsonValue>> {
        if let Self::List(items) = self {
            Some(items)
        } else {
            None
        }
    }

    pub fn as_number(&self) -> Option<&JsonNumber> {
        if let Self::Number(number) = self {
            Some(number)
        } else {
            None
        }
    }

    pub fn as_object(&self) -> Option<&JsonObject> {
        if let Self::Object(entries) = self {
            Some(entries)
        } else {
            None
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut JsonObject> {
        if let Self::Object(entries) = self {
            Some(entries)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Self::String(value) = self {
            Some(value.as_str())
        } else {
            None
        }
    }

    /// Recursively merges `other` into `self`.
    ///
    /// Objects are merged member by member, lists of equal length are merged
    /// element by element, and anything else in `other` replaces what was in
    /// `self`.
    pub fn deep_merge(&mut self, other: JsonValue) {
        match (self, other) {
            (Self::Object(target), Self::Object(source)) => {
                for (key, value) in source {
                    match target.get_mut(&key) {
                        Some(existing) => existing.deep_merge(value),
                        None => {
                            target.insert(key, value);
                        },
                    }
                }
            },
            (Self::List(target), Self::List(source)) if target.len() == source.len() => {
                for (existing, value) in target.iter_mut().zip(source) {
                    existing.deep_merge(value);
                }
            },
            (target, source) => *target = source,
        }
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.as_object()?.get(key)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The [`JsonTokenKind`] a reader positioned at this value would report.
    pub fn kind(&self) -> JsonTokenKind {
        match self {
            Self::Null => JsonTokenKind::Null,
            Self::Bool(_) => JsonTokenKind::Boolean,
            Self::Number(_) => JsonTokenKind::Number,
            Self::String(_) => JsonTokenKind::String,
            Self::List(_) => JsonTokenKind::BeginArray,
            Self::Object(_) => JsonTokenKind::BeginObject,
        }
    }

    /// Parses a complete JSON document.
    pub fn parse(text: &str) -> crate::Result<Self> {
        let mut reader = StrJsonReader::new(text);
        let value = reader.read_json_value()?;
        reader.expect_end_of_document()?;
        Ok(value)
    }

    /// Follows `path` from this value.
    pub fn pointer(&self, path: &JsonPath) -> Option<&JsonValue> {
        path.elements()
            .iter()
            .try_fold(self, |value, element| match (element, value) {
                (JsonPathElement::Key(key), Self::Object(entries)) => entries.get(key),
                (JsonPathElement::Index(index), Self::List(items)) => items.get(*index),
                _ => None,
            })
    }

    /// Follows `path` from this value, returning a mutable reference.
    pub fn pointer_mut(&mut self, path: &JsonPath) -> Option<&mut JsonValue> {
        let mut value = self;
        for element in path.elements() {
            value = match (element, value) {
                (JsonPathElement::Key(key), Self::Object(entries)) => entries.get_mut(key)?,
                (JsonPathElement::Index(index), Self::List(items)) => items.get_mut(*index)?,
                _ => return None,
            };
        }
        Some(value)
    }

    /// Serializes this value as compact JSON text.
    pub fn to_json_string(&self) -> String {
        let mut writer = StrJsonWriter::new();
        // A materialized value is always structurally well-formed, and
        // `JsonNumber` can only hold finite numbers.
        match writer.value_json(self).and_then(|_| writer.into_string()) {
            Ok(text) => text,
            Err(_) => String::from("null"),
        }
    }
}
impl std::fmt::Display for JsonValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_json_string().as_str())
    }
}
impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
impl From<i32> for JsonValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}
impl From<i64> for JsonValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}
impl From<u64> for JsonValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}
impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}
impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
impl From<Vec<JsonValue>> for JsonValue {
    fn from(items: Vec<JsonValue>) -> Self {
        Self::List(items)
    }
}
impl From<JsonObject> for JsonValue {
    fn from(entries: JsonObject) -> Self {
        Self::Object(entries)
    }
}
impl From<serde_json::Value> for JsonValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(value) => Self::Bool(value),
            serde_json::Value::Number(number) => {
                Self::Number(JsonNumber::from_validated(number.to_string().as_str()))
            },
            serde_json::Value::String(value) => Self::String(value),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            },
            serde_json::Value::Object(entries) => Self::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}
impl From<JsonValue> for serde_json::Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(value) => Self::Bool(value),
            JsonValue::Number(number) => number
                .as_str()
                .parse::<serde_json::Number>()
                .map(Self::Number)
                .unwrap_or_else(|_| Self::String(number.to_string())),
            JsonValue::String(value) => Self::String(value),
            JsonValue::List(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            JsonValue::Object(entries) => Self::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}
impl serde::Serialize for JsonValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_json::Value::from(self.clone()).serialize(serializer)
    }
}
impl<'de> serde::Deserialize<'de> for JsonValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}
