use crate::JsonError;
use crate::JsonNumber;
use crate::JsonObject;
use crate::JsonValue;
use crate::JsonWriter;
use crate::Result;
use inherent::inherent;

#[derive(Debug)]
enum OpenContainer {
    Array(Vec<JsonValue>),
    Object {
        entries: JsonObject,
        pending_name: Option<String>,
    },
}

/// A [`JsonWriter`] that builds a [`JsonValue`] tree.
///
/// This is how encoded values are handed to consumers that want the raw
/// field tree (normalized caches, incremental merging) rather than text.
#[derive(Debug, Default)]
pub struct MapJsonWriter {
    root: Option<JsonValue>,
    stack: Vec<OpenContainer>,
}

impl MapJsonWriter {
    pub fn into_value(self) -> Result<JsonValue> {
        match (self.stack.is_empty(), self.root) {
            (true, Some(root)) => Ok(root),
            _ => Err(JsonError::invalid_write("incomplete JSON document")),
        }
    }

    pub fn new() -> Self {
        Self::default()
    }

    fn push_value(&mut self, value: JsonValue) -> Result<()> {
        match self.stack.last_mut() {
            None if self.root.is_some() => Err(JsonError::invalid_write(
                "JSON documents have a single top-level value",
            )),
            None => {
                self.root = Some(value);
                Ok(())
            },
            Some(OpenContainer::Array(items)) => {
                items.push(value);
                Ok(())
            },
            Some(OpenContainer::Object {
                entries,
                pending_name,
            }) => match pending_name.take() {
                Some(name) => {
                    entries.insert(name, value);
                    Ok(())
                },
                None => Err(JsonError::invalid_write(
                    "object members need a name before their value",
                )),
            },
        }
    }
}

#[inherent]
impl JsonWriter for MapJsonWriter {
    pub fn begin_array(&mut self) -> Result<()> {
        self.stack.push(OpenContainer::Array(vec![]));
        Ok(())
    }

    pub fn begin_object(&mut self) -> Result<()> {
        self.stack.push(OpenContainer::Object {
            entries: JsonObject::new(),
            pending_name: None,
        });
        Ok(())
    }

    pub fn end_array(&mut self) -> Result<()> {
        match self.stack.pop() {
            Some(OpenContainer::Array(items)) => self.push_value(JsonValue::List(items)),
            _ => Err(JsonError::invalid_write("unbalanced `]`")),
        }
    }

    pub fn end_object(&mut self) -> Result<()> {
        match self.stack.pop() {
            Some(OpenContainer::Object {
                entries,
                pending_name: None,
            }) => self.push_value(JsonValue::Object(entries)),
            _ => Err(JsonError::invalid_write("unbalanced `}`")),
        }
    }

    pub fn name(&mut self, name: &str) -> Result<()> {
        match self.stack.last_mut() {
            Some(OpenContainer::Object {
                pending_name: pending_name @ None,
                ..
            }) => {
                *pending_name = Some(name.to_string());
                Ok(())
            },
            _ => Err(JsonError::invalid_write(format!(
                "name `{name}` written outside of an object"
            ))),
        }
    }

    pub fn value_bool(&mut self, value: bool) -> Result<()> {
        self.push_value(JsonValue::Bool(value))
    }

    pub fn value_json(&mut self, value: &JsonValue) -> Result<()> {
        self.push_value(value.clone())
    }

    pub fn value_null(&mut self) -> Result<()> {
        self.push_value(JsonValue::Null)
    }

    pub fn value_number(&mut self, value: &JsonNumber) -> Result<()> {
        self.push_value(JsonValue::Number(value.clone()))
    }

    pub fn value_string(&mut self, value: &str) -> Result<()> {
        self.push_value(JsonValue::String(value.to_string()))
    }
}
