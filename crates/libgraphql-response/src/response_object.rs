use crate::Value;
use indexmap::IndexMap;
use libgraphql_json::JsonPath;
use libgraphql_json::JsonPathElement;

/// A decoded GraphQL object: its concrete `__typename` (when the response
/// carried one) and its fields keyed by response key, in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResponseObject {
    fields: IndexMap<String, Value>,
    typename: Option<String>,
}
impl ResponseObject {
    pub fn new(typename: Option<String>) -> Self {
        Self {
            fields: IndexMap::new(),
            typename,
        }
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    pub fn get(&self, response_key: &str) -> Option<&Value> {
        self.fields.get(response_key)
    }

    pub fn insert(&mut self, response_key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(response_key.into(), value)
    }

    pub fn into_fields(self) -> IndexMap<String, Value> {
        self.fields
    }

    /// Follows `path` from this object.
    pub fn pointer(&self, path: &JsonPath) -> Option<&Value> {
        let (first, rest) = path.elements().split_first()?;
        let JsonPathElement::Key(key) = first else {
            return None;
        };
        rest.iter()
            .try_fold(self.get(key.as_str())?, |value, element| value.step(element))
    }

    pub fn typename(&self) -> Option<&str> {
        self.typename.as_deref()
    }

    pub fn with_field(mut self, response_key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(response_key, value.into());
        self
    }
}
