use crate::JsonValue;

/// One step of a [`JsonPath`]: either an object member name or a list
/// index.
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(untagged)]
pub enum JsonPathElement {
    Index(usize),
    Key(String),
}
impl From<&str> for JsonPathElement {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}
impl From<usize> for JsonPathElement {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A location within a response tree, in the shape GraphQL uses for error
/// and incremental-payload paths (`["computers", 0, "cpu"]`).
///
/// Displays as `computers[0].cpu`.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct JsonPath(Vec<JsonPathElement>);
impl JsonPath {
    pub fn elements(&self) -> &[JsonPathElement] {
        self.0.as_slice()
    }

    /// Reads a path from its JSON form. Returns `None` unless `value` is a
    /// list of strings and non-negative integers.
    pub fn from_json_value(value: &JsonValue) -> Option<Self> {
        value
            .as_list()?
            .iter()
            .map(|element| match element {
                JsonValue::String(key) => Some(JsonPathElement::Key(key.clone())),
                JsonValue::Number(number) => number
                    .as_i64()
                    .and_then(|index| usize::try_from(index).ok())
                    .map(JsonPathElement::Index),
                _ => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn join(&self, element: impl Into<JsonPathElement>) -> Self {
        let mut joined = self.clone();
        joined.push(element);
        joined
    }

    pub fn last(&self) -> Option<&JsonPathElement> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn new() -> Self {
        Self(vec![])
    }

    /// The path one step up, or `None` for the root path.
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.0.split_last()?;
        Some(Self(parent.to_vec()))
    }

    pub fn pop(&mut self) -> Option<JsonPathElement> {
        self.0.pop()
    }

    /// Returns `prefix` followed by the elements of this path.
    pub fn prefixed_with(&self, prefix: &JsonPath) -> Self {
        let mut elements = prefix.0.clone();
        elements.extend(self.0.iter().cloned());
        Self(elements)
    }

    pub fn push(&mut self, element: impl Into<JsonPathElement>) {
        self.0.push(element.into());
    }

    pub fn starts_with(&self, prefix: &JsonPath) -> bool {
        self.0.starts_with(prefix.elements())
    }

    pub fn to_json_value(&self) -> JsonValue {
        JsonValue::List(
            self.0
                .iter()
                .map(|element| match element {
                    JsonPathElement::Index(index) => JsonValue::from(*index as u64),
                    JsonPathElement::Key(key) => JsonValue::String(key.clone()),
                })
                .collect(),
        )
    }
}
impl std::fmt::Display for JsonPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (position, element) in self.0.iter().enumerate() {
            match element {
                JsonPathElement::Index(index) => write!(f, "[{index}]")?,
                JsonPathElement::Key(key) if position == 0 => f.write_str(key)?,
                JsonPathElement::Key(key) => write!(f, ".{key}")?,
            }
        }
        Ok(())
    }
}
impl<TElement: Into<JsonPathElement>> FromIterator<TElement> for JsonPath {
    fn from_iter<T: IntoIterator<Item = TElement>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
