use crate::CustomScalar;
use crate::ResponseObject;
use libgraphql_json::JsonPath;
use libgraphql_json::JsonPathElement;
use std::sync::Arc;

/// A typed value produced by decoding one field.
///
/// `Null` is the sentinel for null, for fields that were absent but
/// nullable, and for fields of deferred fragments that have not been
/// delivered yet.
#[derive(Clone, Debug, Default)]
pub enum Value {
    Boolean(bool),
    Custom(Arc<dyn CustomScalar>),
    Enum(String),
    Float(f64),
    Int(i32),
    List(Vec<Value>),
    Long(i64),
    #[default]
    Null,
    Object(ResponseObject),
    String(String),
}
impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Boolean(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    /// Downcasts a [`Value::Custom`] to the type its adapter produced.
    pub fn as_custom<T: 'static>(&self) -> Option<&T> {
        if let Self::Custom(scalar) = self {
            (**scalar).downcast_ref::<T>()
        } else {
            None
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        if let Self::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        if let Self::Int(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(i64::from(*value)),
            Self::Long(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        if let Self::List(items) = self {
            Some(items.as_slice())
        } else {
            None
        }
    }

    pub fn as_object(&self) -> Option<&ResponseObject> {
        if let Self::Object(object) = self {
            Some(object)
        } else {
            None
        }
    }

    /// The text of a [`Value::String`] or a [`Value::Enum`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Enum(value) | Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn custom<T: CustomScalar>(value: T) -> Self {
        Self::Custom(Arc::new(value))
    }

    pub fn get(&self, response_key: &str) -> Option<&Value> {
        self.as_object()?.get(response_key)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn pointer(&self, path: &JsonPath) -> Option<&Value> {
        path.elements()
            .iter()
            .try_fold(self, |value, element| value.step(element))
    }

    pub(crate) fn step(&self, element: &JsonPathElement) -> Option<&Value> {
        match (element, self) {
            (JsonPathElement::Key(key), Self::Object(object)) => object.get(key.as_str()),
            (JsonPathElement::Index(index), Self::List(items)) => items.get(*index),
            _ => None,
        }
    }
}
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => (**a).eq_dyn(&**b),
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Null, Self::Null) => true,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            _ => false,
        }
    }
}
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}
impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}
impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}
impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}
impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
impl From<ResponseObject> for Value {
    fn from(object: ResponseObject) -> Self {
        Self::Object(object)
    }
}
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}
