use crate::CustomScalar;
use crate::ScalarCoercionError;
use inherent::inherent;
use libgraphql_json::JsonValue;
use std::marker::PhantomData;
use std::sync::Arc;

type CoercionResult<T> = std::result::Result<T, ScalarCoercionError>;

/// Converts one custom scalar between its raw JSON form and a typed value.
///
/// Adapters receive the fully materialized [`JsonValue`] rather than a live
/// reader, so they never deal with streaming details. They are shared by
/// every decode that uses the registry they belong to.
pub trait ScalarAdapter: Send + Sync {
    fn decode(&self, value: &JsonValue) -> CoercionResult<Arc<dyn CustomScalar>>;

    fn encode(&self, value: &dyn CustomScalar) -> CoercionResult<JsonValue>;
}

/// Passes the raw [`JsonValue`] through untouched.
///
/// Also used for unregistered scalars when
/// [`DecodeOptions::require_registered_scalars`](crate::DecodeOptions::require_registered_scalars)
/// is off.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonValueAdapter;
#[inherent]
impl ScalarAdapter for JsonValueAdapter {
    pub fn decode(&self, value: &JsonValue) -> CoercionResult<Arc<dyn CustomScalar>> {
        Ok(Arc::new(value.clone()))
    }

    pub fn encode(&self, value: &dyn CustomScalar) -> CoercionResult<JsonValue> {
        value
            .downcast_ref::<JsonValue>()
            .cloned()
            .ok_or(ScalarCoercionError::UnexpectedValue {
                expected: "JsonValue",
            })
    }
}

/// Decodes string-serialized scalars (`URL`, `DateTime`, ...) as `String`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringScalarAdapter;
#[inherent]
impl ScalarAdapter for StringScalarAdapter {
    pub fn decode(&self, value: &JsonValue) -> CoercionResult<Arc<dyn CustomScalar>> {
        match value {
            JsonValue::String(text) => Ok(Arc::new(text.clone())),
            other => Err(ScalarCoercionError::UnexpectedJson {
                expected: "STRING",
                found: other.kind(),
            }),
        }
    }

    pub fn encode(&self, value: &dyn CustomScalar) -> CoercionResult<JsonValue> {
        value
            .downcast_ref::<String>()
            .map(|text| JsonValue::String(text.clone()))
            .ok_or(ScalarCoercionError::UnexpectedValue { expected: "String" })
    }
}

/// Decodes a 64-bit integer scalar as `i64`. Accepts both JSON numbers and
/// numeric strings, since servers commonly quote values that do not fit in
/// a double.
#[derive(Clone, Copy, Debug, Default)]
pub struct LongScalarAdapter;
#[inherent]
impl ScalarAdapter for LongScalarAdapter {
    pub fn decode(&self, value: &JsonValue) -> CoercionResult<Arc<dyn CustomScalar>> {
        let parsed = match value {
            JsonValue::Number(number) => number.as_i64(),
            JsonValue::String(text) => text.parse::<i64>().ok(),
            other => {
                return Err(ScalarCoercionError::UnexpectedJson {
                    expected: "NUMBER",
                    found: other.kind(),
                });
            },
        };
        parsed
            .map(|value| Arc::new(value) as Arc<dyn CustomScalar>)
            .ok_or_else(|| ScalarCoercionError::invalid(format!("`{value}` is not a 64-bit integer")))
    }

    pub fn encode(&self, value: &dyn CustomScalar) -> CoercionResult<JsonValue> {
        value
            .downcast_ref::<i64>()
            .map(|value| JsonValue::from(*value))
            .ok_or(ScalarCoercionError::UnexpectedValue { expected: "i64" })
    }
}

/// A [`ScalarAdapter`] built from a pair of closures.
///
/// ```
/// use libgraphql_json::JsonValue;
/// use libgraphql_response::FnScalarAdapter;
/// use libgraphql_response::ScalarCoercionError;
///
/// let upper = FnScalarAdapter::new(
///     |value: &JsonValue| {
///         value
///             .as_str()
///             .map(str::to_uppercase)
///             .ok_or_else(|| ScalarCoercionError::invalid("expected a string"))
///     },
///     |value: &String| Ok(JsonValue::from(value.to_lowercase())),
/// );
/// # let _ = upper;
/// ```
pub struct FnScalarAdapter<T, D, E> {
    decode: D,
    encode: E,
    _marker: PhantomData<fn() -> T>,
}
impl<T, D, E> FnScalarAdapter<T, D, E>
where
    T: CustomScalar,
    D: Fn(&JsonValue) -> CoercionResult<T> + Send + Sync,
    E: Fn(&T) -> CoercionResult<JsonValue> + Send + Sync,
{
    pub fn new(decode: D, encode: E) -> Self {
        Self {
            decode,
            encode,
            _marker: PhantomData,
        }
    }
}
impl<T, D, E> ScalarAdapter for FnScalarAdapter<T, D, E>
where
    T: CustomScalar,
    D: Fn(&JsonValue) -> CoercionResult<T> + Send + Sync,
    E: Fn(&T) -> CoercionResult<JsonValue> + Send + Sync,
{
    fn decode(&self, value: &JsonValue) -> CoercionResult<Arc<dyn CustomScalar>> {
        (self.decode)(value).map(|value| Arc::new(value) as Arc<dyn CustomScalar>)
    }

    fn encode(&self, value: &dyn CustomScalar) -> CoercionResult<JsonValue> {
        let value = value
            .downcast_ref::<T>()
            .ok_or(ScalarCoercionError::UnexpectedValue {
                expected: std::any::type_name::<T>(),
            })?;
        (self.encode)(value)
    }
}
