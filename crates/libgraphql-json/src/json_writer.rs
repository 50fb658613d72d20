use crate::JsonError;
use crate::JsonNumber;
use crate::JsonValue;
use crate::Result;

/// Push-based counterpart to [`JsonReader`](crate::JsonReader).
///
/// Structural misuse (a value where a member name is required, a name
/// outside of an object, closing the wrong container) fails with
/// [`JsonError::InvalidWrite`].
pub trait JsonWriter {
    fn begin_array(&mut self) -> Result<()>;

    fn begin_object(&mut self) -> Result<()>;

    fn end_array(&mut self) -> Result<()>;

    fn end_object(&mut self) -> Result<()>;

    fn name(&mut self, name: &str) -> Result<()>;

    fn value_bool(&mut self, value: bool) -> Result<()>;

    fn value_null(&mut self) -> Result<()>;

    fn value_number(&mut self, value: &JsonNumber) -> Result<()>;

    fn value_string(&mut self, value: &str) -> Result<()>;

    fn value_double(&mut self, value: f64) -> Result<()> {
        let number = JsonNumber::from_f64(value).ok_or_else(|| {
            JsonError::invalid_write(format!("{value} cannot be represented in JSON"))
        })?;
        self.value_number(&number)
    }

    fn value_int(&mut self, value: i32) -> Result<()> {
        self.value_number(&JsonNumber::from(value))
    }

    fn value_long(&mut self, value: i64) -> Result<()> {
        self.value_number(&JsonNumber::from(value))
    }

    /// Writes an arbitrary materialized value.
    fn value_json(&mut self, value: &JsonValue) -> Result<()> {
        match value {
            JsonValue::Null => self.value_null(),
            JsonValue::Bool(value) => self.value_bool(*value),
            JsonValue::Number(number) => self.value_number(number),
            JsonValue::String(value) => self.value_string(value),
            JsonValue::List(items) => {
                self.begin_array()?;
                for item in items {
                    self.value_json(item)?;
                }
                self.end_array()
            },
            JsonValue::Object(entries) => {
                self.begin_object()?;
                for (key, value) in entries {
                    self.name(key)?;
                    self.value_json(value)?;
                }
                self.end_object()
            },
        }
    }
}
