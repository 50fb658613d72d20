use crate::JsonError;
use crate::JsonNumber;
use crate::JsonPath;
use crate::JsonTokenKind;
use crate::JsonValue;
use crate::Result;
use indexmap::IndexMap;

/// Pull-based access to JSON-shaped data, independent of how that data is
/// stored.
///
/// Containers must be opened and closed in strictly paired order. Scalar
/// accessors fail with [`JsonError::UnexpectedToken`] when the next token is
/// of a different kind; nothing is consumed in that case.
pub trait JsonReader {
    fn begin_array(&mut self) -> Result<()>;

    fn begin_object(&mut self) -> Result<()>;

    fn end_array(&mut self) -> Result<()>;

    /// Closes the innermost object. Members that were not consumed yet are
    /// skipped.
    fn end_object(&mut self) -> Result<()>;

    /// `true` while the current container has more elements/members.
    fn has_next(&mut self) -> Result<bool>;

    fn next_boolean(&mut self) -> Result<bool>;

    fn next_name(&mut self) -> Result<String>;

    fn next_null(&mut self) -> Result<()>;

    fn next_number(&mut self) -> Result<JsonNumber>;

    fn next_string(&mut self) -> Result<String>;

    /// Where the reader is: enclosing member names and list indices.
    fn path(&self) -> JsonPath;

    fn peek(&mut self) -> Result<JsonTokenKind>;

    /// The path of the value consumed last. Inside a list this is the
    /// item just read rather than the next one.
    fn value_path(&self) -> JsonPath;

    /// Returns the next member name without consuming it, or `None` if the
    /// next token is not a name.
    fn peek_name(&mut self) -> Result<Option<String>>;

    /// Consumes member names until one of them is in `candidates`, and
    /// returns its index. Values of members that match no candidate are
    /// skipped. Returns `None` once the object has no more members, or
    /// immediately when `candidates` is empty.
    fn select_name<S: AsRef<str>>(&mut self, candidates: &[S]) -> Result<Option<usize>>;

    /// Consumes the next value, including everything nested in it.
    fn skip_value(&mut self) -> Result<()>;

    fn next_double(&mut self) -> Result<f64> {
        let number = self.next_number()?;
        number.as_f64().ok_or_else(|| JsonError::NumberOutOfRange {
            raw: number.to_string(),
            target: "f64",
            path: self.value_path(),
        })
    }

    fn next_int(&mut self) -> Result<i32> {
        let number = self.next_number()?;
        number.as_i32().ok_or_else(|| JsonError::NumberOutOfRange {
            raw: number.to_string(),
            target: "i32",
            path: self.value_path(),
        })
    }

    fn next_long(&mut self) -> Result<i64> {
        let number = self.next_number()?;
        number.as_i64().ok_or_else(|| JsonError::NumberOutOfRange {
            raw: number.to_string(),
            target: "i64",
            path: self.value_path(),
        })
    }

    /// Materializes the next value, whatever its kind.
    fn read_json_value(&mut self) -> Result<JsonValue> {
        match self.peek()? {
            JsonTokenKind::Null => {
                self.next_null()?;
                Ok(JsonValue::Null)
            },
            JsonTokenKind::Boolean => Ok(JsonValue::Bool(self.next_boolean()?)),
            JsonTokenKind::Number => Ok(JsonValue::Number(self.next_number()?)),
            JsonTokenKind::String => Ok(JsonValue::String(self.next_string()?)),
            JsonTokenKind::BeginArray => {
                self.begin_array()?;
                let mut items = vec![];
                while self.has_next()? {
                    items.push(self.read_json_value()?);
                }
                self.end_array()?;
                Ok(JsonValue::List(items))
            },
            JsonTokenKind::BeginObject => {
                self.begin_object()?;
                let mut entries = IndexMap::new();
                while self.has_next()? {
                    let name = self.next_name()?;
                    let value = self.read_json_value()?;
                    entries.insert(name, value);
                }
                self.end_object()?;
                Ok(JsonValue::Object(entries))
            },
            found => Err(JsonError::UnexpectedToken {
                expected: "a value",
                found,
                path: self.path(),
            }),
        }
    }

    /// Fails unless the whole document has been consumed.
    fn expect_end_of_document(&mut self) -> Result<()> {
        match self.peek()? {
            JsonTokenKind::EndDocument => Ok(()),
            found => Err(JsonError::UnexpectedToken {
                expected: JsonTokenKind::EndDocument.as_str(),
                found,
                path: self.path(),
            }),
        }
    }
}
