//! Various test utils.

use crate::JsonValue;

/// Parses a JSON fixture, panicking on malformed input.
pub fn json(text: &str) -> JsonValue {
    JsonValue::parse(text).unwrap()
}
