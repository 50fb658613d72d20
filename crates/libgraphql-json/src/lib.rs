//! Pull-based JSON token streams used to decode GraphQL responses into
//! typed values and to encode typed values back into JSON.
//!
//! Two interchangeable [`JsonReader`] backings are provided:
//!
//! - [`StrJsonReader`] lexes JSON text lazily, one token at a time, without
//!   ever materializing the document.
//! - [`MapJsonReader`] walks an already-materialized [`JsonValue`] tree
//!   (cache reads, incremental re-decodes, test fixtures).
//!
//! Writes go through the [`JsonWriter`] trait, backed either by compact
//! text ([`StrJsonWriter`]) or by an in-memory tree ([`MapJsonWriter`]).

mod json_error;
mod json_number;
mod json_path;
mod json_reader;
mod json_reader_options;
mod json_token_kind;
mod json_value;
mod json_writer;
mod map_json_reader;
mod map_json_writer;
mod name_selector;
mod str_json_reader;
mod str_json_writer;

pub use indexmap::IndexMap;
pub use json_error::JsonError;
pub use json_number::JsonNumber;
pub use json_path::JsonPath;
pub use json_path::JsonPathElement;
pub use json_reader::JsonReader;
pub use json_reader_options::JsonReaderOptions;
pub use json_reader_options::DEFAULT_MAX_DEPTH;
pub use json_reader_options::MIN_MAX_DEPTH;
pub use json_token_kind::JsonTokenKind;
pub use json_value::JsonObject;
pub use json_value::JsonValue;
pub use json_writer::JsonWriter;
pub use map_json_reader::MapJsonReader;
pub use map_json_writer::MapJsonWriter;
pub use str_json_reader::StrJsonReader;
pub use str_json_writer::StrJsonWriter;

pub type Result<T> = std::result::Result<T, JsonError>;

#[cfg(test)]
mod tests;
