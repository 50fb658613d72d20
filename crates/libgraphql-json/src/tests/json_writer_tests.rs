//! Tests for StrJsonWriter and MapJsonWriter.

use crate::tests::utils::json;
use crate::JsonError;
use crate::JsonWriter;
use crate::MapJsonWriter;
use crate::StrJsonWriter;

fn write_sample<W: JsonWriter>(writer: &mut W) {
    writer.begin_object().unwrap();
    writer.name("id").unwrap();
    writer.value_string("c0").unwrap();
    writer.name("cores").unwrap();
    writer.value_int(8).unwrap();
    writer.name("tags").unwrap();
    writer.begin_array().unwrap();
    writer.value_bool(true).unwrap();
    writer.value_null().unwrap();
    writer.value_double(1.5).unwrap();
    writer.end_array().unwrap();
    writer.end_object().unwrap();
}

/// Verifies compact output of StrJsonWriter.
#[test]
fn test_str_writer_output() {
    let mut writer = StrJsonWriter::new();
    write_sample(&mut writer);
    assert_eq!(
        writer.into_string().unwrap(),
        r#"{"id":"c0","cores":8,"tags":[true,null,1.5]}"#,
    );
}

/// Verifies that both writers agree on the structure they produce.
#[test]
fn test_map_writer_builds_same_tree() {
    let mut writer = MapJsonWriter::new();
    write_sample(&mut writer);
    assert_eq!(
        writer.into_value().unwrap(),
        json(r#"{"id":"c0","cores":8,"tags":[true,null,1.5]}"#),
    );
}

/// Verifies string escaping, including control characters.
#[test]
fn test_str_writer_escapes() {
    let mut writer = StrJsonWriter::new();
    writer.value_string("a\"b\\c\nd\u{1}").unwrap();
    assert_eq!(writer.into_string().unwrap(), r#""a\"b\\c\nd\u0001""#);
}

/// Verifies that structural misuse is reported for both writers.
#[test]
fn test_structural_misuse() {
    let mut writer = StrJsonWriter::new();
    writer.begin_object().unwrap();
    assert!(matches!(writer.value_int(1), Err(JsonError::InvalidWrite { .. })));
    assert!(matches!(writer.end_array(), Err(JsonError::InvalidWrite { .. })));

    let mut writer = StrJsonWriter::new();
    assert!(matches!(writer.name("a"), Err(JsonError::InvalidWrite { .. })));
    writer.value_null().unwrap();
    assert!(matches!(writer.value_null(), Err(JsonError::InvalidWrite { .. })));

    let mut writer = MapJsonWriter::new();
    writer.begin_object().unwrap();
    assert!(matches!(writer.value_int(1), Err(JsonError::InvalidWrite { .. })));
    assert!(matches!(writer.end_array(), Err(JsonError::InvalidWrite { .. })));
}

/// Verifies that unfinished documents cannot be extracted.
#[test]
fn test_incomplete_document() {
    let mut writer = StrJsonWriter::new();
    writer.begin_array().unwrap();
    assert!(writer.into_string().is_err());
    assert!(StrJsonWriter::new().into_string().is_err());

    let mut writer = MapJsonWriter::new();
    writer.begin_array().unwrap();
    assert!(writer.into_value().is_err());
}

/// Verifies that non-finite doubles cannot be written.
#[test]
fn test_non_finite_double() {
    let mut writer = StrJsonWriter::new();
    assert!(matches!(
        writer.value_double(f64::NAN),
        Err(JsonError::InvalidWrite { .. }),
    ));
}

/// Verifies that value_json() writes a whole tree.
#[test]
fn test_value_json() {
    let value = json(r#"{"a": [1, {"b": "c"}], "d": false}"#);
    let mut writer = StrJsonWriter::new();
    writer.value_json(&value).unwrap();
    assert_eq!(writer.into_string().unwrap(), r#"{"a":[1,{"b":"c"}],"d":false}"#);
}
