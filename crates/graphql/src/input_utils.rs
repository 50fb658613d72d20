use anyhow::Context;
use libgraphql_json::JsonObject;
use libgraphql_json::JsonValue;
use libgraphql_response::Operation;
use std::path::Path;

pub(crate) fn load_operation(path: &Path) -> anyhow::Result<Operation> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read operation descriptor {path:#?}"))?;
    let operation = Operation::from_descriptor_json(&text)
        .with_context(|| format!("Invalid operation descriptor {path:#?}"))?;
    log::debug!(
        "Loaded operation `{}` (custom scalars: {:?}).",
        operation.name(),
        operation.required_custom_scalars(),
    );
    Ok(operation)
}

/// Parses `--variables`, which must be a JSON object when given.
pub(crate) fn parse_variables(variables: Option<&str>) -> anyhow::Result<JsonObject> {
    let Some(text) = variables else {
        return Ok(JsonObject::new());
    };
    match JsonValue::parse(text).context("Invalid `--variables` JSON")? {
        JsonValue::Object(variables) => Ok(variables),
        other => anyhow::bail!("`--variables` must be a JSON object, got {}", other.kind()),
    }
}
