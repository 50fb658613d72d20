use libgraphql_json::JsonObject;
use libgraphql_json::JsonValue;
use libgraphql_response::DecodeContext;
use libgraphql_response::GraphQLResponse;
use libgraphql_response::Operation;

pub(crate) const GREEN_CHECK: &str = "\u{2705}";
pub(crate) const RED_X: &str = "\u{274C}";

/// Renders a decoded response as a single line of JSON, with `data`
/// re-encoded through the operation's shape.
pub(crate) fn render_response(
    operation: &Operation,
    response: &GraphQLResponse,
    ctx: &DecodeContext<'_>,
) -> anyhow::Result<String> {
    let mut envelope = JsonObject::new();
    let data = match &response.data {
        Some(data) => operation.to_raw_tree(data, ctx)?,
        None => JsonValue::Null,
    };
    envelope.insert("data".to_string(), data);
    if response.has_errors() {
        let errors = response.errors.iter().map(|error| error.to_json_value()).collect();
        envelope.insert("errors".to_string(), JsonValue::List(errors));
    }
    if !response.extensions.is_empty() {
        envelope.insert("extensions".to_string(), JsonValue::Object(response.extensions.clone()));
    }
    envelope.insert("hasNext".to_string(), JsonValue::from(response.has_next));
    Ok(JsonValue::Object(envelope).to_json_string())
}
