use crate::GraphQLError;
use crate::ResponseObject;
use libgraphql_json::JsonObject;

/// A decoded response: typed data (absent when the server returned
/// `"data": null` or no data at all) plus whatever errors and extensions
/// accompanied it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphQLResponse {
    pub data: Option<ResponseObject>,
    pub errors: Vec<GraphQLError>,
    pub extensions: JsonObject,
    /// Whether more incremental payloads follow this one.
    pub has_next: bool,
}
impl GraphQLResponse {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
