use crate::CodecError;
use libgraphql_json::JsonError;
use libgraphql_json::JsonPath;

/// Failures that end an incremental response sequence.
#[derive(Debug, thiserror::Error)]
pub enum IncrementalError {
    #[error("the incremental response already completed")]
    AlreadyTerminated,

    #[error(transparent)]
    Decode(#[from] CodecError),

    #[error("malformed payload JSON: {0}")]
    Json(#[from] JsonError),

    #[error("malformed multipart body: {message}")]
    MalformedMultipart {
        message: String,
    },

    #[error("malformed incremental payload: {message}")]
    MalformedPayload {
        message: String,
    },

    #[error("the response stream ended before a payload with `hasNext: false`")]
    StreamEndedEarly,

    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server addressed a patch to a location that does not exist in
    /// the response delivered so far.
    #[error("incremental payload path `{path}` does not resolve against the response")]
    UnresolvablePath {
        path: JsonPath,
    },
}
impl IncrementalError {
    pub(crate) fn malformed_payload(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }
}
