use crate::ScalarCoercionError;
use libgraphql_json::JsonError;
use libgraphql_json::JsonPath;

/// Failure to decode (or encode) a value against its compiled shape.
///
/// Apart from [`CodecError::UnregisteredScalar`], every variant describes a
/// problem with the data being decoded. `UnregisteredScalar` means the
/// client was configured without an adapter it needs; see
/// [`CodecError::is_configuration_error`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error(transparent)]
    Json(#[from] JsonError),

    #[error("malformed response envelope: {message}")]
    MalformedEnvelope {
        message: String,
    },

    #[error("missing required field `{field}` at `{path}`")]
    MissingField {
        field: String,
        path: JsonPath,
    },

    #[error("non-nullable field `{path}` was null")]
    NullabilityViolation {
        path: JsonPath,
    },

    #[error("custom scalar `{scalar_name}` at `{path}` could not be coerced: {source}")]
    ScalarCoercion {
        path: JsonPath,
        scalar_name: String,
        #[source]
        source: ScalarCoercionError,
    },

    #[error("expected {expected} at `{path}`")]
    UnexpectedValue {
        expected: &'static str,
        path: JsonPath,
    },

    #[error("no adapter registered for custom scalar `{scalar_name}`")]
    UnregisteredScalar {
        scalar_name: String,
    },
}
impl CodecError {
    /// Whether this error stems from client misconfiguration rather than
    /// from the response being decoded.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::UnregisteredScalar { .. })
    }

    /// Where in the response the problem was detected, when known.
    pub fn path(&self) -> Option<&JsonPath> {
        match self {
            Self::Json(err) => err.path(),
            Self::MissingField { path, .. }
            | Self::NullabilityViolation { path }
            | Self::ScalarCoercion { path, .. }
            | Self::UnexpectedValue { path, .. } => Some(path),
            Self::MalformedEnvelope { .. } | Self::UnregisteredScalar { .. } => None,
        }
    }
}
