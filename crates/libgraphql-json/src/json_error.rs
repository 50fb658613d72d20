use crate::JsonPath;
use crate::JsonTokenKind;

/// Errors raised by [`JsonReader`](crate::JsonReader)s and
/// [`JsonWriter`](crate::JsonWriter)s.
///
/// Every variant raised while reading carries the [`JsonPath`] at which the
/// problem was detected.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum JsonError {
    #[error("expected {expected} but found {found} at `{path}`")]
    UnexpectedToken {
        expected: &'static str,
        found: JsonTokenKind,
        path: JsonPath,
    },

    #[error("nesting exceeds the maximum depth of {max_depth} at `{path}`")]
    TooDeeplyNested {
        max_depth: usize,
        path: JsonPath,
    },

    /// `end_object()`/`end_array()` called without a matching begin, or
    /// called to close the wrong kind of container.
    #[error("`{operation}` has no matching open container at `{path}`")]
    UnbalancedContainer {
        operation: &'static str,
        path: JsonPath,
    },

    #[error("number `{raw}` does not fit in {target} at `{path}`")]
    NumberOutOfRange {
        raw: String,
        target: &'static str,
        path: JsonPath,
    },

    #[error("malformed JSON at byte {offset}: {message}")]
    Syntax {
        message: String,
        offset: usize,
    },

    #[error("invalid write: {message}")]
    InvalidWrite {
        message: String,
    },
}
impl JsonError {
    pub fn path(&self) -> Option<&JsonPath> {
        match self {
            Self::UnexpectedToken { path, .. }
            | Self::TooDeeplyNested { path, .. }
            | Self::UnbalancedContainer { path, .. }
            | Self::NumberOutOfRange { path, .. } => Some(path),
            Self::Syntax { .. } | Self::InvalidWrite { .. } => None,
        }
    }

    /// Re-roots the path carried by this error under `prefix`.
    ///
    /// Used when a reader was created over a detached subtree and its errors
    /// must point into the enclosing document.
    pub fn with_path_prefix(self, prefix: &JsonPath) -> Self {
        match self {
            Self::UnexpectedToken { expected, found, path } => Self::UnexpectedToken {
                expected,
                found,
                path: path.prefixed_with(prefix),
            },
            Self::TooDeeplyNested { max_depth, path } => Self::TooDeeplyNested {
                max_depth,
                path: path.prefixed_with(prefix),
            },
            Self::UnbalancedContainer { operation, path } => Self::UnbalancedContainer {
                operation,
                path: path.prefixed_with(prefix),
            },
            Self::NumberOutOfRange { raw, target, path } => Self::NumberOutOfRange {
                raw,
                target,
                path: path.prefixed_with(prefix),
            },
            other @ (Self::Syntax { .. } | Self::InvalidWrite { .. }) => other,
        }
    }

    pub(crate) fn invalid_write(message: impl Into<String>) -> Self {
        Self::InvalidWrite {
            message: message.into(),
        }
    }
}
