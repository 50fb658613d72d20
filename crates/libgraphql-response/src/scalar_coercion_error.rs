use libgraphql_json::JsonTokenKind;

/// Raised by a [`ScalarAdapter`](crate::ScalarAdapter) that cannot convert
/// between its raw JSON form and its typed form.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ScalarCoercionError {
    #[error("{0}")]
    Invalid(String),

    #[error("expected {expected} but found {found}")]
    UnexpectedJson {
        expected: &'static str,
        found: JsonTokenKind,
    },

    /// The value handed to `encode()` was not produced by this adapter.
    #[error("expected a value of type `{expected}`")]
    UnexpectedValue {
        expected: &'static str,
    },
}
impl ScalarCoercionError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}
