use libgraphql_json::JsonObject;

/// A `@skip(if: $variable)` or `@include(if: $variable)` directive bound to
/// an operation variable.
///
/// `inverted` is `true` for `@skip` and `false` for `@include`.
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub variable: String,
    #[serde(default)]
    pub inverted: bool,
}
impl Condition {
    /// `@include(if: $variable)`
    pub fn include_if(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            inverted: false,
        }
    }

    /// `@skip(if: $variable)`
    pub fn skip_if(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            inverted: true,
        }
    }

    /// Whether this condition, evaluated against `variables`, removes the
    /// field from the selection. Variables that are absent or not booleans
    /// read as `false`.
    pub fn skips(&self, variables: &JsonObject) -> bool {
        let value = variables
            .get(self.variable.as_str())
            .and_then(|value| value.as_bool())
            .unwrap_or(false);
        value == self.inverted
    }
}
