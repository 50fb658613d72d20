use crate::Condition;
use crate::FieldType;
use libgraphql_json::JsonObject;

/// The compiled description of one field selection.
///
/// Descriptors are immutable once built and are shared by every decode of
/// every response for the operation they belong to.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    conditions: Vec<Condition>,
    field_type: FieldType,
    response_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schema_name: Option<String>,
}
impl FieldDescriptor {
    pub fn new(response_key: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            conditions: vec![],
            field_type,
            response_key: response_key.into(),
            schema_name: None,
        }
    }

    pub fn conditions(&self) -> &[Condition] {
        self.conditions.as_slice()
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// The key this field appears under in a response (its alias, if it was
    /// aliased).
    pub fn response_key(&self) -> &str {
        self.response_key.as_str()
    }

    /// The field's name in the schema. Falls back to the response key for
    /// fields that were not aliased.
    pub fn schema_name(&self) -> &str {
        self.schema_name.as_deref().unwrap_or(self.response_key.as_str())
    }

    /// A field is skipped when any `@skip` condition is `true` or any
    /// `@include` condition is `false`. Fields without conditions are never
    /// skipped.
    pub fn should_skip(&self, variables: &JsonObject) -> bool {
        self.conditions
            .iter()
            .any(|condition| condition.skips(variables))
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_schema_name(mut self, schema_name: impl Into<String>) -> Self {
        self.schema_name = Some(schema_name.into());
        self
    }
}
