use crate::FieldDescriptor;

/// Fields selected under a `@defer`red fragment.
///
/// Until a fragment is delivered, its fields decode as `null` regardless of
/// their declared nullability.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeferredFragment {
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Restricts the fragment to objects whose `__typename` matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_condition: Option<String>,
}
impl DeferredFragment {
    pub fn new(label: Option<&str>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
            label: label.map(str::to_string),
            type_condition: None,
        }
    }

    pub fn on_type(mut self, type_condition: impl Into<String>) -> Self {
        self.type_condition = Some(type_condition.into());
        self
    }
}
