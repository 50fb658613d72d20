use crate::DeferredFragment;
use crate::FieldDescriptor;
use indexmap::IndexMap;
use indexmap::IndexSet;

/// The compiled selection set for one object position.
///
/// `fields` is the default selection. When the selection contains type
/// conditions, `possible_types` maps a concrete `__typename` to the full
/// field list selected for that type; objects whose type is not listed fall
/// back to `fields`.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectShape {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deferred_fragments: Vec<DeferredFragment>,
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub possible_types: IndexMap<String, Vec<FieldDescriptor>>,
}
impl ObjectShape {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            deferred_fragments: vec![],
            fields,
            possible_types: IndexMap::new(),
        }
    }

    pub(crate) fn collect_custom_scalars(&self, names: &mut IndexSet<String>) {
        let fields = self
            .fields
            .iter()
            .chain(self.possible_types.values().flatten())
            .chain(self.deferred_fragments.iter().flat_map(|fragment| fragment.fields.iter()));
        for field in fields {
            field.field_type().collect_custom_scalars(names);
        }
    }

    pub fn with_deferred_fragment(mut self, fragment: DeferredFragment) -> Self {
        self.deferred_fragments.push(fragment);
        self
    }

    pub fn with_possible_type(
        mut self,
        typename: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        self.possible_types.insert(typename.into(), fields);
        self
    }
}
