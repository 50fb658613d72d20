use crate::CodecError;
use crate::ScalarAdapter;
use std::collections::HashMap;
use std::sync::Arc;

/// Custom scalar adapters keyed by scalar name.
///
/// Built once (see
/// [`ScalarAdapterRegistryBuilder`](crate::ScalarAdapterRegistryBuilder))
/// and read-only afterwards; every decode receives it by reference through
/// its [`DecodeContext`](crate::DecodeContext). Independent clients in one
/// process simply hold independent registries.
#[derive(Clone, Default)]
pub struct ScalarAdapterRegistry {
    pub(crate) adapters: HashMap<String, Arc<dyn ScalarAdapter>>,
}
impl ScalarAdapterRegistry {
    pub fn adapter_for(&self, scalar_name: &str) -> Result<&dyn ScalarAdapter, CodecError> {
        self.adapters
            .get(scalar_name)
            .map(|adapter| adapter.as_ref())
            .ok_or_else(|| CodecError::UnregisteredScalar {
                scalar_name: scalar_name.to_string(),
            })
    }

    pub fn contains(&self, scalar_name: &str) -> bool {
        self.adapters.contains_key(scalar_name)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn scalar_names(&self) -> impl Iterator<Item = &str> {
        self.adapters.keys().map(String::as_str)
    }
}
impl std::fmt::Debug for ScalarAdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.scalar_names().collect();
        names.sort_unstable();
        f.debug_struct("ScalarAdapterRegistry")
            .field("scalar_names", &names)
            .finish()
    }
}
