use crate::Operation;
use crate::ScalarAdapter;
use crate::ScalarAdapterRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

type Result<T> = std::result::Result<T, Vec<ScalarAdapterRegistryBuildError>>;

/// Collects [`ScalarAdapter`]s and produces an immutable
/// [`ScalarAdapterRegistry`].
///
/// # Example
///
/// ```
/// use libgraphql_response::FieldDescriptor;
/// use libgraphql_response::FieldType;
/// use libgraphql_response::ObjectShape;
/// use libgraphql_response::Operation;
/// use libgraphql_response::ScalarAdapterRegistryBuilder;
/// use libgraphql_response::StringScalarAdapter;
///
/// let operation = Operation::new(
///     "Viewer",
///     ObjectShape::new(vec![
///         FieldDescriptor::new("createdAt", FieldType::custom("DateTime")),
///     ]),
/// );
///
/// let mut builder = ScalarAdapterRegistryBuilder::new();
/// builder.register("DateTime", StringScalarAdapter).unwrap();
/// let registry = builder.build_for(&[&operation]).unwrap();
/// assert!(registry.contains("DateTime"));
/// ```
#[derive(Default)]
pub struct ScalarAdapterRegistryBuilder {
    adapters: HashMap<String, Arc<dyn ScalarAdapter>>,
}

impl ScalarAdapterRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry without checking it against any operation.
    /// Scalars that turn out to be missing fail at first use instead.
    pub fn build(self) -> ScalarAdapterRegistry {
        ScalarAdapterRegistry {
            adapters: self.adapters,
        }
    }

    /// Builds the registry, failing up front if any of `operations` needs a
    /// custom scalar that has no adapter.
    pub fn build_for(self, operations: &[&Operation]) -> Result<ScalarAdapterRegistry> {
        let mut errors = vec![];
        for operation in operations {
            for scalar_name in operation.required_custom_scalars() {
                if !self.adapters.contains_key(&scalar_name) {
                    errors.push(ScalarAdapterRegistryBuildError::UnregisteredScalar {
                        operation_name: operation.name().to_string(),
                        scalar_name,
                    });
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(self.build())
    }

    /// Registers the adapter for `scalar_name`.
    ///
    /// Returns an error if an adapter for that name was already registered.
    pub fn register(
        &mut self,
        scalar_name: impl Into<String>,
        adapter: impl ScalarAdapter + 'static,
    ) -> std::result::Result<&mut Self, ScalarAdapterRegistryBuildError> {
        let scalar_name = scalar_name.into();
        if self.adapters.contains_key(&scalar_name) {
            return Err(ScalarAdapterRegistryBuildError::DuplicateAdapter { scalar_name });
        }
        log::trace!("Registered adapter for custom scalar `{scalar_name}`.");
        self.adapters.insert(scalar_name, Arc::new(adapter));
        Ok(self)
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ScalarAdapterRegistryBuildError {
    #[error("an adapter for custom scalar `{scalar_name}` was registered more than once")]
    DuplicateAdapter {
        scalar_name: String,
    },

    #[error("operation `{operation_name}` requires custom scalar `{scalar_name}`, which has no registered adapter")]
    UnregisteredScalar {
        operation_name: String,
        scalar_name: String,
    },
}
