use crate::CodecError;
use crate::DecodeOptions;
use crate::JsonValueAdapter;
use crate::ScalarAdapter;
use crate::ScalarAdapterRegistry;
use libgraphql_json::JsonObject;
use libgraphql_json::JsonPath;

static PASSTHROUGH_ADAPTER: JsonValueAdapter = JsonValueAdapter;

/// A deferred fragment that has been delivered: the path of the object it
/// was delivered into, and its label.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DeliveredFragment {
    pub label: Option<String>,
    pub path: JsonPath,
}

/// How fields of `@defer`red fragments are treated during a decode.
#[derive(Clone, Copy, Debug, Default)]
pub enum DeferMode<'a> {
    /// The response is complete: deferred fields obey their declared
    /// nullability like any other field.
    #[default]
    Strict,

    /// The response is partial: only the listed fragments have been
    /// delivered, and fields belonging only to undelivered fragments
    /// decode as `null`.
    Partial(&'a [DeliveredFragment]),
}

/// Everything a decode (or encode) needs besides the reader and the shape,
/// passed explicitly into every recursive call.
#[derive(Clone, Copy, Debug)]
pub struct DecodeContext<'a> {
    defer_mode: DeferMode<'a>,
    options: DecodeOptions,
    registry: &'a ScalarAdapterRegistry,
    variables: &'a JsonObject,
}
impl<'a> DecodeContext<'a> {
    pub fn new(registry: &'a ScalarAdapterRegistry, variables: &'a JsonObject) -> Self {
        Self {
            defer_mode: DeferMode::Strict,
            options: DecodeOptions::default(),
            registry,
            variables,
        }
    }

    pub(crate) fn adapter_for(&self, scalar_name: &str) -> Result<&'a dyn ScalarAdapter, CodecError> {
        match self.registry.adapter_for(scalar_name) {
            Ok(adapter) => Ok(adapter),
            Err(_) if !self.options.require_registered_scalars => Ok(&PASSTHROUGH_ADAPTER),
            Err(err) => Err(err),
        }
    }

    pub fn defer_mode(&self) -> DeferMode<'a> {
        self.defer_mode
    }

    pub(crate) fn is_fragment_delivered(&self, path: &JsonPath, label: Option<&str>) -> bool {
        match self.defer_mode {
            DeferMode::Strict => true,
            DeferMode::Partial(delivered) => delivered
                .iter()
                .any(|fragment| fragment.label.as_deref() == label && fragment.path == *path),
        }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn registry(&self) -> &'a ScalarAdapterRegistry {
        self.registry
    }

    pub fn variables(&self) -> &'a JsonObject {
        self.variables
    }

    pub fn with_defer_mode(mut self, defer_mode: DeferMode<'a>) -> Self {
        self.defer_mode = defer_mode;
        self
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }
}
