use libgraphql_json::JsonReaderOptions;

fn default_require_registered_scalars() -> bool {
    true
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeOptions {
    /// Options for every reader the decoder creates internally (for
    /// incremental re-decodes and polymorphic objects whose `__typename`
    /// arrives late).
    #[serde(default)]
    pub reader: JsonReaderOptions,

    /// When `true` (the default) a custom scalar without a registered
    /// adapter fails with
    /// [`CodecError::UnregisteredScalar`](crate::CodecError::UnregisteredScalar).
    /// When `false` such scalars decode as their raw
    /// [`JsonValue`](libgraphql_json::JsonValue).
    #[serde(default = "default_require_registered_scalars")]
    pub require_registered_scalars: bool,
}
impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            reader: JsonReaderOptions::default(),
            require_registered_scalars: default_require_registered_scalars(),
        }
    }
}
