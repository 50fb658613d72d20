use serde::Deserialize;

/// Default bound on how many objects/arrays may be open at once.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Smallest nesting bound a reader accepts. Lower requests are raised to
/// this.
pub const MIN_MAX_DEPTH: usize = 32;

/// Knobs shared by every [`JsonReader`](crate::JsonReader) backing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReaderOptions {
    #[serde(default = "default_max_depth", deserialize_with = "deserialize_max_depth")]
    max_depth: usize,
}
impl JsonReaderOptions {
    /// How many containers may be open at once before reads fail with
    /// [`JsonError::TooDeeplyNested`](crate::JsonError::TooDeeplyNested).
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Values below [`MIN_MAX_DEPTH`] are raised to it.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(MIN_MAX_DEPTH),
        }
    }
}
impl Default for JsonReaderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn deserialize_max_depth<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<usize, D::Error> {
    usize::deserialize(deserializer).map(|max_depth| max_depth.max(MIN_MAX_DEPTH))
}
