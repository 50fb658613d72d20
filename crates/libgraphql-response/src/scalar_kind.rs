/// The built-in GraphQL scalars (plus enums, which travel as strings).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum ScalarKind {
    Boolean,
    Enum,
    Float,
    /// Serialized as a string. Numeric ids are accepted on decode and kept
    /// as their textual form.
    #[serde(rename = "ID")]
    Id,
    Int,
    /// A 64-bit integer, for schemas that model `Long` as a built-in.
    Long,
    String,
}
impl ScalarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Enum => "Enum",
            Self::Float => "Float",
            Self::Id => "ID",
            Self::Int => "Int",
            Self::Long => "Long",
            Self::String => "String",
        }
    }
}
impl std::fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
