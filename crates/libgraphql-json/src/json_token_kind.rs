/// The kind of the next token available from a
/// [`JsonReader`](crate::JsonReader).
///
/// Value-level kinds (`Null`, `Boolean`, `Number`, `String`,
/// `BeginObject`, `BeginArray`) are also what [`JsonValue::kind()`] reports
/// for a materialized value.
///
/// [`JsonValue::kind()`]: crate::JsonValue::kind
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum JsonTokenKind {
    BeginArray,
    BeginObject,
    Boolean,
    EndArray,
    EndDocument,
    EndObject,
    /// A member name inside of an object.
    Name,
    Null,
    Number,
    String,
}
impl JsonTokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeginArray => "BEGIN_ARRAY",
            Self::BeginObject => "BEGIN_OBJECT",
            Self::Boolean => "BOOLEAN",
            Self::EndArray => "END_ARRAY",
            Self::EndDocument => "END_DOCUMENT",
            Self::EndObject => "END_OBJECT",
            Self::Name => "NAME",
            Self::Null => "NULL",
            Self::Number => "NUMBER",
            Self::String => "STRING",
        }
    }

    /// Returns `true` if a token of this kind starts a value (as opposed to
    /// closing a container, naming a member, or ending the document).
    pub fn is_value_start(&self) -> bool {
        matches!(
            self,
            Self::BeginArray
                | Self::BeginObject
                | Self::Boolean
                | Self::Null
                | Self::Number
                | Self::String
        )
    }
}
impl std::fmt::Display for JsonTokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
