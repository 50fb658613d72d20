use libgraphql_json::JsonObject;
use libgraphql_json::JsonPath;
use libgraphql_json::JsonValue;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct GraphQLErrorLocation {
    pub line: u32,
    pub column: u32,
}

/// One entry of a response's `errors` list.
///
/// These are reported by the server alongside (possibly partial) data and
/// are not decode failures.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphQLError {
    pub extensions: JsonObject,
    pub locations: Vec<GraphQLErrorLocation>,
    pub message: String,
    /// Members other than `message`, `locations`, `path`, and `extensions`.
    pub other_fields: JsonObject,
    pub path: Option<JsonPath>,
}
impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Reads an error object. Returns `None` unless `value` is an object
    /// with a string `message`. Malformed `locations` entries and a
    /// malformed `path` are dropped rather than failing the error.
    pub fn from_json_value(value: &JsonValue) -> Option<Self> {
        let mut error = Self::new(value.get("message")?.as_str()?);
        for (key, member) in value.as_object()? {
            match key.as_str() {
                "message" => (),
                "locations" => {
                    error.locations = member
                        .as_list()
                        .map(|locations| {
                            locations
                                .iter()
                                .filter_map(|location| {
                                    Some(GraphQLErrorLocation {
                                        line: u32::try_from(location.get("line")?.as_i64()?).ok()?,
                                        column: u32::try_from(location.get("column")?.as_i64()?).ok()?,
                                    })
                                })
                                .collect()
                        })
                        .unwrap_or_default();
                },
                "path" => error.path = JsonPath::from_json_value(member),
                "extensions" => {
                    if let Some(extensions) = member.as_object() {
                        error.extensions = extensions.clone();
                    }
                },
                _ => {
                    error.other_fields.insert(key.clone(), member.clone());
                },
            }
        }
        Some(error)
    }

    /// Reads an `errors` list. `null` reads as an empty list.
    pub fn list_from_json_value(value: &JsonValue) -> Option<Vec<Self>> {
        match value {
            JsonValue::Null => Some(vec![]),
            JsonValue::List(errors) => errors.iter().map(Self::from_json_value).collect(),
            _ => None,
        }
    }

    pub fn to_json_value(&self) -> JsonValue {
        let mut object = JsonObject::new();
        object.insert("message".to_string(), JsonValue::from(self.message.as_str()));
        if !self.locations.is_empty() {
            let locations = self
                .locations
                .iter()
                .map(|location| {
                    let mut entry = JsonObject::new();
                    entry.insert("line".to_string(), JsonValue::from(u64::from(location.line)));
                    entry.insert("column".to_string(), JsonValue::from(u64::from(location.column)));
                    JsonValue::Object(entry)
                })
                .collect::<Vec<_>>();
            object.insert("locations".to_string(), JsonValue::List(locations));
        }
        if let Some(path) = &self.path {
            object.insert("path".to_string(), path.to_json_value());
        }
        if !self.extensions.is_empty() {
            object.insert("extensions".to_string(), JsonValue::Object(self.extensions.clone()));
        }
        for (key, value) in &self.other_fields {
            object.insert(key.clone(), value.clone());
        }
        JsonValue::Object(object)
    }

    pub fn with_path(mut self, path: JsonPath) -> Self {
        self.path = Some(path);
        self
    }
}
impl std::fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} (at `{path}`)", self.message),
            None => f.write_str(self.message.as_str()),
        }
    }
}
