use crate::CodecError;
use crate::CompositeCodec;
use crate::DecodeContext;
use crate::GraphQLError;
use crate::GraphQLResponse;
use crate::ObjectShape;
use crate::ResponseObject;
use crate::Result;
use crate::TYPENAME_FIELD;
use crate::ValueCodec;
use indexmap::IndexSet;
use libgraphql_json::JsonPath;
use libgraphql_json::JsonPathElement;
use libgraphql_json::JsonReader;
use libgraphql_json::JsonTokenKind;
use libgraphql_json::JsonValue;
use libgraphql_json::JsonWriter;
use libgraphql_json::MapJsonWriter;
use libgraphql_json::StrJsonReader;
use libgraphql_json::StrJsonWriter;
use std::sync::Arc;

const ENVELOPE_MEMBERS: [&str; 4] = ["data", "errors", "extensions", "hasNext"];

#[derive(Clone, serde::Deserialize, serde::Serialize)]
struct OperationDescriptor {
    name: String,
    root: ObjectShape,
}

/// A compiled operation: its name and the shape of its root selection set.
///
/// The root codec is compiled once on construction, so an `Operation` can
/// be shared (e.g. behind an `Arc`) by any number of concurrent decodes.
/// Operations deserialize from descriptor JSON of the form
/// `{"name": "...", "root": {"fields": [...]}}`.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[serde(from = "OperationDescriptor", into = "OperationDescriptor")]
pub struct Operation {
    composite: Arc<CompositeCodec>,
    name: String,
    root: ObjectShape,
    root_codec: ValueCodec,
}
impl Operation {
    pub fn new(name: impl Into<String>, root: ObjectShape) -> Self {
        let composite = Arc::new(CompositeCodec::compile(&root));
        Self {
            root_codec: ValueCodec::Composite(composite.clone()),
            composite,
            name: name.into(),
            root,
        }
    }

    /// Reads an operation from descriptor JSON.
    pub fn from_descriptor_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// The codec reached by following `path` from the root, choosing
    /// type-conditioned field sets by the `__typename`s found along the same
    /// path in `raw_data`.
    pub fn codec_at(&self, path: &JsonPath, raw_data: &JsonValue) -> Option<&ValueCodec> {
        let mut codec = &self.root_codec;
        let mut raw = Some(raw_data);
        for element in path.elements() {
            codec = match (codec.non_null(), element) {
                (ValueCodec::Composite(composite), JsonPathElement::Key(key)) => {
                    let typename = raw
                        .and_then(|raw| raw.get(TYPENAME_FIELD))
                        .and_then(JsonValue::as_str);
                    composite.field_codec(typename, key.as_str())?
                },
                (ValueCodec::ListOf(item), JsonPathElement::Index(_)) => item.as_ref(),
                _ => return None,
            };
            raw = raw.and_then(|raw| match (element, raw) {
                (JsonPathElement::Key(key), JsonValue::Object(entries)) => entries.get(key),
                (JsonPathElement::Index(index), JsonValue::List(items)) => items.get(*index),
                _ => None,
            });
        }
        Some(codec)
    }

    pub fn codec(&self) -> &CompositeCodec {
        self.composite.as_ref()
    }

    /// Decodes the `data` object `reader` is positioned at.
    pub fn decode_data<R: JsonReader>(
        &self,
        reader: &mut R,
        ctx: &DecodeContext<'_>,
    ) -> Result<ResponseObject> {
        let mut path = JsonPath::new();
        self.codec().decode(reader, ctx, &mut path)
    }

    /// Decodes a complete response envelope in a single streaming pass.
    pub fn decode_response(&self, text: &str, ctx: &DecodeContext<'_>) -> Result<GraphQLResponse> {
        let mut reader = StrJsonReader::with_options(text, ctx.options().reader);
        let mut response = GraphQLResponse::default();
        reader.begin_object()?;
        while let Some(index) = reader.select_name(&ENVELOPE_MEMBERS)? {
            match index {
                0 => {
                    if reader.peek()? == JsonTokenKind::Null {
                        reader.next_null()?;
                    } else {
                        response.data = Some(self.decode_data(&mut reader, ctx)?);
                    }
                },
                1 => {
                    let errors = reader.read_json_value()?;
                    response.errors = GraphQLError::list_from_json_value(&errors)
                        .ok_or_else(|| malformed_envelope("`errors` must be a list of error objects"))?;
                },
                2 => match reader.read_json_value()? {
                    JsonValue::Null => (),
                    JsonValue::Object(extensions) => response.extensions = extensions,
                    _ => return Err(malformed_envelope("`extensions` must be an object")),
                },
                _ => {
                    response.has_next = if reader.peek()? == JsonTokenKind::Null {
                        reader.next_null()?;
                        false
                    } else {
                        reader.next_boolean()?
                    };
                },
            }
        }
        reader.end_object()?;
        reader.expect_end_of_document()?;
        log::trace!(
            "Decoded `{}` response ({} errors).",
            self.name,
            response.errors.len(),
        );
        Ok(response)
    }

    /// Encodes `data` as compact JSON text.
    pub fn encode_data(&self, data: &ResponseObject, ctx: &DecodeContext<'_>) -> Result<String> {
        let mut writer = StrJsonWriter::new();
        self.encode_into(&mut writer, data, ctx)?;
        Ok(writer.into_string()?)
    }

    fn encode_into<W: JsonWriter>(
        &self,
        writer: &mut W,
        data: &ResponseObject,
        ctx: &DecodeContext<'_>,
    ) -> Result<()> {
        let mut path = JsonPath::new();
        self.codec().encode(writer, ctx, data, &mut path)
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Every custom scalar this operation can decode, in first-seen order.
    pub fn required_custom_scalars(&self) -> IndexSet<String> {
        let mut names = IndexSet::new();
        self.root.collect_custom_scalars(&mut names);
        names
    }

    pub fn root(&self) -> &ObjectShape {
        &self.root
    }

    /// Encodes `data` as a raw [`JsonValue`] tree, for consumers (such as a
    /// normalized cache) that work on the raw field tree.
    pub fn to_raw_tree(&self, data: &ResponseObject, ctx: &DecodeContext<'_>) -> Result<JsonValue> {
        let mut writer = MapJsonWriter::new();
        self.encode_into(&mut writer, data, ctx)?;
        Ok(writer.into_value()?)
    }
}
impl From<OperationDescriptor> for Operation {
    fn from(descriptor: OperationDescriptor) -> Self {
        Self::new(descriptor.name, descriptor.root)
    }
}
impl From<Operation> for OperationDescriptor {
    fn from(operation: Operation) -> Self {
        Self {
            name: operation.name,
            root: operation.root,
        }
    }
}

fn malformed_envelope(message: &str) -> CodecError {
    CodecError::MalformedEnvelope {
        message: message.to_string(),
    }
}
