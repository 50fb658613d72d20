use crate::CodecError;
use crate::CompositeCodec;
use crate::DecodeContext;
use crate::FieldType;
use crate::Result;
use crate::ScalarKind;
use crate::Value;
use libgraphql_json::JsonPath;
use libgraphql_json::JsonReader;
use libgraphql_json::JsonTokenKind;
use libgraphql_json::JsonWriter;
use std::sync::Arc;

/// Converts between one region of a JSON token stream and one typed
/// [`Value`], for a single declared GraphQL type.
///
/// Codecs are compiled once per [`FieldType`] and nest the same way the type
/// does: `[DateTime]!` compiles to `ListOf(Nullable(Custom("DateTime")))`.
/// They hold no mutable state and are shared by every concurrent decode.
#[derive(Clone, Debug)]
pub enum ValueCodec {
    Composite(Arc<CompositeCodec>),
    Custom(String),
    Leaf(ScalarKind),
    ListOf(Box<ValueCodec>),
    Nullable(Box<ValueCodec>),
}
impl ValueCodec {
    /// The [`CompositeCodec`] behind this codec, looking through a
    /// [`ValueCodec::Nullable`] wrapper.
    pub fn as_composite(&self) -> Option<&CompositeCodec> {
        if let Self::Composite(composite) = self.non_null() {
            Some(composite.as_ref())
        } else {
            None
        }
    }

    pub fn compile(field_type: &FieldType) -> Self {
        let codec = match field_type {
            FieldType::CustomScalar { name, .. } => Self::Custom(name.clone()),
            FieldType::List { of_type, .. } => Self::ListOf(Box::new(Self::compile(of_type))),
            FieldType::Object { shape, .. } => Self::Composite(Arc::new(CompositeCodec::compile(shape))),
            FieldType::Scalar { scalar, .. } => Self::Leaf(*scalar),
        };
        if field_type.is_nullable() {
            Self::Nullable(Box::new(codec))
        } else {
            codec
        }
    }

    /// Decodes the value `reader` is positioned at.
    ///
    /// `path` is the location of that value within the response; it is
    /// extended and restored around nested values and is what every
    /// [`CodecError`] reports.
    pub fn decode<R: JsonReader>(
        &self,
        reader: &mut R,
        ctx: &DecodeContext<'_>,
        path: &mut JsonPath,
    ) -> Result<Value> {
        let is_null = reader.peek()? == JsonTokenKind::Null;
        match self {
            Self::Nullable(_) if is_null => {
                reader.next_null()?;
                Ok(Value::Null)
            },
            Self::Nullable(inner) => inner.decode(reader, ctx, path),
            _ if is_null => Err(CodecError::NullabilityViolation { path: path.clone() }),
            Self::Leaf(kind) => decode_leaf(*kind, reader),
            Self::Custom(scalar_name) => {
                let adapter = ctx.adapter_for(scalar_name)?;
                let raw = reader.read_json_value()?;
                adapter
                    .decode(&raw)
                    .map(Value::Custom)
                    .map_err(|source| CodecError::ScalarCoercion {
                        path: path.clone(),
                        scalar_name: scalar_name.clone(),
                        source,
                    })
            },
            Self::ListOf(inner) => {
                reader.begin_array()?;
                let mut items = vec![];
                while reader.has_next()? {
                    path.push(items.len());
                    let item = inner.decode(reader, ctx, path);
                    path.pop();
                    items.push(item?);
                }
                reader.end_array()?;
                Ok(Value::List(items))
            },
            Self::Composite(composite) => composite.decode(reader, ctx, path).map(Value::Object),
        }
    }

    pub fn encode<W: JsonWriter>(
        &self,
        writer: &mut W,
        ctx: &DecodeContext<'_>,
        value: &Value,
        path: &mut JsonPath,
    ) -> Result<()> {
        match (self, value) {
            (Self::Nullable(_), Value::Null) => writer.value_null()?,
            (Self::Nullable(inner), value) => inner.encode(writer, ctx, value, path)?,
            (_, Value::Null) => {
                return Err(CodecError::NullabilityViolation { path: path.clone() });
            },
            (Self::Leaf(kind), value) => encode_leaf(*kind, writer, value, path)?,
            (Self::Custom(scalar_name), Value::Custom(scalar)) => {
                let adapter = ctx.adapter_for(scalar_name)?;
                let raw = adapter
                    .encode(&**scalar)
                    .map_err(|source| CodecError::ScalarCoercion {
                        path: path.clone(),
                        scalar_name: scalar_name.clone(),
                        source,
                    })?;
                writer.value_json(&raw)?;
            },
            (Self::ListOf(inner), Value::List(items)) => {
                writer.begin_array()?;
                for (index, item) in items.iter().enumerate() {
                    path.push(index);
                    let encoded = inner.encode(writer, ctx, item, path);
                    path.pop();
                    encoded?;
                }
                writer.end_array()?;
            },
            (Self::Composite(composite), Value::Object(object)) => {
                composite.encode(writer, ctx, object, path)?;
            },
            (Self::Custom(_), _) => return Err(self.unexpected_value(path)),
            (Self::ListOf(_), _) => return Err(self.unexpected_value(path)),
            (Self::Composite(_), _) => return Err(self.unexpected_value(path)),
        }
        Ok(())
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }

    /// This codec with any [`ValueCodec::Nullable`] wrapper removed.
    pub fn non_null(&self) -> &ValueCodec {
        match self {
            Self::Nullable(inner) => inner.non_null(),
            other => other,
        }
    }

    fn unexpected_value(&self, path: &JsonPath) -> CodecError {
        let expected = match self.non_null() {
            Self::Composite(_) => "an object",
            Self::Custom(_) => "a custom scalar value",
            Self::Leaf(kind) => kind.as_str(),
            Self::ListOf(_) => "a list",
            Self::Nullable(_) => "a nullable value",
        };
        CodecError::UnexpectedValue {
            expected,
            path: path.clone(),
        }
    }
}

fn decode_leaf<R: JsonReader>(kind: ScalarKind, reader: &mut R) -> Result<Value> {
    if kind == ScalarKind::Id && reader.peek()? == JsonTokenKind::Number {
        return Ok(Value::String(reader.next_number()?.to_string()));
    }
    Ok(match kind {
        ScalarKind::Boolean => Value::Boolean(reader.next_boolean()?),
        ScalarKind::Enum => Value::Enum(reader.next_string()?),
        ScalarKind::Float => Value::Float(reader.next_double()?),
        ScalarKind::Id | ScalarKind::String => Value::String(reader.next_string()?),
        ScalarKind::Int => Value::Int(reader.next_int()?),
        ScalarKind::Long => Value::Long(reader.next_long()?),
    })
}

fn encode_leaf<W: JsonWriter>(
    kind: ScalarKind,
    writer: &mut W,
    value: &Value,
    path: &JsonPath,
) -> Result<()> {
    match (kind, value) {
        (ScalarKind::Boolean, Value::Boolean(value)) => writer.value_bool(*value)?,
        (ScalarKind::Enum, Value::Enum(value) | Value::String(value)) => writer.value_string(value)?,
        (ScalarKind::Float, Value::Float(value)) => writer.value_double(*value)?,
        (ScalarKind::Id | ScalarKind::String, Value::String(value)) => writer.value_string(value)?,
        (ScalarKind::Int, Value::Int(value)) => writer.value_int(*value)?,
        (ScalarKind::Long, Value::Int(value)) => writer.value_long(i64::from(*value))?,
        (ScalarKind::Long, Value::Long(value)) => writer.value_long(*value)?,
        _ => {
            return Err(CodecError::UnexpectedValue {
                expected: kind.as_str(),
                path: path.clone(),
            });
        },
    }
    Ok(())
}
