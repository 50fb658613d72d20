use crate::CodecError;
use crate::DecodeContext;
use crate::DeferredFragment;
use crate::FieldDescriptor;
use crate::GraphQLError;
use crate::ObjectShape;
use crate::ResponseObject;
use crate::Result;
use crate::TYPENAME_FIELD;
use crate::Value;
use crate::ValueCodec;
use indexmap::IndexMap;
use libgraphql_json::JsonObject;
use libgraphql_json::JsonPath;
use libgraphql_json::JsonReader;
use libgraphql_json::JsonTokenKind;
use libgraphql_json::JsonValue;
use libgraphql_json::JsonWriter;
use libgraphql_json::MapJsonReader;
use smallvec::SmallVec;

#[derive(Debug)]
struct CompiledField {
    codec: ValueCodec,
    descriptor: FieldDescriptor,
    /// Indices (into `CompiledSelection::fragment_labels`) of the deferred
    /// fragments that select this field.
    fragments: SmallVec<[usize; 2]>,
    /// Whether the field is selected outside of any deferred fragment.
    in_base: bool,
}

/// One concrete field set: the base selection plus the fields of every
/// deferred fragment that applies to it, deduplicated by response key.
#[derive(Debug)]
struct CompiledSelection {
    fields: Vec<CompiledField>,
    fragment_labels: Vec<Option<String>>,
    /// Response keys of `fields`, in order, followed by `__typename` if no
    /// selected field reads it already. Matching that trailing candidate
    /// records the object's type without adding a field.
    response_keys: Vec<String>,
    typename_index: Option<usize>,
}
impl CompiledSelection {
    fn compile(fields: &[FieldDescriptor], fragments: &[&DeferredFragment]) -> Self {
        let mut compiled: Vec<CompiledField> = fields
            .iter()
            .map(|descriptor| CompiledField {
                codec: ValueCodec::compile(descriptor.field_type()),
                descriptor: descriptor.clone(),
                fragments: SmallVec::new(),
                in_base: true,
            })
            .collect();

        let mut fragment_labels = vec![];
        for (fragment_index, fragment) in fragments.iter().enumerate() {
            fragment_labels.push(fragment.label.clone());
            for descriptor in &fragment.fields {
                let existing = compiled
                    .iter_mut()
                    .find(|field| field.descriptor.response_key() == descriptor.response_key());
                match existing {
                    Some(field) => field.fragments.push(fragment_index),
                    None => compiled.push(CompiledField {
                        codec: ValueCodec::compile(descriptor.field_type()),
                        descriptor: descriptor.clone(),
                        fragments: smallvec::smallvec![fragment_index],
                        in_base: false,
                    }),
                }
            }
        }

        let typename_index = compiled
            .iter()
            .position(|field| field.descriptor.response_key() == TYPENAME_FIELD);
        let mut response_keys: Vec<String> = compiled
            .iter()
            .map(|field| field.descriptor.response_key().to_string())
            .collect();
        if typename_index.is_none() {
            response_keys.push(TYPENAME_FIELD.to_string());
        }

        Self {
            fields: compiled,
            fragment_labels,
            response_keys,
            typename_index,
        }
    }

    /// Indices of the deferred fragments a patch labeled `label` carrying
    /// the members of `data` delivers to the object at `path`.
    ///
    /// A fragment with a matching label wins. Otherwise every undelivered
    /// fragment that selects one of the members of `data` matches.
    fn matching_fragments(
        &self,
        label: Option<&str>,
        data: &JsonObject,
        ctx: &DecodeContext<'_>,
        path: &JsonPath,
    ) -> SmallVec<[usize; 2]> {
        let labeled: SmallVec<[usize; 2]> = self
            .fragment_labels
            .iter()
            .enumerate()
            .filter(|(_, fragment_label)| label.is_some() && fragment_label.as_deref() == label)
            .map(|(index, _)| index)
            .collect();
        if !labeled.is_empty() {
            return labeled;
        }

        let selecting: SmallVec<[usize; 2]> = self
            .fragment_labels
            .iter()
            .enumerate()
            .filter(|(_, fragment_label)| !ctx.is_fragment_delivered(path, fragment_label.as_deref()))
            .filter(|(index, _)| {
                self.fields.iter().any(|field| {
                    field.fragments.contains(index) && data.contains_key(field.descriptor.response_key())
                })
            })
            .map(|(index, _)| index)
            .collect();
        if !selecting.is_empty() || label.is_some() {
            return selecting;
        }

        // An unlabeled patch without members still delivers the unlabeled
        // fragments.
        self.fragment_labels
            .iter()
            .enumerate()
            .filter(|(_, fragment_label)| fragment_label.is_none())
            .map(|(index, _)| index)
            .collect()
    }

    fn is_delivered(&self, field: &CompiledField, ctx: &DecodeContext<'_>, path: &JsonPath) -> bool {
        field.in_base
            || field.fragments.iter().any(|index| {
                self.fragment_labels
                    .get(*index)
                    .is_some_and(|label| ctx.is_fragment_delivered(path, label.as_deref()))
            })
    }
}

/// Outcome of checking a deferred fragment's patch data before it is merged.
pub(crate) struct FragmentCheck {
    pub(crate) accepted: bool,
    /// The members of the patch the matched fragments select.
    pub(crate) data: JsonObject,
    pub(crate) errors: Vec<GraphQLError>,
    /// Labels of the matched fragments.
    pub(crate) labels: Vec<Option<String>>,
}

/// The [`ValueCodec`] for an object position: drives the selection loop
/// over the object's members and builds a [`ResponseObject`].
///
/// When the shape has type conditions, the field set is chosen by the
/// object's `__typename`. If `__typename` is not the first member, the rest
/// of the object is buffered so the choice can still be made before any
/// field is decoded.
#[derive(Debug)]
pub struct CompositeCodec {
    default_selection: CompiledSelection,
    type_selections: IndexMap<String, CompiledSelection>,
}
impl CompositeCodec {
    pub fn compile(shape: &ObjectShape) -> Self {
        let mut type_selections = IndexMap::new();
        for (typename, fields) in &shape.possible_types {
            let fragments = fragments_for(shape, Some(typename.as_str()));
            type_selections.insert(typename.clone(), CompiledSelection::compile(fields, &fragments));
        }
        for fragment in &shape.deferred_fragments {
            if let Some(typename) = &fragment.type_condition
                && !type_selections.contains_key(typename)
            {
                let fragments = fragments_for(shape, Some(typename.as_str()));
                type_selections.insert(
                    typename.clone(),
                    CompiledSelection::compile(&shape.fields, &fragments),
                );
            }
        }

        Self {
            default_selection: CompiledSelection::compile(&shape.fields, &fragments_for(shape, None)),
            type_selections,
        }
    }

    /// Checks patch `data` for the deferred fragments of the object at
    /// `path` before it is merged. Returns `None` when no deferred fragment
    /// of the object matches the patch.
    ///
    /// Only members selected by the matched fragments are kept. A nullable
    /// field that fails to decode is replaced with `null`. A non-nullable
    /// one rejects the whole patch. Either way the failure is reported as a
    /// [`GraphQLError`].
    pub(crate) fn check_fragment(
        &self,
        typename: Option<&str>,
        label: Option<&str>,
        mut data: JsonObject,
        ctx: &DecodeContext<'_>,
        path: &JsonPath,
    ) -> Option<FragmentCheck> {
        let selection = self.selection_for(typename);
        let matched = selection.matching_fragments(label, &data, ctx, path);
        if matched.is_empty() {
            return None;
        }
        let labels = selection
            .fragment_labels
            .iter()
            .enumerate()
            .filter(|(index, _)| matched.contains(index))
            .map(|(_, fragment_label)| fragment_label.clone())
            .collect();

        let mut checked = JsonObject::new();
        let mut errors = vec![];
        for field in &selection.fields {
            let in_matched = field.fragments.iter().any(|index| matched.contains(index));
            if !in_matched || field.descriptor.should_skip(ctx.variables()) {
                continue;
            }
            let key = field.descriptor.response_key();
            let mut field_path = path.join(key);
            let outcome = match data.get(key) {
                Some(raw) => {
                    let mut reader = MapJsonReader::with_options(raw, ctx.options().reader)
                        .with_base_path(field_path.clone());
                    field.codec.decode(&mut reader, ctx, &mut field_path).map(|_| ())
                },
                None if field.codec.is_nullable() => Ok(()),
                None => Err(CodecError::MissingField {
                    field: key.to_string(),
                    path: path.clone(),
                }),
            };
            let err = match outcome {
                Ok(()) => {
                    if let Some(raw) = data.shift_remove(key) {
                        checked.insert(key.to_string(), raw);
                    }
                    continue;
                },
                Err(err) => err,
            };

            log::debug!("Deferred field `{field_path}` failed to decode: {err}");
            let error_path = err.path().cloned().unwrap_or_else(|| field_path.clone());
            errors.push(GraphQLError::new(err.to_string()).with_path(error_path));
            if !field.codec.is_nullable() {
                return Some(FragmentCheck {
                    accepted: false,
                    data: checked,
                    errors,
                    labels,
                });
            }
            checked.insert(key.to_string(), JsonValue::Null);
        }
        if !data.is_empty() {
            log::trace!(
                "Ignoring {} patch members at `{path}` outside the deferred fragments.",
                data.len(),
            );
        }

        Some(FragmentCheck {
            accepted: true,
            data: checked,
            errors,
            labels,
        })
    }

    /// Decodes the object `reader` is positioned at.
    pub fn decode<R: JsonReader>(
        &self,
        reader: &mut R,
        ctx: &DecodeContext<'_>,
        path: &mut JsonPath,
    ) -> Result<ResponseObject> {
        reader.begin_object()?;
        if self.type_selections.is_empty() {
            return self.decode_members(reader, ctx, path, &self.default_selection, None);
        }

        if reader.peek_name()?.as_deref() == Some(TYPENAME_FIELD) {
            reader.next_name()?;
            let typename = read_typename(reader)?;
            let selection = self.selection_for(typename.as_deref());
            return self.decode_members(reader, ctx, path, selection, typename);
        }

        log::trace!("Buffering object at `{path}` until its `__typename` is known.");
        let mut members = JsonObject::new();
        while reader.has_next()? {
            let name = reader.next_name()?;
            let value = reader.read_json_value()?;
            members.insert(name, value);
        }
        reader.end_object()?;

        let typename = members
            .get(TYPENAME_FIELD)
            .and_then(JsonValue::as_str)
            .map(str::to_string);
        let buffered = JsonValue::Object(members);
        let mut buffered_reader = MapJsonReader::with_options(&buffered, ctx.options().reader)
            .with_base_path(path.clone());
        let selection = self.selection_for(typename.as_deref());
        buffered_reader.begin_object()?;
        self.decode_members(&mut buffered_reader, ctx, path, selection, typename)
    }

    /// The selection loop: matches members against the selection's
    /// response keys, skips members excluded by `@skip`/`@include`, decodes
    /// the rest, and leaves unknown members to `end_object()`.
    fn decode_members<R: JsonReader>(
        &self,
        reader: &mut R,
        ctx: &DecodeContext<'_>,
        path: &mut JsonPath,
        selection: &CompiledSelection,
        mut typename: Option<String>,
    ) -> Result<ResponseObject> {
        let variables = ctx.variables();
        let mut values: SmallVec<[Option<Value>; 16]> =
            SmallVec::from_elem(None, selection.fields.len());
        if let (Some(index), Some(typename)) = (selection.typename_index, typename.as_ref()) {
            values[index] = Some(Value::String(typename.clone()));
        }

        while let Some(index) = reader.select_name(&selection.response_keys)? {
            let Some(field) = selection.fields.get(index) else {
                typename = read_typename(reader)?;
                continue;
            };
            if field.descriptor.should_skip(variables) {
                reader.skip_value()?;
                continue;
            }
            path.push(field.descriptor.response_key());
            let decoded = field.codec.decode(reader, ctx, path);
            path.pop();
            values[index] = Some(decoded?);
        }
        reader.end_object()?;

        if let Some(Value::String(selected)) = selection
            .typename_index
            .and_then(|index| values[index].as_ref())
        {
            typename = Some(selected.clone());
        }

        let mut object = ResponseObject::new(typename);
        for (field, value) in selection.fields.iter().zip(values) {
            let key = field.descriptor.response_key();
            let value = match value {
                Some(value) => value,
                None if field.descriptor.should_skip(variables) => continue,
                None if field.codec.is_nullable() => Value::Null,
                None if !selection.is_delivered(field, ctx, path) => Value::Null,
                None => {
                    return Err(CodecError::MissingField {
                        field: key.to_string(),
                        path: path.clone(),
                    });
                },
            };
            object.insert(key, value);
        }
        Ok(object)
    }

    /// Writes `object` in declaration order. Fields absent from `object`
    /// are not written.
    pub fn encode<W: JsonWriter>(
        &self,
        writer: &mut W,
        ctx: &DecodeContext<'_>,
        object: &ResponseObject,
        path: &mut JsonPath,
    ) -> Result<()> {
        let selection = self.selection_for(object.typename());
        writer.begin_object()?;
        if let (None, Some(typename)) = (selection.typename_index, object.typename()) {
            writer.name(TYPENAME_FIELD)?;
            writer.value_string(typename)?;
        }
        for field in &selection.fields {
            let key = field.descriptor.response_key();
            let Some(value) = object.get(key) else {
                continue;
            };
            writer.name(key)?;
            path.push(key);
            // Undelivered deferred fields are null whatever their declared
            // type.
            let encoded = if value.is_null() && !field.in_base {
                writer.value_null().map_err(CodecError::from)
            } else {
                field.codec.encode(writer, ctx, value, path)
            };
            path.pop();
            encoded?;
        }
        writer.end_object()?;
        Ok(())
    }

    /// The codec of the field selected under `response_key` for an object
    /// of type `typename`, including fields of deferred fragments.
    pub fn field_codec(&self, typename: Option<&str>, response_key: &str) -> Option<&ValueCodec> {
        self.selection_for(typename)
            .fields
            .iter()
            .find(|field| field.descriptor.response_key() == response_key)
            .map(|field| &field.codec)
    }

    pub fn is_polymorphic(&self) -> bool {
        !self.type_selections.is_empty()
    }

    fn selection_for(&self, typename: Option<&str>) -> &CompiledSelection {
        typename
            .and_then(|typename| self.type_selections.get(typename))
            .unwrap_or(&self.default_selection)
    }
}

fn fragments_for<'a>(shape: &'a ObjectShape, typename: Option<&str>) -> Vec<&'a DeferredFragment> {
    shape
        .deferred_fragments
        .iter()
        .filter(|fragment| match (fragment.type_condition.as_deref(), typename) {
            (None, _) => true,
            (Some(condition), Some(typename)) => condition == typename,
            (Some(_), None) => false,
        })
        .collect()
}

fn read_typename<R: JsonReader>(reader: &mut R) -> Result<Option<String>> {
    if reader.peek()? == JsonTokenKind::Null {
        reader.next_null()?;
        return Ok(None);
    }
    Ok(Some(reader.next_string()?))
}
