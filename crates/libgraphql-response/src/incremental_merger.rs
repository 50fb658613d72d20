use crate::DecodeContext;
use crate::DecodeOptions;
use crate::DeferMode;
use crate::DeliveredFragment;
use crate::GraphQLError;
use crate::GraphQLResponse;
use crate::IncrementalEntry;
use crate::IncrementalError;
use crate::IncrementalPayload;
use crate::Operation;
use crate::ScalarAdapterRegistry;
use crate::TYPENAME_FIELD;
use crate::ValueCodec;
use libgraphql_json::JsonObject;
use libgraphql_json::JsonPath;
use libgraphql_json::JsonPathElement;
use libgraphql_json::JsonValue;
use libgraphql_json::MapJsonReader;
use std::sync::Arc;

type Result<T> = std::result::Result<T, IncrementalError>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MergerState {
    /// No payload has been applied yet.
    Initial,

    /// The initial payload was applied and the server announced more.
    AwaitingPatch,

    /// The last payload was applied (or a fatal error occurred). Nothing
    /// more is accepted.
    Terminal,
}

/// Folds the payloads of one incremental (`@defer`/`@stream`) response into
/// a sequence of progressively more complete [`GraphQLResponse`]s.
///
/// The merger keeps the raw JSON tree of everything delivered so far.
/// Each patch is checked against the codec the operation declares at the
/// patch's path, spliced into the raw tree, and the whole tree is then
/// decoded again. Every emitted response therefore obeys the same
/// nullability and `@skip`/`@include` rules as a non-incremental one.
///
/// A merger is single-use: one per request.
#[derive(Debug)]
pub struct IncrementalMerger {
    delivered: Vec<DeliveredFragment>,
    errors: Vec<GraphQLError>,
    extensions: JsonObject,
    operation: Arc<Operation>,
    options: DecodeOptions,
    raw_data: Option<JsonValue>,
    registry: Arc<ScalarAdapterRegistry>,
    state: MergerState,
    variables: JsonObject,
}
impl IncrementalMerger {
    pub fn new(
        operation: Arc<Operation>,
        registry: Arc<ScalarAdapterRegistry>,
        variables: JsonObject,
    ) -> Self {
        Self {
            delivered: vec![],
            errors: vec![],
            extensions: JsonObject::new(),
            operation,
            options: DecodeOptions::default(),
            raw_data: None,
            registry,
            state: MergerState::Initial,
            variables,
        }
    }

    /// Applies one payload and returns the response it completes.
    ///
    /// Every entry of the payload is applied before the response is
    /// decoded. Any error is fatal: the merger becomes
    /// [`MergerState::Terminal`].
    pub fn apply(&mut self, payload: IncrementalPayload) -> Result<GraphQLResponse> {
        let result = self.apply_payload(payload);
        if result.is_err() {
            self.transition(MergerState::Terminal);
        }
        result
    }

    /// Parses `text` as a payload and applies it.
    pub fn apply_json(&mut self, text: &str) -> Result<GraphQLResponse> {
        if self.is_terminal() {
            return Err(IncrementalError::AlreadyTerminated);
        }
        match IncrementalPayload::parse(text) {
            Ok(payload) => self.apply(payload),
            Err(err) => {
                self.transition(MergerState::Terminal);
                Err(err)
            },
        }
    }

    fn apply_payload(&mut self, payload: IncrementalPayload) -> Result<GraphQLResponse> {
        match self.state {
            MergerState::Terminal => return Err(IncrementalError::AlreadyTerminated),
            MergerState::Initial => {
                self.raw_data = payload.data.filter(|data| !data.is_null());
            },
            MergerState::AwaitingPatch => {
                if payload.data.is_some() {
                    return Err(IncrementalError::malformed_payload(
                        "a subsequent payload carries top-level `data`",
                    ));
                }
            },
        }
        self.errors.extend(payload.errors);
        self.extensions.extend(payload.extensions);
        for entry in payload.incremental {
            self.apply_entry(entry)?;
        }

        let response = self.emit(payload.has_next)?;
        self.transition(if payload.has_next {
            MergerState::AwaitingPatch
        } else {
            MergerState::Terminal
        });
        Ok(response)
    }

    fn apply_entry(&mut self, entry: IncrementalEntry) -> Result<()> {
        let IncrementalEntry {
            data,
            errors,
            extensions,
            items,
            label,
            path,
        } = entry;
        log::trace!(
            "Applying incremental entry at `{path}` (label: {}).",
            label.as_deref().unwrap_or("none"),
        );

        self.errors.extend(errors.into_iter().map(|error| {
            if error.path.is_none() {
                error.with_path(path.clone())
            } else {
                error
            }
        }));
        self.extensions.extend(extensions);

        match (data, items) {
            (_, Some(items)) => self.apply_stream_items(path, items),
            (None | Some(JsonValue::Null), None) => Ok(()),
            (Some(JsonValue::Object(data)), None) => self.apply_deferred_fragment(path, label, data),
            (Some(_), None) => Err(IncrementalError::malformed_payload(
                "incremental `data` must be an object",
            )),
        }
    }

    fn apply_deferred_fragment(
        &mut self,
        path: JsonPath,
        label: Option<String>,
        data: JsonObject,
    ) -> Result<()> {
        let Some(raw_data) = self.raw_data.as_ref() else {
            return Err(IncrementalError::UnresolvablePath { path });
        };
        let Some(target) = raw_data.pointer(&path).and_then(JsonValue::as_object) else {
            return Err(IncrementalError::UnresolvablePath { path });
        };
        let typename = target
            .get(TYPENAME_FIELD)
            .and_then(JsonValue::as_str)
            .map(str::to_string);
        let operation = self.operation.clone();
        let Some(composite) = operation
            .codec_at(&path, raw_data)
            .and_then(ValueCodec::as_composite)
        else {
            return Err(IncrementalError::UnresolvablePath { path });
        };

        let ctx = DecodeContext::new(&self.registry, &self.variables)
            .with_options(self.options)
            .with_defer_mode(DeferMode::Partial(&self.delivered));
        let Some(check) = composite.check_fragment(typename.as_deref(), label.as_deref(), data, &ctx, &path)
        else {
            log::debug!(
                "No deferred fragment at `{path}` matches the patch (label: {}).",
                label.as_deref().unwrap_or("none"),
            );
            return Err(IncrementalError::UnresolvablePath { path });
        };
        self.errors.extend(check.errors);
        if !check.accepted {
            log::debug!("Dropping deferred fragment at `{path}`: a non-nullable field failed.");
            return Ok(());
        }

        if let Some(target) = self.raw_data.as_mut().and_then(|raw| raw.pointer_mut(&path)) {
            target.deep_merge(JsonValue::Object(check.data));
        }
        self.delivered.extend(check.labels.into_iter().map(|label| DeliveredFragment {
            label,
            path: path.clone(),
        }));
        Ok(())
    }

    /// Appends streamed list items. `path` names either the list or the
    /// index of the first new item.
    fn apply_stream_items(&mut self, path: JsonPath, items: Vec<JsonValue>) -> Result<()> {
        let Some(raw_data) = self.raw_data.as_ref() else {
            return Err(IncrementalError::UnresolvablePath { path });
        };
        let ends_in_index = matches!(path.last(), Some(JsonPathElement::Index(_)));
        let parent_list = path
            .parent()
            .filter(|parent| ends_in_index && matches!(raw_data.pointer(parent), Some(JsonValue::List(_))));
        let list_path = match parent_list {
            Some(parent) => parent,
            None if matches!(raw_data.pointer(&path), Some(JsonValue::List(_))) => path,
            None => return Err(IncrementalError::UnresolvablePath { path }),
        };
        let start = raw_data
            .pointer(&list_path)
            .and_then(JsonValue::as_list)
            .map_or(0, Vec::len);
        let operation = self.operation.clone();
        let item_codec = match operation.codec_at(&list_path, raw_data).map(ValueCodec::non_null) {
            Some(ValueCodec::ListOf(item_codec)) => item_codec.as_ref(),
            _ => return Err(IncrementalError::UnresolvablePath { path: list_path }),
        };

        let ctx = DecodeContext::new(&self.registry, &self.variables)
            .with_options(self.options)
            .with_defer_mode(DeferMode::Partial(&self.delivered));
        let mut accepted = Vec::with_capacity(items.len());
        for (offset, item) in items.into_iter().enumerate() {
            let mut item_path = list_path.join(start + offset);
            let decoded = {
                let mut reader = MapJsonReader::with_options(&item, self.options.reader)
                    .with_base_path(item_path.clone());
                item_codec.decode(&mut reader, &ctx, &mut item_path).map(|_| ())
            };
            let Err(err) = decoded else {
                accepted.push(item);
                continue;
            };

            log::debug!("Streamed item `{item_path}` failed to decode: {err}");
            let error_path = err.path().cloned().unwrap_or(item_path);
            self.errors.push(GraphQLError::new(err.to_string()).with_path(error_path));
            if !item_codec.is_nullable() {
                return Ok(());
            }
            accepted.push(JsonValue::Null);
        }

        if let Some(JsonValue::List(list)) = self
            .raw_data
            .as_mut()
            .and_then(|raw| raw.pointer_mut(&list_path))
        {
            list.extend(accepted);
        }
        Ok(())
    }

    fn emit(&self, has_next: bool) -> Result<GraphQLResponse> {
        let ctx = DecodeContext::new(&self.registry, &self.variables)
            .with_options(self.options)
            .with_defer_mode(DeferMode::Partial(&self.delivered));
        let data = match &self.raw_data {
            None => None,
            Some(raw) => {
                let mut reader = MapJsonReader::with_options(raw, self.options.reader);
                Some(self.operation.decode_data(&mut reader, &ctx)?)
            },
        };
        Ok(GraphQLResponse {
            data,
            errors: self.errors.clone(),
            extensions: self.extensions.clone(),
            has_next,
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.state == MergerState::Terminal
    }

    pub fn state(&self) -> MergerState {
        self.state
    }

    fn transition(&mut self, state: MergerState) {
        if self.state != state {
            log::debug!(
                "Incremental response for `{}`: {:?} -> {:?}",
                self.operation.name(),
                self.state,
                state,
            );
            self.state = state;
        }
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }
}
