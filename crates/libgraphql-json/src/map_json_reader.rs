use crate::name_selector::NameSelector;
use crate::JsonError;
use crate::JsonNumber;
use crate::JsonObject;
use crate::JsonPath;
use crate::JsonReader;
use crate::JsonReaderOptions;
use crate::JsonTokenKind;
use crate::JsonValue;
use crate::Result;
use inherent::inherent;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug)]
enum Frame<'a> {
    Array {
        items: &'a [JsonValue],
        next: usize,
    },
    Object {
        entries: &'a JsonObject,
        /// Index of the member currently being read.
        next: usize,
        /// Whether the name of the member at `next` was already consumed.
        name_consumed: bool,
        /// Index of the member whose name was consumed last. Stays set after
        /// its value is read so errors still name it.
        named: Option<usize>,
    },
}

/// A [`JsonReader`] over an already-materialized [`JsonValue`].
///
/// Construction is O(1) and borrows the tree, so a fresh reader can be made
/// for any subtree (e.g. to re-decode a patched response) without copying.
pub struct MapJsonReader<'a> {
    base_path: JsonPath,
    frames: SmallVec<[Frame<'a>; 32]>,
    options: JsonReaderOptions,
    root: &'a JsonValue,
    root_consumed: bool,
    selector: NameSelector,
}

impl<'a> MapJsonReader<'a> {
    pub fn new(root: &'a JsonValue) -> Self {
        Self::with_options(root, JsonReaderOptions::default())
    }

    pub fn with_options(root: &'a JsonValue, options: JsonReaderOptions) -> Self {
        Self {
            base_path: JsonPath::new(),
            frames: SmallVec::new(),
            options,
            root,
            root_consumed: false,
            selector: NameSelector::default(),
        }
    }

    /// Reports every [`JsonReader::path`] (and every error path) relative to
    /// `base_path`, for readers over a subtree of a larger document.
    pub fn with_base_path(mut self, base_path: JsonPath) -> Self {
        self.base_path = base_path;
        self
    }

    /// Marks the pending value as consumed.
    fn advance(&mut self) {
        match self.frames.last_mut() {
            None => self.root_consumed = true,
            Some(Frame::Array { next, .. }) => *next += 1,
            Some(Frame::Object {
                next,
                name_consumed,
                ..
            }) => {
                *next += 1;
                *name_consumed = false;
            },
        }
    }

    fn peek_kind(&self) -> JsonTokenKind {
        match self.frames.last() {
            None if self.root_consumed => JsonTokenKind::EndDocument,
            None => self.root.kind(),
            Some(Frame::Array { items, next }) => items
                .get(*next)
                .map(JsonValue::kind)
                .unwrap_or(JsonTokenKind::EndArray),
            Some(Frame::Object {
                entries,
                next,
                name_consumed,
                ..
            }) => match entries.get_index(*next) {
                None => JsonTokenKind::EndObject,
                Some(_) if !*name_consumed => JsonTokenKind::Name,
                Some((_, value)) => value.kind(),
            },
        }
    }

    fn mark_name_consumed(&mut self) {
        if let Some(Frame::Object {
            next,
            name_consumed,
            named,
            ..
        }) = self.frames.last_mut()
        {
            *name_consumed = true;
            *named = Some(*next);
        }
    }

    /// The value the reader is positioned at, if it is positioned at one.
    fn pending_value(&self) -> Option<&'a JsonValue> {
        match self.frames.last() {
            None => (!self.root_consumed).then_some(self.root),
            Some(Frame::Array { items, next }) => items.get(*next),
            Some(Frame::Object {
                entries,
                next,
                name_consumed: true,
                ..
            }) => entries.get_index(*next).map(|(_, value)| value),
            Some(Frame::Object { .. }) => None,
        }
    }

    /// The member name the reader is positioned at, if any.
    fn pending_name(&self) -> Option<&'a str> {
        match self.frames.last() {
            Some(Frame::Object {
                entries,
                next,
                name_consumed: false,
                ..
            }) => entries.get_index(*next).map(|(key, _)| key.as_str()),
            _ => None,
        }
    }

    fn push_frame(&mut self, frame: Frame<'a>) -> Result<()> {
        if self.frames.len() >= self.options.max_depth() {
            return Err(JsonError::TooDeeplyNested {
                max_depth: self.options.max_depth(),
                path: self.path(),
            });
        }
        self.frames.push(frame);
        Ok(())
    }

    fn take_value(&mut self, expected: JsonTokenKind) -> Result<&'a JsonValue> {
        match self.pending_value() {
            Some(value) if value.kind() == expected => {
                self.advance();
                Ok(value)
            },
            _ => Err(self.unexpected(expected.as_str())),
        }
    }

    fn unexpected(&self, expected: &'static str) -> JsonError {
        JsonError::UnexpectedToken {
            expected,
            found: self.peek_kind(),
            path: self.path(),
        }
    }
}

#[inherent]
impl<'a> JsonReader for MapJsonReader<'a> {
    pub fn begin_array(&mut self) -> Result<()> {
        match self.pending_value() {
            Some(JsonValue::List(items)) => self.push_frame(Frame::Array { items, next: 0 }),
            _ => Err(self.unexpected(JsonTokenKind::BeginArray.as_str())),
        }
    }

    pub fn begin_object(&mut self) -> Result<()> {
        match self.pending_value() {
            Some(JsonValue::Object(entries)) => {
                self.push_frame(Frame::Object {
                    entries,
                    next: 0,
                    name_consumed: false,
                    named: None,
                })?;
                self.selector.push_object();
                Ok(())
            },
            _ => Err(self.unexpected(JsonTokenKind::BeginObject.as_str())),
        }
    }

    pub fn end_array(&mut self) -> Result<()> {
        match self.frames.last().copied() {
            Some(Frame::Array { items, next }) if next >= items.len() => {
                self.frames.pop();
                self.advance();
                Ok(())
            },
            Some(Frame::Array { .. }) => Err(self.unexpected(JsonTokenKind::EndArray.as_str())),
            _ => Err(JsonError::UnbalancedContainer {
                operation: "end_array",
                path: self.path(),
            }),
        }
    }

    pub fn end_object(&mut self) -> Result<()> {
        match self.frames.last().copied() {
            Some(Frame::Object { .. }) => {
                self.frames.pop();
                self.selector.pop_object();
                self.advance();
                Ok(())
            },
            _ => Err(JsonError::UnbalancedContainer {
                operation: "end_object",
                path: self.path(),
            }),
        }
    }

    pub fn has_next(&mut self) -> Result<bool> {
        Ok(!matches!(
            self.peek_kind(),
            JsonTokenKind::EndArray | JsonTokenKind::EndObject | JsonTokenKind::EndDocument,
        ))
    }

    pub fn next_boolean(&mut self) -> Result<bool> {
        match self.take_value(JsonTokenKind::Boolean)? {
            JsonValue::Bool(value) => Ok(*value),
            _ => Err(self.unexpected(JsonTokenKind::Boolean.as_str())),
        }
    }

    pub fn next_name(&mut self) -> Result<String> {
        let name = self
            .pending_name()
            .ok_or_else(|| self.unexpected(JsonTokenKind::Name.as_str()))?;
        self.mark_name_consumed();
        Ok(name.to_string())
    }

    pub fn next_null(&mut self) -> Result<()> {
        self.take_value(JsonTokenKind::Null).map(|_| ())
    }

    pub fn next_number(&mut self) -> Result<JsonNumber> {
        match self.take_value(JsonTokenKind::Number)? {
            JsonValue::Number(number) => Ok(number.clone()),
            _ => Err(self.unexpected(JsonTokenKind::Number.as_str())),
        }
    }

    pub fn next_string(&mut self) -> Result<String> {
        match self.take_value(JsonTokenKind::String)? {
            JsonValue::String(value) => Ok(value.clone()),
            _ => Err(self.unexpected(JsonTokenKind::String.as_str())),
        }
    }

    pub fn path(&self) -> JsonPath {
        let mut path = self.base_path.clone();
        for frame in self.frames.iter() {
            match frame {
                Frame::Array { next, .. } => path.push(*next),
                Frame::Object {
                    entries,
                    named: Some(index),
                    ..
                } => {
                    if let Some((key, _)) = entries.get_index(*index) {
                        path.push(key.as_str());
                    }
                },
                Frame::Object { named: None, .. } => (),
            }
        }
        path
    }

    pub fn value_path(&self) -> JsonPath {
        let mut path = self.path();
        if let Some(Frame::Array { next, .. }) = self.frames.last()
            && *next > 0
        {
            path.pop();
            path.push(*next - 1);
        }
        path
    }

    pub fn peek(&mut self) -> Result<JsonTokenKind> {
        Ok(self.peek_kind())
    }

    pub fn peek_name(&mut self) -> Result<Option<String>> {
        Ok(self.pending_name().map(str::to_string))
    }

    pub fn read_json_value(&mut self) -> Result<JsonValue> {
        match self.pending_value() {
            Some(value) => {
                self.advance();
                Ok(value.clone())
            },
            None => Err(self.unexpected("a value")),
        }
    }

    pub fn select_name<S: AsRef<str>>(&mut self, candidates: &[S]) -> Result<Option<usize>> {
        if candidates.is_empty() {
            return Ok(None);
        }
        loop {
            match self.peek_kind() {
                JsonTokenKind::EndObject => return Ok(None),
                JsonTokenKind::Name => {
                    let name = self
                        .pending_name()
                        .ok_or_else(|| self.unexpected(JsonTokenKind::Name.as_str()))?;
                    self.mark_name_consumed();
                    if let Some(index) = self.selector.find(candidates, name) {
                        return Ok(Some(index));
                    }
                    self.advance();
                },
                _ => return Err(self.unexpected(JsonTokenKind::Name.as_str())),
            }
        }
    }

    pub fn skip_value(&mut self) -> Result<()> {
        match self.pending_value() {
            Some(_) => {
                self.advance();
                Ok(())
            },
            None => Err(self.unexpected("a value")),
        }
    }
}
