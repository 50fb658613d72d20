//! Streaming lexer that exposes JSON text through the [`JsonReader`] API.

use crate::json_number::scan_number;
use crate::name_selector::NameSelector;
use crate::JsonError;
use crate::JsonNumber;
use crate::JsonPath;
use crate::JsonReader;
use crate::JsonReaderOptions;
use crate::JsonTokenKind;
use crate::Result;
use inherent::inherent;
use memchr::memchr2;
use smallvec::SmallVec;
use std::borrow::Cow;

/// Lexical state of one open container (or of the document itself).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Scope {
    EmptyDocument,
    NonEmptyDocument,
    EmptyArray,
    NonEmptyArray,
    EmptyObject,
    /// A member name was read; the `:` and the value are next.
    DanglingName,
    NonEmptyObject,
}

/// What a container contributes to [`StrJsonReader::path()`].
#[derive(Clone, Copy, Debug)]
enum PathSlot {
    Document,
    Index(usize),
    /// Byte range (and escape flag) of the most recently read member name.
    Name(Option<SourceStr>),
}

/// A string token's contents as a byte range into the source, excluding
/// the quotes. Escapes are only processed when the string is actually read.
#[derive(Clone, Copy, Debug)]
struct SourceStr {
    start: usize,
    end: usize,
    escaped: bool,
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    path: PathSlot,
    scope: Scope,
}

/// A token that has been lexed but not yet consumed.
#[derive(Clone, Copy, Debug)]
enum Peeked {
    BeginArray,
    BeginObject,
    EndArray,
    EndDocument,
    EndObject,
    False,
    Name(SourceStr),
    Null,
    Number { start: usize, end: usize },
    String(SourceStr),
    True,
}
impl Peeked {
    fn kind(&self) -> JsonTokenKind {
        match self {
            Self::BeginArray => JsonTokenKind::BeginArray,
            Self::BeginObject => JsonTokenKind::BeginObject,
            Self::EndArray => JsonTokenKind::EndArray,
            Self::EndDocument => JsonTokenKind::EndDocument,
            Self::EndObject => JsonTokenKind::EndObject,
            Self::False | Self::True => JsonTokenKind::Boolean,
            Self::Name(_) => JsonTokenKind::Name,
            Self::Null => JsonTokenKind::Null,
            Self::Number { .. } => JsonTokenKind::Number,
            Self::String(_) => JsonTokenKind::String,
        }
    }
}

/// A [`JsonReader`] that lexes JSON text on demand.
///
/// At most one token is buffered at a time; the document is never
/// materialized. Strings without escape sequences are handed out without
/// copying until the caller asks for an owned `String`.
///
/// Member-name lookups via [`select_name()`](Self::select_name) compare the
/// raw source bytes against the candidates, so matching a name never
/// allocates unless the name contains escapes.
pub struct StrJsonReader<'src> {
    frames: SmallVec<[Frame; 32]>,
    options: JsonReaderOptions,
    peeked: Option<Peeked>,
    pos: usize,
    selector: NameSelector,
    src: &'src str,
}

impl<'src> StrJsonReader<'src> {
    pub fn new(src: &'src str) -> Self {
        Self::with_options(src, JsonReaderOptions::default())
    }

    pub fn with_options(src: &'src str, options: JsonReaderOptions) -> Self {
        let mut frames = SmallVec::new();
        frames.push(Frame {
            path: PathSlot::Document,
            scope: Scope::EmptyDocument,
        });
        Self {
            frames,
            options,
            peeked: None,
            pos: 0,
            selector: NameSelector::default(),
            src,
        }
    }

    /// Reads the next string value without copying it when possible.
    pub fn next_str(&mut self) -> Result<Cow<'src, str>> {
        match self.do_peek()? {
            Peeked::String(source_str) => {
                let value = self.decode_str(source_str)?;
                self.peeked = None;
                self.after_value();
                Ok(value)
            },
            other => Err(self.unexpected(JsonTokenKind::String.as_str(), other)),
        }
    }

    fn after_value(&mut self) {
        if let Some(Frame {
            path: PathSlot::Index(index),
            ..
        }) = self.frames.last_mut()
        {
            *index += 1;
        }
    }

    fn consume_literal(&mut self, rest: &[u8]) -> Result<()> {
        let bytes = self.src.as_bytes();
        if bytes[self.pos..].starts_with(rest) {
            self.pos += rest.len();
            Ok(())
        } else {
            Err(self.syntax_error("invalid literal"))
        }
    }

    fn decode_str(&self, source_str: SourceStr) -> Result<Cow<'src, str>> {
        let src: &'src str = self.src;
        let raw = &src[source_str.start..source_str.end];
        if source_str.escaped {
            unescape(raw, source_str.start).map(Cow::Owned)
        } else {
            Ok(Cow::Borrowed(raw))
        }
    }

    fn do_peek(&mut self) -> Result<Peeked> {
        if let Some(peeked) = self.peeked {
            return Ok(peeked);
        }
        let peeked = self.lex_next()?;
        self.peeked = Some(peeked);
        Ok(peeked)
    }

    fn lex_next(&mut self) -> Result<Peeked> {
        let scope = self.top_scope();
        match scope {
            Scope::EmptyArray => {
                self.set_top_scope(Scope::NonEmptyArray);
                if self.peek_non_whitespace() == Some(b']') {
                    self.pos += 1;
                    return Ok(Peeked::EndArray);
                }
            },
            Scope::NonEmptyArray => match self.next_non_whitespace() {
                Some(b']') => return Ok(Peeked::EndArray),
                Some(b',') => (),
                _ => return Err(self.syntax_error("expected `,` or `]`")),
            },
            Scope::EmptyObject | Scope::NonEmptyObject => {
                self.set_top_scope(Scope::DanglingName);
                if scope == Scope::NonEmptyObject {
                    match self.next_non_whitespace() {
                        Some(b'}') => return Ok(Peeked::EndObject),
                        Some(b',') => (),
                        _ => return Err(self.syntax_error("expected `,` or `}`")),
                    }
                }
                return match self.next_non_whitespace() {
                    Some(b'"') => Ok(Peeked::Name(self.lex_string()?)),
                    Some(b'}') if scope == Scope::EmptyObject => Ok(Peeked::EndObject),
                    _ => Err(self.syntax_error("expected a member name")),
                };
            },
            Scope::DanglingName => {
                self.set_top_scope(Scope::NonEmptyObject);
                if self.next_non_whitespace() != Some(b':') {
                    return Err(self.syntax_error("expected `:`"));
                }
            },
            Scope::EmptyDocument => self.set_top_scope(Scope::NonEmptyDocument),
            Scope::NonEmptyDocument => {
                return match self.peek_non_whitespace() {
                    None => Ok(Peeked::EndDocument),
                    Some(_) => Err(self.syntax_error("unexpected data after the document")),
                };
            },
        }

        match self.next_non_whitespace() {
            Some(b'{') => Ok(Peeked::BeginObject),
            Some(b'[') => Ok(Peeked::BeginArray),
            Some(b'"') => Ok(Peeked::String(self.lex_string()?)),
            Some(b't') => self.consume_literal(b"rue").map(|_| Peeked::True),
            Some(b'f') => self.consume_literal(b"alse").map(|_| Peeked::False),
            Some(b'n') => self.consume_literal(b"ull").map(|_| Peeked::Null),
            Some(b'-' | b'0'..=b'9') => {
                let start = self.pos - 1;
                match scan_number(self.src.as_bytes(), start) {
                    Some(end) => {
                        self.pos = end;
                        Ok(Peeked::Number { start, end })
                    },
                    None => Err(self.syntax_error("malformed number")),
                }
            },
            Some(_) => Err(self.syntax_error("expected a value")),
            None => Err(self.syntax_error("unexpected end of input")),
        }
    }

    /// Scans a string whose opening quote was just consumed.
    fn lex_string(&mut self) -> Result<SourceStr> {
        let bytes = self.src.as_bytes();
        let start = self.pos;
        let mut escaped = false;
        let mut cursor = start;
        loop {
            let Some(offset) = memchr2(b'"', b'\\', &bytes[cursor..]) else {
                return Err(JsonError::Syntax {
                    message: "unterminated string".to_string(),
                    offset: start - 1,
                });
            };
            let at = cursor + offset;
            // U+0000 through U+001F must be escaped.
            if let Some(control) = bytes[cursor..at].iter().position(|byte| *byte < 0x20) {
                return Err(JsonError::Syntax {
                    message: "unescaped control character in string".to_string(),
                    offset: cursor + control,
                });
            }
            if bytes[at] == b'"' {
                self.pos = at + 1;
                return Ok(SourceStr {
                    start,
                    end: at,
                    escaped,
                });
            }
            escaped = true;
            cursor = at + 2;
            if cursor > bytes.len() {
                return Err(JsonError::Syntax {
                    message: "unterminated string".to_string(),
                    offset: start - 1,
                });
            }
        }
    }

    fn next_non_whitespace(&mut self) -> Option<u8> {
        let byte = self.peek_non_whitespace()?;
        self.pos += 1;
        Some(byte)
    }

    fn peek_non_whitespace(&mut self) -> Option<u8> {
        let bytes = self.src.as_bytes();
        while let Some(&byte) = bytes.get(self.pos) {
            if matches!(byte, b' ' | b'\t' | b'\n' | b'\r') {
                self.pos += 1;
            } else {
                return Some(byte);
            }
        }
        None
    }

    fn push_frame(&mut self, frame: Frame) -> Result<()> {
        if self.frames.len() > self.options.max_depth() {
            return Err(JsonError::TooDeeplyNested {
                max_depth: self.options.max_depth(),
                path: self.path(),
            });
        }
        self.frames.push(frame);
        Ok(())
    }

    fn set_name_slot(&mut self, source_str: SourceStr) {
        if let Some(frame) = self.frames.last_mut() {
            frame.path = PathSlot::Name(Some(source_str));
        }
    }

    fn set_top_scope(&mut self, scope: Scope) {
        if let Some(frame) = self.frames.last_mut() {
            frame.scope = scope;
        }
    }

    fn syntax_error(&self, message: &str) -> JsonError {
        JsonError::Syntax {
            message: message.to_string(),
            offset: self.pos,
        }
    }

    fn top_scope(&self) -> Scope {
        self.frames
            .last()
            .map(|frame| frame.scope)
            .unwrap_or(Scope::NonEmptyDocument)
    }

    fn unexpected(&self, expected: &'static str, found: Peeked) -> JsonError {
        JsonError::UnexpectedToken {
            expected,
            found: found.kind(),
            path: self.path(),
        }
    }
}

#[inherent]
impl<'src> JsonReader for StrJsonReader<'src> {
    pub fn begin_array(&mut self) -> Result<()> {
        match self.do_peek()? {
            Peeked::BeginArray => {
                self.push_frame(Frame {
                    path: PathSlot::Index(0),
                    scope: Scope::EmptyArray,
                })?;
                self.peeked = None;
                Ok(())
            },
            other => Err(self.unexpected(JsonTokenKind::BeginArray.as_str(), other)),
        }
    }

    pub fn begin_object(&mut self) -> Result<()> {
        match self.do_peek()? {
            Peeked::BeginObject => {
                self.push_frame(Frame {
                    path: PathSlot::Name(None),
                    scope: Scope::EmptyObject,
                })?;
                self.selector.push_object();
                self.peeked = None;
                Ok(())
            },
            other => Err(self.unexpected(JsonTokenKind::BeginObject.as_str(), other)),
        }
    }

    pub fn end_array(&mut self) -> Result<()> {
        if !matches!(self.top_scope(), Scope::EmptyArray | Scope::NonEmptyArray) {
            return Err(JsonError::UnbalancedContainer {
                operation: "end_array",
                path: self.path(),
            });
        }
        match self.do_peek()? {
            Peeked::EndArray => {
                self.peeked = None;
                self.frames.pop();
                self.after_value();
                Ok(())
            },
            other => Err(self.unexpected(JsonTokenKind::EndArray.as_str(), other)),
        }
    }

    pub fn end_object(&mut self) -> Result<()> {
        if !matches!(
            self.top_scope(),
            Scope::EmptyObject | Scope::DanglingName | Scope::NonEmptyObject,
        ) {
            return Err(JsonError::UnbalancedContainer {
                operation: "end_object",
                path: self.path(),
            });
        }
        loop {
            match self.do_peek()? {
                Peeked::EndObject => break,
                Peeked::Name(source_str) => {
                    self.peeked = None;
                    self.set_name_slot(source_str);
                    self.skip_value()?;
                },
                _ => self.skip_value()?,
            }
        }
        self.peeked = None;
        self.frames.pop();
        self.selector.pop_object();
        self.after_value();
        Ok(())
    }

    pub fn has_next(&mut self) -> Result<bool> {
        Ok(!matches!(
            self.do_peek()?,
            Peeked::EndArray | Peeked::EndObject | Peeked::EndDocument,
        ))
    }

    pub fn next_boolean(&mut self) -> Result<bool> {
        let value = match self.do_peek()? {
            Peeked::True => true,
            Peeked::False => false,
            other => return Err(self.unexpected(JsonTokenKind::Boolean.as_str(), other)),
        };
        self.peeked = None;
        self.after_value();
        Ok(value)
    }

    pub fn next_name(&mut self) -> Result<String> {
        match self.do_peek()? {
            Peeked::Name(source_str) => {
                let name = self.decode_str(source_str)?.into_owned();
                self.peeked = None;
                self.set_name_slot(source_str);
                Ok(name)
            },
            other => Err(self.unexpected(JsonTokenKind::Name.as_str(), other)),
        }
    }

    pub fn next_null(&mut self) -> Result<()> {
        match self.do_peek()? {
            Peeked::Null => {
                self.peeked = None;
                self.after_value();
                Ok(())
            },
            other => Err(self.unexpected(JsonTokenKind::Null.as_str(), other)),
        }
    }

    pub fn next_number(&mut self) -> Result<JsonNumber> {
        match self.do_peek()? {
            Peeked::Number { start, end } => {
                let number = JsonNumber::from_validated(&self.src[start..end]);
                self.peeked = None;
                self.after_value();
                Ok(number)
            },
            other => Err(self.unexpected(JsonTokenKind::Number.as_str(), other)),
        }
    }

    pub fn next_string(&mut self) -> Result<String> {
        self.next_str().map(Cow::into_owned)
    }

    pub fn path(&self) -> JsonPath {
        let mut path = JsonPath::new();
        for frame in self.frames.iter() {
            match frame.path {
                PathSlot::Document | PathSlot::Name(None) => (),
                PathSlot::Index(index) => path.push(index),
                PathSlot::Name(Some(source_str)) => {
                    let raw = &self.src[source_str.start..source_str.end];
                    let name = self
                        .decode_str(source_str)
                        .map(Cow::into_owned)
                        .unwrap_or_else(|_| raw.to_string());
                    path.push(name.as_str());
                },
            }
        }
        path
    }

    pub fn value_path(&self) -> JsonPath {
        let mut path = self.path();
        if let Some(Frame {
            path: PathSlot::Index(index),
            ..
        }) = self.frames.last()
            && *index > 0
        {
            path.pop();
            path.push(*index - 1);
        }
        path
    }

    pub fn peek(&mut self) -> Result<JsonTokenKind> {
        self.do_peek().map(|peeked| peeked.kind())
    }

    pub fn peek_name(&mut self) -> Result<Option<String>> {
        match self.do_peek()? {
            Peeked::Name(source_str) => Ok(Some(self.decode_str(source_str)?.into_owned())),
            _ => Ok(None),
        }
    }

    pub fn select_name<S: AsRef<str>>(&mut self, candidates: &[S]) -> Result<Option<usize>> {
        if candidates.is_empty() {
            return Ok(None);
        }
        loop {
            match self.do_peek()? {
                Peeked::Name(source_str) => {
                    self.peeked = None;
                    self.set_name_slot(source_str);
                    let name = self.decode_str(source_str)?;
                    if let Some(index) = self.selector.find(candidates, &name) {
                        return Ok(Some(index));
                    }
                    self.skip_value()?;
                },
                Peeked::EndObject => return Ok(None),
                other => return Err(self.unexpected(JsonTokenKind::Name.as_str(), other)),
            }
        }
    }

    pub fn skip_value(&mut self) -> Result<()> {
        match self.do_peek()? {
            Peeked::BeginObject => {
                self.begin_object()?;
                self.end_object()
            },
            Peeked::BeginArray => {
                self.begin_array()?;
                while self.has_next()? {
                    self.skip_value()?;
                }
                self.end_array()
            },
            Peeked::String(_)
            | Peeked::Number { .. }
            | Peeked::True
            | Peeked::False
            | Peeked::Null => {
                self.peeked = None;
                self.after_value();
                Ok(())
            },
            other => Err(self.unexpected("a value", other)),
        }
    }
}

/// Processes the escape sequences in the raw contents of a string token.
/// `offset` is the byte offset of `raw` within the source, for errors.
fn unescape(raw: &str, offset: usize) -> Result<String> {
    let invalid = |message: &str| JsonError::Syntax {
        message: message.to_string(),
        offset,
    };
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let high = read_hex4(&mut chars).ok_or_else(|| invalid("malformed \\u escape"))?;
                let code_point = match high {
                    0xD800..=0xDBFF => {
                        if chars.next() != Some('\\') || chars.next() != Some('u') {
                            return Err(invalid("unpaired surrogate in \\u escape"));
                        }
                        let low = read_hex4(&mut chars)
                            .filter(|low| (0xDC00..=0xDFFF).contains(low))
                            .ok_or_else(|| invalid("unpaired surrogate in \\u escape"))?;
                        0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                    },
                    0xDC00..=0xDFFF => return Err(invalid("unpaired surrogate in \\u escape")),
                    _ => high,
                };
                out.push(char::from_u32(code_point).ok_or_else(|| invalid("invalid code point"))?);
            },
            _ => return Err(invalid("invalid escape sequence")),
        }
    }
    Ok(out)
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> Option<u32> {
    let mut value = 0;
    for _ in 0..4 {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}
