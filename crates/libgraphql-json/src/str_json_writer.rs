use crate::JsonError;
use crate::JsonNumber;
use crate::JsonWriter;
use crate::Result;
use inherent::inherent;
use smallvec::SmallVec;
use std::fmt::Write;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Scope {
    EmptyDocument,
    NonEmptyDocument,
    EmptyArray,
    NonEmptyArray,
    EmptyObject,
    DanglingName,
    NonEmptyObject,
}

/// A [`JsonWriter`] that produces compact JSON text.
#[derive(Debug)]
pub struct StrJsonWriter {
    out: String,
    scopes: SmallVec<[Scope; 32]>,
}

impl StrJsonWriter {
    /// Returns the written text. Fails if the document is empty or has
    /// containers that were never closed.
    pub fn into_string(self) -> Result<String> {
        if self.scopes.as_slice() != [Scope::NonEmptyDocument] {
            return Err(JsonError::invalid_write("incomplete JSON document"));
        }
        Ok(self.out)
    }

    pub fn new() -> Self {
        let mut scopes = SmallVec::new();
        scopes.push(Scope::EmptyDocument);
        Self {
            out: String::new(),
            scopes,
        }
    }

    fn before_value(&mut self) -> Result<()> {
        let top = self.scopes.last_mut().ok_or_else(|| {
            JsonError::invalid_write("writer has no open scope")
        })?;
        match *top {
            Scope::EmptyDocument => *top = Scope::NonEmptyDocument,
            Scope::EmptyArray => *top = Scope::NonEmptyArray,
            Scope::NonEmptyArray => self.out.push(','),
            Scope::DanglingName => *top = Scope::NonEmptyObject,
            Scope::NonEmptyDocument => {
                return Err(JsonError::invalid_write("JSON documents have a single top-level value"));
            },
            Scope::EmptyObject | Scope::NonEmptyObject => {
                return Err(JsonError::invalid_write("object members need a name before their value"));
            },
        }
        Ok(())
    }

    fn close(&mut self, empty: Scope, non_empty: Scope, closer: char) -> Result<()> {
        match self.scopes.last() {
            Some(scope) if *scope == empty || *scope == non_empty => {
                self.scopes.pop();
                self.out.push(closer);
                Ok(())
            },
            _ => Err(JsonError::invalid_write(format!("unbalanced `{closer}`"))),
        }
    }

    fn open(&mut self, scope: Scope, opener: char) -> Result<()> {
        self.before_value()?;
        self.scopes.push(scope);
        self.out.push(opener);
        Ok(())
    }
}
impl Default for StrJsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[inherent]
impl JsonWriter for StrJsonWriter {
    pub fn begin_array(&mut self) -> Result<()> {
        self.open(Scope::EmptyArray, '[')
    }

    pub fn begin_object(&mut self) -> Result<()> {
        self.open(Scope::EmptyObject, '{')
    }

    pub fn end_array(&mut self) -> Result<()> {
        self.close(Scope::EmptyArray, Scope::NonEmptyArray, ']')
    }

    pub fn end_object(&mut self) -> Result<()> {
        self.close(Scope::EmptyObject, Scope::NonEmptyObject, '}')
    }

    pub fn name(&mut self, name: &str) -> Result<()> {
        match self.scopes.last_mut() {
            Some(top @ Scope::EmptyObject) => *top = Scope::DanglingName,
            Some(top @ Scope::NonEmptyObject) => {
                *top = Scope::DanglingName;
                self.out.push(',');
            },
            _ => return Err(JsonError::invalid_write(format!("name `{name}` written outside of an object"))),
        }
        write_escaped(&mut self.out, name);
        self.out.push(':');
        Ok(())
    }

    pub fn value_bool(&mut self, value: bool) -> Result<()> {
        self.before_value()?;
        self.out.push_str(if value { "true" } else { "false" });
        Ok(())
    }

    pub fn value_null(&mut self) -> Result<()> {
        self.before_value()?;
        self.out.push_str("null");
        Ok(())
    }

    pub fn value_number(&mut self, value: &JsonNumber) -> Result<()> {
        self.before_value()?;
        self.out.push_str(value.as_str());
        Ok(())
    }

    pub fn value_string(&mut self, value: &str) -> Result<()> {
        self.before_value()?;
        write_escaped(&mut self.out, value);
        Ok(())
    }
}

fn write_escaped(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            },
            c => out.push(c),
        }
    }
    out.push('"');
}
