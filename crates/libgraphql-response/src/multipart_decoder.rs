use crate::IncrementalError;
use memchr::memmem;

type Result<T> = std::result::Result<T, IncrementalError>;

/// Splits a `multipart/mixed` body into the JSON documents of its parts.
///
/// Chunks may split delimiters, headers, or bodies anywhere; bytes are
/// buffered until a whole part is available. Parts whose body is empty or
/// `{}` (heartbeats) are dropped. Anything after the close delimiter is
/// ignored.
#[derive(Debug)]
pub struct MultipartDecoder {
    buffer: Vec<u8>,
    closed: bool,
    /// `--` followed by the boundary.
    delimiter: Vec<u8>,
    /// CRLF followed by `delimiter`: how every delimiter after the first
    /// one appears.
    separator: Vec<u8>,
    started: bool,
}
impl MultipartDecoder {
    pub fn new(boundary: &str) -> Self {
        let delimiter = [b"--".as_slice(), boundary.as_bytes()].concat();
        let separator = [b"\r\n".as_slice(), delimiter.as_slice()].concat();
        Self {
            buffer: vec![],
            closed: false,
            delimiter,
            separator,
            started: false,
        }
    }

    /// Call once the byte source is exhausted. Returns the final part if the
    /// body ended without a close delimiter.
    pub fn finish(&mut self) -> Result<Vec<String>> {
        let remaining = std::mem::take(&mut self.buffer);
        if self.closed {
            return Ok(vec![]);
        }
        self.closed = true;
        if !self.started {
            if remaining.iter().all(u8::is_ascii_whitespace) {
                return Ok(vec![]);
            }
            return Err(IncrementalError::MalformedMultipart {
                message: "no boundary delimiter found in the body".to_string(),
            });
        }
        let end = memmem::find(&remaining, &self.separator).unwrap_or(remaining.len());
        Ok(part_body(&remaining[..end])?.into_iter().collect())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Buffers `chunk` and returns the bodies of any parts it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>> {
        if self.closed {
            return Ok(vec![]);
        }
        self.buffer.extend_from_slice(chunk);

        let mut bodies = vec![];
        loop {
            let needle = if self.started {
                &self.separator
            } else {
                &self.delimiter
            };
            let Some(position) = memmem::find(&self.buffer, needle) else {
                break;
            };
            let after = position + needle.len();
            // The two bytes after a delimiter tell a close delimiter apart.
            if self.buffer.len() < after + 2 {
                break;
            }

            if self.started {
                bodies.extend(part_body(&self.buffer[..position])?);
            }
            self.started = true;
            if &self.buffer[after..after + 2] == b"--" {
                log::trace!("Reached the multipart close delimiter.");
                self.closed = true;
                self.buffer.clear();
                break;
            }
            self.buffer.drain(..after);
        }
        Ok(bodies)
    }
}
impl Default for MultipartDecoder {
    fn default() -> Self {
        Self::new("-")
    }
}

/// The JSON body of one part: everything after the header block, trimmed.
/// Returns `None` for heartbeat parts.
fn part_body(part: &[u8]) -> Result<Option<String>> {
    let text = std::str::from_utf8(part).map_err(|err| IncrementalError::MalformedMultipart {
        message: format!("part is not valid UTF-8: {err}"),
    })?;
    // The rest of the delimiter line: optional padding, then CRLF.
    let text = text.trim_start_matches([' ', '\t']);
    let text = text.strip_prefix("\r\n").unwrap_or(text);

    let body = if let Some(body) = text.strip_prefix("\r\n") {
        body
    } else if let Some(header_end) = text.find("\r\n\r\n") {
        &text[header_end + 4..]
    } else if text.trim_start().starts_with('{') {
        text
    } else if text.trim().is_empty() {
        ""
    } else {
        return Err(IncrementalError::MalformedMultipart {
            message: "part headers are not followed by a blank line".to_string(),
        });
    };

    let body = body.trim();
    if body.is_empty() || body == "{}" {
        return Ok(None);
    }
    Ok(Some(body.to_string()))
}
