/// A JSON number, kept as the raw text it was written as.
///
/// Keeping the source text (rather than eagerly converting to `i64` or
/// `f64`) means custom scalars such as arbitrary-precision decimals see
/// exactly what the server sent, and integers never lose precision by
/// round-tripping through a float.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct JsonNumber {
    raw: String,
}
impl JsonNumber {
    pub fn as_f64(&self) -> Option<f64> {
        self.raw.parse::<f64>().ok().filter(|value| value.is_finite())
    }

    pub fn as_i32(&self) -> Option<i32> {
        self.raw.parse().ok()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.raw.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    /// Builds a number from a finite `f64`. Returns `None` for `NaN` and the
    /// infinities, which JSON cannot represent.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let mut raw = value.to_string();
        if !raw.contains(['.', 'e', 'E']) {
            raw.push_str(".0");
        }
        Some(Self { raw })
    }

    /// `true` if the raw text has no fraction or exponent part.
    pub fn is_integer(&self) -> bool {
        !self.raw.contains(['.', 'e', 'E'])
    }

    /// Validates `raw` against the JSON number grammar.
    pub fn parse(raw: &str) -> Option<Self> {
        (scan_number(raw.as_bytes(), 0) == Some(raw.len())).then(|| Self {
            raw: raw.to_string(),
        })
    }

    pub(crate) fn from_validated(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
        }
    }
}
impl From<i32> for JsonNumber {
    fn from(value: i32) -> Self {
        Self {
            raw: value.to_string(),
        }
    }
}
impl From<i64> for JsonNumber {
    fn from(value: i64) -> Self {
        Self {
            raw: value.to_string(),
        }
    }
}
impl From<u64> for JsonNumber {
    fn from(value: u64) -> Self {
        Self {
            raw: value.to_string(),
        }
    }
}
impl std::fmt::Display for JsonNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.raw.as_str())
    }
}

/// Scans one JSON number starting at `start`, returning the offset just past
/// its last byte, or `None` if the bytes there do not form a number.
pub(crate) fn scan_number(bytes: &[u8], start: usize) -> Option<usize> {
    let mut pos = start;
    if bytes.get(pos) == Some(&b'-') {
        pos += 1;
    }
    match bytes.get(pos) {
        Some(b'0') => pos += 1,
        Some(b'1'..=b'9') => pos = skip_digits(bytes, pos + 1),
        _ => return None,
    }
    if bytes.get(pos) == Some(&b'.') {
        let digits_start = pos + 1;
        pos = skip_digits(bytes, digits_start);
        if pos == digits_start {
            return None;
        }
    }
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let digits_start = pos;
        pos = skip_digits(bytes, digits_start);
        if pos == digits_start {
            return None;
        }
    }
    Some(pos)
}

fn skip_digits(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    pos
}
