//! Tagged SQL values for default literals and data re-encoding.
//!
//! Conversion rules in the value registry pattern-match over this closed set
//! instead of inspecting untyped values at runtime.

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::dialect::{DialectDescriptor, DialectKind};

/// A single SQL value with a strongly typed payload.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Bytes(Vec<u8>),
    Timestamp(NaiveDateTime),
}

impl SqlValue {
    /// Check if value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Short name of the variant, for error messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Integer(_) => "integer",
            SqlValue::Float(_) => "float",
            SqlValue::Text(_) => "text",
            SqlValue::Boolean(_) => "boolean",
            SqlValue::Bytes(_) => "bytes",
            SqlValue::Timestamp(_) => "timestamp",
        }
    }

    /// Parse a SQL literal as written in a DEFAULT clause.
    ///
    /// Returns `None` for anything that is not a plain literal (function
    /// calls, expressions, identifiers).
    pub fn from_literal(text: &str) -> Option<SqlValue> {
        let text = strip_wrapping_parens(text.trim());
        if text.is_empty() {
            return None;
        }

        let upper = text.to_ascii_uppercase();
        match upper.as_str() {
            "NULL" => return Some(SqlValue::Null),
            "TRUE" => return Some(SqlValue::Boolean(true)),
            "FALSE" => return Some(SqlValue::Boolean(false)),
            _ => {}
        }

        if let Ok(n) = text.parse::<i64>() {
            return Some(SqlValue::Integer(n));
        }
        if text.contains(['.', 'e', 'E']) && !text.contains('\'') {
            if let Ok(f) = text.parse::<f64>() {
                return Some(SqlValue::Float(f));
            }
        }

        // 0xCAFE (SQL Server, MySQL)
        if let Some(hex) = upper.strip_prefix("0X") {
            return decode_hex(hex).map(SqlValue::Bytes);
        }

        let (prefix, body) = split_string_literal(text)?;
        match prefix.to_ascii_uppercase().as_str() {
            "X" => decode_hex(&body).map(SqlValue::Bytes),
            "B" => i64::from_str_radix(&body, 2).ok().map(SqlValue::Integer),
            _ => Some(SqlValue::Text(body)),
        }
    }

    /// Render the value as a literal for the given dialect.
    pub fn to_literal(&self, dialect: &DialectDescriptor) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Integer(n) => n.to_string(),
            SqlValue::Float(f) => {
                let s = f.to_string();
                if s.contains(['.', 'e', 'E']) {
                    s
                } else {
                    format!("{}.0", s)
                }
            }
            SqlValue::Text(s) => quote_string(s),
            SqlValue::Boolean(b) => {
                let literal = match (dialect.supports_boolean_literals, *b) {
                    (true, true) => "TRUE",
                    (true, false) => "FALSE",
                    (false, true) => "1",
                    (false, false) => "0",
                };
                literal.to_string()
            }
            SqlValue::Bytes(bytes) => {
                let hex = encode_hex(bytes);
                match dialect.kind {
                    DialectKind::Postgres => format!("'\\x{}'", hex.to_lowercase()),
                    DialectKind::Sqlserver => format!("0x{}", hex),
                    DialectKind::Oracle => format!("HEXTORAW('{}')", hex),
                    DialectKind::Mysql | DialectKind::Sqlite => format!("X'{}'", hex),
                }
            }
            SqlValue::Timestamp(ts) => {
                let text = format_timestamp(ts);
                match dialect.kind {
                    DialectKind::Oracle => format!("TIMESTAMP '{}'", text),
                    _ => format!("'{}'", text),
                }
            }
        }
    }

    /// Interpret the value as a boolean (0/1, true/false, 't'/'f', 'y'/'n').
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Boolean(b) => Some(*b),
            SqlValue::Integer(n) => Some(*n != 0),
            SqlValue::Float(f) => Some(*f != 0.0),
            SqlValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "t" | "true" | "y" | "yes" | "on" => Some(true),
                "0" | "f" | "false" | "n" | "no" | "off" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Interpret the value as a timestamp. Dates are taken at midnight.
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            SqlValue::Timestamp(ts) => Some(*ts),
            SqlValue::Text(s) => parse_timestamp(s.trim()),
            _ => None,
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Boolean(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

/// Quote a string literal, doubling embedded single quotes.
pub fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Format a timestamp, keeping fractional seconds only when present.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    if ts.nanosecond() == 0 {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }
}

/// Parse `YYYY-MM-DD[ T]HH:MM:SS[.fff]` or a bare date.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Remove parentheses that wrap the entire text, e.g. `((0))` -> `0`.
pub fn strip_wrapping_parens(mut text: &str) -> &str {
    loop {
        let trimmed = text.trim();
        if !(trimmed.starts_with('(') && trimmed.ends_with(')')) {
            return trimmed;
        }
        let inner = &trimmed[1..trimmed.len() - 1];
        // The opening paren must close at the very end.
        let mut depth = 0i32;
        let mut in_quote = false;
        for ch in inner.chars() {
            match ch {
                '\'' => in_quote = !in_quote,
                '(' if !in_quote => depth += 1,
                ')' if !in_quote => {
                    depth -= 1;
                    if depth < 0 {
                        return trimmed;
                    }
                }
                _ => {}
            }
        }
        if depth != 0 {
            return trimmed;
        }
        text = inner;
    }
}

/// Split a (possibly prefixed) single-quoted literal into prefix and unescaped body.
///
/// Accepts `'abc'`, `N'abc'`, `E'abc'`, `X'CAFE'`, `b'101'` and MySQL
/// introducers such as `_utf8mb4'abc'`. A trailing PostgreSQL cast
/// (`'abc'::character varying`) is ignored.
fn split_string_literal(text: &str) -> Option<(String, String)> {
    let quote_pos = text.find('\'')?;
    let prefix = &text[..quote_pos];
    if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    let rest = &text[quote_pos + 1..];
    let mut body = String::new();
    let mut chars = rest.char_indices().peekable();
    let mut end = None;
    while let Some((i, ch)) = chars.next() {
        if ch == '\'' {
            if matches!(chars.peek(), Some((_, '\''))) {
                body.push('\'');
                chars.next();
            } else {
                end = Some(i);
                break;
            }
        } else {
            body.push(ch);
        }
    }

    let end = end?;
    let tail = rest[end + 1..].trim();
    if !tail.is_empty() && !tail.starts_with("::") {
        return None;
    }
    Some((prefix.to_string(), body))
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}

fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}
