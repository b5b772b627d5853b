use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

pub const DEFAULT_INDENT: usize = 2;

/// Text that is not strict JSON. Carries the location serde_json reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseFailure {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl From<serde_json::Error> for ParseFailure {
    fn from(err: serde_json::Error) -> Self {
        Self {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

pub fn parse(text: &str) -> Result<Value, ParseFailure> {
    Ok(serde_json::from_str(text)?)
}

/// Pretty form with `indent` spaces per level. Formatting of the text that
/// produced `value` is not preserved.
pub fn serialize(value: &Value, indent: usize) -> String {
    let unit = " ".repeat(indent);
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(unit.as_bytes());
    let mut serializer = Serializer::with_formatter(&mut out, formatter);
    if value.serialize(&mut serializer).is_err() {
        return value.to_string();
    }
    String::from_utf8(out).unwrap_or_else(|_| value.to_string())
}
