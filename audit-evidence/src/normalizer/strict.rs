//! Stage 1: strict JSON reading of the webhook `output` string.
//!
//! Expected shape: `[{ "pageContent": "...", "metadata": { "file_name": "..." } }, ...]`.
//! Elements lacking either value (or carrying only whitespace) are skipped;
//! a content without a file name never becomes a citation.

use serde_json::Value;

use crate::errors::MalformedUpstream;

/// One `(content, file name)` pair, both trimmed and non-empty.
pub type Pair = (String, String);

/// Parses `output` as a JSON array of citation-like records.
///
/// # Errors
/// [`MalformedUpstream::InvalidJson`] if `output` does not parse,
/// [`MalformedUpstream::NotAnArray`] if it parses to anything but an array.
pub fn parse_pairs(output: &str) -> Result<Vec<Pair>, MalformedUpstream> {
    let value: Value =
        serde_json::from_str(output).map_err(|e| MalformedUpstream::InvalidJson(e.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(_) => return Err(MalformedUpstream::NotAnArray("object")),
        Value::String(_) => return Err(MalformedUpstream::NotAnArray("string")),
        Value::Number(_) => return Err(MalformedUpstream::NotAnArray("number")),
        Value::Bool(_) => return Err(MalformedUpstream::NotAnArray("bool")),
        Value::Null => return Err(MalformedUpstream::NotAnArray("null")),
    };

    Ok(items.iter().filter_map(pair_of).collect())
}

fn pair_of(item: &Value) -> Option<Pair> {
    let content = item.get("pageContent").and_then(Value::as_str)?.trim();
    let file = item
        .get("metadata")
        .and_then(|m| m.get("file_name"))
        .and_then(Value::as_str)?
        .trim();
    if content.is_empty() || file.is_empty() {
        return None;
    }
    Some((content.to_string(), file.to_string()))
}
