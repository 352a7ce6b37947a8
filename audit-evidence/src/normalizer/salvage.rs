//! Stage 2: regex salvage for `output` strings that strict JSON rejects.
//!
//! All `"pageContent": "..."` and `"file_name": "..."` values are collected
//! in order of appearance and paired by position. Positional pairing is only
//! trusted when both lists have the same length; on a mismatch nothing is
//! recovered (a `file_name` value containing `"pageContent":"` would
//! otherwise shift every later pair).

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::MalformedUpstream;
use crate::normalizer::strict::Pair;
use crate::normalizer::text::unescape;

lazy_static! {
    static ref PAGE_CONTENT: Regex =
        Regex::new(r#""pageContent"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("pageContent pattern");
    static ref FILE_NAME: Regex =
        Regex::new(r#""file_name"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("file_name pattern");
}

/// Extracts positional `(content, file name)` pairs from a malformed payload.
///
/// Values are unescaped and trimmed; pairs where either side ends up empty
/// are dropped after pairing (so they do not shift their neighbours).
///
/// # Errors
/// [`MalformedUpstream::SalvageMismatch`] when the two match counts differ.
pub fn salvage_pairs(output: &str) -> Result<Vec<Pair>, MalformedUpstream> {
    let contents: Vec<String> = PAGE_CONTENT
        .captures_iter(output)
        .filter_map(|c| c.get(1))
        .map(|m| unescape(m.as_str()))
        .collect();
    let files: Vec<String> = FILE_NAME
        .captures_iter(output)
        .filter_map(|c| c.get(1))
        .map(|m| unescape(m.as_str()))
        .collect();

    if contents.len() != files.len() {
        return Err(MalformedUpstream::SalvageMismatch {
            contents: contents.len(),
            files: files.len(),
        });
    }

    Ok(contents
        .into_iter()
        .zip(files)
        .filter_map(|(c, f)| {
            let (c, f) = (c.trim(), f.trim());
            (!c.is_empty() && !f.is_empty()).then(|| (c.to_string(), f.to_string()))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_pairs_from_trailing_garbage() {
        let out = r#"[{"pageContent":"Policy states X","file_name":"policy.pdf"}]}}garbage"#;
        assert_eq!(
            salvage_pairs(out).unwrap(),
            vec![("Policy states X".to_string(), "policy.pdf".to_string())]
        );
    }

    #[test]
    fn unescapes_content_and_tolerates_spacing() {
        let out = r#"[{"pageContent" : "Line one\nsaid \"yes\"\tok", "metadata": {"file_name" :"a%20b.pdf"}}"#;
        let pairs = salvage_pairs(out).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "Line one\nsaid \"yes\"\tok");
        assert_eq!(pairs[0].1, "a%20b.pdf");
    }

    #[test]
    fn count_mismatch_recovers_nothing() {
        let out = r#"[{"pageContent":"a","file_name":"x.pdf"},{"pageContent":"b"}"#;
        assert_eq!(
            salvage_pairs(out),
            Err(MalformedUpstream::SalvageMismatch { contents: 2, files: 1 })
        );
    }

    #[test]
    fn empty_values_are_dropped_after_pairing() {
        let out = r#"{"pageContent":"","file_name":"x.pdf"},{"pageContent":"kept","file_name":"y.pdf"} broken"#;
        assert_eq!(
            salvage_pairs(out).unwrap(),
            vec![("kept".to_string(), "y.pdf".to_string())]
        );
    }
}
