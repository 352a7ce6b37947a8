//! Raw answer returned by the evidence-extraction webhook.
//!
//! The payload is untrusted: `result` is usually `"Yes"`/`"No"` but any string
//! is kept, and `output` is normally a JSON-encoded *string* holding an array
//! of `{ pageContent, metadata: { file_name } }` records. Some deployments send
//! `output` as a nested JSON value instead; it is kept as its JSON text so the
//! downstream parser sees one shape.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error_handler::{AiWebhookError, Result};

/// Untrusted webhook answer for a single question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAiResponse {
    /// Relevance verdict (`"Yes"`, `"No"`, or anything else upstream sends).
    #[serde(default, deserialize_with = "lenient_text")]
    pub result: Option<String>,

    /// JSON-in-string citation payload; meaningful only when `result == "Yes"`.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub output: Option<String>,
}

impl RawAiResponse {
    /// Convenience constructor used by tests and callers that build answers by hand.
    pub fn new(result: impl Into<String>, output: Option<String>) -> Self {
        Self {
            result: Some(result.into()),
            output,
        }
    }

    /// Decodes a webhook body.
    ///
    /// Accepts either a single object or an array whose first element is the
    /// answer object (workflow engines often wrap items in a list).
    ///
    /// # Errors
    /// Returns [`AiWebhookError::Decode`] when the body is not JSON or has no
    /// object to read.
    pub fn from_body(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| AiWebhookError::Decode(format!("body is not JSON: {e}")))?;

        let object = match value {
            Value::Array(items) => items
                .into_iter()
                .next()
                .ok_or_else(|| AiWebhookError::Decode("empty array body".into()))?,
            obj @ Value::Object(_) => obj,
            other => {
                return Err(AiWebhookError::Decode(format!(
                    "expected object or array, got `{}`",
                    kind_of(&other)
                )));
            }
        };

        serde_json::from_value(object).map_err(|e| AiWebhookError::Decode(e.to_string()))
    }
}

/// Strings pass through; `null` becomes `None`; other JSON values keep their JSON text.
fn lenient_text<'de, D>(de: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(de)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_output_is_kept_verbatim() {
        let body = r#"{"result":"Yes","output":"[{\"pageContent\":\"a\"}]"}"#;
        let raw = RawAiResponse::from_body(body).unwrap();
        assert_eq!(raw.result.as_deref(), Some("Yes"));
        assert_eq!(raw.output.as_deref(), Some(r#"[{"pageContent":"a"}]"#));
    }

    #[test]
    fn nested_output_is_serialized_back_to_text() {
        let body = r#"{"result":"Yes","output":[{"pageContent":"a","metadata":{"file_name":"f.pdf"}}]}"#;
        let raw = RawAiResponse::from_body(body).unwrap();
        let out: Value = serde_json::from_str(raw.output.as_deref().unwrap()).unwrap();
        assert_eq!(out[0]["metadata"]["file_name"], "f.pdf");
    }

    #[test]
    fn wrapped_in_array_and_missing_fields() {
        let raw = RawAiResponse::from_body(r#"[{"result":"No","output":null}]"#).unwrap();
        assert_eq!(raw.result.as_deref(), Some("No"));
        assert!(raw.output.is_none());

        let empty = RawAiResponse::from_body("{}").unwrap();
        assert_eq!(empty, RawAiResponse::default());
    }

    #[test]
    fn non_object_body_is_a_decode_error() {
        assert!(matches!(
            RawAiResponse::from_body("[]"),
            Err(AiWebhookError::Decode(_))
        ));
        assert!(matches!(
            RawAiResponse::from_body("not json"),
            Err(AiWebhookError::Decode(_))
        ));
    }
}
