//! Rewrites axum's plain-text extractor rejections (bad JSON body, bad path)
//! into the [`ApiResponse`] error envelope and tags them with a request id.

use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse};

const REQUEST_ID: &str = "X-Request-Id";
/// Rejection bodies are short; anything bigger is passed through untouched.
const MAX_REJECTION_BYTES: usize = 64 * 1024;

pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    if !(status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY) {
        return res;
    }
    // Our own handlers already answer with the envelope.
    if is_json(&res) {
        return res;
    }

    let (mut parts, body) = res.into_parts();
    let bytes: Bytes = axum::body::to_bytes(body, MAX_REJECTION_BYTES)
        .await
        .unwrap_or_default();
    let original = String::from_utf8_lossy(&bytes);
    let req_id = ensure_request_id(&mut parts.headers);
    debug!(request_id = %req_id, "rejection: {}", original.trim());

    let detail = ApiErrorDetail {
        path: field_from_serde_msg(&original),
        hint: hint_for(&original),
    };
    let code = if status == StatusCode::BAD_REQUEST {
        "BAD_REQUEST"
    } else {
        "UNPROCESSABLE_ENTITY"
    };
    let envelope = ApiResponse::<()>::failure(code, original.trim()).with_detail(detail);

    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.headers.remove(header::CONTENT_LENGTH);

    Response::from_parts(parts, body.into())
}

fn is_json(res: &Response) -> bool {
    res.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

fn ensure_request_id(headers: &mut axum::http::HeaderMap) -> String {
    if let Some(v) = headers.get(REQUEST_ID).and_then(|h| h.to_str().ok()) {
        if !v.trim().is_empty() {
            return v.to_string();
        }
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    let id = format!("req-{nanos}");
    if let Ok(value) = HeaderValue::from_str(&id) {
        headers.insert(REQUEST_ID, value);
    }
    id
}

/// Field named by a serde message such as "missing field `question_ids`".
fn field_from_serde_msg(msg: &str) -> Option<String> {
    let start = msg.find('`')? + 1;
    let len = msg[start..].find('`')?;
    let field = &msg[start..start + len];
    (!field.is_empty()).then(|| field.to_string())
}

fn hint_for(msg: &str) -> Option<String> {
    if msg.contains("expected a sequence") {
        Some("Expected an array, e.g. [\"q1\", \"q2\"].".into())
    } else if msg.contains("expected a map") || msg.contains("expected struct") {
        Some("Expected a JSON object, e.g. { \"field\": \"value\" }.".into())
    } else if msg.contains("Content-Type") {
        Some("Send the body with `Content-Type: application/json`.".into())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_backticked_field() {
        let msg = "Failed to deserialize the JSON body into the target type: missing field `question_ids` at line 1 column 2";
        assert_eq!(field_from_serde_msg(msg).as_deref(), Some("question_ids"));
        assert_eq!(field_from_serde_msg("EOF while parsing"), None);
    }

    #[test]
    fn hints() {
        assert!(hint_for("invalid type: string, expected a sequence").is_some());
        assert!(hint_for("something else").is_none());
    }

    #[test]
    fn request_id_is_kept_or_generated() {
        let mut headers = axum::http::HeaderMap::new();
        let generated = ensure_request_id(&mut headers);
        assert!(generated.starts_with("req-"));
        assert_eq!(ensure_request_id(&mut headers), generated);
    }
}
