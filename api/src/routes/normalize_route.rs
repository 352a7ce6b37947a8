//! POST /normalize: runs the normalizer on a raw webhook answer (no side effects).

use axum::Json;
use serde::Deserialize;

use audit_evidence::{NormalizedAnswer, RawAiResponse, normalize};

use crate::core::http::response_envelope::{ApiResponse, ok};

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    #[serde(flatten)]
    pub raw: RawAiResponse,
    /// When set, citations are attached to this question.
    #[serde(default)]
    pub question_id: Option<String>,
}

/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/normalize \
///   -H 'content-type: application/json' \
///   -d '{"result":"Yes","output":"[{\"pageContent\":\"x\",\"metadata\":{\"file_name\":\"a.pdf\"}}]"}'
/// ```
pub async fn normalize_answer(
    Json(body): Json<NormalizeRequest>,
) -> Json<ApiResponse<NormalizedAnswer>> {
    let mut normalized = normalize(&body.raw);
    if let Some(qid) = body.question_id.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        normalized.assign_question(qid);
    }
    ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn normalizes_nested_output_and_assigns_question() {
        let body: NormalizeRequest = serde_json::from_str(
            r#"{
                "result": "Yes",
                "output": [{"pageContent": "Backups run nightly", "metadata": {"file_name": "backup%20policy.pdf"}}],
                "question_id": "q1"
            }"#,
        )
        .unwrap();

        let Json(res) = normalize_answer(Json(body)).await;
        let n = res.data.unwrap();
        assert_eq!(n.answer, "Yes");
        assert_eq!(n.evidence, "• Backups run nightly");
        assert_eq!(n.source, "backup policy.pdf");
        assert_eq!(n.citations[0].question_id, "q1");
    }

    #[tokio::test]
    async fn negative_answer_has_no_evidence() {
        let body: NormalizeRequest = serde_json::from_str(r#"{"result":"No"}"#).unwrap();
        let Json(res) = normalize_answer(Json(body)).await;
        let n = res.data.unwrap();
        assert_eq!(n.answer, "No");
        assert!(n.citations.is_empty());
        assert_eq!(n.evidence, audit_evidence::NO_VALUE);
    }
}
