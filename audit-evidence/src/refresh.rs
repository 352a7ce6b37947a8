//! Evidence refresh: webhook → normalizer → store.
//!
//! Citations of a question are replaced wholesale on every refresh. Citation
//! writes are best-effort: a failed delete/insert is logged and reported in
//! the outcome, but the question's answer/evidence/source fields are still
//! updated. A failed field update is surfaced.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use ai_webhook_service::{RawAiResponse, WebhookService};
use audit_store::{Question, QuestionPatch, StoreClient};

use crate::errors::{EvidenceError, EvidenceResult};
use crate::normalizer::{NormalizedAnswer, normalize};

/// What a refresh did.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshOutcome {
    /// Question after the field update.
    pub question: Question,
    /// Normalized answer (citations carry the question id).
    pub normalized: NormalizedAnswer,
    /// `false` when old citations could not be deleted or new ones inserted.
    pub citations_persisted: bool,
}

/// Prompt sent to the webhook for one question.
pub fn build_prompt(question: &Question) -> String {
    question.question.trim().to_string()
}

/// Full refresh for one question: load it, ask the webhook, persist the result.
///
/// # Errors
/// - [`EvidenceError::Validation`] for an empty id
/// - [`EvidenceError::Store`] if the question is missing or its fields cannot be updated
/// - [`EvidenceError::Webhook`] if the webhook call fails
#[instrument(skip_all, fields(question_id = %question_id))]
pub async fn refresh_question_evidence(
    webhook: &WebhookService,
    store: &StoreClient,
    question_id: &str,
) -> EvidenceResult<RefreshOutcome> {
    if question_id.trim().is_empty() {
        return Err(EvidenceError::Validation("question id must not be empty".into()));
    }

    let t0 = Instant::now();
    debug!("refresh: load question");
    let question = store.get_question(question_id).await?;

    debug!("refresh: ask webhook");
    let raw = webhook.ask(&build_prompt(&question), question_id).await?;
    debug!("refresh: webhook answered in {} ms", t0.elapsed().as_millis());

    apply_webhook_answer(store, question_id, &raw).await
}

/// Normalizes `raw` and persists it for `question_id` (steps after the webhook call).
///
/// # Errors
/// [`EvidenceError::Store`] if the question is missing (nothing is written) or
/// its fields cannot be updated.
pub async fn apply_webhook_answer(
    store: &StoreClient,
    question_id: &str,
    raw: &RawAiResponse,
) -> EvidenceResult<RefreshOutcome> {
    let t0 = Instant::now();
    store.get_question(question_id).await?;

    let mut normalized = normalize(raw);
    normalized.assign_question(question_id);
    debug!(
        "refresh: normalized answer={} citations={}",
        normalized.answer,
        normalized.citations.len()
    );

    let citations_persisted = replace_citations(store, question_id, &normalized).await;

    let patch = QuestionPatch {
        answer: Some(normalized.answer.clone()),
        evidence: Some(normalized.evidence.clone()),
        source: Some(normalized.source.clone()),
        ..Default::default()
    };
    let question = store.update_question(question_id, &patch).await?;

    info!(
        "refresh: question {} updated (citations={}, persisted={}) in {} ms",
        question_id,
        normalized.citations.len(),
        citations_persisted,
        t0.elapsed().as_millis()
    );

    Ok(RefreshOutcome {
        question,
        normalized,
        citations_persisted,
    })
}

/// Deletes the old citations and inserts the new ones; `false` on any failure.
async fn replace_citations(
    store: &StoreClient,
    question_id: &str,
    normalized: &NormalizedAnswer,
) -> bool {
    match store.delete_citations(question_id).await {
        Ok(n) => debug!("refresh: removed {n} old citation(s)"),
        Err(e) => {
            // Inserting on top of stale rows would mix old and new evidence.
            error!("refresh: failed to delete old citations for {question_id}: {e}");
            return false;
        }
    }

    if normalized.citations.is_empty() {
        return true;
    }

    match store.insert_citations(&normalized.citations).await {
        Ok(n) => {
            debug!("refresh: inserted {n} citation(s)");
            true
        }
        Err(e) => {
            error!("refresh: failed to insert citations for {question_id}: {e}");
            false
        }
    }
}

/// Result of applying a batch of row edits.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SaveReport {
    pub updated: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<SaveFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveFailure {
    pub question_id: String,
    pub message: String,
}

/// Applies pending per-row edits, keyed by question id, in id order.
///
/// Empty patches are skipped. A failing row does not stop the others.
pub async fn apply_edits(
    store: &StoreClient,
    edits: &BTreeMap<String, QuestionPatch>,
) -> SaveReport {
    let mut report = SaveReport::default();
    for (id, patch) in edits {
        if patch.is_empty() {
            report.skipped.push(id.clone());
            continue;
        }
        match store.update_question(id, patch).await {
            Ok(_) => report.updated.push(id.clone()),
            Err(e) => {
                warn!("save: question {id} not updated: {e}");
                report.failed.push(SaveFailure {
                    question_id: id.clone(),
                    message: e.to_string(),
                });
            }
        }
    }
    debug!(
        "save: updated={} skipped={} failed={}",
        report.updated.len(),
        report.skipped.len(),
        report.failed.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_store::{MemoryStore, NO_VALUE};

    async fn seeded() -> StoreClient {
        let store = StoreClient::Memory(MemoryStore::new());
        store
            .upsert_question(Question::new("q1", "acme", "  Are backups run nightly?  "))
            .await
            .unwrap();
        store
    }

    fn positive() -> RawAiResponse {
        RawAiResponse::new(
            "Yes",
            Some(
                r#"[{"pageContent":"Backups run nightly","metadata":{"file_name":"backup%20policy.pdf"}}]"#
                    .into(),
            ),
        )
    }

    #[tokio::test]
    async fn positive_answer_is_persisted() {
        let store = seeded().await;
        let out = apply_webhook_answer(&store, "q1", &positive()).await.unwrap();

        assert!(out.citations_persisted);
        assert_eq!(out.question.answer, "Yes");
        assert_eq!(out.question.evidence, "• Backups run nightly");
        assert_eq!(out.question.source, "backup policy.pdf");

        let rows = store.select_citations("q1").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].question_id, "q1");
        assert_eq!(rows[0].file_name, "backup%20policy.pdf");
    }

    #[tokio::test]
    async fn refresh_replaces_old_citations() {
        let store = seeded().await;
        apply_webhook_answer(&store, "q1", &positive()).await.unwrap();
        // Same answer again: old rows removed first, so no duplicate-id clash.
        let again = apply_webhook_answer(&store, "q1", &positive()).await.unwrap();
        assert!(again.citations_persisted);
        assert_eq!(store.select_citations("q1").await.unwrap().len(), 1);

        let negative = RawAiResponse::new("No", None);
        let out = apply_webhook_answer(&store, "q1", &negative).await.unwrap();
        assert_eq!(out.question.answer, "No");
        assert_eq!(out.question.evidence, NO_VALUE);
        assert!(store.select_citations("q1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_question_is_an_error() {
        let store = seeded().await;
        let err = apply_webhook_answer(&store, "nope", &positive()).await.unwrap_err();
        assert!(matches!(err, EvidenceError::Store(_)));
        assert!(store.select_citations("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_citation_insert_still_updates_fields() {
        let store = seeded().await;
        store
            .upsert_question(Question::new("q2", "acme", "Is MFA enforced?"))
            .await
            .unwrap();

        // q2 already owns the id q1's citation will get, so the delete for q1
        // leaves it in place and the insert fails on a duplicate id.
        let mut expected = normalize(&positive());
        expected.assign_question("q1");
        let mut clash = expected.citations[0].clone();
        clash.question_id = "q2".into();
        store.insert_citations(&[clash]).await.unwrap();

        let out = apply_webhook_answer(&store, "q1", &positive()).await.unwrap();
        assert!(!out.citations_persisted);
        assert_eq!(out.question.answer, "Yes");
        assert_eq!(out.question.evidence, "• Backups run nightly");
        assert_eq!(out.question.source, "backup policy.pdf");

        let stored = store.get_question("q1").await.unwrap();
        assert_eq!(stored.evidence, "• Backups run nightly");
        assert!(store.select_citations("q1").await.unwrap().is_empty());
        assert_eq!(store.select_citations("q2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn edits_are_applied_per_row() {
        let store = seeded().await;
        let mut edits = BTreeMap::new();
        edits.insert(
            "q1".to_string(),
            QuestionPatch {
                remediation_guidance: Some("Test restores monthly".into()),
                ..Default::default()
            },
        );
        edits.insert("q0".to_string(), QuestionPatch::default());
        edits.insert(
            "missing".to_string(),
            QuestionPatch {
                answer: Some("No".into()),
                ..Default::default()
            },
        );

        let report = apply_edits(&store, &edits).await;
        assert_eq!(report.updated, vec!["q1"]);
        assert_eq!(report.skipped, vec!["q0"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].question_id, "missing");

        let q = store.get_question("q1").await.unwrap();
        assert_eq!(q.remediation_guidance, "Test restores monthly");
    }

    #[test]
    fn prompt_is_the_trimmed_question() {
        let q = Question::new("q1", "acme", "  Is MFA enforced?\n");
        assert_eq!(build_prompt(&q), "Is MFA enforced?");
    }
}
