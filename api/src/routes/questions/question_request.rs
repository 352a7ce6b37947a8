use std::collections::BTreeMap;

use serde::Deserialize;

use audit_store::QuestionPatch;

/// Body of `PUT /questions/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpsertQuestionRequest {
    pub auditee_id: String,
    /// `question` is required; every other field defaults to `"--"`.
    #[serde(flatten)]
    pub fields: QuestionPatch,
}

/// Body of `POST /questions/save`: pending edits keyed by question id.
#[derive(Debug, Deserialize)]
pub struct SaveEditsRequest {
    pub edits: BTreeMap<String, QuestionPatch>,
}
