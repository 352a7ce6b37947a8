use serde::Deserialize;

/// Body of `POST /reports`.
///
/// Either `question_ids` (rendered in that order) or `auditee_id` (all of the
/// auditee's questions, in id order) must select at least one question.
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub auditee_name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub question_ids: Vec<String>,
    #[serde(default)]
    pub auditee_id: Option<String>,
}
