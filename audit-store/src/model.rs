//! Persisted entities: questions and their evidence citations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel shown for absent answer/evidence/source/evaluation text.
pub const NO_VALUE: &str = "--";

fn no_value() -> String {
    NO_VALUE.to_string()
}

/// `true` when a text field carries real content (not empty, not `--`).
pub fn has_value(s: &str) -> bool {
    let t = s.trim();
    !t.is_empty() && t != NO_VALUE
}

/// One extracted (content, source-file) pair evidencing an answer.
///
/// `file_name` keeps the raw upstream name (e.g. `backup%20policy.pdf`);
/// decoding is a display concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub id: Uuid,
    /// Owning question; empty until the caller assigns it.
    #[serde(default)]
    pub question_id: String,
    pub content: String,
    pub file_name: String,
}

impl Citation {
    /// New citation with a fresh v4 id and no owning question yet.
    pub fn new(content: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            question_id: String::new(),
            content: content.into(),
            file_name: file_name.into(),
        }
    }
}

/// A questionnaire row for one auditee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub auditee_id: String,
    pub question: String,
    #[serde(default = "no_value")]
    pub answer: String,
    #[serde(default = "no_value")]
    pub evidence: String,
    #[serde(default = "no_value")]
    pub source: String,
    #[serde(default = "no_value")]
    pub document_evaluation: String,
    #[serde(default = "no_value")]
    pub field_audit_findings: String,
    #[serde(default = "no_value")]
    pub control_evaluation: String,
    #[serde(default = "no_value")]
    pub remediation_guidance: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Question {
    /// Fresh question with every text field set to [`NO_VALUE`].
    pub fn new(
        id: impl Into<String>,
        auditee_id: impl Into<String>,
        question: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            auditee_id: auditee_id.into(),
            question: question.into(),
            answer: no_value(),
            evidence: no_value(),
            source: no_value(),
            document_evaluation: no_value(),
            field_audit_findings: no_value(),
            control_evaluation: no_value(),
            remediation_guidance: no_value(),
            updated_at: None,
        }
    }
}

/// Partial update of a question's editable fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionPatch {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub evidence: Option<String>,
    pub source: Option<String>,
    pub document_evaluation: Option<String>,
    pub field_audit_findings: Option<String>,
    pub control_evaluation: Option<String>,
    pub remediation_guidance: Option<String>,
}

impl QuestionPatch {
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_none())
    }

    fn fields(&self) -> [(&'static str, &Option<String>); 8] {
        [
            ("question", &self.question),
            ("answer", &self.answer),
            ("evidence", &self.evidence),
            ("source", &self.source),
            ("document_evaluation", &self.document_evaluation),
            ("field_audit_findings", &self.field_audit_findings),
            ("control_evaluation", &self.control_evaluation),
            ("remediation_guidance", &self.remediation_guidance),
        ]
    }

    /// Writes the set fields into `q`. Returns `true` if anything changed.
    pub fn apply(&self, q: &mut Question) -> bool {
        let mut changed = false;
        let mut set = |dst: &mut String, src: &Option<String>| {
            if let Some(v) = src {
                if dst != v {
                    *dst = v.clone();
                    changed = true;
                }
            }
        };
        set(&mut q.question, &self.question);
        set(&mut q.answer, &self.answer);
        set(&mut q.evidence, &self.evidence);
        set(&mut q.source, &self.source);
        set(&mut q.document_evaluation, &self.document_evaluation);
        set(&mut q.field_audit_findings, &self.field_audit_findings);
        set(&mut q.control_evaluation, &self.control_evaluation);
        set(&mut q.remediation_guidance, &self.remediation_guidance);
        changed
    }

    /// Names of the fields this patch sets (for logs).
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter(|(_, v)| v.is_some())
            .map(|(k, _)| k)
            .collect()
    }
}
