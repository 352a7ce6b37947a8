use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use audit_store::{Citation, Question};

use crate::geometry::PageGeometry;

/// One questionnaire row as it appears in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: String,
    pub question: String,
    pub document_evaluation: String,
    pub evidence: String,
    pub source: String,
    pub field_audit_findings: String,
    pub control_evaluation: String,
    pub remediation_guidance: String,
}

impl From<&Question> for ReportRecord {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id.clone(),
            question: q.question.clone(),
            document_evaluation: q.document_evaluation.clone(),
            evidence: q.evidence.clone(),
            source: q.source.clone(),
            field_audit_findings: q.field_audit_findings.clone(),
            control_evaluation: q.control_evaluation.clone(),
            remediation_guidance: q.remediation_guidance.clone(),
        }
    }
}

/// A record plus the citations fetched for it (empty when none or the fetch failed).
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub record: ReportRecord,
    pub citations: Vec<Citation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub title: String,
    /// Printed under the title when non-empty.
    pub auditee_name: String,
    pub created_at: DateTime<Utc>,
    pub geometry: PageGeometry,
}

impl ReportOptions {
    pub fn new(auditee_name: impl Into<String>) -> Self {
        Self {
            title: "Audit Evidence Report".to_string(),
            auditee_name: auditee_name.into(),
            created_at: Utc::now(),
            geometry: PageGeometry::a4(),
        }
    }

    pub fn created_label(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M UTC").to_string()
    }
}
