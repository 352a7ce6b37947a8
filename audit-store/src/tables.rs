//! Plain in-memory tables shared by both backends.
//!
//! Rows keep insertion order; lookups are linear, which is fine for one
//! auditee's questionnaire.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{StoreError, StoreResult};
use crate::model::{Citation, Question, QuestionPatch};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Tables {
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub citations: Vec<Citation>,
}

impl Tables {
    pub fn get_question(&self, id: &str) -> StoreResult<Question> {
        self.questions
            .iter()
            .find(|q| q.id == id)
            .cloned()
            .ok_or_else(|| StoreError::question_not_found(id))
    }

    pub fn list_questions(&self, auditee_id: &str) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.auditee_id == auditee_id)
            .cloned()
            .collect()
    }

    pub fn upsert_question(&mut self, mut q: Question) -> StoreResult<Question> {
        if q.id.trim().is_empty() {
            return Err(StoreError::Validation("question id must not be empty".into()));
        }
        q.updated_at = Some(Utc::now());
        match self.questions.iter_mut().find(|x| x.id == q.id) {
            Some(slot) => *slot = q.clone(),
            None => self.questions.push(q.clone()),
        }
        Ok(q)
    }

    pub fn update_question(&mut self, id: &str, patch: &QuestionPatch) -> StoreResult<Question> {
        let q = self
            .questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| StoreError::question_not_found(id))?;
        if patch.apply(q) {
            q.updated_at = Some(Utc::now());
        }
        Ok(q.clone())
    }

    /// All-or-nothing: every row is validated before any is inserted. Each row's
    /// question must already exist.
    pub fn insert_citations(&mut self, rows: &[Citation]) -> StoreResult<usize> {
        for c in rows {
            if c.question_id.trim().is_empty() {
                return Err(StoreError::Validation(format!(
                    "citation {} has no question id",
                    c.id
                )));
            }
            if c.content.trim().is_empty() || c.file_name.trim().is_empty() {
                return Err(StoreError::Validation(format!(
                    "citation {} needs both content and file name",
                    c.id
                )));
            }
            if self.citations.iter().any(|x| x.id == c.id) {
                return Err(StoreError::Validation(format!("duplicate citation id {}", c.id)));
            }
            if !self.questions.iter().any(|q| q.id == c.question_id) {
                return Err(StoreError::question_not_found(&c.question_id));
            }
        }
        self.citations.extend_from_slice(rows);
        Ok(rows.len())
    }

    pub fn delete_citations(&mut self, question_id: &str) -> usize {
        let before = self.citations.len();
        self.citations.retain(|c| c.question_id != question_id);
        before - self.citations.len()
    }

    pub fn select_citations(&self, question_id: &str) -> Vec<Citation> {
        self.citations
            .iter()
            .filter(|c| c.question_id == question_id)
            .cloned()
            .collect()
    }
}
