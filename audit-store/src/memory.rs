//! Volatile backend; state lives as long as the process.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::errors::StoreResult;
use crate::model::{Citation, Question, QuestionPatch};
use crate::tables::Tables;

/// Cheap-to-clone handle over shared tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_question(&self, id: &str) -> StoreResult<Question> {
        self.tables.read().await.get_question(id)
    }

    pub async fn list_questions(&self, auditee_id: &str) -> StoreResult<Vec<Question>> {
        Ok(self.tables.read().await.list_questions(auditee_id))
    }

    pub async fn upsert_question(&self, q: Question) -> StoreResult<Question> {
        self.tables.write().await.upsert_question(q)
    }

    pub async fn update_question(&self, id: &str, patch: &QuestionPatch) -> StoreResult<Question> {
        self.tables.write().await.update_question(id, patch)
    }

    pub async fn insert_citations(&self, rows: &[Citation]) -> StoreResult<usize> {
        self.tables.write().await.insert_citations(rows)
    }

    pub async fn delete_citations(&self, question_id: &str) -> StoreResult<usize> {
        Ok(self.tables.write().await.delete_citations(question_id))
    }

    pub async fn select_citations(&self, question_id: &str) -> StoreResult<Vec<Citation>> {
        Ok(self.tables.read().await.select_citations(question_id))
    }
}
