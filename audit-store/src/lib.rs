//! Storage collaborator for questions and evidence citations.
//!
//! - Two backends: volatile [`MemoryStore`] and snapshot-on-disk [`JsonFileStore`].
//! - Enum dispatch via [`StoreClient`]: plain `async fn`, no `async-trait`,
//!   no boxed futures.
//! - Backend selection from env: `AUDIT_STORE_KIND` (`memory` | `json`),
//!   `AUDIT_STORE_PATH` (default `data/audit_store.json`).

use std::path::PathBuf;

use tracing::{debug, instrument};

pub mod errors;
pub mod json_file;
pub mod memory;
pub mod model;
mod tables;

pub use errors::{StoreError, StoreResult};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use model::{Citation, NO_VALUE, Question, QuestionPatch, has_value};

/// Which backend to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    JsonFile,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub kind: StoreKind,
    /// Snapshot path for [`StoreKind::JsonFile`].
    pub path: PathBuf,
}

impl StoreConfig {
    /// Reads `AUDIT_STORE_KIND` / `AUDIT_STORE_PATH`.
    ///
    /// # Errors
    /// [`StoreError::Validation`] for an unknown backend kind.
    pub fn from_env() -> StoreResult<Self> {
        let kind = match std::env::var("AUDIT_STORE_KIND")
            .unwrap_or_else(|_| "memory".into())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "" | "memory" => StoreKind::Memory,
            "json" | "file" => StoreKind::JsonFile,
            other => {
                return Err(StoreError::Validation(format!(
                    "unsupported AUDIT_STORE_KIND: {other}"
                )));
            }
        };
        let path = std::env::var("AUDIT_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/audit_store.json"));
        Ok(Self { kind, path })
    }
}

/// Concrete store (enum-dispatch).
#[derive(Debug, Clone)]
pub enum StoreClient {
    Memory(MemoryStore),
    JsonFile(JsonFileStore),
}

impl StoreClient {
    pub fn from_config(cfg: StoreConfig) -> Self {
        debug!("store backend: {:?} ({})", cfg.kind, cfg.path.display());
        match cfg.kind {
            StoreKind::Memory => Self::Memory(MemoryStore::new()),
            StoreKind::JsonFile => Self::JsonFile(JsonFileStore::new(cfg.path)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::JsonFile(_) => "json",
        }
    }

    pub async fn get_question(&self, id: &str) -> StoreResult<Question> {
        match self {
            Self::Memory(s) => s.get_question(id).await,
            Self::JsonFile(s) => s.get_question(id).await,
        }
    }

    pub async fn list_questions(&self, auditee_id: &str) -> StoreResult<Vec<Question>> {
        match self {
            Self::Memory(s) => s.list_questions(auditee_id).await,
            Self::JsonFile(s) => s.list_questions(auditee_id).await,
        }
    }

    pub async fn upsert_question(&self, q: Question) -> StoreResult<Question> {
        match self {
            Self::Memory(s) => s.upsert_question(q).await,
            Self::JsonFile(s) => s.upsert_question(q).await,
        }
    }

    #[instrument(skip_all, fields(question_id = %id, fields = ?patch.field_names()))]
    pub async fn update_question(&self, id: &str, patch: &QuestionPatch) -> StoreResult<Question> {
        match self {
            Self::Memory(s) => s.update_question(id, patch).await,
            Self::JsonFile(s) => s.update_question(id, patch).await,
        }
    }

    #[instrument(skip_all, fields(count = rows.len()))]
    pub async fn insert_citations(&self, rows: &[Citation]) -> StoreResult<usize> {
        match self {
            Self::Memory(s) => s.insert_citations(rows).await,
            Self::JsonFile(s) => s.insert_citations(rows).await,
        }
    }

    pub async fn delete_citations(&self, question_id: &str) -> StoreResult<usize> {
        match self {
            Self::Memory(s) => s.delete_citations(question_id).await,
            Self::JsonFile(s) => s.delete_citations(question_id).await,
        }
    }

    pub async fn select_citations(&self, question_id: &str) -> StoreResult<Vec<Citation>> {
        match self {
            Self::Memory(s) => s.select_citations(question_id).await,
            Self::JsonFile(s) => s.select_citations(question_id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cited(qid: &str, content: &str, file: &str) -> Citation {
        let mut c = Citation::new(content, file);
        c.question_id = qid.into();
        c
    }

    async fn exercise(store: &StoreClient) {
        store
            .upsert_question(Question::new("q1", "acme", "Are backups tested?"))
            .await
            .unwrap();
        store
            .upsert_question(Question::new("q2", "acme", "Is MFA enforced?"))
            .await
            .unwrap();
        store
            .upsert_question(Question::new("q3", "globex", "Other auditee"))
            .await
            .unwrap();

        let acme: Vec<String> = store
            .list_questions("acme")
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(acme, vec!["q1", "q2"]);

        let n = store
            .insert_citations(&[
                cited("q1", "Backups run nightly", "backup%20policy.pdf"),
                cited("q1", "Restores tested quarterly", "dr.pdf"),
                cited("q2", "MFA on VPN", "access.pdf"),
            ])
            .await
            .unwrap();
        assert_eq!(n, 3);

        let q1 = store.select_citations("q1").await.unwrap();
        assert_eq!(q1.len(), 2);
        assert_eq!(q1[0].content, "Backups run nightly");

        assert_eq!(store.delete_citations("q1").await.unwrap(), 2);
        assert!(store.select_citations("q1").await.unwrap().is_empty());
        assert_eq!(store.select_citations("q2").await.unwrap().len(), 1);

        let patch = QuestionPatch {
            answer: Some("Yes".into()),
            ..Default::default()
        };
        let q = store.update_question("q2", &patch).await.unwrap();
        assert_eq!(q.answer, "Yes");
        assert!(q.updated_at.is_some());

        assert!(matches!(
            store.update_question("missing", &patch).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn memory_backend_roundtrip() {
        let store = StoreClient::Memory(MemoryStore::new());
        exercise(&store).await;
    }

    #[tokio::test]
    async fn json_backend_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = StoreClient::JsonFile(JsonFileStore::new(&path));
        exercise(&store).await;

        let reopened = JsonFileStore::new(&path);
        let q2 = reopened.get_question("q2").await.unwrap();
        assert_eq!(q2.answer, "Yes");
        assert_eq!(reopened.select_citations("q2").await.unwrap().len(), 1);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn invalid_citation_batch_is_rejected_whole() {
        let store = MemoryStore::new();
        store
            .upsert_question(Question::new("q1", "acme", "Are backups tested?"))
            .await
            .unwrap();
        let err = store
            .insert_citations(&[cited("q1", "ok", "a.pdf"), Citation::new("orphan", "b.pdf")])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.select_citations("q1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn citations_need_an_existing_question() {
        let store = MemoryStore::new();
        store
            .upsert_question(Question::new("q1", "acme", "Are backups tested?"))
            .await
            .unwrap();
        let err = store
            .insert_citations(&[cited("q1", "ok", "a.pdf"), cited("ghost", "x", "b.pdf")])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(store.select_citations("q1").await.unwrap().is_empty());
        assert!(store.select_citations("ghost").await.unwrap().is_empty());
    }
}
