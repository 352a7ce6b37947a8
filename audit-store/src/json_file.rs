//! File-backed store (one JSON snapshot on disk).
//!
//! The snapshot is loaded lazily on first access and rewritten after every
//! mutation: serialized to `<path>.tmp`, then renamed over `<path>`, so a crash
//! mid-write never leaves a truncated snapshot behind.
//! Default path: "data/audit_store.json".

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::StoreResult;
use crate::model::{Citation, Question, QuestionPatch};
use crate::tables::Tables;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    tables: Arc<RwLock<Option<Tables>>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tables: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs a read-only closure against the loaded tables.
    async fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> StoreResult<R> {
        {
            let guard = self.tables.read().await;
            if let Some(t) = guard.as_ref() {
                return Ok(f(t));
            }
        }
        let mut guard = self.tables.write().await;
        if guard.is_none() {
            *guard = Some(load_snapshot(&self.path).await?);
        }
        let tables = guard.get_or_insert_with(Tables::default);
        Ok(f(tables))
    }

    /// Runs a mutating closure and persists the snapshot when it succeeds.
    ///
    /// The write lock is held across the disk write so writers are serialized.
    async fn write<R>(&self, f: impl FnOnce(&mut Tables) -> StoreResult<R>) -> StoreResult<R> {
        let mut guard = self.tables.write().await;
        if guard.is_none() {
            *guard = Some(load_snapshot(&self.path).await?);
        }
        let tables = guard.get_or_insert_with(Tables::default);

        // Work on a copy so a failed persist leaves memory and disk in agreement.
        let mut next = tables.clone();
        let out = f(&mut next)?;
        store_snapshot(&self.path, &next).await?;
        *tables = next;
        Ok(out)
    }

    pub async fn get_question(&self, id: &str) -> StoreResult<Question> {
        self.read(|t| t.get_question(id)).await?
    }

    pub async fn list_questions(&self, auditee_id: &str) -> StoreResult<Vec<Question>> {
        self.read(|t| t.list_questions(auditee_id)).await
    }

    pub async fn upsert_question(&self, q: Question) -> StoreResult<Question> {
        self.write(|t| t.upsert_question(q)).await
    }

    pub async fn update_question(&self, id: &str, patch: &QuestionPatch) -> StoreResult<Question> {
        self.write(|t| t.update_question(id, patch)).await
    }

    pub async fn insert_citations(&self, rows: &[Citation]) -> StoreResult<usize> {
        self.write(|t| t.insert_citations(rows)).await
    }

    pub async fn delete_citations(&self, question_id: &str) -> StoreResult<usize> {
        self.write(|t| Ok(t.delete_citations(question_id))).await
    }

    pub async fn select_citations(&self, question_id: &str) -> StoreResult<Vec<Citation>> {
        self.read(|t| t.select_citations(question_id)).await
    }
}

async fn load_snapshot(path: &Path) -> StoreResult<Tables> {
    if !fs::try_exists(path).await? {
        debug!("store snapshot {} missing, starting empty", path.display());
        return Ok(Tables::default());
    }
    let data = fs::read(path).await?;
    let tables: Tables = serde_json::from_slice(&data)?;
    debug!(
        "store snapshot loaded: questions={} citations={}",
        tables.questions.len(),
        tables.citations.len()
    );
    Ok(tables)
}

async fn store_snapshot(path: &Path, tables: &Tables) -> StoreResult<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).await?;
        }
    }
    let json = serde_json::to_vec_pretty(tables)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, json).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}
