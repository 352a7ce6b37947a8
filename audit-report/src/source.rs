//! Citation fetching for report export.

use std::fmt::Display;
use std::future::Future;

use futures::future::join_all;
use tracing::{debug, warn};

use audit_store::{Citation, StoreClient, StoreError};

use crate::record::{ReportEntry, ReportRecord};

/// Anything that can list the citations of a question.
pub trait CitationSource {
    type Error: Display;

    fn fetch_citations(
        &self,
        question_id: &str,
    ) -> impl Future<Output = Result<Vec<Citation>, Self::Error>> + Send;
}

impl CitationSource for StoreClient {
    type Error = StoreError;

    fn fetch_citations(
        &self,
        question_id: &str,
    ) -> impl Future<Output = Result<Vec<Citation>, StoreError>> + Send {
        self.select_citations(question_id)
    }
}

/// Fetches citations for all records concurrently and pairs them up in input order.
///
/// A failed fetch is logged and leaves that record with no citations, so it
/// renders from its flat evidence/source fields.
pub async fn collect_entries<S: CitationSource>(
    source: &S,
    records: Vec<ReportRecord>,
) -> Vec<ReportEntry> {
    let fetched = join_all(records.iter().map(|r| source.fetch_citations(&r.id))).await;

    records
        .into_iter()
        .zip(fetched)
        .map(|(record, res)| {
            let citations = match res {
                Ok(c) => c,
                Err(e) => {
                    warn!("report: citations for {} unavailable: {e}", record.id);
                    Vec::new()
                }
            };
            debug!("report: {} -> {} citation(s)", record.id, citations.len());
            ReportEntry { record, citations }
        })
        .collect()
}
