//! Crate-wide error hierarchy for audit-evidence.
//!
//! - Single root `EvidenceError` for the refresh pipeline.
//! - `MalformedUpstream` describes why the strict stage (or the salvage) gave
//!   up on a webhook payload. It is only ever logged: a malformed payload
//!   degrades to "no evidence", it is not a failure.

use thiserror::Error;

use ai_webhook_service::AiWebhookError;
use audit_store::StoreError;

/// Convenient alias for crate-wide results.
pub type EvidenceResult<T> = Result<T, EvidenceError>;

/// Root error type for the audit-evidence crate.
#[derive(Debug, Error)]
pub enum EvidenceError {
    /// Webhook unreachable, non-2xx, or undecodable body.
    #[error(transparent)]
    Webhook(#[from] AiWebhookError),

    /// Store read/write failure that could not be tolerated.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Input validation errors (empty ids etc.).
    #[error("validation error: {0}")]
    Validation(String),
}

/// Reasons a webhook `output` payload could not be read as citations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedUpstream {
    /// `output` is not valid JSON.
    #[error("output is not valid JSON: {0}")]
    InvalidJson(String),

    /// `output` is JSON but not an array.
    #[error("output is JSON but not an array (got {0})")]
    NotAnArray(&'static str),

    /// Salvage found different numbers of contents and file names.
    #[error("salvage found {contents} pageContent values but {files} file_name values")]
    SalvageMismatch { contents: usize, files: usize },
}
