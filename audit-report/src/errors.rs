//! Typed error for the audit-report crate.
//!
//! Only whole-export failures live here. A failed citation fetch for one
//! question is not an error: that question falls back to its flat fields.

use thiserror::Error;

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Page geometry leaves no printable area.
    #[error("invalid page geometry: {0}")]
    Geometry(String),

    /// PDF object/stream encoding failed.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Writing the document bytes failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
