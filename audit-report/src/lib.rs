//! Paginated PDF export of an auditee's questionnaire.
//!
//! Two layers:
//! 1) **Layout** ([`layout`], [`report`]): pure and backend-independent. Text
//!    is measured and wrapped, blocks are placed with a [`LayoutCursor`] and
//!    a page is started whenever the next block would cross the bottom margin.
//!    The summary table repeats its header once on every new page.
//! 2) **Backend** ([`pdf`]): draws the laid-out pages with `lopdf`.
//!
//! Citations for all records are fetched concurrently before layout; a
//! failed fetch degrades that record to its flat evidence/source fields.

use std::time::Instant;

use tracing::{debug, info, instrument};

pub mod errors;
pub mod geometry;
pub mod layout;
pub mod measure;
pub mod pdf;
pub mod record;
pub mod report;
pub mod source;

pub use errors::{ReportError, ReportResult};
pub use geometry::{LayoutCursor, PageGeometry};
pub use layout::{DrawOp, LayoutEngine, Page, ReportLayout};
pub use measure::{HelveticaMetrics, MonospaceMeasure, TextMeasure, TextStyle, wrap_text};
pub use pdf::render_pdf;
pub use record::{ReportEntry, ReportOptions, ReportRecord};
pub use report::layout_report;
pub use source::{CitationSource, collect_entries};

/// Fetches citations, lays out and renders the report. Returns PDF bytes.
///
/// # Errors
/// [`ReportError::Geometry`] for unusable page geometry, [`ReportError::Pdf`] /
/// [`ReportError::Io`] if the document cannot be encoded.
#[instrument(skip_all, fields(records = records.len()))]
pub async fn export_report<S: CitationSource>(
    source: &S,
    records: Vec<ReportRecord>,
    options: &ReportOptions,
) -> ReportResult<Vec<u8>> {
    options.geometry.validate()?;
    let t0 = Instant::now();

    let entries = collect_entries(source, records).await;
    debug!("report: citations fetched in {} ms", t0.elapsed().as_millis());

    let layout = layout_report(&entries, options, &HelveticaMetrics)?;
    let bytes = render_pdf(&layout, &options.title)?;

    info!(
        "report: {} record(s), {} page(s), {} bytes in {} ms",
        entries.len(),
        layout.page_count(),
        bytes.len(),
        t0.elapsed().as_millis()
    );
    Ok(bytes)
}
