//! Report sections: title block, paginated summary table, per-record details.

use audit_evidence::decode_file_name;
use audit_store::{Citation, has_value};

use crate::errors::ReportResult;
use crate::geometry::LayoutCursor;
use crate::layout::{BoxStyle, DrawOp, LayoutEngine, ReportLayout};
use crate::measure::{TextMeasure, TextStyle};
use crate::record::{ReportEntry, ReportOptions};

const TITLE: TextStyle = TextStyle::bold(18.0);
const SUBTITLE: TextStyle = TextStyle::regular(12.0);
const META: TextStyle = TextStyle::regular(10.0);
const HEADING: TextStyle = TextStyle::bold(14.0);
const CELL: TextStyle = TextStyle::regular(9.0);
const CELL_HEAD: TextStyle = TextStyle::bold(9.0);
const RECORD_TITLE: TextStyle = TextStyle::bold(11.0);
const LABEL: TextStyle = TextStyle::bold(10.0);
const BODY: TextStyle = TextStyle::regular(10.0);
const CITE_HEAD: TextStyle = TextStyle::bold(9.0);
const CITE_BODY: TextStyle = TextStyle::regular(9.0);

const CELL_PAD: f32 = 2.0;
const BOX_PAD: f32 = 2.0;
/// A summary row never starts with less room than this below the cursor.
const MIN_ROW_SPACE: f32 = 15.0;
const HEADER_FILL: f32 = 0.85;
const CITE_HEAD_FILL: f32 = 0.92;

pub const ELLIPSIS: char = '…';
pub const SUMMARY_HEADERS: [&str; 3] = ["ID", "Question", "Document Evaluation"];

/// Summary column widths; 20/70/80 mm on A4, scaled for other widths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryColumns {
    pub id: f32,
    pub question: f32,
    pub evaluation: f32,
}

impl SummaryColumns {
    pub fn for_width(printable: f32) -> Self {
        let scale = printable / 170.0;
        let id = 20.0 * scale;
        let question = 70.0 * scale;
        Self {
            id,
            question,
            evaluation: printable - id - question,
        }
    }

    fn widths(&self) -> [f32; 3] {
        [self.id, self.question, self.evaluation]
    }
}

/// Lays out the whole report. Entries are rendered in the given order.
pub fn layout_report<M: TextMeasure + ?Sized>(
    entries: &[ReportEntry],
    options: &ReportOptions,
    measure: &M,
) -> ReportResult<ReportLayout> {
    options.geometry.validate()?;

    let mut eng = LayoutEngine::new(measure, options.geometry);
    let cur = LayoutCursor::start(options.geometry);
    let cur = title_block(&mut eng, cur, options);
    let cur = summary_table(&mut eng, cur, entries);
    if !entries.is_empty() {
        details(&mut eng, cur, entries);
    }
    Ok(eng.finish())
}

fn title_block<M: TextMeasure + ?Sized>(
    eng: &mut LayoutEngine<'_, M>,
    cur: LayoutCursor,
    options: &ReportOptions,
) -> LayoutCursor {
    let width = cur.geometry.printable_width();
    let mut cur = eng.paragraph(cur, cur.left(), width, &options.title, TITLE);
    cur = cur.advance(2.0);

    if !options.auditee_name.trim().is_empty() {
        let line = format!("Auditee: {}", options.auditee_name.trim());
        cur = eng.paragraph(cur, cur.left(), width, &line, SUBTITLE);
    }

    let meta = [
        format!("Created: {}", options.created_label()),
        "Prepared by: ______________________".to_string(),
        "Approved by: ______________________".to_string(),
        "Approval date: ____________________".to_string(),
    ];
    for line in &meta {
        cur = eng.paragraph(cur, cur.left(), width, line, META);
    }
    cur.advance(8.0)
}

fn summary_table<M: TextMeasure + ?Sized>(
    eng: &mut LayoutEngine<'_, M>,
    cur: LayoutCursor,
    entries: &[ReportEntry],
) -> LayoutCursor {
    let cols = SummaryColumns::for_width(cur.geometry.printable_width());
    let head_h = CELL_HEAD.line_height() + 2.0 * CELL_PAD;
    let lh = CELL.line_height();

    let cur = eng.ensure_space(cur, HEADING.line_height() + head_h + MIN_ROW_SPACE);
    eng.text_at(cur, cur.left(), "Summary", HEADING);
    let cur = cur.advance(HEADING.line_height() + 2.0);
    let mut cur = table_header(eng, cur, cols);

    let max_row_h = cur.geometry.printable_height() - head_h;
    let max_lines = (((max_row_h - 2.0 * CELL_PAD) / lh).floor() as usize).max(1);

    for entry in entries {
        let r = &entry.record;
        let mut cells = [
            eng.wrap(&r.id, CELL, cols.id - 2.0 * CELL_PAD),
            eng.wrap(&r.question, CELL, cols.question - 2.0 * CELL_PAD),
            eng.wrap(&r.document_evaluation, CELL, cols.evaluation - 2.0 * CELL_PAD),
        ];
        for cell in &mut cells {
            clip_lines(cell, max_lines);
        }
        let n = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
        let row_h = n as f32 * lh + 2.0 * CELL_PAD;

        let next = eng.ensure_space(cur, row_h.max(MIN_ROW_SPACE));
        cur = if next.page != cur.page {
            table_header(eng, next, cols)
        } else {
            next
        };

        let mut x = cur.left();
        for (cell, w) in cells.iter().zip(cols.widths()) {
            eng.push(
                cur.page,
                DrawOp::Rect {
                    x,
                    y: cur.y,
                    w,
                    h: row_h,
                    fill: None,
                    stroke: true,
                },
            );
            let mut line_cur = cur.advance(CELL_PAD);
            for line in cell {
                eng.text_at(line_cur, x + CELL_PAD, line, CELL);
                line_cur = line_cur.advance(lh);
            }
            x += w;
        }
        cur = cur.advance(row_h);
    }

    cur.advance(8.0)
}

/// Keeps at most `max` lines; a clipped cell ends with an ellipsis.
fn clip_lines(lines: &mut Vec<String>, max: usize) {
    if lines.len() <= max {
        return;
    }
    lines.truncate(max);
    if let Some(last) = lines.last_mut() {
        if last.chars().count() > 1 {
            last.pop();
        }
        last.push(ELLIPSIS);
    }
}

fn table_header<M: TextMeasure + ?Sized>(
    eng: &mut LayoutEngine<'_, M>,
    cur: LayoutCursor,
    cols: SummaryColumns,
) -> LayoutCursor {
    let h = CELL_HEAD.line_height() + 2.0 * CELL_PAD;
    let mut x = cur.left();
    for (title, w) in SUMMARY_HEADERS.iter().zip(cols.widths()) {
        eng.push(
            cur.page,
            DrawOp::Rect {
                x,
                y: cur.y,
                w,
                h,
                fill: Some(HEADER_FILL),
                stroke: true,
            },
        );
        eng.text_at(cur.advance(CELL_PAD), x + CELL_PAD, title, CELL_HEAD);
        x += w;
    }
    cur.advance(h)
}

fn details<M: TextMeasure + ?Sized>(
    eng: &mut LayoutEngine<'_, M>,
    cur: LayoutCursor,
    entries: &[ReportEntry],
) -> LayoutCursor {
    let width = cur.geometry.printable_width();
    let mut cur = eng.start_page(cur);
    eng.text_at(cur, cur.left(), "Detailed Findings", HEADING);
    cur = cur.advance(HEADING.line_height() + 4.0);

    for (idx, entry) in entries.iter().enumerate() {
        let r = &entry.record;

        let title = eng.wrap(&format!("{}. {}", r.id, r.question), RECORD_TITLE, width);
        let keep = title.len() as f32 * RECORD_TITLE.line_height() + 2.0 * LABEL.line_height();
        cur = eng.ensure_space(cur, keep);
        cur = eng.lines(cur, cur.left(), &title, RECORD_TITLE);
        cur = cur.advance(2.0);

        if entry.citations.is_empty() {
            cur = labeled_block(eng, cur, "Evidence", &r.evidence);
            cur = labeled_block(eng, cur, "Source", &r.source);
        } else {
            for citation in &entry.citations {
                cur = citation_boxes(eng, cur, citation);
            }
            if has_value(&r.source) {
                let line = format!("Sources: {}", r.source);
                cur = eng.paragraph(cur, cur.left(), width, &line, BODY);
                cur = cur.advance(2.0);
            }
        }

        for (label, text) in [
            ("Field Audit Findings", &r.field_audit_findings),
            ("Control Evaluation", &r.control_evaluation),
            ("Remediation Guidance", &r.remediation_guidance),
        ] {
            if has_value(text) {
                cur = labeled_block(eng, cur, label, text);
            }
        }

        if idx + 1 < entries.len() {
            cur = eng.ensure_space(cur.advance(3.0), 6.0);
            cur = eng.rule(cur).advance(5.0);
        }
    }
    cur
}

/// Shaded header box with the decoded file name, then a bordered content box.
fn citation_boxes<M: TextMeasure + ?Sized>(
    eng: &mut LayoutEngine<'_, M>,
    cur: LayoutCursor,
    citation: &Citation,
) -> LayoutCursor {
    let x = cur.left();
    let width = cur.geometry.printable_width();
    let inner = width - 2.0 * BOX_PAD;

    let head = eng.wrap(&decode_file_name(&citation.file_name), CITE_HEAD, inner);
    let body = eng.wrap(&citation.content, CITE_BODY, inner);

    let head_h = head.len() as f32 * CITE_HEAD.line_height() + 2.0 * BOX_PAD;
    let first_body = CITE_BODY.line_height() + 2.0 * BOX_PAD;
    let cur = eng.ensure_space(cur, head_h + first_body);

    let cur = eng.boxed(
        cur,
        BoxStyle {
            x,
            width,
            padding: BOX_PAD,
            fill: Some(CITE_HEAD_FILL),
            stroke: true,
        },
        &head,
        CITE_HEAD,
    );
    let cur = eng.boxed(
        cur,
        BoxStyle {
            x,
            width,
            padding: BOX_PAD,
            fill: None,
            stroke: true,
        },
        &body,
        CITE_BODY,
    );
    cur.advance(4.0)
}

/// Bold label line followed by the wrapped text.
fn labeled_block<M: TextMeasure + ?Sized>(
    eng: &mut LayoutEngine<'_, M>,
    cur: LayoutCursor,
    label: &str,
    text: &str,
) -> LayoutCursor {
    let width = cur.geometry.printable_width();
    let lines = eng.wrap(text, BODY, width);
    let est = LABEL.line_height() + lines.len() as f32 * BODY.line_height();

    let cur = eng.ensure_space(cur, est);
    eng.text_at(cur, cur.left(), &format!("{label}:"), LABEL);
    let cur = eng.lines(cur.advance(LABEL.line_height()), cur.left(), &lines, BODY);
    cur.advance(3.0)
}
