//! PDF backend: turns a [`ReportLayout`] into document bytes with `lopdf`.
//!
//! Base-14 Helvetica fonts with WinAnsi encoding, so no font files are
//! embedded. Every page gets a centered "Page n of m" footer.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};

use crate::errors::ReportResult;
use crate::geometry::{MM_TO_PT, PageGeometry};
use crate::layout::{DrawOp, ReportLayout};
use crate::measure::{HelveticaMetrics, TextMeasure, TextStyle};

const FOOTER: TextStyle = TextStyle::regular(8.0);
const STROKE_GRAY: f32 = 0.45;
const LINE_WIDTH_PT: f32 = 0.5;

pub fn render_pdf(layout: &ReportLayout, title: &str) -> ReportResult<Vec<u8>> {
    let g = layout.geometry;
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(font("Helvetica"));
    let bold = doc.add_object(font("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let total = layout.page_count();
    let mut kids: Vec<Object> = Vec::with_capacity(total);
    for (idx, page) in layout.pages.iter().enumerate() {
        let mut ops = Vec::new();
        for op in &page.ops {
            encode_op(&mut ops, op, &g);
        }
        footer(&mut ops, &g, idx + 1, total);

        let content = Content { operations: ops };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => total as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            (g.width * MM_TO_PT).into(),
            (g.height * MM_TO_PT).into(),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => pdf_text(title),
        "Producer" => pdf_text("audit-desk"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut buf = Vec::new();
    doc.save_to(&mut buf)?;
    Ok(buf)
}

fn font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn pdf_text(text: &str) -> Object {
    Object::String(encode_win_ansi(text), StringFormat::Hexadecimal)
}

/// Page y (mm from top) to PDF y (pt from bottom).
fn flip(g: &PageGeometry, y_mm: f32) -> f32 {
    (g.height - y_mm) * MM_TO_PT
}

fn encode_op(out: &mut Vec<Operation>, op: &DrawOp, g: &PageGeometry) {
    match op {
        DrawOp::Text {
            x,
            baseline,
            style,
            text,
        } => text_ops(out, *x, flip(g, *baseline), *style, text),
        DrawOp::Rect {
            x,
            y,
            w,
            h,
            fill,
            stroke,
        } => {
            if fill.is_none() && !stroke {
                return;
            }
            out.push(Operation::new("w", vec![LINE_WIDTH_PT.into()]));
            out.push(Operation::new("G", vec![STROKE_GRAY.into()]));
            if let Some(gray) = fill {
                out.push(Operation::new("g", vec![(*gray).into()]));
            }
            out.push(Operation::new(
                "re",
                vec![
                    (x * MM_TO_PT).into(),
                    flip(g, y + h).into(),
                    (w * MM_TO_PT).into(),
                    (h * MM_TO_PT).into(),
                ],
            ));
            let paint = match (fill.is_some(), *stroke) {
                (true, true) => "B",
                (true, false) => "f",
                _ => "S",
            };
            out.push(Operation::new(paint, vec![]));
        }
        DrawOp::Line { x1, y1, x2, y2 } => {
            out.push(Operation::new("w", vec![LINE_WIDTH_PT.into()]));
            out.push(Operation::new("G", vec![STROKE_GRAY.into()]));
            out.push(Operation::new(
                "m",
                vec![(x1 * MM_TO_PT).into(), flip(g, *y1).into()],
            ));
            out.push(Operation::new(
                "l",
                vec![(x2 * MM_TO_PT).into(), flip(g, *y2).into()],
            ));
            out.push(Operation::new("S", vec![]));
        }
    }
}

fn text_ops(out: &mut Vec<Operation>, x_mm: f32, y_pt: f32, style: TextStyle, text: &str) {
    let font = if style.bold { "F2" } else { "F1" };
    out.push(Operation::new("g", vec![0.into()]));
    out.push(Operation::new("BT", vec![]));
    out.push(Operation::new(
        "Tf",
        vec![Object::Name(font.as_bytes().to_vec()), style.size_pt.into()],
    ));
    out.push(Operation::new("Td", vec![(x_mm * MM_TO_PT).into(), y_pt.into()]));
    out.push(Operation::new("Tj", vec![pdf_text(text)]));
    out.push(Operation::new("ET", vec![]));
}

fn footer(out: &mut Vec<Operation>, g: &PageGeometry, page: usize, total: usize) {
    let label = format!("Page {page} of {total}");
    let width = HelveticaMetrics.width(&label, FOOTER);
    let x = (g.width - width) / 2.0;
    let baseline = g.height - g.bottom_margin / 2.0;
    text_ops(out, x, flip(g, baseline), FOOTER, &label);
}

/// Maps text to WinAnsi (cp1252) bytes; unmappable chars become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\t' | '\n' | '\r' => b' ',
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{LayoutCursor, PageGeometry};
    use crate::layout::{BoxStyle, LayoutEngine};
    use crate::measure::MonospaceMeasure;

    #[test]
    fn win_ansi_mapping() {
        assert_eq!(encode_win_ansi("A b"), b"A b".to_vec());
        assert_eq!(encode_win_ansi("• x…"), vec![0x95, b' ', b'x', 0x85]);
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }

    #[test]
    fn renders_a_loadable_document() {
        let measure = MonospaceMeasure { char_width: 2.0 };
        let geometry = PageGeometry::a4();
        let mut eng = LayoutEngine::new(&measure, geometry);
        let cur = LayoutCursor::start(geometry);
        eng.text_at(cur, 20.0, "Hello (report)", TextStyle::bold(12.0));
        let cur = eng.boxed(
            cur.advance(10.0),
            BoxStyle {
                x: 20.0,
                width: 170.0,
                padding: 2.0,
                fill: Some(0.9),
                stroke: true,
            },
            &["• evidence".to_string()],
            TextStyle::regular(9.0),
        );
        let cur = eng.start_page(cur);
        eng.rule(cur);
        let layout = eng.finish();

        let bytes = render_pdf(&layout, "Test").unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }
}
