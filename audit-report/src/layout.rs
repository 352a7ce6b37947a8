//! Backend-independent layout engine.
//!
//! Produces a [`ReportLayout`]: one list of [`DrawOp`]s per page, in mm from
//! the page's top-left corner. The cursor is threaded by value through every
//! call; `ensure_space` is the only place that starts a new page before a block.

use crate::geometry::{LayoutCursor, PageGeometry};
use crate::measure::{TextMeasure, TextStyle, wrap_text};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        baseline: f32,
        style: TextStyle,
        text: String,
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        /// Gray level 0.0 (black) ..= 1.0 (white).
        fill: Option<f32>,
        stroke: bool,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

impl ReportLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of text ops equal to `needle` on `page`.
    pub fn count_text(&self, page: usize, needle: &str) -> usize {
        self.pages
            .get(page)
            .map_or(0, |p| p.texts().filter(|t| *t == needle).count())
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.pages
            .iter()
            .any(|p| p.texts().any(|t| t.contains(needle)))
    }
}

/// Box drawing parameters.
#[derive(Debug, Clone, Copy)]
pub struct BoxStyle {
    pub x: f32,
    pub width: f32,
    pub padding: f32,
    pub fill: Option<f32>,
    pub stroke: bool,
}

pub struct LayoutEngine<'m, M: TextMeasure + ?Sized> {
    measure: &'m M,
    layout: ReportLayout,
}

impl<'m, M: TextMeasure + ?Sized> LayoutEngine<'m, M> {
    pub fn new(measure: &'m M, geometry: PageGeometry) -> Self {
        Self {
            measure,
            layout: ReportLayout {
                geometry,
                pages: vec![Page::default()],
            },
        }
    }

    pub fn finish(self) -> ReportLayout {
        self.layout
    }

    pub fn wrap(&self, text: &str, style: TextStyle, width: f32) -> Vec<String> {
        wrap_text(self.measure, text, style, width)
    }

    pub fn text_width(&self, text: &str, style: TextStyle) -> f32 {
        self.measure.width(text, style)
    }

    pub fn push(&mut self, page: usize, op: DrawOp) {
        self.open_page(page);
        self.layout.pages[page].ops.push(op);
    }

    fn open_page(&mut self, page: usize) {
        while self.layout.pages.len() <= page {
            self.layout.pages.push(Page::default());
        }
    }

    /// Moves to the next page unless `needed` mm fit below the cursor.
    ///
    /// A cursor already at the top of a page stays put: the block would not
    /// fit on a fresh page either, and the caller has to split or clip it.
    pub fn ensure_space(&mut self, cur: LayoutCursor, needed: f32) -> LayoutCursor {
        if needed <= cur.remaining() || cur.at_page_top() {
            return cur;
        }
        self.start_page(cur)
    }

    /// Unconditional page break (no-op at the top of an empty page).
    pub fn start_page(&mut self, cur: LayoutCursor) -> LayoutCursor {
        if cur.at_page_top() && self.page_is_empty(cur.page) {
            return cur;
        }
        let next = cur.next_page();
        self.open_page(next.page);
        next
    }

    fn page_is_empty(&self, page: usize) -> bool {
        self.layout.pages.get(page).is_none_or(|p| p.ops.is_empty())
    }

    /// Draws one line of text in the line box starting at `cur.y`; does not advance.
    pub fn text_at(&mut self, cur: LayoutCursor, x: f32, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        self.push(
            cur.page,
            DrawOp::Text {
                x,
                baseline: cur.y + style.baseline_offset(),
                style,
                text: text.to_string(),
            },
        );
    }

    /// Flows pre-wrapped lines, breaking pages between lines as needed.
    pub fn lines(
        &mut self,
        mut cur: LayoutCursor,
        x: f32,
        lines: &[String],
        style: TextStyle,
    ) -> LayoutCursor {
        let lh = style.line_height();
        for line in lines {
            cur = self.ensure_space(cur, lh);
            self.text_at(cur, x, line, style);
            cur = cur.advance(lh);
        }
        cur
    }

    /// Wraps `text` to `width` and flows it.
    pub fn paragraph(
        &mut self,
        cur: LayoutCursor,
        x: f32,
        width: f32,
        text: &str,
        style: TextStyle,
    ) -> LayoutCursor {
        let lines = self.wrap(text, style, width);
        self.lines(cur, x, &lines, style)
    }

    /// Draws `lines` inside a padded box.
    ///
    /// A box that fits a page is never split. A taller one starts on a fresh
    /// page and continues as further boxes on the following pages.
    pub fn boxed(
        &mut self,
        mut cur: LayoutCursor,
        frame: BoxStyle,
        lines: &[String],
        style: TextStyle,
    ) -> LayoutCursor {
        let lh = style.line_height();
        let mut rest = lines;

        loop {
            let full = rest.len() as f32 * lh + 2.0 * frame.padding;
            let page_h = cur.geometry.printable_height();
            cur = self.ensure_space(cur, full.min(page_h));

            let fit = ((cur.remaining() - 2.0 * frame.padding) / lh + 1e-3)
                .floor()
                .max(1.0) as usize;
            let take = fit.min(rest.len()).max(1);
            let (chunk, tail) = rest.split_at(take.min(rest.len()));
            let h = chunk.len().max(1) as f32 * lh + 2.0 * frame.padding;

            self.push(
                cur.page,
                DrawOp::Rect {
                    x: frame.x,
                    y: cur.y,
                    w: frame.width,
                    h,
                    fill: frame.fill,
                    stroke: frame.stroke,
                },
            );
            let mut line_cur = cur.advance(frame.padding);
            for line in chunk {
                self.text_at(line_cur, frame.x + frame.padding, line, style);
                line_cur = line_cur.advance(lh);
            }
            cur = cur.advance(h);

            if tail.is_empty() {
                return cur;
            }
            rest = tail;
            cur = self.start_page(cur);
        }
    }

    /// Horizontal rule across the printable width.
    pub fn rule(&mut self, cur: LayoutCursor) -> LayoutCursor {
        let x1 = cur.left();
        let x2 = x1 + cur.geometry.printable_width();
        self.push(
            cur.page,
            DrawOp::Line {
                x1,
                y1: cur.y,
                x2,
                y2: cur.y,
            },
        );
        cur
    }
}
