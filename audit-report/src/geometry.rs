//! Page dimensions and the layout cursor (all values in millimetres, y grows downwards).

use crate::errors::{ReportError, ReportResult};

/// Points per millimetre.
pub const MM_TO_PT: f32 = 72.0 / 25.4;
/// Millimetres per point.
pub const PT_TO_MM: f32 = 25.4 / 72.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    /// Left, right and top margin.
    pub margin: f32,
    /// Space kept free at the bottom of every page (footer lives there).
    pub bottom_margin: f32,
}

impl PageGeometry {
    /// A4 portrait, 20 mm margins: 170 × 257 mm printable.
    pub fn a4() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margin: 20.0,
            bottom_margin: 20.0,
        }
    }

    pub fn printable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn printable_height(&self) -> f32 {
        self.content_bottom() - self.margin
    }

    /// Lowest y any block may reach.
    pub fn content_bottom(&self) -> f32 {
        self.height - self.bottom_margin
    }

    pub fn validate(&self) -> ReportResult<()> {
        if self.printable_width() <= 10.0 || self.printable_height() <= 20.0 {
            return Err(ReportError::Geometry(format!(
                "{}x{} mm with margins {}/{} leaves no room for content",
                self.width, self.height, self.margin, self.bottom_margin
            )));
        }
        Ok(())
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// Render-time position: which page, and how far down it the next block starts.
///
/// Invariant: `y <= geometry.content_bottom()` for any block already placed;
/// the engine moves to a new page before a block would cross that line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    pub geometry: PageGeometry,
    pub page: usize,
    pub y: f32,
}

impl LayoutCursor {
    /// Top of the first page.
    pub fn start(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            page: 0,
            y: geometry.margin,
        }
    }

    pub fn remaining(&self) -> f32 {
        self.geometry.content_bottom() - self.y
    }

    pub fn at_page_top(&self) -> bool {
        (self.y - self.geometry.margin).abs() < f32::EPSILON
    }

    pub fn advance(self, dy: f32) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }

    pub fn next_page(self) -> Self {
        Self {
            page: self.page + 1,
            y: self.geometry.margin,
            ..self
        }
    }

    pub fn left(&self) -> f32 {
        self.geometry.margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_printable_area() {
        let g = PageGeometry::a4();
        assert_eq!(g.printable_width(), 170.0);
        assert_eq!(g.printable_height(), 257.0);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn tiny_page_is_rejected() {
        let g = PageGeometry {
            width: 30.0,
            height: 40.0,
            margin: 10.0,
            bottom_margin: 10.0,
        };
        assert!(g.validate().is_err());
    }

    #[test]
    fn next_page_resets_to_top_margin() {
        let c = LayoutCursor::start(PageGeometry::a4()).advance(100.0);
        assert_eq!(c.remaining(), 157.0);
        let n = c.next_page();
        assert_eq!(n.page, 1);
        assert_eq!(n.y, 20.0);
        assert!(n.at_page_top());
    }
}
