//! Text measurement and word wrapping.
//!
//! Widths are in millimetres. [`HelveticaMetrics`] uses the standard
//! Helvetica advance widths so wrapping matches what the PDF viewer draws;
//! [`MonospaceMeasure`] makes layout arithmetic predictable in tests.

use crate::geometry::PT_TO_MM;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_pt: f32,
    pub bold: bool,
}

impl TextStyle {
    pub const fn regular(size_pt: f32) -> Self {
        Self {
            size_pt,
            bold: false,
        }
    }

    pub const fn bold(size_pt: f32) -> Self {
        Self { size_pt, bold: true }
    }

    /// Vertical advance of one line, mm.
    pub fn line_height(&self) -> f32 {
        self.size_pt * PT_TO_MM * 1.35
    }

    /// Distance from the top of a line box to its baseline, mm.
    pub fn baseline_offset(&self) -> f32 {
        self.line_height() * 0.78
    }
}

pub trait TextMeasure {
    /// Rendered width of `text` in `style`, mm.
    fn width(&self, text: &str, style: TextStyle) -> f32;
}

/// Helvetica / Helvetica-Bold metrics (units of 1/1000 em).
#[derive(Debug, Clone, Copy, Default)]
pub struct HelveticaMetrics;

/// Advance widths for ASCII 32..=126.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, //
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, //
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, //
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Bold glyphs run wider; a flat factor keeps the estimate on the safe side.
const BOLD_FACTOR: f32 = 1.1;

impl HelveticaMetrics {
    fn glyph_units(c: char) -> u16 {
        match c {
            ' '..='~' => HELVETICA_ASCII[(c as usize) - 32],
            '•' => 350,
            '…' | '—' => 1000,
            '–' => 556,
            '‘' | '’' => 222,
            '“' | '”' => 333,
            _ => 556,
        }
    }
}

impl TextMeasure for HelveticaMetrics {
    fn width(&self, text: &str, style: TextStyle) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(Self::glyph_units(c))).sum();
        let factor = if style.bold { BOLD_FACTOR } else { 1.0 };
        units as f32 / 1000.0 * style.size_pt * PT_TO_MM * factor
    }
}

/// Every char is `char_width` mm wide regardless of style.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasure {
    pub char_width: f32,
}

impl TextMeasure for MonospaceMeasure {
    fn width(&self, text: &str, _style: TextStyle) -> f32 {
        text.chars().count() as f32 * self.char_width
    }
}

/// Greedy word wrap to `max_width`.
///
/// Explicit newlines always break. Words wider than a line are split at
/// char boundaries. Never returns an empty vec; empty input is one empty line.
pub fn wrap_text<M: TextMeasure + ?Sized>(
    measure: &M,
    text: &str,
    style: TextStyle,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if measure.width(&candidate, style) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
            while measure.width(&current, style) > max_width {
                let (head, tail) = split_to_fit(measure, &current, style, max_width);
                lines.push(head);
                current = tail;
            }
        }

        lines.push(current);
    }

    lines
}

/// Longest char prefix that fits (at least one char), and the rest.
fn split_to_fit<M: TextMeasure + ?Sized>(
    measure: &M,
    word: &str,
    style: TextStyle,
    max_width: f32,
) -> (String, String) {
    let mut cut = 0;
    for (idx, c) in word.char_indices() {
        let end = idx + c.len_utf8();
        if measure.width(&word[..end], style) > max_width {
            break;
        }
        cut = end;
    }
    if cut == 0 {
        cut = word.chars().next().map_or(word.len(), char::len_utf8);
    }
    (word[..cut].to_string(), word[cut..].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONO: MonospaceMeasure = MonospaceMeasure { char_width: 1.0 };
    const BODY: TextStyle = TextStyle::regular(10.0);

    #[test]
    fn greedy_wrap_fills_lines() {
        let lines = wrap_text(&MONO, "aaa bbb ccc ddd", BODY, 7.0);
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn newlines_are_preserved() {
        let lines = wrap_text(&MONO, "• one\n• two\n\nend", BODY, 50.0);
        assert_eq!(lines, vec!["• one", "• two", "", "end"]);
    }

    #[test]
    fn long_word_is_hard_split() {
        let lines = wrap_text(&MONO, "ab abcdefghij", BODY, 4.0);
        assert_eq!(lines, vec!["ab", "abcd", "efgh", "ij"]);
    }

    #[test]
    fn empty_text_is_one_line() {
        assert_eq!(wrap_text(&MONO, "", BODY, 10.0), vec![String::new()]);
    }

    #[test]
    fn width_narrower_than_a_char_still_progresses() {
        let lines = wrap_text(&MONO, "abc", BODY, 0.5);
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn helvetica_widths() {
        let m = HelveticaMetrics;
        let style = TextStyle::regular(10.0);
        // "i" is 222 units, "W" 944.
        assert!(m.width("W", style) > 4.0 * m.width("i", style));
        assert!(m.width("abc", TextStyle::bold(10.0)) > m.width("abc", style));
        // 10 digits at 10pt: 5560/1000 * 10pt.
        let w = m.width("0123456789", style);
        assert!((w - 55.6 * PT_TO_MM).abs() < 1e-3);
    }
}
