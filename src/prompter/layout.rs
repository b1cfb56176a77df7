//! Lays content out in terminal cells
//!
//! Wrapping follows `white-space: pre-wrap` with `overflow-wrap: break-word`:
//! newlines always break, runs of spaces are kept, lines break at the last
//! space that fits, and a word wider than the row is split where it
//! overflows. Spaces at the end of a wrapped row hang and are dropped.

use super::engine::Extent;
use super::render::{RenderModel, CELL_HEIGHT_PX};
use unicode_width::UnicodeWidthChar;

const TAB_WIDTH: usize = 4;

/// One rendered row of text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutRow {
    glyphs: Vec<char>,
    /// Cells occupied, letter spacing included
    width: u16,
}

impl LayoutRow {
    pub fn width(&self) -> u16 {
        self.width
    }

    #[cfg(test)]
    pub fn text(&self) -> String {
        self.glyphs.iter().collect()
    }

    /// The row as drawn: `gap` blank cells between glyphs, glyph order
    /// reversed when mirrored
    pub fn display(&self, gap: u16, mirrored: bool) -> String {
        let spacer = " ".repeat(gap as usize);
        let mut out = String::with_capacity(self.glyphs.len() * (1 + gap as usize));
        let mut push = |i: usize, ch: char| {
            if i > 0 && !spacer.is_empty() && ch.width().unwrap_or(0) > 0 {
                out.push_str(&spacer);
            }
            out.push(ch);
        };
        if mirrored {
            self.glyphs.iter().rev().enumerate().for_each(|(i, c)| push(i, *c));
        } else {
            self.glyphs.iter().enumerate().for_each(|(i, c)| push(i, *c));
        }
        out
    }
}

/// Content wrapped for one render model
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextLayout {
    lines: Vec<LayoutRow>,
    row_pitch: u16,
    pad_top: u16,
    pad_bottom: u16,
    viewport_rows: u16,
}

impl TextLayout {
    pub fn compute(text: &str, model: &RenderModel) -> Self {
        Self {
            lines: wrap(text, model.text_width(), model.text.glyph_gap()),
            row_pitch: model.text.row_pitch(),
            pad_top: model.padding.top,
            pad_bottom: model.padding.bottom,
            viewport_rows: model.panel.height,
        }
    }

    /// Rows of the scroll container, padding included
    pub fn total_rows(&self) -> usize {
        self.pad_top as usize + self.lines.len() * self.row_pitch as usize + self.pad_bottom as usize
    }

    /// Text on container row `index`; `None` for padding and line spacing
    pub fn row(&self, index: usize) -> Option<&LayoutRow> {
        let index = index.checked_sub(self.pad_top as usize)?;
        let pitch = self.row_pitch.max(1) as usize;
        if index % pitch != 0 {
            return None;
        }
        self.lines.get(index / pitch)
    }

    /// The container rows visible at `scroll_top` (virtual pixels)
    pub fn visible(&self, scroll_top: f64) -> Vec<Option<&LayoutRow>> {
        let first = (scroll_top.max(0.0) / CELL_HEIGHT_PX).floor() as usize;
        (first..first + self.viewport_rows as usize)
            .map(|i| self.row(i))
            .collect()
    }

    pub fn extent(&self) -> Extent {
        Extent::new(
            self.total_rows() as f64 * CELL_HEIGHT_PX,
            self.viewport_rows as f64 * CELL_HEIGHT_PX,
        )
    }
}

/// Wrap `text` into rows at most `width` cells wide
pub fn wrap(text: &str, width: u16, gap: u16) -> Vec<LayoutRow> {
    if width == 0 {
        return Vec::new();
    }
    let mut rows = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph.trim_end_matches('\r'), width as u32, gap as u32, &mut rows);
    }
    rows
}

fn wrap_paragraph(paragraph: &str, width: u32, gap: u32, rows: &mut Vec<LayoutRow>) {
    let mut row: Vec<char> = Vec::new();
    // index just past the most recent space in `row`
    let mut break_at: Option<usize> = None;

    for ch in expand_tabs(paragraph) {
        let w = ch.width().unwrap_or(0) as u32;
        if ch.is_control() {
            continue;
        }

        if w > 0 && !row.is_empty() && measure(&row, gap) + gap + w > width {
            if ch == ' ' {
                // hanging space ends the row
                rows.push(finish(&row, gap));
                row.clear();
                break_at = None;
                continue;
            }
            let carried = match break_at {
                Some(at) => row.split_off(at),
                None => Vec::new(),
            };
            rows.push(finish(&row, gap));
            row = carried;
            break_at = None;

            // the carried word plus this glyph can still overflow
            if !row.is_empty() && measure(&row, gap) + gap + w > width {
                rows.push(finish(&row, gap));
                row.clear();
            }
        }

        row.push(ch);
        if ch == ' ' {
            break_at = Some(row.len());
        }
    }

    rows.push(finish(&row, gap));
}

fn expand_tabs(paragraph: &str) -> impl Iterator<Item = char> + '_ {
    paragraph.chars().flat_map(|c| {
        let n = if c == '\t' { TAB_WIDTH } else { 1 };
        std::iter::repeat(if c == '\t' { ' ' } else { c }).take(n)
    })
}

fn measure(glyphs: &[char], gap: u32) -> u32 {
    let mut total = 0;
    let mut seen = 0;
    for ch in glyphs {
        let w = ch.width().unwrap_or(0) as u32;
        if w == 0 {
            continue;
        }
        if seen > 0 {
            total += gap;
        }
        total += w;
        seen += 1;
    }
    total
}

fn finish(glyphs: &[char], gap: u32) -> LayoutRow {
    let end = glyphs
        .iter()
        .rposition(|c| *c != ' ')
        .map_or(0, |i| i + 1);
    let glyphs = glyphs[..end].to_vec();
    let width = measure(&glyphs, gap).min(u16::MAX as u32) as u16;
    LayoutRow { glyphs, width }
}
