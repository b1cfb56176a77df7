//! The teleprompter panel
//!
//! Draws the session's layout at its current scroll position: configured
//! colors, padding, alignment, mirroring and the reading indicator. The
//! same renderer serves the windowed preview and presentation mode.

use super::scrollbar::render_scrollbar_raw;
use crate::prompter::render::CELL_HEIGHT_PX;
use crate::prompter::settings::TextAlign;
use crate::prompter::Session;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Block,
    Frame,
};

const INDICATOR_SYMBOL: &str = "─";

pub fn render(f: &mut Frame, area: Rect, session: &mut Session, show_scrollbar: bool) {
    session.set_area(area);
    let model = session.render_model();
    let scroll_top = session.scroll_top();
    let panel = model.panel;
    if panel.is_empty() {
        return;
    }

    let text_style = Style::default()
        .fg(Color::from(model.text.color))
        .bg(Color::from(model.background));
    f.render_widget(Block::default().style(text_style), panel);

    let gap = model.text.glyph_gap();
    let text_x = panel.x + model.padding.left;
    let text_width = model.text_width();
    let align = model.effective_align();

    let layout = session.layout();
    let total_rows = layout.total_rows();
    let mut rows = layout.visible(scroll_top);
    if model.mirror.vertical {
        rows.reverse();
    }

    let buf = f.buffer_mut();
    if text_width > 0 {
        for (i, row) in rows.iter().enumerate().take(panel.height as usize) {
            let Some(row) = row else { continue };
            let width = row.width().min(text_width);
            let offset = match align {
                TextAlign::Left => 0,
                TextAlign::Center => (text_width - width) / 2,
                TextAlign::Right => text_width - width,
            };
            let line = row.display(gap, model.mirror.horizontal);
            buf.set_stringn(
                text_x + offset,
                panel.y + i as u16,
                &line,
                text_width as usize,
                text_style,
            );
        }
    }

    // The indicator runs behind the text: only blank cells take the rule
    let indicator_y = panel.y + model.indicator.row;
    let indicator_color = Color::from(model.indicator.color);
    for x in panel.x..panel.right() {
        if let Some(cell) = buf.cell_mut((x, indicator_y)) {
            if cell.symbol() == " " {
                cell.set_symbol(INDICATOR_SYMBOL).set_fg(indicator_color);
            }
        }
    }

    if show_scrollbar {
        let first_row = (scroll_top / CELL_HEIGHT_PX).floor() as usize;
        render_scrollbar_raw(f, panel, total_rows, panel.height as usize, first_row);
    }
}
