//! Scrollbar rendering helper

use ratatui::{
    layout::Rect,
    widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Render a minimal vertical scrollbar on the right edge of `area`
///
/// Nothing is drawn when the content fits.
///
/// * `total` - Total number of rows
/// * `viewport` - Visible rows
/// * `offset` - First visible row
pub fn render_scrollbar_raw(f: &mut Frame, area: Rect, total: usize, viewport: usize, offset: usize) {
    if total <= viewport {
        return;
    }

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(None)
        .end_symbol(None);

    let content_length = total.saturating_sub(viewport);
    let mut scrollbar_state = ScrollbarState::new(content_length).position(offset.min(content_length));

    f.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
}
