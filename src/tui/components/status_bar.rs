// Status bar component
//
// Renders key hints at the bottom, with the most recent warning from the
// log buffer on the right for a short while after it was logged.

use super::palette;
use crate::logging::LogLevel;
use crate::tui::app::App;
use chrono::{Duration, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// How long a warning stays in the status bar
const WARNING_TTL_SECS: i64 = 8;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(palette::BORDER));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let warning = app
        .log_buffer
        .latest_at_least(LogLevel::Warn)
        .filter(|entry| Utc::now() - entry.timestamp < Duration::seconds(WARNING_TTL_SECS));

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Percentage(45)])
        .split(inner);

    f.render_widget(
        Paragraph::new(format!(" {}", app.focus_hint()))
            .style(Style::default().fg(palette::FOREGROUND)),
        chunks[0],
    );

    if let Some(entry) = warning {
        f.render_widget(
            Paragraph::new(format!("{} {} ", entry.level.as_str(), entry.message))
                .style(Style::default().fg(palette::WARNING))
                .alignment(ratatui::layout::Alignment::Right),
            chunks[1],
        );
    }
}
