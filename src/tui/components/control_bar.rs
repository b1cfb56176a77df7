// Control bar component
//
// Renders the playback state across the top of the windowed layout:
// play/pause, elapsed time, speed and the active display toggles.

use super::palette;
use crate::tui::app::App;
use crate::tui::layout::Breakpoint;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let config = session.config();
    let bp = Breakpoint::from_width(area.width);

    let (state, state_color) = if session.is_playing() {
        ("▶ PLAYING", palette::PLAYING)
    } else {
        ("❚❚ PAUSED", palette::FOREGROUND)
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", state),
            Style::default().fg(state_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(session.timer().formatted(), Style::default().fg(palette::ACCENT)),
        Span::raw(" │ "),
        Span::raw(format!("speed {:.1}x", config.speed)),
    ];

    if bp.at_least(Breakpoint::Normal) {
        spans.push(Span::raw(format!(
            " │ {}px × {:.1}",
            config.font_size, config.line_height
        )));
        spans.push(Span::raw(format!(" │ {}", config.panel_position.label())));
    }

    let mirrors: Vec<&str> = [
        (config.mirror_horizontal, "⇆"),
        (config.mirror_vertical, "⇅"),
    ]
    .iter()
    .filter(|(on, _)| *on)
    .map(|(_, glyph)| *glyph)
    .collect();
    if !mirrors.is_empty() {
        spans.push(Span::styled(
            format!(" │ mirror {}", mirrors.join("")),
            Style::default().fg(palette::ACCENT),
        ));
    }

    let bar = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(palette::FOREGROUND))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette::BORDER))
                .title(Span::styled(
                    " cueline ",
                    Style::default()
                        .fg(palette::HIGHLIGHT)
                        .add_modifier(Modifier::BOLD),
                ))
                .title_top(Line::from(" ? ").right_aligned()),
        );

    f.render_widget(bar, area);
}
