// Modal overlay rendering
//
// Modals are rendered on top of the main content:
// - Help modal: keyboard shortcuts and where exports go
// - Confirm modal: reset all settings to defaults

use crate::prompter::transfer::EXPORT_FILE_NAME;
use crate::tui::app::App;
use crate::tui::components::palette;
use crate::tui::modal::Modal;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render a modal dialog as a centered overlay
pub fn render(f: &mut Frame, modal: &Modal, app: &App) {
    match modal {
        Modal::Help => render_help(f, app),
        Modal::ConfirmReset => render_confirm_reset(f),
    }
}

/// Calculate centered rect for modal dialog
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn render_help(f: &mut Frame, app: &App) {
    let key_style = Style::default().fg(palette::ACCENT);
    let desc_style = Style::default().fg(palette::FOREGROUND);
    let header_style = Style::default()
        .fg(palette::HIGHLIGHT)
        .add_modifier(Modifier::BOLD);
    let divider_style = Style::default().fg(palette::BORDER);

    // Helper to create a keybind line: "    key         description"
    let kb = |key: &str, desc: &str| -> Line {
        Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("{:<12}", key), key_style),
            Span::styled(desc.to_string(), desc_style),
        ])
    };

    let export_path = app.config.export_dir.join(EXPORT_FILE_NAME);

    let content = Text::from(vec![
        Line::raw(""),
        Line::from(Span::styled("  Playback", header_style)),
        kb("space", "Play / pause"),
        kb("r", "Back to the top, timer to zero"),
        kb("+ / -", "Faster / slower"),
        kb("↑/↓, PgUp/Dn", "Scroll by hand while paused"),
        kb("Home/End", "Jump to start / end"),
        Line::raw(""),
        Line::from(Span::styled("  Presentation", header_style)),
        kb("f", "Enter / leave presentation mode"),
        kb("s", "Settings overlay (presenting)"),
        kb("Esc", "Leave presentation mode"),
        Line::raw(""),
        Line::from(Span::styled("  Settings", header_style)),
        kb("Tab", "Focus the settings panel"),
        kb("↑/↓", "Select a setting"),
        kb("←/→", "Adjust the value"),
        kb("Enter", "Cycle choice / apply preset"),
        kb("Ctrl+R", "Reset all settings"),
        Line::raw(""),
        Line::from(Span::styled("  Script", header_style)),
        kb("p", "Paste script from clipboard"),
        kb("e", "Export settings and script"),
        kb("i", "Import settings and script"),
        Line::raw(""),
        Line::from(Span::styled("  General", header_style)),
        kb("?", "Toggle this help"),
        kb("q", "Quit"),
        Line::raw(""),
        Line::from(Span::styled(
            "  ──────────────────────────────────────",
            divider_style,
        )),
        Line::from(vec![
            Span::styled("  Export file: ", desc_style),
            Span::styled(export_path.display().to_string(), key_style),
        ]),
    ]);

    let area = centered_rect(48, 35, f.area());
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette::HIGHLIGHT))
            .title(" Help ")
            .title_bottom(Line::from(" Press ? or Esc to close ").centered()),
    );

    f.render_widget(paragraph, area);
}

fn render_confirm_reset(f: &mut Frame) {
    let content = Text::from(vec![
        Line::raw(""),
        Line::from(Span::styled(
            "Reset all settings to defaults?",
            Style::default()
                .fg(palette::FOREGROUND)
                .add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(palette::ACCENT)),
            Span::raw(" reset    "),
            Span::styled("n", Style::default().fg(palette::ACCENT)),
            Span::raw(" keep"),
        ]),
    ]);

    let area = centered_rect(40, 6, f.area());
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(content).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette::WARNING))
                .title(" Reset "),
        ),
        area,
    );
}
