// Views module - screen-level rendering logic
//
// Two screens exist:
// - Windowed: control bar, preview beside the settings panel, status bar
// - Presentation: the teleprompter alone, with the settings overlay on demand
//
// Modals and toasts are drawn on top of either.

mod modal;

use super::app::{App, Focus};
use super::components::{self, control_bar, prompter_view, status_bar};
use super::layout::Breakpoint;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear};
use ratatui::Frame;

/// Width of the floating settings overlay in presentation mode
const OVERLAY_WIDTH: u16 = 42;

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &mut App) {
    let bg_block = Block::default().style(Style::default().bg(components::palette::BACKGROUND));
    f.render_widget(bg_block, f.area());

    if app.is_fullscreen() {
        draw_presentation(f, app);
    } else {
        draw_windowed(f, app);
    }

    // Render modal overlay (on top of everything)
    if let Some(modal_state) = app.modal {
        modal::render(f, &modal_state, app);
    }

    if let Some(ref toast) = app.toast {
        toast.render(f, f.area());
    }

    app.clear_expired_toast();
}

fn draw_presentation(f: &mut Frame, app: &mut App) {
    let area = f.area();
    prompter_view::render(f, area, &mut app.session, false);

    if app.session.presentation().overlay_open() {
        let width = OVERLAY_WIDTH.min(area.width);
        let height = area.height.saturating_sub(4).min(24);
        let overlay = Rect::new(
            area.right().saturating_sub(width + 1),
            area.y + 1,
            width,
            height,
        )
        .intersection(area);
        f.render_widget(Clear, overlay);
        app.settings
            .render(f, overlay, app.session.config(), true);
    }
}

fn draw_windowed(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .split(f.area());

    control_bar::render(f, chunks[0], app);
    draw_body(f, chunks[1], app);
    status_bar::render(f, chunks[2], app);
}

fn draw_body(f: &mut Frame, area: Rect, app: &mut App) {
    let bp = Breakpoint::from_width(area.width);
    let settings_focused = app.focus == Focus::Settings;

    let (preview, settings) = match bp.settings_width() {
        Some(width) => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(10), Constraint::Length(width)])
                .split(area);
            (Some(cols[0]), Some(cols[1]))
        }
        // Too narrow for both: the focused one takes the body
        None if settings_focused => (None, Some(area)),
        None => (Some(area), None),
    };

    if let Some(preview) = preview {
        let border = if settings_focused {
            components::palette::BORDER
        } else {
            components::palette::HIGHLIGHT
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Preview ");
        let inner = block.inner(preview);
        f.render_widget(block, preview);
        prompter_view::render(f, inner, &mut app.session, true);
    }

    if let Some(settings) = settings {
        app.settings
            .render(f, settings, app.session.config(), settings_focused);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::logging::LogBuffer;
    use crate::prompter::commands::Command;
    use crate::prompter::Session;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buf = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..height {
            for x in 0..width {
                out.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            out.push('\n');
        }
        out
    }

    fn app(width: u16, height: u16) -> App {
        let mut session = Session::default();
        session.replace_content("Hello");
        App::new(session, Config::default(), LogBuffer::new(), (width, height))
    }

    #[test]
    fn windowed_layout_shows_chrome() {
        let mut app = app(100, 30);
        let screen = render(&mut app, 100, 30);
        assert!(screen.contains("cueline"));
        assert!(screen.contains("Preview"));
        assert!(screen.contains("Settings"));
        assert!(screen.contains("PAUSED"));
        assert!(screen.contains("Hello"));
    }

    #[test]
    fn presentation_hides_chrome() {
        let mut app = app(100, 30);
        app.run_command(Command::ToggleFullscreen);
        let screen = render(&mut app, 100, 30);
        assert!(screen.contains("Hello"));
        assert!(!screen.contains("Preview"));
        assert!(!screen.contains("Settings"));

        app.run_command(Command::ToggleOverlay);
        let screen = render(&mut app, 100, 30);
        assert!(screen.contains("Settings"));
    }

    #[test]
    fn compact_width_gives_the_body_to_the_focused_pane() {
        let mut app = app(50, 30);
        let screen = render(&mut app, 50, 30);
        assert!(screen.contains("Preview"));
        assert!(!screen.contains("Settings"));

        app.toggle_focus();
        let screen = render(&mut app, 50, 30);
        assert!(screen.contains("Settings"));
        assert!(!screen.contains("Preview"));
    }
}
