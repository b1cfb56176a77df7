// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard and mouse input, playback ticks, redraws)
// - Layered key routing from the command dispatcher down to manual scroll

pub mod app;
pub mod clipboard;
pub mod components;
pub mod host;
pub mod layout;
pub mod modal;
pub mod traits;
pub mod views;

use crate::config::Config;
use crate::logging::LogBuffer;
use crate::prompter::Session;
use anyhow::{Context, Result};
use app::{App, SCROLL_STEP_ROWS};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, KeyboardEnhancementFlags, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use futures::StreamExt;
use modal::{Modal, ModalAction};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use traits::Handled;

/// Redraw cadence while nothing else happens (toast expiry, warnings)
const IDLE_REDRAW: Duration = Duration::from_millis(250);

/// Run the TUI
///
/// Sets up the terminal, runs the event loop, and restores the terminal
/// when done, even if the loop failed.
pub async fn run_tui(
    session: Session,
    log_buffer: LogBuffer,
    config: Config,
    start_fullscreen: bool,
) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;

    // Release events let auto-repeat be told apart from new presses
    let enhanced = matches!(supports_keyboard_enhancement(), Ok(true));
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .context("Failed to enable key release events")?;
    }
    tracing::debug!("Keyboard enhancement: {}", enhanced);

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    let size = terminal.size().context("Failed to read terminal size")?;

    let mut app = App::new(session, config, log_buffer, (size.width, size.height));
    if start_fullscreen {
        app.run_command(crate::prompter::commands::Command::ToggleFullscreen);
    }

    let result = run_event_loop(&mut terminal, &mut app).await;

    // Restore terminal
    if enhanced {
        let _ = execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Three sources are raced with tokio::select!:
/// 1. Terminal input (keys, mouse, resize)
/// 2. Playback ticks, which only arrive while the engine runs
/// 3. An idle redraw so toasts expire on screen
///
/// select! drops the losing futures before running the winning handler,
/// so handlers are free to borrow `app` mutably.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut redraw = tokio::time::interval(IDLE_REDRAW);
    redraw.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key_event))) => handle_key_event(app, key_event),
                Some(Ok(Event::Mouse(mouse_event))) => handle_mouse_event(app, mouse_event),
                Some(Ok(Event::Resize(width, height))) => app.on_resize(width, height),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                None => break,
            },

            tick = app.session.next_tick() => {
                app.session.on_clock(tick);
            }

            _ = redraw.tick() => {}
        }

        app.sync_host();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
/// Layered dispatch: Modal → Commands → Global → Settings → Manual scroll
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    // Layer 1: Modal captures all input when active
    if handle_modal_input(app, &key_event) {
        return;
    }

    // Layer 2: space / F / R / S, which also swallow their own repeats
    match app.dispatch(&key_event) {
        crate::prompter::commands::Dispatch::Handled(command) => {
            app.run_command(command);
            return;
        }
        dispatch if dispatch.prevents_default() => return,
        _ => {}
    }

    // Terminals without release reporting send repeats as presses; with it,
    // repeats and releases are told apart
    match key_event.kind {
        KeyEventKind::Release => {
            app.handle_key_release(key_event.code);
            return;
        }
        KeyEventKind::Press | KeyEventKind::Repeat => {}
    }

    // Layer 3: Global keys
    if handle_global_keys(app, &key_event) {
        return;
    }

    if !app.handle_key_press(key_event.code) {
        return;
    }

    // Layer 4: Settings panel when focused or shown as the overlay
    if app.settings_active() && app.dispatch_to_settings(key_event) == Handled::Yes {
        return;
    }

    // Layer 5: Manual scrolling of the teleprompter
    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => app.scroll_rows(-SCROLL_STEP_ROWS),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_rows(SCROLL_STEP_ROWS),
        KeyCode::PageUp => app.scroll_page(false),
        KeyCode::PageDown => app.scroll_page(true),
        KeyCode::Home => app.scroll_to_start(),
        KeyCode::End => app.scroll_to_end(),
        _ => {}
    }
}

/// Handle mouse input
fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    if app.modal.is_some() {
        return;
    }
    match mouse_event.kind {
        MouseEventKind::ScrollUp => app.scroll_rows(-SCROLL_STEP_ROWS),
        MouseEventKind::ScrollDown => app.scroll_rows(SCROLL_STEP_ROWS),
        _ => {}
    }
}

/// Handle modal input - returns true if modal absorbed the input
fn handle_modal_input(app: &mut App, key_event: &KeyEvent) -> bool {
    let Some(modal) = app.modal else {
        return false;
    };

    // Always process Release events to keep InputHandler in sync
    // Without this, keys get stuck in "pressed" state after modal closes
    if key_event.kind == KeyEventKind::Release {
        app.handle_key_release(key_event.code);
        app.dispatch(key_event);
        return true;
    }

    if key_event.kind != KeyEventKind::Press || !app.handle_key_press(key_event.code) {
        return true;
    }

    match modal.handle_input(key_event.code) {
        ModalAction::None => {}
        ModalAction::Close => app.modal = None,
        ModalAction::Confirm => {
            app.modal = None;
            if modal == Modal::ConfirmReset {
                app.reset_config();
            }
        }
    }

    true
}

/// Handle global keys - returns true if handled
/// Uses InputHandler so a held key triggers once per press
fn handle_global_keys(app: &mut App, key_event: &KeyEvent) -> bool {
    let key = key_event.code;
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

    match key {
        KeyCode::Char('c') if ctrl => {
            app.should_quit = true;
            true
        }
        // Ctrl+R: reset every setting (R alone resets the scroll)
        KeyCode::Char('r') | KeyCode::Char('R') if ctrl => {
            if app.handle_key_press(key) {
                app.request_reset_config();
            }
            true
        }
        _ if ctrl => false,
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            if app.handle_key_press(key) {
                app.should_quit = true;
            }
            true
        }
        KeyCode::Esc => {
            if app.handle_key_press(key) {
                app.escape();
            }
            true
        }
        KeyCode::Char('?') => {
            if app.handle_key_press(key) {
                app.modal = Some(Modal::Help);
            }
            true
        }
        KeyCode::Tab => {
            if app.handle_key_press(key) {
                app.toggle_focus();
            }
            true
        }
        KeyCode::Char('e') | KeyCode::Char('E') => {
            if app.handle_key_press(key) {
                app.export();
            }
            true
        }
        KeyCode::Char('i') | KeyCode::Char('I') => {
            if app.handle_key_press(key) {
                app.import();
            }
            true
        }
        KeyCode::Char('p') | KeyCode::Char('P') => {
            if app.handle_key_press(key) {
                app.paste();
            }
            true
        }
        // Speed: + / = faster, - slower (repeatable while held)
        KeyCode::Char('+') | KeyCode::Char('=') => {
            if app.handle_key_press(key) {
                app.adjust_speed(true);
            }
            true
        }
        KeyCode::Char('-') => {
            if app.handle_key_press(key) {
                app.adjust_speed(false);
            }
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use ratatui::layout::Rect;

    fn app() -> App {
        let mut session = Session::default();
        session.set_area(Rect::new(0, 0, 80, 20));
        session.replace_content("line\n".repeat(40));
        App::new(session, Config::default(), LogBuffer::new(), (80, 24))
    }

    fn event(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        event(code, KeyEventKind::Press)
    }

    #[tokio::test]
    async fn space_toggles_playback_once_per_press() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char(' ')));
        assert!(app.session.is_playing());

        // Auto-repeat of the held key doesn't toggle back
        handle_key_event(&mut app, event(KeyCode::Char(' '), KeyEventKind::Repeat));
        assert!(app.session.is_playing());

        handle_key_event(&mut app, event(KeyCode::Char(' '), KeyEventKind::Release));
        handle_key_event(&mut app, press(KeyCode::Char(' ')));
        assert!(!app.session.is_playing());
    }

    #[test]
    fn s_opens_overlay_only_in_presentation_mode() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('s')));
        assert!(!app.session.presentation().overlay_open());

        handle_key_event(&mut app, press(KeyCode::Char('F')));
        assert!(app.is_fullscreen());
        handle_key_event(&mut app, press(KeyCode::Char('s')));
        assert!(app.session.presentation().overlay_open());

        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(!app.is_fullscreen());
        assert!(!app.session.presentation().overlay_open());
    }

    #[test]
    fn modal_swallows_command_keys() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('?')));
        assert_eq!(app.modal, Some(Modal::Help));

        handle_key_event(&mut app, press(KeyCode::Char(' ')));
        assert!(!app.session.is_playing());

        handle_key_event(&mut app, press(KeyCode::Esc));
        assert_eq!(app.modal, None);
    }

    #[test]
    fn ctrl_r_confirms_before_resetting() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('+')));
        assert!((app.session.config().speed - 1.1).abs() < 1e-9);

        let ctrl_r = KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..press(KeyCode::Char('r'))
        };
        handle_key_event(&mut app, ctrl_r);
        assert_eq!(app.modal, Some(Modal::ConfirmReset));

        handle_key_event(&mut app, press(KeyCode::Char('y')));
        assert_eq!(app.modal, None);
        assert_eq!(app.session.config().speed, 1.0);
    }

    #[test]
    fn arrows_scroll_unless_settings_are_focused() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Down));
        let scrolled = app.session.offset();
        assert!(scrolled > 0.0);

        handle_key_event(&mut app, press(KeyCode::Tab));
        handle_key_event(&mut app, event(KeyCode::Down, KeyEventKind::Release));
        handle_key_event(&mut app, press(KeyCode::Down));
        assert_eq!(app.session.offset(), scrolled);
    }

    #[test]
    fn wheel_scrolls_the_prompter() {
        let mut app = app();
        let wheel = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut app, wheel);
        assert!(app.session.offset() > 0.0);
    }

    #[test]
    fn q_quits() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
