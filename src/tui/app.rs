// TUI application state
//
// App wraps the teleprompter session with everything that only exists in a
// terminal front-end: the fullscreen host, key press tracking, focus,
// modals and toasts. Key routing lives in tui/mod.rs; this module holds
// the actions those keys trigger.

use super::clipboard;
use super::components::settings_panel::SettingsPanel;
use super::components::Toast;
use super::host::TerminalHost;
use super::modal::Modal;
use super::traits::{Handled, Interactive};
use crate::config::Config;
use crate::logging::LogBuffer;
use crate::prompter::commands::{Command, CommandDispatcher, Dispatch};
use crate::prompter::input::InputHandler;
use crate::prompter::presentation::FullscreenHost;
use crate::prompter::render::CELL_HEIGHT_PX;
use crate::prompter::settings::{ConfigField, ConfigPatch};
use crate::prompter::transfer::{TransferError, EXPORT_FILE_NAME};
use crate::prompter::Session;
use crossterm::event::{KeyCode, KeyEvent};

/// Rows moved per arrow press or wheel notch
pub const SCROLL_STEP_ROWS: f64 = 3.0;

/// Which part of the windowed layout receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Prompter,
    Settings,
}

pub struct App {
    pub session: Session,

    pub host: TerminalHost,

    /// space / F / R / S
    dispatcher: CommandDispatcher,

    /// Press tracking for front-end keys (q, ?, arrows...)
    input_handler: InputHandler,

    pub settings: SettingsPanel,

    pub focus: Focus,

    pub modal: Option<Modal>,

    pub toast: Option<Toast>,

    /// Captured tracing output; the status bar shows the latest warning
    pub log_buffer: LogBuffer,

    pub config: Config,

    pub should_quit: bool,
}

impl App {
    pub fn new(session: Session, config: Config, log_buffer: LogBuffer, size: (u16, u16)) -> Self {
        Self {
            session,
            host: TerminalHost::new(size.0, size.1),
            dispatcher: CommandDispatcher::new(),
            input_handler: InputHandler::default(),
            settings: SettingsPanel::new(),
            focus: Focus::default(),
            modal: None,
            toast: None,
            log_buffer,
            config,
            should_quit: false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Input plumbing
    // ─────────────────────────────────────────────────────────────────────

    /// Handle a key press - returns true if the action should be triggered
    pub fn handle_key_press(&mut self, key: KeyCode) -> bool {
        self.input_handler.handle_key_press(key)
    }

    pub fn handle_key_release(&mut self, key: KeyCode) {
        self.input_handler.handle_key_release(key);
    }

    pub fn dispatch(&mut self, key: &KeyEvent) -> Dispatch {
        let fullscreen = self.session.presentation().is_fullscreen();
        self.dispatcher.dispatch(key, fullscreen)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Presentation
    // ─────────────────────────────────────────────────────────────────────

    pub fn is_fullscreen(&self) -> bool {
        self.session.presentation().is_fullscreen()
    }

    /// Keys go to the settings panel rather than manual scrolling
    pub fn settings_active(&self) -> bool {
        if self.is_fullscreen() {
            self.session.presentation().overlay_open()
        } else {
            self.focus == Focus::Settings
        }
    }

    pub fn run_command(&mut self, command: Command) {
        if let Err(e) = self.session.execute(command, &mut self.host) {
            self.show_toast(Toast::error(format!("✗ {}", e)));
            return;
        }
        if command == Command::ToggleFullscreen && self.is_fullscreen() {
            self.focus = Focus::Prompter;
        }
    }

    /// Pick up fullscreen changes the host made on its own
    pub fn sync_host(&mut self) {
        if let Some(fullscreen) = self.host.take_change() {
            self.session.sync_fullscreen(fullscreen);
        }
    }

    /// Esc: leave presentation mode, else drop settings focus
    pub fn escape(&mut self) {
        if self.host.escape_gesture() {
            self.sync_host();
        } else if self.focus == Focus::Settings {
            self.focus = Focus::Prompter;
        }
    }

    pub fn toggle_focus(&mut self) {
        if self.is_fullscreen() {
            return;
        }
        self.focus = match self.focus {
            Focus::Prompter => Focus::Settings,
            Focus::Settings => Focus::Prompter,
        };
    }

    pub fn on_resize(&mut self, width: u16, height: u16) {
        self.host.on_resize(width, height);
        self.sync_host();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────

    pub fn dispatch_to_settings(&mut self, key: KeyEvent) -> Handled {
        let handled = self.settings.handle_key(key);
        if let Some(edit) = self.settings.take_edit() {
            let patch = edit.to_patch(self.session.config());
            self.apply_patch(&patch);
        }
        handled
    }

    pub fn adjust_speed(&mut self, faster: bool) {
        let patch = ConfigPatch::step(self.session.config(), ConfigField::Speed, faster);
        self.apply_patch(&patch);
        let speed = self.session.config().display_value(ConfigField::Speed);
        self.show_toast(Toast::new(format!("Speed {}", speed)));
    }

    fn apply_patch(&mut self, patch: &ConfigPatch) {
        if patch.is_empty() {
            return;
        }
        let report = self.session.update_config(patch);
        if let Some(rejected) = report.rejected.first() {
            self.show_toast(Toast::error(format!("✗ {}", rejected)));
        }
    }

    /// Ask before resetting when configured to
    pub fn request_reset_config(&mut self) {
        if self.config.confirm_reset {
            self.modal = Some(Modal::ConfirmReset);
        } else {
            self.reset_config();
        }
    }

    pub fn reset_config(&mut self) {
        self.session.reset_config();
        self.show_toast(Toast::new("✓ Settings reset to defaults"));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Manual scrolling
    // ─────────────────────────────────────────────────────────────────────

    pub fn scroll_rows(&mut self, rows: f64) {
        self.session.user_scroll_by(rows * CELL_HEIGHT_PX);
    }

    pub fn scroll_page(&mut self, down: bool) {
        let page = self.session.render_model().panel.height.saturating_sub(1).max(1) as f64;
        self.scroll_rows(if down { page } else { -page });
    }

    pub fn scroll_to_start(&mut self) {
        self.session.user_scroll_to(0.0);
    }

    pub fn scroll_to_end(&mut self) {
        let max = self.session.extent().max_scroll();
        self.session.user_scroll_to(max);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Transfer and clipboard
    // ─────────────────────────────────────────────────────────────────────

    pub fn export(&mut self) {
        match self.session.export_to_dir(&self.config.export_dir) {
            Ok(path) => self.show_toast(Toast::new(format!("✓ Exported {}", path.display()))),
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                self.show_toast(Toast::error("✗ Export failed"));
            }
        }
    }

    /// Import `teleprompter-config.json` from the export directory
    pub fn import(&mut self) {
        let path = self.config.export_dir.join(EXPORT_FILE_NAME);
        match self.session.import_from_path(&path) {
            Ok(outcome) => {
                let message = match outcome.report.rejected.len() {
                    0 => "✓ Configuration imported".to_string(),
                    n => format!("✓ Imported, {} value(s) skipped", n),
                };
                self.show_toast(Toast::new(message));
            }
            Err(TransferError::Io { path, source }) => {
                tracing::warn!("Import failed: {}: {}", path.display(), source);
                self.show_toast(Toast::error(format!("✗ Cannot read {}", path.display())));
            }
            Err(e) => {
                tracing::warn!("Import failed: {}", e);
                self.show_toast(Toast::error("✗ Invalid configuration file"));
            }
        }
    }

    pub fn paste(&mut self) {
        match clipboard::paste_from_clipboard() {
            Ok(text) => {
                self.session.replace_content(text);
                self.show_toast(Toast::new("✓ Script pasted"));
            }
            Err(e) => {
                tracing::warn!("Paste failed: {:#}", e);
                self.show_toast(Toast::error(format!("✗ {}", e)));
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Toasts
    // ─────────────────────────────────────────────────────────────────────

    pub fn show_toast(&mut self, toast: Toast) {
        self.toast = Some(toast);
    }

    pub fn clear_expired_toast(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    /// Key hints for the status bar
    pub fn focus_hint(&self) -> &'static str {
        if self.settings_active() {
            return self
                .settings
                .focus_hint()
                .unwrap_or("↑↓:select  ←→:adjust");
        }
        if self.is_fullscreen() {
            "space:play  R:reset  S:settings  Esc/F:exit"
        } else {
            "space:play  F:present  R:reset  Tab:settings  ↑↓:scroll  ?:help"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;

    fn app() -> App {
        let mut session = Session::default();
        session.set_area(Rect::new(0, 0, 80, 20));
        App::new(session, Config::default(), LogBuffer::new(), (80, 24))
    }

    fn temp_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("cueline-app-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn fullscreen_follows_esc_from_the_host() {
        let mut app = app();
        app.focus = Focus::Settings;
        app.run_command(Command::ToggleFullscreen);
        assert!(app.is_fullscreen());
        assert_eq!(app.focus, Focus::Prompter);

        app.run_command(Command::ToggleOverlay);
        assert!(app.settings_active());

        app.escape();
        assert!(!app.is_fullscreen());
        assert!(!app.session.presentation().overlay_open());
    }

    #[test]
    fn refused_fullscreen_shows_a_toast() {
        let mut app = app();
        app.on_resize(10, 4);
        app.run_command(Command::ToggleFullscreen);
        assert!(!app.is_fullscreen());
        assert!(app.toast.as_ref().unwrap().message.contains("at least"));
    }

    #[test]
    fn shrinking_the_terminal_ends_presentation() {
        let mut app = app();
        app.run_command(Command::ToggleFullscreen);
        app.on_resize(15, 24);
        assert!(!app.is_fullscreen());
    }

    #[test]
    fn tab_moves_focus_only_when_windowed() {
        let mut app = app();
        app.toggle_focus();
        assert!(app.settings_active());
        app.escape();
        assert_eq!(app.focus, Focus::Prompter);
    }

    #[test]
    fn settings_edits_go_through_the_session() {
        let mut app = app();
        let before = app.session.config().font_size;
        app.dispatch_to_settings(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
        assert_eq!(app.session.config().font_size, before + 1.0);
    }

    #[test]
    fn speed_keys_stay_in_range() {
        let mut app = app();
        for _ in 0..50 {
            app.adjust_speed(true);
        }
        assert_eq!(app.session.config().speed, 3.0);
    }

    #[test]
    fn reset_asks_first_when_configured() {
        let mut app = app();
        app.session.update_config(&ConfigPatch::speed(2.0));
        app.request_reset_config();
        assert_eq!(app.modal, Some(Modal::ConfirmReset));
        assert_eq!(app.session.config().speed, 2.0);

        app.config.confirm_reset = false;
        app.request_reset_config();
        assert_eq!(app.session.config().speed, 1.0);
    }

    #[test]
    fn export_then_import_round_trips() {
        let dir = temp_dir("roundtrip");
        let mut app = app();
        app.config.export_dir = dir.clone();
        app.session.replace_content("Line one\nLine two");
        app.session.update_config(&ConfigPatch::speed(2.5));
        app.export();
        assert!(dir.join(EXPORT_FILE_NAME).exists());

        app.session.reset_config();
        app.session.replace_content("something else");
        app.import();
        assert_eq!(app.session.config().speed, 2.5);
        assert_eq!(app.session.content().text(), "Line one\nLine two");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_import_leaves_state_alone() {
        let dir = temp_dir("malformed");
        std::fs::write(dir.join(EXPORT_FILE_NAME), "{ not json").unwrap();
        let mut app = app();
        app.config.export_dir = dir.clone();
        let before = app.session.config().clone();

        app.import();
        assert_eq!(*app.session.config(), before);
        assert_eq!(
            app.toast.as_ref().unwrap().message,
            "✗ Invalid configuration file"
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn manual_scroll_moves_by_rows() {
        let mut app = app();
        app.session.replace_content("line\n".repeat(40));
        app.scroll_rows(SCROLL_STEP_ROWS);
        assert_eq!(app.session.offset(), 3.0 * CELL_HEIGHT_PX);
        app.scroll_to_start();
        assert_eq!(app.session.offset(), 0.0);
    }
}
