//! Keyboard command dispatch
//!
//! | key   | command                         |
//! |-------|---------------------------------|
//! | space | play / pause                    |
//! | F     | enter / leave presentation mode |
//! | R     | reset scroll position and timer |
//! | S     | overlay (presentation mode only)|
//!
//! Letters match in either case. Auto-repeat never re-fires a command.

use super::input::{InputHandler, KeyBehavior};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePlay,
    ToggleFullscreen,
    ResetScroll,
    ToggleOverlay,
}

/// What the dispatcher did with a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Run this command; the key's default behavior must not apply
    Handled(Command),
    /// A command key that must not fire now (repeat, release); still
    /// swallow it so its default behavior doesn't apply either
    Suppressed,
    /// Not a command key here; let the front-end have it
    Ignored,
}

impl Dispatch {
    /// True when the host should skip the key's default behavior
    pub fn prevents_default(&self) -> bool {
        !matches!(self, Dispatch::Ignored)
    }
}

pub struct CommandDispatcher {
    input: InputHandler,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        let mut input = InputHandler::new();
        input.configure_keys(
            &[
                KeyCode::Char(' '),
                KeyCode::Char('f'),
                KeyCode::Char('r'),
                KeyCode::Char('s'),
            ],
            KeyBehavior::StateChange,
        );
        Self { input }
    }

    /// Map a key to its command, if it is one of ours
    ///
    /// Modified keys (Ctrl-R and friends) are left to the front-end.
    pub fn command_for(key: &KeyEvent) -> Option<(KeyCode, Command)> {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
        {
            return None;
        }
        let KeyCode::Char(c) = key.code else {
            return None;
        };
        // Both cases share one physical key, so they share press state
        let c = c.to_ascii_lowercase();
        let command = match c {
            ' ' => Command::TogglePlay,
            'f' => Command::ToggleFullscreen,
            'r' => Command::ResetScroll,
            's' => Command::ToggleOverlay,
            _ => return None,
        };
        Some((KeyCode::Char(c), command))
    }

    pub fn dispatch(&mut self, key: &KeyEvent, fullscreen: bool) -> Dispatch {
        let Some((code, command)) = Self::command_for(key) else {
            return Dispatch::Ignored;
        };

        if key.kind == KeyEventKind::Release {
            self.input.handle_key_release(code);
            return Dispatch::Suppressed;
        }

        if command == Command::ToggleOverlay && !fullscreen {
            return Dispatch::Ignored;
        }

        match key.kind {
            KeyEventKind::Press if self.input.handle_key_press(code) => Dispatch::Handled(command),
            _ => Dispatch::Suppressed,
        }
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
