//! Interactive trait for components that handle keyboard input
//!
//! Components that can receive and process keyboard events implement
//! this trait. The App routes input to the focused component.

use crossterm::event::KeyEvent;

/// Result of handling a key event
///
/// Tells the App whether the component consumed the event or
/// if it should bubble up for global handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Event was consumed by the component
    Yes,
    /// Event was not handled, should bubble up
    No,
}

/// Trait for components that handle keyboard input
///
/// ```text
/// KeyEvent
///    │
///    ▼
/// Command dispatcher (space, F, R, S)
///    │
///    │ if ignored
///    ▼
/// App (global handlers: ?, q, e, i, p)
///    │
///    │ if not handled
///    ▼
/// Focused Component (via Interactive trait)
///    │
///    │ returns Handled::Yes or Handled::No
///    ▼
/// App (fallback: manual scrolling)
/// ```
pub trait Interactive {
    /// Returns `Handled::Yes` if the component consumed the event,
    /// `Handled::No` if it should bubble up to the App.
    fn handle_key(&mut self, key: KeyEvent) -> Handled;

    /// Hint text for the status bar when this component is focused
    fn focus_hint(&self) -> Option<&'static str> {
        None
    }
}
