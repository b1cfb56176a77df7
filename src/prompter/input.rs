// Key press tracking with per-key behaviors
//
// Two behaviors:
// - StateChange: fires once per physical press. Held keys and OS auto-repeat
//   don't fire again until the key is released.
// - Repeatable: fires on press, then repeats after an initial delay while
//   held (manual scrolling).
//
// Terminals without the keyboard enhancement protocol never send Release
// events and report auto-repeat as fresh presses. For those, a StateChange
// key counts as released once no event for it has arrived for
// RELEASE_TIMEOUT. That is well above the auto-repeat interval but below
// the initial repeat delay, so a quick second press still registers and a
// key held past the initial delay can fire one extra time.

use crossterm::event::KeyCode;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Silence after which a key without Release events counts as released
pub const RELEASE_TIMEOUT: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy)]
pub enum KeyBehavior {
    StateChange,
    Repeatable {
        /// Delay before starting to repeat
        initial_delay: Duration,
        /// Time between repeats
        repeat_interval: Duration,
    },
}

impl KeyBehavior {
    pub fn navigation() -> Self {
        Self::Repeatable {
            initial_delay: Duration::from_millis(300),
            repeat_interval: Duration::from_millis(40),
        }
    }
}

#[derive(Debug, Default)]
struct KeyState {
    is_pressed: bool,
    press_started: Option<Instant>,
    last_triggered: Option<Instant>,
    last_seen: Option<Instant>,
}

impl KeyState {
    fn release(&mut self) {
        *self = KeyState::default();
    }
}

pub struct InputHandler {
    key_states: HashMap<KeyCode, KeyState>,
    key_behaviors: HashMap<KeyCode, KeyBehavior>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            key_states: HashMap::new(),
            key_behaviors: HashMap::new(),
        }
    }

    pub fn configure_key(&mut self, key: KeyCode, behavior: KeyBehavior) {
        self.key_behaviors.insert(key, behavior);
    }

    pub fn configure_keys(&mut self, keys: &[KeyCode], behavior: KeyBehavior) {
        for key in keys {
            self.configure_key(*key, behavior);
        }
    }

    /// Returns true if the press should trigger its action
    pub fn handle_key_press(&mut self, key: KeyCode) -> bool {
        self.handle_key_press_at(key, Instant::now())
    }

    pub(crate) fn handle_key_press_at(&mut self, key: KeyCode, now: Instant) -> bool {
        let behavior = self
            .key_behaviors
            .get(&key)
            .copied()
            .unwrap_or(KeyBehavior::StateChange);

        let state = self.key_states.entry(key).or_default();

        if state.is_pressed {
            let silent_for = state.last_seen.map(|seen| now.duration_since(seen));
            state.last_seen = Some(now);

            match behavior {
                KeyBehavior::StateChange => {
                    if silent_for.is_some_and(|gap| gap >= RELEASE_TIMEOUT) {
                        // No Release event arrived, but the key went quiet
                        state.press_started = Some(now);
                        state.last_triggered = Some(now);
                        return true;
                    }
                    false
                }
                KeyBehavior::Repeatable {
                    initial_delay,
                    repeat_interval,
                } => {
                    if let (Some(press_start), Some(last_trigger)) =
                        (state.press_started, state.last_triggered)
                    {
                        let time_since_press = now.duration_since(press_start);
                        let time_since_last = now.duration_since(last_trigger);

                        if time_since_press >= initial_delay && time_since_last >= repeat_interval {
                            state.last_triggered = Some(now);
                            return true;
                        }
                    }
                    false
                }
            }
        } else {
            state.is_pressed = true;
            state.press_started = Some(now);
            state.last_triggered = Some(now);
            state.last_seen = Some(now);
            true
        }
    }

    pub fn handle_key_release(&mut self, key: KeyCode) {
        if let Some(state) = self.key_states.get_mut(&key) {
            state.release();
        }
    }

    /// Arrow/page keys repeat; everything else fires once per press
    pub fn with_default_config() -> Self {
        let mut handler = Self::new();

        handler.configure_keys(
            &[
                KeyCode::Up,
                KeyCode::Down,
                KeyCode::PageUp,
                KeyCode::PageDown,
                KeyCode::Left,
                KeyCode::Right,
                KeyCode::Char('+'),
                KeyCode::Char('='),
                KeyCode::Char('-'),
            ],
            KeyBehavior::navigation(),
        );

        handler
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::with_default_config()
    }
}
