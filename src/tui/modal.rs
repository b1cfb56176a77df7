// Modal system for TUI overlays
//
// Self-contained modal dialogs that handle their own input and return actions.
// App just holds Option<Modal>, input routing acts on returned ModalAction.

use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// Input consumed, no state change needed
    None,
    Close,
    /// The user accepted the question the modal asked
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    /// Keyboard shortcuts
    Help,
    /// "Reset all settings to defaults?"
    ConfirmReset,
}

impl Modal {
    pub fn handle_input(&self, key: KeyCode) -> ModalAction {
        match self {
            Modal::Help => match key {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Enter => {
                    ModalAction::Close
                }
                _ => ModalAction::None,
            },
            Modal::ConfirmReset => match key {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => ModalAction::Confirm,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc | KeyCode::Char('q') => {
                    ModalAction::Close
                }
                _ => ModalAction::None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_reset_needs_an_explicit_yes() {
        let modal = Modal::ConfirmReset;
        assert_eq!(modal.handle_input(KeyCode::Char('y')), ModalAction::Confirm);
        assert_eq!(modal.handle_input(KeyCode::Enter), ModalAction::Confirm);
        assert_eq!(modal.handle_input(KeyCode::Esc), ModalAction::Close);
        assert_eq!(modal.handle_input(KeyCode::Char(' ')), ModalAction::None);
    }

    #[test]
    fn help_closes_on_its_own_key() {
        assert_eq!(Modal::Help.handle_input(KeyCode::Char('?')), ModalAction::Close);
        assert_eq!(Modal::Help.handle_input(KeyCode::Char('f')), ModalAction::None);
    }
}
