//! Terminal implementation of the fullscreen capability
//!
//! "Fullscreen" in a terminal means the teleprompter takes the whole window
//! with all chrome hidden. The host refuses when the window is too small to
//! present anything useful, and leaves on its own when the user presses Esc
//! or the window shrinks below that size.

use crate::prompter::presentation::{CapabilityError, FullscreenHost};

pub const MIN_PRESENT_WIDTH: u16 = 20;
pub const MIN_PRESENT_HEIGHT: u16 = 5;

#[derive(Debug)]
pub struct TerminalHost {
    width: u16,
    height: u16,
    fullscreen: bool,
    /// Change the host made on its own, waiting to be observed
    change: Option<bool>,
}

impl TerminalHost {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            fullscreen: false,
            change: None,
        }
    }

    #[cfg(test)]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn fits(&self) -> bool {
        self.width >= MIN_PRESENT_WIDTH && self.height >= MIN_PRESENT_HEIGHT
    }

    pub fn on_resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        if self.fullscreen && !self.fits() {
            tracing::warn!(
                "Terminal shrank to {}x{}, leaving presentation mode",
                width,
                height
            );
            self.leave_on_own();
        }
    }

    /// The user's "get me out" key; true if it ended presentation
    pub fn escape_gesture(&mut self) -> bool {
        if !self.fullscreen {
            return false;
        }
        self.leave_on_own();
        true
    }

    fn leave_on_own(&mut self) {
        self.fullscreen = false;
        self.change = Some(false);
    }
}

impl FullscreenHost for TerminalHost {
    fn request_fullscreen(&mut self) -> Result<(), CapabilityError> {
        if !self.fits() {
            return Err(CapabilityError::TooSmall {
                width: self.width,
                height: self.height,
                min_width: MIN_PRESENT_WIDTH,
                min_height: MIN_PRESENT_HEIGHT,
            });
        }
        self.fullscreen = true;
        Ok(())
    }

    fn exit_fullscreen(&mut self) {
        self.fullscreen = false;
    }

    fn take_change(&mut self) -> Option<bool> {
        self.change.take()
    }
}
