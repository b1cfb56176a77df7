//! Script text shown by the teleprompter
//!
//! Content is opaque: no markup, no parsing. The only thing the rest of the
//! crate cares about is that replacing it bumps a revision counter, so the
//! layout knows to re-measure.

/// Placeholder script shown before the user loads their own
pub const DEFAULT_SCRIPT: &str = "Paste your script here...\n\n\
This is your teleprompter content area.\n\n\
The text will scroll smoothly at your preferred speed.\n\n\
You can customize font size, colors, and many other settings.\n\n\
Perfect for presentations, videos, and live streaming!";

#[derive(Debug, Clone)]
pub struct Content {
    text: String,
    revision: u64,
}

impl Content {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            revision: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the whole buffer
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.revision = self.revision.wrapping_add(1);
    }

    /// Changes every time the text is replaced
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::new(DEFAULT_SCRIPT)
    }
}
