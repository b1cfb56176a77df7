//! Clipboard access for pasting scripts
//!
//! Uses `arboard` for cross-platform support (Windows, macOS, Linux).
//! The clipboard is created fresh each time to avoid holding resources.

use anyhow::{bail, Context, Result};
use arboard::Clipboard;

/// Read text from the system clipboard
///
/// Common failure cases: no display server (headless Linux), clipboard
/// holding an image instead of text.
pub fn paste_from_clipboard() -> Result<String> {
    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;
    let text = clipboard
        .get_text()
        .context("Clipboard has no text")?
        .replace("\r\n", "\n");
    if text.trim().is_empty() {
        bail!("Clipboard is empty");
    }
    Ok(text)
}
