//! Component trait system for TUI architecture
//!
//! Instead of App knowing how every panel reacts to keys, components
//! declare their own input handling through [`Interactive`].

mod interactive;

pub use interactive::{Handled, Interactive};
