// Components module - reusable UI building blocks
//
// Chrome components are rendered around the preview in windowed mode:
// - Control bar: play state, speed, elapsed time
// - Status bar: key hints and the latest warning
// - Settings panel: every display/playback parameter
//
// The prompter view is the teleprompter itself and is the only thing
// drawn in presentation mode.

pub mod control_bar;
pub mod prompter_view;
pub mod scrollbar;
pub mod settings_panel;
pub mod status_bar;
pub mod toast;

pub use toast::Toast;

/// Colors of the application chrome; the teleprompter panel uses the
/// configured colors instead
pub mod palette {
    use ratatui::style::Color;

    pub const BACKGROUND: Color = Color::Reset;
    pub const FOREGROUND: Color = Color::Gray;
    pub const BORDER: Color = Color::DarkGray;
    pub const HIGHLIGHT: Color = Color::Cyan;
    pub const ACCENT: Color = Color::Yellow;
    pub const PLAYING: Color = Color::Green;
    pub const WARNING: Color = Color::LightRed;
}
