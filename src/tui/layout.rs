/// Responsive breakpoints for the windowed layout.
///
/// Single source of truth for width thresholds - no magic numbers scattered in render code.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    /// < 70 cols: preview only; the settings panel takes over the body while focused
    Compact,
    /// 70-119 cols: preview beside a narrow settings panel
    Normal,
    /// 120+ cols: wider settings panel with labels spelled out
    Wide,
}

impl Breakpoint {
    pub fn from_width(width: u16) -> Self {
        match width {
            0..=69 => Breakpoint::Compact,
            70..=119 => Breakpoint::Normal,
            _ => Breakpoint::Wide,
        }
    }

    /// Check if at least this breakpoint (inclusive)
    pub fn at_least(&self, min: Breakpoint) -> bool {
        self.ordinal() >= min.ordinal()
    }

    /// Columns for the settings panel beside the preview, if it fits
    pub fn settings_width(&self) -> Option<u16> {
        match self {
            Breakpoint::Compact => None,
            Breakpoint::Normal => Some(34),
            Breakpoint::Wide => Some(42),
        }
    }

    fn ordinal(&self) -> u8 {
        match self {
            Breakpoint::Compact => 0,
            Breakpoint::Normal => 1,
            Breakpoint::Wide => 2,
        }
    }
}
