//! Color values for text, background and indicator
//!
//! Accepts `#rgb`, `#rrggbb` and the CSS basic color names. Everything is
//! normalised to lowercase `#rrggbb` on the way in, so a color that went
//! through export/import comes back byte-identical.

use serde::{Serialize, Serializer};
use std::fmt;

/// CSS basic named colors (plus orange, which the CSS2.1 list added)
const NAMED_COLORS: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("silver", "#c0c0c0"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("white", "#ffffff"),
    ("maroon", "#800000"),
    ("red", "#ff0000"),
    ("purple", "#800080"),
    ("fuchsia", "#ff00ff"),
    ("green", "#008000"),
    ("lime", "#00ff00"),
    ("olive", "#808000"),
    ("yellow", "#ffff00"),
    ("navy", "#000080"),
    ("blue", "#0000ff"),
    ("teal", "#008080"),
    ("aqua", "#00ffff"),
    ("orange", "#ffa500"),
];

/// A validated 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);
    pub const RED: Self = Self::rgb(0xff, 0x00, 0x00);
    pub const YELLOW: Self = Self::rgb(0xff, 0xff, 0x00);
    pub const GREEN: Self = Self::rgb(0x00, 0xff, 0x00);

    /// Parse a color string, `None` if it isn't a color we understand
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        let lower = s.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .and_then(|(_, hex)| Self::parse_hex(&hex[1..]))
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                // #abc expands to #aabbcc
                let mut digits = hex.chars().map(|c| c.to_digit(16).unwrap_or(0) as u8);
                let r = digits.next()?;
                let g = digits.next()?;
                let b = digits.next()?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::rgb(r, g, b))
            }
            _ => None,
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<HexColor> for ratatui::style::Color {
    fn from(c: HexColor) -> Self {
        ratatui::style::Color::Rgb(c.r, c.g, c.b)
    }
}
