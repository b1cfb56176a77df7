//! Teleprompter configuration model
//!
//! `PrompterConfig` is the live, always-valid record. It is never deserialized
//! directly: every external value (settings panel, key shortcuts, imported
//! payloads) arrives as a `ConfigPatch` and goes through `merge`, which
//! clamps numbers into their domain and rejects values that can't be made
//! valid. Rejected fields keep their previous value.

use super::color::HexColor;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::ops::RangeInclusive;

// ─────────────────────────────────────────────────────────────────────────────
// Domains
// ─────────────────────────────────────────────────────────────────────────────

pub const FONT_SIZE_RANGE: RangeInclusive<f64> = 16.0..=120.0;
pub const LINE_HEIGHT_RANGE: RangeInclusive<f64> = 1.0..=3.0;
pub const LETTER_SPACING_RANGE: RangeInclusive<f64> = -2.0..=10.0;
/// Margins are a percentage of the viewport
pub const MARGIN_RANGE: RangeInclusive<f64> = 0.0..=30.0;
/// Pixels advanced per engine tick
pub const SPEED_RANGE: RangeInclusive<f64> = 0.0..=3.0;
/// Percentage from the top of the viewport
pub const INDICATOR_RANGE: RangeInclusive<f64> = 0.0..=100.0;

// ─────────────────────────────────────────────────────────────────────────────
// Enumerated fields
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub const ALL: [TextAlign; 3] = [TextAlign::Left, TextAlign::Center, TextAlign::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == s)
    }

    /// The alignment as it appears after a horizontal flip
    pub fn mirrored(self) -> Self {
        match self {
            TextAlign::Left => TextAlign::Right,
            TextAlign::Center => TextAlign::Center,
            TextAlign::Right => TextAlign::Left,
        }
    }
}

/// Where the teleprompter panel sits inside the available area
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelPosition {
    Top,
    Bottom,
    Left,
    Right,
    #[default]
    Full,
}

impl PanelPosition {
    pub const ALL: [PanelPosition; 5] = [
        PanelPosition::Full,
        PanelPosition::Top,
        PanelPosition::Bottom,
        PanelPosition::Left,
        PanelPosition::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelPosition::Top => "top",
            PanelPosition::Bottom => "bottom",
            PanelPosition::Left => "left",
            PanelPosition::Right => "right",
            PanelPosition::Full => "full",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }

    /// Human label for the settings panel
    pub fn label(&self) -> &'static str {
        match self {
            PanelPosition::Full => "Full Screen",
            PanelPosition::Top => "Top Half",
            PanelPosition::Bottom => "Bottom Half",
            PanelPosition::Left => "Left Half",
            PanelPosition::Right => "Right Half",
        }
    }
}

/// Cycle through a fixed list, wrapping at both ends
fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    let len = all.len();
    let next = if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    };
    all[next]
}

// ─────────────────────────────────────────────────────────────────────────────
// Field identity
// ─────────────────────────────────────────────────────────────────────────────

/// Every configuration field, in settings-panel order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    FontSize,
    LineHeight,
    LetterSpacing,
    TextAlign,
    TextColor,
    BackgroundColor,
    PanelPosition,
    MirrorHorizontal,
    MirrorVertical,
    MarginTop,
    MarginBottom,
    MarginHorizontal,
    Speed,
    IndicatorPosition,
    IndicatorColor,
}

impl ConfigField {
    pub const ALL: [ConfigField; 15] = [
        ConfigField::FontSize,
        ConfigField::LineHeight,
        ConfigField::LetterSpacing,
        ConfigField::TextAlign,
        ConfigField::TextColor,
        ConfigField::BackgroundColor,
        ConfigField::PanelPosition,
        ConfigField::MirrorHorizontal,
        ConfigField::MirrorVertical,
        ConfigField::MarginTop,
        ConfigField::MarginBottom,
        ConfigField::MarginHorizontal,
        ConfigField::Speed,
        ConfigField::IndicatorPosition,
        ConfigField::IndicatorColor,
    ];

    /// Key used in exported payloads
    pub fn key(&self) -> &'static str {
        match self {
            ConfigField::FontSize => "fontSize",
            ConfigField::LineHeight => "lineHeight",
            ConfigField::LetterSpacing => "letterSpacing",
            ConfigField::TextAlign => "textAlign",
            ConfigField::TextColor => "textColor",
            ConfigField::BackgroundColor => "backgroundColor",
            ConfigField::PanelPosition => "panelPosition",
            ConfigField::MirrorHorizontal => "mirrorHorizontal",
            ConfigField::MirrorVertical => "mirrorVertical",
            ConfigField::MarginTop => "marginTop",
            ConfigField::MarginBottom => "marginBottom",
            ConfigField::MarginHorizontal => "marginHorizontal",
            ConfigField::Speed => "speed",
            ConfigField::IndicatorPosition => "indicatorPosition",
            ConfigField::IndicatorColor => "indicatorColor",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfigField::FontSize => "Font Size",
            ConfigField::LineHeight => "Line Height",
            ConfigField::LetterSpacing => "Letter Spacing",
            ConfigField::TextAlign => "Text Alignment",
            ConfigField::TextColor => "Text Color",
            ConfigField::BackgroundColor => "Background",
            ConfigField::PanelPosition => "Panel Position",
            ConfigField::MirrorHorizontal => "Horizontal Flip",
            ConfigField::MirrorVertical => "Vertical Flip",
            ConfigField::MarginTop => "Margin Top",
            ConfigField::MarginBottom => "Margin Bottom",
            ConfigField::MarginHorizontal => "Margin Sides",
            ConfigField::Speed => "Speed",
            ConfigField::IndicatorPosition => "Indicator Position",
            ConfigField::IndicatorColor => "Indicator Color",
        }
    }

    /// Domain of a numeric field, `None` for the others
    pub fn range(&self) -> Option<RangeInclusive<f64>> {
        match self {
            ConfigField::FontSize => Some(FONT_SIZE_RANGE),
            ConfigField::LineHeight => Some(LINE_HEIGHT_RANGE),
            ConfigField::LetterSpacing => Some(LETTER_SPACING_RANGE),
            ConfigField::MarginTop | ConfigField::MarginBottom | ConfigField::MarginHorizontal => {
                Some(MARGIN_RANGE)
            }
            ConfigField::Speed => Some(SPEED_RANGE),
            ConfigField::IndicatorPosition => Some(INDICATOR_RANGE),
            _ => None,
        }
    }

    /// Adjustment step for numeric fields
    pub fn step(&self) -> f64 {
        match self {
            ConfigField::LineHeight | ConfigField::Speed => 0.1,
            _ => 1.0,
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────────────────────────

/// A value that could not be accepted for a field
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: value is not a finite number")]
    NotFinite { field: ConfigField },

    #[error("{field}: {value:?} is not a valid color")]
    InvalidColor { field: ConfigField, value: String },

    #[error("{field}: {value:?} is not one of {expected}")]
    UnknownVariant {
        field: ConfigField,
        value: String,
        expected: &'static str,
    },

    #[error("{field}: expected {expected}")]
    WrongType {
        field: ConfigField,
        expected: &'static str,
    },
}

impl ValidationError {
    #[cfg(test)]
    pub fn field(&self) -> ConfigField {
        match self {
            ValidationError::NotFinite { field }
            | ValidationError::InvalidColor { field, .. }
            | ValidationError::UnknownVariant { field, .. }
            | ValidationError::WrongType { field, .. } => *field,
        }
    }
}

/// Outcome of merging a patch into the live configuration
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UpdateReport {
    /// Fields that took a new value (including clamped ones)
    pub applied: Vec<ConfigField>,
    /// Fields whose value was pulled back into the domain
    pub clamped: Vec<ConfigField>,
    /// Fields left unchanged because their value was unusable
    pub rejected: Vec<ValidationError>,
}

impl UpdateReport {
    #[cfg(test)]
    pub fn is_clean(&self) -> bool {
        self.clamped.is_empty() && self.rejected.is_empty()
    }

    pub(crate) fn extend_rejected(&mut self, errors: impl IntoIterator<Item = ValidationError>) {
        self.rejected.extend(errors);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Live configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Display and playback parameters; every field is always inside its domain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrompterConfig {
    pub font_size: f64,
    pub line_height: f64,
    pub letter_spacing: f64,
    pub text_align: TextAlign,
    pub text_color: HexColor,
    pub background_color: HexColor,
    pub panel_position: PanelPosition,
    pub mirror_horizontal: bool,
    pub mirror_vertical: bool,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_horizontal: f64,
    pub speed: f64,
    pub indicator_position: f64,
    pub indicator_color: HexColor,
}

impl Default for PrompterConfig {
    fn default() -> Self {
        Self {
            font_size: 48.0,
            line_height: 1.6,
            letter_spacing: 0.0,
            text_align: TextAlign::Center,
            text_color: HexColor::WHITE,
            background_color: HexColor::BLACK,
            panel_position: PanelPosition::Full,
            mirror_horizontal: false,
            mirror_vertical: false,
            margin_top: 10.0,
            margin_bottom: 10.0,
            margin_horizontal: 10.0,
            speed: 1.0,
            indicator_position: 50.0,
            indicator_color: HexColor::RED,
        }
    }
}

impl PrompterConfig {
    /// Current value of a numeric field
    pub fn number(&self, field: ConfigField) -> Option<f64> {
        match field {
            ConfigField::FontSize => Some(self.font_size),
            ConfigField::LineHeight => Some(self.line_height),
            ConfigField::LetterSpacing => Some(self.letter_spacing),
            ConfigField::MarginTop => Some(self.margin_top),
            ConfigField::MarginBottom => Some(self.margin_bottom),
            ConfigField::MarginHorizontal => Some(self.margin_horizontal),
            ConfigField::Speed => Some(self.speed),
            ConfigField::IndicatorPosition => Some(self.indicator_position),
            _ => None,
        }
    }

    /// Display string of any field, for the settings panel
    pub fn display_value(&self, field: ConfigField) -> String {
        match field {
            ConfigField::FontSize => format!("{}px", self.font_size),
            ConfigField::LineHeight => format!("{:.1}", self.line_height),
            ConfigField::LetterSpacing => format!("{}px", self.letter_spacing),
            ConfigField::TextAlign => self.text_align.as_str().to_string(),
            ConfigField::TextColor => self.text_color.to_string(),
            ConfigField::BackgroundColor => self.background_color.to_string(),
            ConfigField::PanelPosition => self.panel_position.label().to_string(),
            ConfigField::MirrorHorizontal => on_off(self.mirror_horizontal),
            ConfigField::MirrorVertical => on_off(self.mirror_vertical),
            ConfigField::MarginTop => format!("{}%", self.margin_top),
            ConfigField::MarginBottom => format!("{}%", self.margin_bottom),
            ConfigField::MarginHorizontal => format!("{}%", self.margin_horizontal),
            ConfigField::Speed => format!("{:.1}x", self.speed),
            ConfigField::IndicatorPosition => format!("{}%", self.indicator_position),
            ConfigField::IndicatorColor => self.indicator_color.to_string(),
        }
    }

    /// Merge a patch field by field; unspecified fields are preserved
    pub fn merge(&mut self, patch: &ConfigPatch) -> UpdateReport {
        let mut report = UpdateReport::default();

        merge_number(&mut report, ConfigField::FontSize, &mut self.font_size, patch.font_size);
        merge_number(&mut report, ConfigField::LineHeight, &mut self.line_height, patch.line_height);
        merge_number(
            &mut report,
            ConfigField::LetterSpacing,
            &mut self.letter_spacing,
            patch.letter_spacing,
        );
        merge_number(&mut report, ConfigField::MarginTop, &mut self.margin_top, patch.margin_top);
        merge_number(
            &mut report,
            ConfigField::MarginBottom,
            &mut self.margin_bottom,
            patch.margin_bottom,
        );
        merge_number(
            &mut report,
            ConfigField::MarginHorizontal,
            &mut self.margin_horizontal,
            patch.margin_horizontal,
        );
        merge_number(&mut report, ConfigField::Speed, &mut self.speed, patch.speed);
        merge_number(
            &mut report,
            ConfigField::IndicatorPosition,
            &mut self.indicator_position,
            patch.indicator_position,
        );

        merge_color(&mut report, ConfigField::TextColor, &mut self.text_color, &patch.text_color);
        merge_color(
            &mut report,
            ConfigField::BackgroundColor,
            &mut self.background_color,
            &patch.background_color,
        );
        merge_color(
            &mut report,
            ConfigField::IndicatorColor,
            &mut self.indicator_color,
            &patch.indicator_color,
        );

        if let Some(align) = patch.text_align {
            self.text_align = align;
            report.applied.push(ConfigField::TextAlign);
        }
        if let Some(position) = patch.panel_position {
            self.panel_position = position;
            report.applied.push(ConfigField::PanelPosition);
        }
        if let Some(flip) = patch.mirror_horizontal {
            self.mirror_horizontal = flip;
            report.applied.push(ConfigField::MirrorHorizontal);
        }
        if let Some(flip) = patch.mirror_vertical {
            self.mirror_vertical = flip;
            report.applied.push(ConfigField::MirrorVertical);
        }

        report
    }
}

fn on_off(b: bool) -> String {
    let label = if b { "on" } else { "off" };
    label.to_string()
}

fn merge_number(report: &mut UpdateReport, field: ConfigField, target: &mut f64, value: Option<f64>) {
    let Some(value) = value else {
        return;
    };
    if !value.is_finite() {
        report.rejected.push(ValidationError::NotFinite { field });
        return;
    }
    let Some(range) = field.range() else {
        return;
    };
    let clamped = value.clamp(*range.start(), *range.end());
    if clamped != value {
        report.clamped.push(field);
    }
    *target = clamped;
    report.applied.push(field);
}

fn merge_color(
    report: &mut UpdateReport,
    field: ConfigField,
    target: &mut HexColor,
    value: &Option<String>,
) {
    let Some(raw) = value else {
        return;
    };
    match HexColor::parse(raw) {
        Some(color) => {
            *target = color;
            report.applied.push(field);
        }
        None => report.rejected.push(ValidationError::InvalidColor {
            field,
            value: raw.clone(),
        }),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Partial updates
// ─────────────────────────────────────────────────────────────────────────────

/// A partial configuration update holding unchecked values
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConfigPatch {
    pub font_size: Option<f64>,
    pub line_height: Option<f64>,
    pub letter_spacing: Option<f64>,
    pub text_align: Option<TextAlign>,
    pub text_color: Option<String>,
    pub background_color: Option<String>,
    pub panel_position: Option<PanelPosition>,
    pub mirror_horizontal: Option<bool>,
    pub mirror_vertical: Option<bool>,
    pub margin_top: Option<f64>,
    pub margin_bottom: Option<f64>,
    pub margin_horizontal: Option<f64>,
    pub speed: Option<f64>,
    pub indicator_position: Option<f64>,
    pub indicator_color: Option<String>,
}

impl ConfigPatch {
    #[cfg(test)]
    pub fn speed(speed: f64) -> Self {
        Self {
            speed: Some(speed),
            ..Default::default()
        }
    }

    pub fn colors(preset: &ColorPreset) -> Self {
        Self {
            text_color: Some(preset.text.to_string()),
            background_color: Some(preset.background.to_string()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Set a numeric field by identity; non-numeric fields are ignored
    pub fn set_number(&mut self, field: ConfigField, value: f64) {
        let slot = match field {
            ConfigField::FontSize => &mut self.font_size,
            ConfigField::LineHeight => &mut self.line_height,
            ConfigField::LetterSpacing => &mut self.letter_spacing,
            ConfigField::MarginTop => &mut self.margin_top,
            ConfigField::MarginBottom => &mut self.margin_bottom,
            ConfigField::MarginHorizontal => &mut self.margin_horizontal,
            ConfigField::Speed => &mut self.speed,
            ConfigField::IndicatorPosition => &mut self.indicator_position,
            _ => return,
        };
        *slot = Some(value);
    }

    /// Patch that moves one field a single step from its current value
    ///
    /// Numbers move by the field's step, enums cycle, booleans toggle and
    /// colors walk the named palette.
    pub fn step(config: &PrompterConfig, field: ConfigField, forward: bool) -> Self {
        let mut patch = Self::default();
        if let Some(current) = config.number(field) {
            let delta = if forward { field.step() } else { -field.step() };
            // Round to two decimals so 0.1 steps don't accumulate float noise
            let next = ((current + delta) * 100.0).round() / 100.0;
            patch.set_number(field, next);
            return patch;
        }

        match field {
            ConfigField::TextAlign => {
                patch.text_align = Some(cycle(&TextAlign::ALL, config.text_align, forward));
            }
            ConfigField::PanelPosition => {
                patch.panel_position =
                    Some(cycle(&PanelPosition::ALL, config.panel_position, forward));
            }
            ConfigField::MirrorHorizontal => {
                patch.mirror_horizontal = Some(!config.mirror_horizontal);
            }
            ConfigField::MirrorVertical => patch.mirror_vertical = Some(!config.mirror_vertical),
            ConfigField::TextColor => {
                patch.text_color = Some(next_palette_color(config.text_color, forward));
            }
            ConfigField::BackgroundColor => {
                patch.background_color =
                    Some(next_palette_color(config.background_color, forward));
            }
            ConfigField::IndicatorColor => {
                patch.indicator_color = Some(next_palette_color(config.indicator_color, forward));
            }
            _ => {}
        }
        patch
    }

    /// Build a patch from a JSON object, e.g. the `config` of an imported payload
    ///
    /// Unknown keys are skipped. A value of the wrong JSON type (or an unknown
    /// enum name) is reported and that field alone is left out of the patch.
    pub fn from_json_object(object: &Map<String, Value>) -> (Self, Vec<ValidationError>) {
        let mut patch = Self::default();
        let mut errors = Vec::new();

        for (key, value) in object {
            let Some(field) = ConfigField::from_key(key) else {
                tracing::debug!("Ignoring unknown config key {:?}", key);
                continue;
            };
            // null means "not set", same as an absent key
            if value.is_null() {
                continue;
            }

            if field.range().is_some() {
                match value.as_f64() {
                    Some(n) => patch.set_number(field, n),
                    None => errors.push(ValidationError::WrongType {
                        field,
                        expected: "a number",
                    }),
                }
                continue;
            }

            match field {
                ConfigField::TextColor | ConfigField::BackgroundColor | ConfigField::IndicatorColor => {
                    let Some(s) = value.as_str() else {
                        errors.push(ValidationError::WrongType {
                            field,
                            expected: "a color string",
                        });
                        continue;
                    };
                    let slot = match field {
                        ConfigField::TextColor => &mut patch.text_color,
                        ConfigField::BackgroundColor => &mut patch.background_color,
                        _ => &mut patch.indicator_color,
                    };
                    *slot = Some(s.to_string());
                }
                ConfigField::MirrorHorizontal | ConfigField::MirrorVertical => {
                    let Some(b) = value.as_bool() else {
                        errors.push(ValidationError::WrongType {
                            field,
                            expected: "a boolean",
                        });
                        continue;
                    };
                    if field == ConfigField::MirrorHorizontal {
                        patch.mirror_horizontal = Some(b);
                    } else {
                        patch.mirror_vertical = Some(b);
                    }
                }
                ConfigField::TextAlign => match value.as_str().map(TextAlign::from_name) {
                    Some(Some(align)) => patch.text_align = Some(align),
                    _ => errors.push(ValidationError::UnknownVariant {
                        field,
                        value: value.to_string(),
                        expected: "left, center, right",
                    }),
                },
                ConfigField::PanelPosition => match value.as_str().map(PanelPosition::from_name) {
                    Some(Some(position)) => patch.panel_position = Some(position),
                    _ => errors.push(ValidationError::UnknownVariant {
                        field,
                        value: value.to_string(),
                        expected: "top, bottom, left, right, full",
                    }),
                },
                _ => {}
            }
        }

        (patch, errors)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Color presets
// ─────────────────────────────────────────────────────────────────────────────

/// A text/background pair that is comfortable to read from a distance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPreset {
    pub name: &'static str,
    pub text: &'static str,
    pub background: &'static str,
}

pub const EYE_FRIENDLY_PRESETS: [ColorPreset; 5] = [
    ColorPreset {
        name: "White on Black",
        text: "#ffffff",
        background: "#000000",
    },
    ColorPreset {
        name: "Yellow on Black",
        text: "#ffff00",
        background: "#000000",
    },
    ColorPreset {
        name: "Green on Black",
        text: "#00ff00",
        background: "#000000",
    },
    ColorPreset {
        name: "Black on White",
        text: "#000000",
        background: "#ffffff",
    },
    ColorPreset {
        name: "Black on Yellow",
        text: "#000000",
        background: "#ffff00",
    },
];

/// Palette walked by `ConfigPatch::step` for color fields
const STEP_PALETTE: [&str; 8] = [
    "#ffffff", "#ffff00", "#00ff00", "#00ffff", "#ff0000", "#ffa500", "#808080", "#000000",
];

fn next_palette_color(current: HexColor, forward: bool) -> String {
    let current = current.to_string();
    let idx = STEP_PALETTE.iter().position(|c| *c == current);
    let next = match (idx, forward) {
        (Some(i), true) => (i + 1) % STEP_PALETTE.len(),
        (Some(i), false) => (i + STEP_PALETTE.len() - 1) % STEP_PALETTE.len(),
        (None, _) => 0,
    };
    STEP_PALETTE[next].to_string()
}
