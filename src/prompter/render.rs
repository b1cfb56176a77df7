//! Rendering contract: what the view layer needs, computed from config
//!
//! Sizes in the configuration are in pixels and percentages. The terminal
//! works in cells, so a virtual pixel grid maps one cell to
//! `CELL_WIDTH_PX` × `CELL_HEIGHT_PX`. Scroll offsets stay in virtual pixels
//! end to end; only drawing converts them to rows.

use super::color::HexColor;
use super::settings::{PanelPosition, PrompterConfig, TextAlign};
use ratatui::layout::Rect;

pub const CELL_WIDTH_PX: f64 = 12.0;
pub const CELL_HEIGHT_PX: f64 = 24.0;

/// Inner spacing of the scroll container, in cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Padding {
    pub top: u16,
    pub bottom: u16,
    pub left: u16,
    pub right: u16,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f64,
    pub line_height: f64,
    pub letter_spacing: f64,
    pub align: TextAlign,
    pub color: HexColor,
}

impl TextStyle {
    /// Rows each line of text occupies
    pub fn row_pitch(&self) -> u16 {
        ((self.font_size * self.line_height) / CELL_HEIGHT_PX)
            .round()
            .max(1.0) as u16
    }

    /// Blank cells between glyphs; negative spacing can't be drawn and is 0
    pub fn glyph_gap(&self) -> u16 {
        (self.letter_spacing / CELL_WIDTH_PX).round().max(0.0) as u16
    }
}

/// Independent reflections about the vertical and horizontal axes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mirror {
    pub horizontal: bool,
    pub vertical: bool,
}

/// The reading-position line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    /// Row inside the panel, counted from the panel's top edge
    pub row: u16,
    pub color: HexColor,
}

/// Everything the view layer needs to draw the teleprompter panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderModel {
    pub panel: Rect,
    pub padding: Padding,
    pub text: TextStyle,
    pub mirror: Mirror,
    pub indicator: Indicator,
    pub background: HexColor,
}

impl RenderModel {
    pub fn compute(config: &PrompterConfig, area: Rect) -> Self {
        let panel = panel_area(config.panel_position, area);
        let mirror = Mirror {
            horizontal: config.mirror_horizontal,
            vertical: config.mirror_vertical,
        };

        let mut indicator_row = indicator_row(panel.height, config.indicator_position);
        if mirror.vertical && panel.height > 0 {
            indicator_row = panel.height - 1 - indicator_row;
        }

        Self {
            panel,
            padding: padding(config, panel),
            text: TextStyle {
                font_size: config.font_size,
                line_height: config.line_height,
                letter_spacing: config.letter_spacing,
                align: config.text_align,
                color: config.text_color,
            },
            mirror,
            indicator: Indicator {
                row: indicator_row,
                color: config.indicator_color,
            },
            background: config.background_color,
        }
    }

    /// Width available to text after horizontal padding
    pub fn text_width(&self) -> u16 {
        self.panel
            .width
            .saturating_sub(self.padding.left + self.padding.right)
    }

    /// The alignment as drawn, after a horizontal flip
    pub fn effective_align(&self) -> TextAlign {
        if self.mirror.horizontal {
            self.text.align.mirrored()
        } else {
            self.text.align
        }
    }
}

/// Where the panel sits inside `area`
pub fn panel_area(position: PanelPosition, area: Rect) -> Rect {
    let half_h = area.height / 2;
    let half_w = area.width / 2;
    match position {
        PanelPosition::Full => area,
        PanelPosition::Top => Rect::new(area.x, area.y, area.width, half_h.max(1).min(area.height)),
        PanelPosition::Bottom => {
            let h = area.height - half_h;
            Rect::new(area.x, area.y + half_h, area.width, h)
        }
        PanelPosition::Left => Rect::new(area.x, area.y, half_w.max(1).min(area.width), area.height),
        PanelPosition::Right => {
            let w = area.width - half_w;
            Rect::new(area.x + half_w, area.y, w, area.height)
        }
    }
}

/// Margins as cells: top/bottom from panel height, sides from panel width
pub fn padding(config: &PrompterConfig, panel: Rect) -> Padding {
    let cells = |extent: u16, percent: f64| (extent as f64 * percent / 100.0).round() as u16;
    let side = cells(panel.width, config.margin_horizontal);
    Padding {
        top: cells(panel.height, config.margin_top),
        bottom: cells(panel.height, config.margin_bottom),
        left: side,
        right: side,
    }
}

/// Indicator row for a percentage from the top
pub fn indicator_row(height: u16, percent: f64) -> u16 {
    if height == 0 {
        return 0;
    }
    let row = (height as f64 * percent / 100.0).floor() as u16;
    row.min(height - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect::new(0, 0, 100, 40)
    }

    #[test]
    fn panel_positions_split_the_area() {
        assert_eq!(panel_area(PanelPosition::Full, area()), area());
        assert_eq!(panel_area(PanelPosition::Top, area()), Rect::new(0, 0, 100, 20));
        assert_eq!(panel_area(PanelPosition::Bottom, area()), Rect::new(0, 20, 100, 20));
        assert_eq!(panel_area(PanelPosition::Left, area()), Rect::new(0, 0, 50, 40));
        assert_eq!(panel_area(PanelPosition::Right, area()), Rect::new(50, 0, 50, 40));

        let odd = Rect::new(2, 3, 11, 7);
        let top = panel_area(PanelPosition::Top, odd);
        let bottom = panel_area(PanelPosition::Bottom, odd);
        assert_eq!(top.height + bottom.height, 7);
        assert_eq!(bottom.y, top.y + top.height);
    }

    #[test]
    fn margins_are_percentages_of_the_panel() {
        let config = PrompterConfig {
            margin_top: 10.0,
            margin_bottom: 25.0,
            margin_horizontal: 30.0,
            ..Default::default()
        };
        let p = padding(&config, area());
        assert_eq!(p, Padding { top: 4, bottom: 10, left: 30, right: 30 });
    }

    #[test]
    fn text_metrics_follow_font_settings() {
        let model = RenderModel::compute(&PrompterConfig::default(), area());
        // 48px * 1.6 = 76.8px ≈ 3 rows of 24px
        assert_eq!(model.text.row_pitch(), 3);
        assert_eq!(model.text.glyph_gap(), 0);

        let small = PrompterConfig {
            font_size: 16.0,
            line_height: 1.0,
            letter_spacing: 10.0,
            ..Default::default()
        };
        let model = RenderModel::compute(&small, area());
        assert_eq!(model.text.row_pitch(), 1);
        assert_eq!(model.text.glyph_gap(), 1);

        let tight = PrompterConfig {
            letter_spacing: -2.0,
            ..Default::default()
        };
        assert_eq!(RenderModel::compute(&tight, area()).text.glyph_gap(), 0);
    }

    #[test]
    fn indicator_position_and_vertical_mirror() {
        assert_eq!(indicator_row(40, 50.0), 20);
        assert_eq!(indicator_row(40, 100.0), 39);
        assert_eq!(indicator_row(40, 0.0), 0);
        assert_eq!(indicator_row(0, 50.0), 0);

        let flipped = PrompterConfig {
            indicator_position: 25.0,
            mirror_vertical: true,
            ..Default::default()
        };
        let model = RenderModel::compute(&flipped, area());
        assert_eq!(model.indicator.row, 29);
    }

    #[test]
    fn horizontal_mirror_swaps_alignment() {
        let config = PrompterConfig {
            text_align: TextAlign::Left,
            mirror_horizontal: true,
            ..Default::default()
        };
        let model = RenderModel::compute(&config, area());
        assert_eq!(model.effective_align(), TextAlign::Right);
        assert!(model.mirror.horizontal && !model.mirror.vertical);
    }
}
