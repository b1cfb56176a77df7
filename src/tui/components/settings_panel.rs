//! Settings panel component
//!
//! Owns the navigation state of the settings list:
//! - One row per configuration field, then one per color preset
//! - Selection and scroll position within the list
//! - The edit the last key asked for, until App applies it
//!
//! The panel never touches the configuration itself. App takes the pending
//! edit, turns it into a patch against the live values and merges it through
//! the session, so every change goes through the same validation.

use super::palette;
use crate::prompter::settings::{
    ConfigField, ConfigPatch, PrompterConfig, EYE_FRIENDLY_PRESETS,
};
use crate::tui::traits::{Handled, Interactive};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// One selectable line of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    Field(ConfigField),
    Preset(usize),
}

impl SettingsRow {
    pub const COUNT: usize = ConfigField::ALL.len() + EYE_FRIENDLY_PRESETS.len();

    pub fn at(index: usize) -> Self {
        match ConfigField::ALL.get(index) {
            Some(field) => SettingsRow::Field(*field),
            None => SettingsRow::Preset(index - ConfigField::ALL.len()),
        }
    }
}

/// A change requested from the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEdit {
    Step { field: ConfigField, forward: bool },
    Preset(usize),
}

impl SettingsEdit {
    pub fn to_patch(self, config: &PrompterConfig) -> ConfigPatch {
        match self {
            SettingsEdit::Step { field, forward } => ConfigPatch::step(config, field, forward),
            SettingsEdit::Preset(index) => EYE_FRIENDLY_PRESETS
                .get(index)
                .map(ConfigPatch::colors)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SettingsPanel {
    selected: usize,
    /// First visible row
    scroll: usize,
    pending: Option<SettingsEdit>,
}

impl SettingsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_row(&self) -> SettingsRow {
        SettingsRow::at(self.selected)
    }

    pub fn take_edit(&mut self) -> Option<SettingsEdit> {
        self.pending.take()
    }

    fn select(&mut self, index: usize) {
        self.selected = index.min(SettingsRow::COUNT - 1);
    }

    fn edit(&mut self, forward: bool, activate: bool) {
        self.pending = match self.selected_row() {
            SettingsRow::Preset(index) => Some(SettingsEdit::Preset(index)),
            // Enter only cycles choices; numbers move with the arrows
            SettingsRow::Field(field) if activate && field.range().is_some() => None,
            SettingsRow::Field(field) => Some(SettingsEdit::Step { field, forward }),
        };
    }

    /// Keep the selection inside a window of `rows` lines
    fn follow_selection(&mut self, rows: usize) {
        if rows == 0 {
            return;
        }
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + rows {
            self.scroll = self.selected + 1 - rows;
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, config: &PrompterConfig, focused: bool) {
        let border = if focused {
            palette::HIGHLIGHT
        } else {
            palette::BORDER
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Settings ");
        let inner = block.inner(area);

        let visible_rows = inner.height as usize;
        self.follow_selection(visible_rows);
        let label_width = inner.width.saturating_sub(12).clamp(6, 20) as usize;

        let lines: Vec<Line> = (self.scroll..SettingsRow::COUNT)
            .take(visible_rows)
            .map(|i| row_line(SettingsRow::at(i), config, label_width, focused && i == self.selected))
            .collect();

        f.render_widget(
            Paragraph::new(lines)
                .style(Style::default().bg(palette::BACKGROUND))
                .block(block),
            area,
        );
    }
}

fn row_line(row: SettingsRow, config: &PrompterConfig, label_width: usize, selected: bool) -> Line<'static> {
    let label_style = if selected {
        Style::default()
            .fg(palette::HIGHLIGHT)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(palette::FOREGROUND)
    };
    let marker = if selected { "›" } else { " " };

    match row {
        SettingsRow::Field(field) => {
            let mut spans = vec![
                Span::styled(format!("{}{:<width$}", marker, field.label(), width = label_width), label_style),
                Span::raw(" "),
            ];
            if let Some(color) = swatch(config, field) {
                spans.push(Span::styled("■ ", Style::default().fg(color)));
            }
            spans.push(Span::styled(
                config.display_value(field),
                Style::default().fg(palette::ACCENT),
            ));
            Line::from(spans)
        }
        SettingsRow::Preset(index) => {
            let Some(preset) = EYE_FRIENDLY_PRESETS.get(index) else {
                return Line::raw("");
            };
            let text: Color = hex_or_reset(preset.text);
            let background: Color = hex_or_reset(preset.background);
            Line::from(vec![
                Span::styled(format!("{}{:<width$}", marker, "Preset", width = label_width), label_style),
                Span::raw(" "),
                Span::styled(
                    format!(" {} ", preset.name),
                    Style::default().fg(text).bg(background),
                ),
            ])
        }
    }
}

fn swatch(config: &PrompterConfig, field: ConfigField) -> Option<Color> {
    let color = match field {
        ConfigField::TextColor => config.text_color,
        ConfigField::BackgroundColor => config.background_color,
        ConfigField::IndicatorColor => config.indicator_color,
        _ => return None,
    };
    Some(color.into())
}

fn hex_or_reset(hex: &str) -> Color {
    crate::prompter::color::HexColor::parse(hex)
        .map(Color::from)
        .unwrap_or(Color::Reset)
}

impl Interactive for SettingsPanel {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.select(self.selected.saturating_sub(1));
                Handled::Yes
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select(self.selected + 1);
                Handled::Yes
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.select(0);
                Handled::Yes
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.select(SettingsRow::COUNT - 1);
                Handled::Yes
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.edit(false, false);
                Handled::Yes
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.edit(true, false);
                Handled::Yes
            }
            KeyCode::Enter => {
                self.edit(true, true);
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn focus_hint(&self) -> Option<&'static str> {
        match self.selected_row() {
            SettingsRow::Preset(_) => Some("↑↓:select  Enter:apply preset  Tab:back"),
            SettingsRow::Field(field) if field.range().is_some() => {
                Some("↑↓:select  ←→:adjust  Tab:back")
            }
            SettingsRow::Field(_) => Some("↑↓:select  ←→/Enter:change  Tab:back"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn rows_list_fields_then_presets() {
        assert_eq!(SettingsRow::at(0), SettingsRow::Field(ConfigField::FontSize));
        assert_eq!(
            SettingsRow::at(ConfigField::ALL.len()),
            SettingsRow::Preset(0)
        );
        assert_eq!(SettingsRow::at(SettingsRow::COUNT - 1), SettingsRow::Preset(4));
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut panel = SettingsPanel::new();
        panel.handle_key(key(KeyCode::Up));
        assert_eq!(panel.selected_row(), SettingsRow::Field(ConfigField::FontSize));
        panel.handle_key(key(KeyCode::End));
        panel.handle_key(key(KeyCode::Down));
        assert_eq!(panel.selected_row(), SettingsRow::Preset(4));
    }

    #[test]
    fn arrows_step_the_selected_field() {
        let mut panel = SettingsPanel::new();
        let config = PrompterConfig::default();

        panel.handle_key(key(KeyCode::Right));
        let edit = panel.take_edit().unwrap();
        assert_eq!(
            edit,
            SettingsEdit::Step {
                field: ConfigField::FontSize,
                forward: true
            }
        );
        let patch = edit.to_patch(&config);
        assert_eq!(patch.font_size, Some(config.font_size + ConfigField::FontSize.step()));
        assert!(panel.take_edit().is_none());
    }

    #[test]
    fn enter_cycles_choices_but_not_numbers() {
        let mut panel = SettingsPanel::new();
        panel.handle_key(key(KeyCode::Enter));
        assert!(panel.take_edit().is_none());

        panel.handle_key(key(KeyCode::Down));
        panel.handle_key(key(KeyCode::Down));
        panel.handle_key(key(KeyCode::Down));
        assert_eq!(panel.selected_row(), SettingsRow::Field(ConfigField::TextAlign));
        panel.handle_key(key(KeyCode::Enter));
        let patch = panel.take_edit().unwrap().to_patch(&PrompterConfig::default());
        assert!(patch.text_align.is_some());
    }

    #[test]
    fn presets_apply_both_colors() {
        let mut panel = SettingsPanel::new();
        panel.handle_key(key(KeyCode::End));
        panel.handle_key(key(KeyCode::Enter));

        let mut config = PrompterConfig::default();
        let patch = panel.take_edit().unwrap().to_patch(&config);
        let report = config.merge(&patch);
        assert!(report.is_clean());
        assert_eq!(config.text_color.to_string(), "#000000");
        assert_eq!(config.background_color.to_string(), "#ffff00");
    }

    #[test]
    fn scroll_follows_selection() {
        let mut panel = SettingsPanel::new();
        panel.select(12);
        panel.follow_selection(5);
        assert_eq!(panel.scroll, 8);
        panel.select(2);
        panel.follow_selection(5);
        assert_eq!(panel.scroll, 2);
    }

    #[test]
    fn unrelated_keys_bubble_up() {
        let mut panel = SettingsPanel::new();
        assert_eq!(panel.handle_key(key(KeyCode::Char('x'))), Handled::No);
    }
}
