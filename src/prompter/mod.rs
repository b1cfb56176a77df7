//! Teleprompter core
//!
//! Everything here is independent of the terminal. `Session` is the single
//! state container: configuration, content, the scroll engine and its view,
//! the playback timer and clock, and presentation state. Every change goes
//! through one of its operations, so invariants (offset within bounds, clock
//! armed exactly while running, overlay closed outside fullscreen) are kept
//! in one place.

pub mod clock;
pub mod color;
pub mod commands;
pub mod content;
pub mod engine;
pub mod input;
pub mod layout;
pub mod presentation;
pub mod render;
pub mod settings;
pub mod timer;
pub mod transfer;

use clock::{ClockTick, PlaybackClock};
use commands::Command;
use content::Content;
use engine::{Extent, ScrollEngine, ScrollOrigin, ScrollView, StopReason, Transition};
use layout::TextLayout;
use presentation::{CapabilityError, FullscreenHost, PresentationController};
use ratatui::layout::Rect;
use render::RenderModel;
use settings::{ConfigPatch, PrompterConfig, UpdateReport};
use std::path::{Path, PathBuf};
use std::time::Duration;
use timer::PlaybackTimer;
use transfer::{ImportOutcome, TransferError};

struct CachedLayout {
    revision: u64,
    model: RenderModel,
    layout: TextLayout,
}

pub struct Session {
    config: PrompterConfig,
    content: Content,
    engine: ScrollEngine,
    view: ScrollView,
    timer: PlaybackTimer,
    clock: PlaybackClock,
    presentation: PresentationController,
    /// Area the teleprompter was last drawn into
    area: Rect,
    cache: Option<CachedLayout>,
}

impl Session {
    pub fn new(tick_period: Duration) -> Self {
        Self {
            config: PrompterConfig::default(),
            content: Content::default(),
            engine: ScrollEngine::new(),
            view: ScrollView::new(),
            timer: PlaybackTimer::new(),
            clock: PlaybackClock::new(tick_period),
            presentation: PresentationController::new(),
            area: Rect::default(),
            cache: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn config(&self) -> &PrompterConfig {
        &self.config
    }

    #[cfg(test)]
    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn is_playing(&self) -> bool {
        self.engine.is_running()
    }

    /// Authoritative scroll offset, virtual pixels
    #[cfg(test)]
    pub fn offset(&self) -> f64 {
        self.engine.offset()
    }

    /// Where the view is drawn from; equals `offset()` except for a user
    /// scroll the running engine hasn't overwritten yet
    pub fn scroll_top(&self) -> f64 {
        self.view.scroll_top()
    }

    pub fn timer(&self) -> &PlaybackTimer {
        &self.timer
    }

    pub fn presentation(&self) -> &PresentationController {
        &self.presentation
    }

    #[cfg(test)]
    pub fn clock_armed(&self) -> bool {
        self.clock.is_armed()
    }

    /// Wait for the next playback tick; pends while stopped
    pub async fn next_tick(&mut self) -> ClockTick {
        self.clock.next().await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Configuration and content
    // ─────────────────────────────────────────────────────────────────────

    pub fn update_config(&mut self, patch: &ConfigPatch) -> UpdateReport {
        let report = self.config.merge(patch);
        for rejected in &report.rejected {
            tracing::warn!("Config value rejected: {}", rejected);
        }
        self.relayout();
        report
    }

    /// Restore the default preset and the initial playback state together
    pub fn reset_config(&mut self) {
        self.config = PrompterConfig::default();
        self.reset_scroll();
        self.relayout();
        tracing::info!("Configuration reset to defaults");
    }

    pub fn replace_content(&mut self, text: impl Into<String>) {
        self.content.replace(text);
        self.relayout();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Playback
    // ─────────────────────────────────────────────────────────────────────

    pub fn play(&mut self) {
        let extent = self.extent();
        let transition = self.engine.play(extent);
        self.after_transition(transition);
    }

    pub fn pause(&mut self) {
        let transition = self.engine.pause();
        self.after_transition(transition);
    }

    pub fn toggle_play(&mut self) {
        if self.engine.is_running() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Offset 0, elapsed 0, stopped, from any state
    pub fn reset_scroll(&mut self) {
        let transition = self.engine.reset();
        self.timer.reset();
        self.after_transition(transition);
    }

    pub fn on_clock(&mut self, tick: ClockTick) {
        match tick {
            ClockTick::Scroll => {
                // re-measured every tick; content may have changed underneath
                let extent = self.extent();
                let transition = self.engine.tick(self.config.speed, extent);
                self.after_transition(transition);
            }
            ClockTick::Second => self.timer.on_second(self.engine.is_running()),
        }
    }

    /// Manual scroll by a delta in virtual pixels
    pub fn user_scroll_by(&mut self, delta: f64) {
        self.view.user_scroll_by(delta);
        self.adopt_user_scrolls();
    }

    pub fn user_scroll_to(&mut self, offset: f64) {
        self.view.user_scroll_to(offset);
        self.adopt_user_scrolls();
    }

    fn adopt_user_scrolls(&mut self) {
        let extent = self.view.extent();
        for event in self.view.drain_events() {
            if event.origin == ScrollOrigin::User {
                self.engine.manual_scroll(event.offset, extent);
            }
        }
    }

    /// Sync clock and view with the engine after any engine operation
    fn after_transition(&mut self, transition: Transition) {
        match transition {
            Transition::Started => tracing::debug!("Playback started"),
            Transition::Stopped(StopReason::EndOfContent) => {
                tracing::debug!("Reached end of content at {:.0}px", self.engine.offset())
            }
            Transition::Stopped(reason) => tracing::debug!("Playback stopped: {:?}", reason),
            Transition::Unchanged => {}
        }

        if self.engine.is_running() {
            self.clock.arm();
        } else {
            self.clock.disarm();
        }
        self.view.write_programmatic(self.engine.offset());
        // Programmatic moves are never read back as manual scrolls
        self.view.drain_events();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Presentation
    // ─────────────────────────────────────────────────────────────────────

    /// Run a dispatched keyboard command
    pub fn execute(
        &mut self,
        command: Command,
        host: &mut dyn FullscreenHost,
    ) -> Result<(), CapabilityError> {
        match command {
            Command::TogglePlay => self.toggle_play(),
            Command::ToggleFullscreen => self.presentation.toggle_fullscreen(host)?,
            Command::ResetScroll => self.reset_scroll(),
            Command::ToggleOverlay => {
                self.presentation.toggle_overlay();
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn enter_fullscreen(&mut self, host: &mut dyn FullscreenHost) -> Result<(), CapabilityError> {
        self.presentation.enter_fullscreen(host)
    }

    /// Follow a fullscreen change the host made on its own
    pub fn sync_fullscreen(&mut self, host_fullscreen: bool) {
        self.presentation.sync_with_host(host_fullscreen);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Layout
    // ─────────────────────────────────────────────────────────────────────

    /// Record the area the teleprompter panel will be drawn into
    pub fn set_area(&mut self, area: Rect) {
        if area != self.area {
            self.area = area;
            self.relayout();
        }
    }

    pub fn render_model(&self) -> RenderModel {
        RenderModel::compute(&self.config, self.area)
    }

    pub fn layout(&mut self) -> &TextLayout {
        let model = self.render_model();
        let revision = self.content.revision();
        if !matches!(&self.cache, Some(c) if c.revision == revision && c.model == model) {
            self.cache = None;
        }
        let text = self.content.text();
        &self
            .cache
            .get_or_insert_with(|| CachedLayout {
                revision,
                model,
                layout: TextLayout::compute(text, &model),
            })
            .layout
    }

    pub fn extent(&mut self) -> Extent {
        let extent = self.layout().extent();
        self.view.set_extent(extent);
        self.view.drain_events();
        extent
    }

    /// Re-measure after a config, content or area change; a stopped engine
    /// is pulled back inside the new bounds
    fn relayout(&mut self) {
        let extent = self.extent();
        if !self.engine.is_running() {
            self.engine.reclamp(extent);
            self.view.write_programmatic(self.engine.offset());
            self.view.drain_events();
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Transfer
    // ─────────────────────────────────────────────────────────────────────

    pub fn export_payload(&self) -> Result<String, TransferError> {
        transfer::export_payload(&self.config, self.content.text())
    }

    /// Apply a payload; on error nothing changes
    pub fn import_payload(&mut self, raw: &str) -> Result<ImportOutcome, TransferError> {
        let payload = transfer::parse_payload(raw)?;

        let mut report = self.config.merge(&payload.patch);
        report.extend_rejected(payload.errors);
        for rejected in &report.rejected {
            tracing::warn!("Imported value rejected: {}", rejected);
        }

        let content_replaced = match payload.content {
            Some(text) => {
                self.content.replace(text);
                true
            }
            None => false,
        };
        self.relayout();

        tracing::info!(
            applied = report.applied.len(),
            rejected = report.rejected.len(),
            content_replaced,
            "Imported configuration"
        );
        Ok(ImportOutcome {
            report,
            content_replaced,
        })
    }

    pub fn export_to_dir(&self, dir: &Path) -> Result<PathBuf, TransferError> {
        let json = self.export_payload()?;
        let path = transfer::write_export(dir, &json)?;
        tracing::info!("Exported configuration to {}", path.display());
        Ok(path)
    }

    pub fn import_from_path(&mut self, path: &Path) -> Result<ImportOutcome, TransferError> {
        let raw = transfer::read_payload_file(path)?;
        self.import_payload(&raw)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(clock::DEFAULT_TICK_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::presentation::tests::FakeHost;
    use super::render::CELL_HEIGHT_PX;
    use super::settings::{ConfigField, TextAlign};
    use super::*;

    fn long_script() -> String {
        (1..=20).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n")
    }

    /// 80x10 area, 20 lines of three rows each plus one row of padding
    /// above and below: 62 rows of content over 10 visible
    fn session() -> Session {
        let mut session = Session::default();
        session.replace_content(long_script());
        session.set_area(Rect::new(0, 0, 80, 10));
        session
    }

    fn run_to_end(session: &mut Session) -> usize {
        let mut ticks = 0;
        while session.is_playing() && ticks < 100_000 {
            session.on_clock(ClockTick::Scroll);
            ticks += 1;
        }
        ticks
    }

    #[tokio::test]
    async fn playback_reaches_exactly_max_and_stops() {
        let mut session = session();
        let max = session.extent().max_scroll();
        assert_eq!(max, 52.0 * CELL_HEIGHT_PX);

        session.update_config(&ConfigPatch::speed(3.0));
        session.play();
        assert!(session.clock_armed());

        let mut highest: f64 = 0.0;
        while session.is_playing() {
            session.on_clock(ClockTick::Scroll);
            highest = highest.max(session.offset());
        }
        assert_eq!(session.offset(), max);
        assert_eq!(highest, max);
        assert_eq!(session.scroll_top(), max);
        assert!(!session.clock_armed());
    }

    #[tokio::test]
    async fn play_with_nothing_to_scroll_stops_immediately() {
        let mut session = Session::default();
        session.replace_content("short");
        session.set_area(Rect::new(0, 0, 80, 40));

        session.play();
        assert!(!session.is_playing());
        assert_eq!(session.offset(), 0.0);
        assert!(!session.clock_armed());
    }

    #[tokio::test]
    async fn reset_restores_initial_playback_state() {
        let mut session = session();
        session.play();
        for _ in 0..50 {
            session.on_clock(ClockTick::Scroll);
        }
        session.on_clock(ClockTick::Second);
        assert!(session.offset() > 0.0);

        session.reset_scroll();
        assert_eq!(session.offset(), 0.0);
        assert_eq!(session.scroll_top(), 0.0);
        assert_eq!(session.timer().elapsed_seconds(), 0);
        assert!(!session.is_playing());
        assert!(!session.clock_armed());

        // already stopped
        session.user_scroll_to(100.0);
        session.reset_scroll();
        assert_eq!(session.offset(), 0.0);
    }

    #[tokio::test]
    async fn manual_scroll_only_counts_while_stopped() {
        let mut session = session();
        session.user_scroll_by(120.0);
        assert_eq!(session.offset(), 120.0);

        session.play();
        session.user_scroll_to(900.0);
        assert_eq!(session.offset(), 120.0);

        // the next tick puts the view back where the engine is
        session.on_clock(ClockTick::Scroll);
        assert_eq!(session.offset(), 121.0);
        assert_eq!(session.scroll_top(), 121.0);

        session.pause();
        session.user_scroll_to(1e9);
        assert_eq!(session.offset(), session.extent().max_scroll());
    }

    #[tokio::test]
    async fn timer_counts_whole_seconds_only_while_running() {
        let mut session = session();
        session.on_clock(ClockTick::Second);
        assert_eq!(session.timer().elapsed_seconds(), 0);

        session.play();
        session.on_clock(ClockTick::Second);
        session.on_clock(ClockTick::Second);
        session.pause();
        session.on_clock(ClockTick::Second);
        assert_eq!(session.timer().elapsed_seconds(), 2);

        session.play();
        session.on_clock(ClockTick::Second);
        assert_eq!(session.timer().formatted(), "00:03");
    }

    #[test]
    fn shrinking_content_pulls_a_stopped_offset_back() {
        let mut session = session();
        session.user_scroll_to(1e9);
        assert!(session.offset() > 0.0);

        session.replace_content("now short");
        assert_eq!(session.offset(), 0.0);
        assert_eq!(session.scroll_top(), 0.0);
    }

    #[tokio::test]
    async fn reset_config_restores_defaults_and_playback() {
        let mut session = session();
        session.update_config(&ConfigPatch {
            font_size: Some(90.0),
            text_align: Some(TextAlign::Left),
            ..Default::default()
        });
        session.play();
        run_to_end(&mut session);

        session.reset_config();
        assert_eq!(session.config(), &PrompterConfig::default());
        assert_eq!(session.offset(), 0.0);
        assert!(!session.is_playing());
        assert_eq!(session.timer().elapsed_seconds(), 0);
    }

    #[test]
    fn export_then_import_reproduces_the_session() {
        let mut source = session();
        source.update_config(&ConfigPatch {
            font_size: Some(72.0),
            text_color: Some("yellow".into()),
            mirror_vertical: Some(true),
            margin_horizontal: Some(25.0),
            ..Default::default()
        });
        let json = source.export_payload().unwrap();

        let mut target = Session::default();
        let outcome = target.import_payload(&json).unwrap();
        assert!(outcome.content_replaced);
        assert!(outcome.report.rejected.is_empty());
        assert_eq!(target.config(), source.config());
        assert_eq!(target.content().text(), source.content().text());
    }

    #[test]
    fn content_only_import_keeps_config() {
        let mut session = session();
        session.update_config(&ConfigPatch::speed(2.5));
        let before = session.config().clone();

        let outcome = session.import_payload(r#"{"content":"fresh"}"#).unwrap();
        assert!(outcome.content_replaced);
        assert_eq!(session.config(), &before);
        assert_eq!(session.content().text(), "fresh");
    }

    #[test]
    fn oversized_font_is_clamped_on_import() {
        let mut session = session();
        let outcome = session
            .import_payload(r#"{"config":{"fontSize":999},"content":"hi"}"#)
            .unwrap();

        assert_eq!(session.config().font_size, 120.0);
        assert_eq!(session.content().text(), "hi");
        assert!(outcome.report.clamped.contains(&ConfigField::FontSize));

        let defaults = PrompterConfig::default();
        assert_eq!(session.config().speed, defaults.speed);
        assert_eq!(session.config().text_color, defaults.text_color);
    }

    #[test]
    fn null_fields_in_import_are_left_alone() {
        let mut session = session();
        session.update_config(&ConfigPatch::speed(2.5));
        let before = session.config().clone();

        let outcome = session
            .import_payload(r#"{"config":{"fontSize":null,"speed":null}}"#)
            .unwrap();
        assert!(outcome.report.rejected.is_empty());
        assert!(!outcome.content_replaced);
        assert_eq!(session.config(), &before);
    }

    #[tokio::test]
    async fn replacing_content_while_playing_stops_at_the_new_end() {
        let mut session = session();
        session.update_config(&ConfigPatch::speed(3.0));
        let before = session.config().clone();
        session.play();
        for _ in 0..300 {
            session.on_clock(ClockTick::Scroll);
        }
        assert!(session.is_playing());
        assert_eq!(session.offset(), 900.0);

        // Five lines: 17 rows over 10 visible
        session.replace_content("a
b
c
d
e");
        assert!(session.is_playing());
        assert_eq!(session.config(), &before);

        session.on_clock(ClockTick::Scroll);
        assert!(!session.is_playing());
        assert_eq!(session.offset(), 7.0 * CELL_HEIGHT_PX);
        assert_eq!(session.scroll_top(), 7.0 * CELL_HEIGHT_PX);
        assert!(!session.clock_armed());
    }

    #[test]
    fn failed_import_leaves_state_untouched() {
        let mut session = session();
        let config = session.config().clone();
        let text = session.content().text().to_string();

        assert!(session.import_payload("{\"config\": {").is_err());
        assert!(session.import_payload(r#"{"config":{"fontSize":30},"content":7}"#).is_err());

        assert_eq!(session.config(), &config);
        assert_eq!(session.content().text(), text);
    }

    #[test]
    fn fullscreen_key_twice_returns_to_windowed() {
        let mut session = session();
        let mut host = FakeHost::default();

        session.execute(Command::ToggleFullscreen, &mut host).unwrap();
        assert!(session.presentation().is_fullscreen());
        assert!(host.active);

        session.execute(Command::ToggleOverlay, &mut host).unwrap();
        assert!(session.presentation().overlay_open());

        session.execute(Command::ToggleFullscreen, &mut host).unwrap();
        assert!(!session.presentation().is_fullscreen());
        assert!(!session.presentation().overlay_open());
        assert!(!host.active);
    }

    #[test]
    fn refused_fullscreen_is_reported_not_fatal() {
        let mut session = session();
        let mut host = FakeHost {
            refuse: true,
            ..Default::default()
        };
        assert!(session.execute(Command::ToggleFullscreen, &mut host).is_err());
        assert!(!session.presentation().is_fullscreen());
    }

    #[test]
    fn overlay_command_outside_fullscreen_does_nothing() {
        let mut session = session();
        let mut host = FakeHost::default();
        session.execute(Command::ToggleOverlay, &mut host).unwrap();
        assert!(!session.presentation().overlay_open());
    }

    #[test]
    fn host_exit_resyncs_presentation_state() {
        let mut session = session();
        let mut host = FakeHost::default();
        session.enter_fullscreen(&mut host).unwrap();
        session.execute(Command::ToggleOverlay, &mut host).unwrap();

        host.escape();
        if let Some(state) = host.take_change() {
            session.sync_fullscreen(state);
        }
        assert!(!session.presentation().is_fullscreen());
        assert!(!session.presentation().overlay_open());
    }

    #[test]
    fn layout_is_cached_until_inputs_change() {
        let mut session = session();
        let rows = session.layout().total_rows();
        assert_eq!(rows, 62);

        session.update_config(&ConfigPatch {
            font_size: Some(16.0),
            line_height: Some(1.0),
            ..Default::default()
        });
        assert_eq!(session.layout().total_rows(), 22);
    }
}
