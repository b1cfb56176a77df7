//! Scroll engine and the scroll view it drives
//!
//! The engine is a two-state machine (Stopped / Running) that owns the
//! authoritative scroll offset. `ScrollView` stands in for the scrollable
//! container on screen: the engine writes to it programmatically every tick,
//! and the user can move it directly. Every movement of the view is recorded
//! as a `ScrollEvent` tagged with its origin so engine writes are never read
//! back as manual scrolls.

/// Measured size of the scroll container, in virtual pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Extent {
    pub content_height: f64,
    pub viewport_height: f64,
}

impl Extent {
    pub fn new(content_height: f64, viewport_height: f64) -> Self {
        Self {
            content_height,
            viewport_height,
        }
    }

    /// Offset ceiling: content height minus viewport height
    ///
    /// Unknown (zero, negative or non-finite) sizes yield 0.
    pub fn max_scroll(&self) -> f64 {
        let known = |v: f64| v.is_finite() && v > 0.0;
        if !known(self.content_height) || !known(self.viewport_height) {
            return 0.0;
        }
        (self.content_height - self.viewport_height).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EngineState {
    #[default]
    Stopped,
    Running,
}

/// Why the engine left the Running state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Paused,
    EndOfContent,
    Reset,
}

/// State change caused by an engine operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started,
    Stopped(StopReason),
    Unchanged,
}

#[derive(Debug, Default, Clone)]
pub struct ScrollEngine {
    state: EngineState,
    offset: f64,
}

impl ScrollEngine {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Stopped → Running; a no-op when already running
    ///
    /// With nothing to scroll (max scroll 0) the engine self-terminates at
    /// offset 0 instead of starting.
    pub fn play(&mut self, extent: Extent) -> Transition {
        if self.is_running() {
            return Transition::Unchanged;
        }
        if extent.max_scroll() <= 0.0 {
            self.offset = 0.0;
            return Transition::Stopped(StopReason::EndOfContent);
        }
        self.state = EngineState::Running;
        Transition::Started
    }

    pub fn pause(&mut self) -> Transition {
        if !self.is_running() {
            return Transition::Unchanged;
        }
        self.state = EngineState::Stopped;
        Transition::Stopped(StopReason::Paused)
    }

    /// Advance one tick by `speed` pixels
    ///
    /// `extent` must be the current measurement: content and font size can
    /// change mid-scroll. Reaching the ceiling clamps the offset to it and
    /// stops the engine.
    pub fn tick(&mut self, speed: f64, extent: Extent) -> Transition {
        if !self.is_running() {
            return Transition::Unchanged;
        }
        let max = extent.max_scroll();
        let next = self.offset + speed;
        if next >= max {
            self.offset = max;
            self.state = EngineState::Stopped;
            return Transition::Stopped(StopReason::EndOfContent);
        }
        self.offset = next;
        Transition::Unchanged
    }

    /// Adopt a user-chosen position; ignored while running
    ///
    /// Returns whether the position was adopted.
    pub fn manual_scroll(&mut self, offset: f64, extent: Extent) -> bool {
        if self.is_running() || !offset.is_finite() {
            return false;
        }
        self.offset = offset.clamp(0.0, extent.max_scroll());
        true
    }

    /// Back to offset 0 and Stopped, from any state
    pub fn reset(&mut self) -> Transition {
        let was_running = self.is_running();
        self.offset = 0.0;
        self.state = EngineState::Stopped;
        if was_running {
            Transition::Stopped(StopReason::Reset)
        } else {
            Transition::Unchanged
        }
    }

    /// Pull a stopped offset back into range after the layout changed
    pub fn reclamp(&mut self, extent: Extent) {
        if !self.is_running() {
            self.offset = self.offset.clamp(0.0, extent.max_scroll());
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scroll view
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOrigin {
    User,
    Programmatic,
}

/// A movement of the scroll view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub offset: f64,
    pub origin: ScrollOrigin,
}

/// The on-screen scroll container
#[derive(Debug, Default, Clone)]
pub struct ScrollView {
    scroll_top: f64,
    extent: Extent,
    /// Set for the duration of a programmatic write
    suppressed: bool,
    pending: Vec<ScrollEvent>,
}

impl ScrollView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Update the measured size; an out-of-range position is clamped as a
    /// programmatic move
    pub fn set_extent(&mut self, extent: Extent) {
        self.extent = extent;
        let top = self.scroll_top;
        self.write_programmatic(top);
    }

    /// Reposition on behalf of the engine
    pub fn write_programmatic(&mut self, offset: f64) {
        self.suppressed = true;
        self.move_to(offset);
        self.suppressed = false;
    }

    /// Reposition on behalf of the user (wheel, arrow keys)
    pub fn user_scroll_to(&mut self, offset: f64) {
        self.move_to(offset);
    }

    pub fn user_scroll_by(&mut self, delta: f64) {
        self.move_to(self.scroll_top + delta);
    }

    /// Take the movements recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<ScrollEvent> {
        std::mem::take(&mut self.pending)
    }

    fn move_to(&mut self, offset: f64) {
        if !offset.is_finite() {
            return;
        }
        let clamped = offset.clamp(0.0, self.extent.max_scroll());
        if clamped == self.scroll_top {
            return;
        }
        self.scroll_top = clamped;
        let origin = if self.suppressed {
            ScrollOrigin::Programmatic
        } else {
            ScrollOrigin::User
        };
        self.pending.push(ScrollEvent {
            offset: clamped,
            origin,
        });
    }
}
