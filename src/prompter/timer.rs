//! Elapsed presentation time

/// Counts whole seconds spent playing
///
/// Pausing keeps the count; only a reset clears it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTimer {
    elapsed_seconds: u64,
}

impl PlaybackTimer {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// One second went by; counts only while the engine is running
    pub fn on_second(&mut self, running: bool) {
        if running {
            self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        }
    }

    pub fn reset(&mut self) {
        self.elapsed_seconds = 0;
    }

    pub fn formatted(&self) -> String {
        format_elapsed(self.elapsed_seconds)
    }
}

/// `MM:SS`, minutes unbounded
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
