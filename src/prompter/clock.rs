//! Periodic callbacks that drive playback
//!
//! Two intervals exist only while the engine is running: the scroll tick
//! (about 60 Hz) and the one-second timer tick. Disarming drops both
//! `Interval`s, so a cancelled tick can never fire late and overwrite a
//! reset that happened after it.

use std::future;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Default scroll cadence (~60 updates per second)
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(16);

const SECOND: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// Advance the scroll offset
    Scroll,
    /// One whole second of playback elapsed
    Second,
}

pub struct PlaybackClock {
    tick_period: Duration,
    scroll: Option<Interval>,
    second: Option<Interval>,
}

impl PlaybackClock {
    pub fn new(tick_period: Duration) -> Self {
        Self {
            tick_period,
            scroll: None,
            second: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.scroll.is_some()
    }

    /// Start both intervals; returns false if they were already running
    ///
    /// First ticks land one period from now, never immediately.
    pub fn arm(&mut self) -> bool {
        if self.is_armed() {
            return false;
        }
        let now = Instant::now();

        let mut scroll = interval_at(now + self.tick_period, self.tick_period);
        scroll.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // Burst keeps the second count honest if the loop stalls briefly
        let mut second = interval_at(now + SECOND, SECOND);
        second.set_missed_tick_behavior(MissedTickBehavior::Burst);

        self.scroll = Some(scroll);
        self.second = Some(second);
        true
    }

    /// Cancel both intervals
    pub fn disarm(&mut self) {
        self.scroll = None;
        self.second = None;
    }

    /// Wait for the next tick; pends forever while disarmed
    ///
    /// Cancel-safe, so it can sit in a `tokio::select!` branch.
    pub async fn next(&mut self) -> ClockTick {
        match (self.scroll.as_mut(), self.second.as_mut()) {
            (Some(scroll), Some(second)) => {
                tokio::select! {
                    biased;
                    _ = second.tick() => ClockTick::Second,
                    _ = scroll.tick() => ClockTick::Scroll,
                }
            }
            _ => future::pending().await,
        }
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collect ticks for `span` of (paused) time
    async fn ticks_for(clock: &mut PlaybackClock, span: Duration) -> Vec<ClockTick> {
        let deadline = Instant::now() + span;
        let mut ticks = Vec::new();
        loop {
            tokio::select! {
                tick = clock.next() => ticks.push(tick),
                _ = tokio::time::sleep_until(deadline) => break,
            }
        }
        ticks
    }

    #[tokio::test(start_paused = true)]
    async fn armed_clock_ticks_at_both_rates() {
        let mut clock = PlaybackClock::new(Duration::from_millis(100));
        assert!(clock.arm());

        let ticks = ticks_for(&mut clock, Duration::from_millis(2050)).await;
        let seconds = ticks.iter().filter(|t| **t == ClockTick::Second).count();
        let scrolls = ticks.iter().filter(|t| **t == ClockTick::Scroll).count();

        assert_eq!(seconds, 2);
        assert_eq!(scrolls, 20);
    }

    #[tokio::test(start_paused = true)]
    async fn arming_twice_does_not_double_schedule() {
        let mut clock = PlaybackClock::new(Duration::from_millis(100));
        assert!(clock.arm());
        assert!(!clock.arm());

        let ticks = ticks_for(&mut clock, Duration::from_millis(1050)).await;
        assert_eq!(ticks.iter().filter(|t| **t == ClockTick::Second).count(), 1);
        assert_eq!(ticks.iter().filter(|t| **t == ClockTick::Scroll).count(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn disarmed_clock_never_fires() {
        let mut clock = PlaybackClock::new(Duration::from_millis(100));
        clock.arm();
        clock.disarm();
        assert!(!clock.is_armed());

        let ticks = ticks_for(&mut clock, Duration::from_secs(5)).await;
        assert!(ticks.is_empty());
    }
}
