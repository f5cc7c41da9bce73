//! Synthetic per-tick timestamps.
//!
//! The server only reports how long each tick took, not when it ran. The
//! timeline is anchored at the wall-clock time of the first poll that
//! produced data; every later tick is placed after its predecessor by that
//! predecessor's duration, but never closer than the nominal tick interval.

use crate::poller::PollState;

/// Nominal interval between two server ticks, in milliseconds.
pub const DEFAULT_MIN_TICK_MS: f64 = 50.0;

/// Assigns synthetic timestamps to extracted tick durations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeline {
    min_tick_ms: f64,
}

impl Timeline {
    /// Create a timeline with the given minimum step.
    ///
    /// `min_tick_ms` must be positive for timestamps to strictly increase;
    /// the settings layer rejects anything else.
    pub fn new(min_tick_ms: f64) -> Self {
        Self { min_tick_ms }
    }

    /// Returns the minimum step between two ticks.
    pub fn min_tick_ms(&self) -> f64 {
        self.min_tick_ms
    }

    /// Timestamp the next tick and advance the running timeline in `state`.
    pub fn stamp(&self, state: &mut PollState, duration_ns: u64, sampled_at_ms: f64) -> f64 {
        let timestamp_ms = match state.last_computed_timestamp_ms {
            None => sampled_at_ms,
            Some(last_ms) => last_ms + self.step_ms(state.last_duration_ns),
        };

        state.last_computed_timestamp_ms = Some(timestamp_ms);
        state.last_duration_ns = Some(duration_ns);
        timestamp_ms
    }

    /// Distance from a tick that took `previous_ns` to the one after it.
    fn step_ms(&self, previous_ns: Option<u64>) -> f64 {
        match previous_ns {
            Some(ns) => self.min_tick_ms.max(ns as f64 / 1e6),
            None => self.min_tick_ms,
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TICK_MS)
    }
}
