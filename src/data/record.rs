//! Emitted tick rows.

/// One reconstructed tick, ready to be written out.
#[derive(Debug, Clone, PartialEq)]
pub struct TickRecord {
    /// Position of this tick in the output stream, starting at 0.
    pub tick_number: u64,
    /// Measured tick duration, in nanoseconds.
    pub duration_ns: u64,
    /// Poll cycle that observed the tick.
    pub loop_iteration: u64,
    /// Wall-clock time the observing poll completed, in milliseconds.
    pub sampled_at_ms: f64,
    /// Synthetic time the tick ran at, in milliseconds.
    pub computed_timestamp_ms: f64,
}

impl TickRecord {
    /// Tick duration in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.duration_ns as f64 / 1e6
    }
}
