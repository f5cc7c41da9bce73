//! The poll loop: fetch, diff, timestamp, emit.
//!
//! ```text
//!          deadline += period
//!   Idle ─────────────────────▶ Fetching
//!    ▲                             │
//!    │   ok:  diff → stamp → write │
//!    └─────────────────────────────┘
//!        err: count the cycle, keep the old baseline
//! ```
//!
//! Everything that survives from one cycle to the next lives in
//! [`PollState`], owned by the loop.

use std::io::{self, Write};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, trace, warn};

use crate::data::{new_ticks, Timeline, TickRecord};
use crate::error::FetchErrorKind;
use crate::output::TickWriter;
use crate::source::{CircularSnapshot, SnapshotSource, RING_SIZE};

/// Default time between two polls.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(2500);

/// Running state carried across poll cycles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollState {
    /// Last successfully fetched buffer.
    pub previous_snapshot: Option<CircularSnapshot>,
    /// Number of the next tick to emit.
    pub tick_counter: u64,
    /// Number of cycles run so far, failed ones included.
    pub loop_iteration: u64,
    /// Synthetic timestamp of the last emitted tick.
    pub last_computed_timestamp_ms: Option<f64>,
    /// Duration of the last emitted tick.
    pub last_duration_ns: Option<u64>,
}

/// What the loop is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the next deadline.
    Idle,
    /// Waiting on the snapshot source.
    Fetching,
}

/// Result of a single poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The fetch succeeded and this many ticks were written.
    Emitted(usize),
    /// The fetch failed; nothing was written.
    Failed(FetchErrorKind),
}

/// Wall-clock time in milliseconds since the Unix epoch.
pub fn wall_clock_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
        * 1000.0
}

/// Drives a [`SnapshotSource`] on a fixed schedule and writes tick rows.
pub struct PollLoop<S, W: Write> {
    source: S,
    writer: TickWriter<W>,
    timeline: Timeline,
    period: Duration,
    clock: Box<dyn FnMut() -> f64 + Send>,
    state: PollState,
    phase: Phase,
    header_written: bool,
    consecutive_failures: u64,
}

impl<S: SnapshotSource, W: Write> PollLoop<S, W> {
    /// Create a loop polling `source` every `period`.
    pub fn new(source: S, writer: TickWriter<W>, timeline: Timeline, period: Duration) -> Self {
        Self {
            source,
            writer,
            timeline,
            period,
            clock: Box::new(wall_clock_ms),
            state: PollState::default(),
            phase: Phase::Idle,
            header_written: false,
            consecutive_failures: 0,
        }
    }

    /// Replace the clock used to stamp poll completion times.
    pub fn with_clock(mut self, clock: impl FnMut() -> f64 + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Returns the running state.
    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the output writer.
    pub fn writer(&self) -> &TickWriter<W> {
        &self.writer
    }

    /// Consume the loop, returning the output writer.
    pub fn into_writer(self) -> TickWriter<W> {
        self.writer
    }

    /// Write the header row if it has not been written yet.
    pub fn start(&mut self) -> io::Result<()> {
        if !self.header_written {
            self.writer.write_header()?;
            self.header_written = true;
            info!(source = self.source.description(), "polling started");
        }
        Ok(())
    }

    /// Poll forever on a drift-corrected schedule.
    ///
    /// Only returns if writing to the output fails.
    pub async fn run(&mut self) -> io::Result<()> {
        self.start()?;
        let mut deadline = Instant::now();
        loop {
            deadline += self.period;
            self.tick(deadline).await?;
        }
    }

    /// Run exactly `cycles` scheduled cycles.
    pub async fn run_cycles(&mut self, cycles: u64) -> io::Result<()> {
        self.start()?;
        let mut deadline = Instant::now();
        for _ in 0..cycles {
            deadline += self.period;
            self.tick(deadline).await?;
        }
        Ok(())
    }

    async fn tick(&mut self, deadline: Instant) -> io::Result<CycleOutcome> {
        sleep_until(deadline).await;
        let late = Instant::now().saturating_duration_since(deadline);
        if late > self.period {
            debug!(late_ms = late.as_millis() as u64, "poll cycle started late");
        }
        self.poll_once().await
    }

    /// Run one cycle immediately: fetch, extract, stamp and write.
    pub async fn poll_once(&mut self) -> io::Result<CycleOutcome> {
        let iteration = self.state.loop_iteration;

        self.phase = Phase::Fetching;
        trace!(iteration, "fetching");
        let fetched = self.source.fetch().await;
        self.phase = Phase::Idle;

        let current = match fetched {
            Ok(current) => current,
            Err(e) => {
                self.consecutive_failures += 1;
                if self.consecutive_failures == 1 {
                    warn!(iteration, kind = ?e.kind(), error = %e, "fetch failed");
                } else {
                    debug!(
                        iteration,
                        failures = self.consecutive_failures,
                        error = %e,
                        "fetch still failing"
                    );
                }
                self.state.loop_iteration += 1;
                return Ok(CycleOutcome::Failed(e.kind()));
            }
        };

        if self.consecutive_failures > 0 {
            info!(
                iteration,
                failures = self.consecutive_failures,
                "fetch recovered"
            );
            self.consecutive_failures = 0;
        }

        let sampled_at_ms = (self.clock)();
        let ticks = new_ticks(self.state.previous_snapshot.as_ref(), &current);
        if ticks.len() == RING_SIZE {
            warn!(
                iteration,
                "whole tick buffer rewritten since last poll, ticks may have been missed"
            );
        }

        for &duration_ns in &ticks {
            let computed_timestamp_ms =
                self.timeline.stamp(&mut self.state, duration_ns, sampled_at_ms);
            let record = TickRecord {
                tick_number: self.state.tick_counter,
                duration_ns,
                loop_iteration: iteration,
                sampled_at_ms,
                computed_timestamp_ms,
            };
            self.writer.write_record(&record)?;
            self.state.tick_counter += 1;
        }

        debug!(iteration, ticks = ticks.len(), "poll complete");
        self.state.previous_snapshot = Some(current);
        self.state.loop_iteration += 1;
        Ok(CycleOutcome::Emitted(ticks.len()))
    }
}
