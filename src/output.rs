//! CSV line output for tick records.
//!
//! The format targets line-oriented metric collectors (e.g. Telegraf's
//! `execd` input with the CSV parser): one header row, then one row per
//! tick, each flushed as soon as it is written.

use std::io::{self, Write};

use crate::data::TickRecord;

/// Header row naming every column.
pub const HEADER: &str =
    "measurement,tick_duration_ms,tick_number,loop_iteration,timestamp_ms,computed_timestamp_ms";

/// Default measurement tag written in the first column.
pub const DEFAULT_MEASUREMENT: &str = "minecraft_tick_duration";

/// Writes tick records as CSV lines to any [`Write`] sink.
#[derive(Debug)]
pub struct TickWriter<W: Write> {
    sink: W,
    measurement: String,
}

impl<W: Write> TickWriter<W> {
    /// Create a writer tagging every row with `measurement`.
    pub fn new(sink: W, measurement: impl Into<String>) -> Self {
        Self {
            sink,
            measurement: measurement.into(),
        }
    }

    /// Write the header row.
    pub fn write_header(&mut self) -> io::Result<()> {
        writeln!(self.sink, "{}", HEADER)?;
        self.sink.flush()
    }

    /// Write one record and flush it.
    pub fn write_record(&mut self, record: &TickRecord) -> io::Result<()> {
        writeln!(self.sink, "{}", self.format_record(record))?;
        self.sink.flush()
    }

    /// Format a record as a CSV row, without the trailing newline.
    pub fn format_record(&self, record: &TickRecord) -> String {
        format!(
            "{},{:.3},{},{},{:.3},{:.3}",
            self.measurement,
            record.duration_ms(),
            record.tick_number,
            record.loop_iteration,
            record.sampled_at_ms,
            record.computed_timestamp_ms
        )
    }

    /// Returns a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Consume the writer, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}
