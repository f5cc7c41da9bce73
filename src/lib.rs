//! # tickwatch
//!
//! Streams per-tick server loop durations out of a game server that only
//! exposes the durations of its last 100 ticks, as a ring buffer read
//! through a Jolokia agent.
//!
//! Every poll reads the whole ring, works out which slots were written since
//! the previous poll, and emits those ticks in the order they ran, each with
//! a synthetic timestamp (the source records durations, not times).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          PollLoop                            │
//! │  ┌─────────┐    ┌───────────┐    ┌──────────┐    ┌────────┐  │
//! │  │ source  │───▶│ new_ticks │───▶│ Timeline │───▶│ output │  │
//! │  │ (fetch) │    │  (diff)   │    │ (stamp)  │    │ (CSV)  │  │
//! │  └─────────┘    └───────────┘    └──────────┘    └────────┘  │
//! │       ▲                                                      │
//! │       └── JolokiaSource | ChannelSource                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: [`SnapshotSource`] trait, the Jolokia HTTP fetcher and a
//!   channel-fed source
//! - **[`data`]**: ring buffer diffing, timeline reconstruction and the
//!   emitted [`TickRecord`]
//! - **[`poller`]**: the drift-corrected poll loop and its [`PollState`]
//! - **[`output`]**: CSV line writer
//! - **[`config`](crate::config)**: layered [`Settings`]
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Poll the local agent every 2.5s and stream CSV to stdout
//! tickwatch --jolokia http://127.0.0.1:8778/jolokia
//! ```
//!
//! ### As a library
//!
//! ```
//! use std::time::Duration;
//! use tickwatch::{ChannelSource, CircularSnapshot, PollLoop, Timeline, TickWriter};
//!
//! # tokio_test::block_on(async {
//! let (tx, source) = ChannelSource::create("example");
//! let writer = TickWriter::new(Vec::new(), "minecraft_tick_duration");
//! let mut poll_loop = PollLoop::new(source, writer, Timeline::default(), Duration::from_secs(1));
//!
//! tx.send(Ok(CircularSnapshot::new([50_000_000; 100]))).unwrap();
//! poll_loop.poll_once().await.unwrap();
//! assert!(poll_loop.state().previous_snapshot.is_some());
//! # });
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod output;
pub mod poller;
pub mod source;

// Re-export main types for convenience
pub use crate::config::{Overrides, Settings};
pub use data::{new_ticks, TickRecord, Timeline};
pub use error::{FetchError, FetchErrorKind};
pub use output::TickWriter;
pub use poller::{CycleOutcome, Phase, PollLoop, PollState};
pub use source::{
    ChannelSource, CircularSnapshot, JolokiaSource, SnapshotSource, RING_SIZE,
};
