//! Tick extraction and reconstruction.
//!
//! ## Submodules
//!
//! - [`diff`]: Finds the slots written between two ring buffer reads
//! - [`timeline`]: Assigns synthetic timestamps to extracted ticks
//! - [`record`]: The emitted per-tick row ([`TickRecord`])
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "2.5s", "500ms")
//!
//! ## Data Flow
//!
//! ```text
//! previous + current CircularSnapshot
//!        │
//!        ▼
//!   new_ticks()  ──▶ durations, oldest first
//!        │
//!        ▼
//!  Timeline::stamp() (threads PollState)
//!        │
//!        ▼
//!    TickRecord
//! ```

pub mod diff;
pub mod duration;
pub mod record;
pub mod timeline;

pub use diff::new_ticks;
pub use record::TickRecord;
pub use timeline::{Timeline, DEFAULT_MIN_TICK_MS};
