//! Snapshot source abstraction for reading the tick ring buffer.
//!
//! The poll loop only needs "give me the buffer as it is right now". This
//! module provides that as a trait, with a Jolokia HTTP implementation for
//! live servers and a channel-fed implementation for embedding and tests.

mod channel;
mod jolokia;
mod snapshot;

pub use channel::ChannelSource;
pub use jolokia::{
    JolokiaSource, JolokiaSourceBuilder, DEFAULT_ATTRIBUTE, DEFAULT_ENDPOINT, DEFAULT_MBEAN,
    DEFAULT_TIMEOUT,
};
pub use snapshot::{CircularSnapshot, RING_SIZE};

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::FetchError;

/// Trait for reading the current contents of the tick ring buffer.
///
/// # Example
///
/// ```
/// use tickwatch::{ChannelSource, CircularSnapshot, SnapshotSource};
///
/// # tokio_test::block_on(async {
/// let (tx, mut source) = ChannelSource::create("scripted");
/// tx.send(Ok(CircularSnapshot::new([50_000_000; 100]))).unwrap();
///
/// let snapshot = source.fetch().await.unwrap();
/// assert_eq!(snapshot[0], 50_000_000);
/// # });
/// ```
#[async_trait]
pub trait SnapshotSource: Send + Debug {
    /// Read the buffer once.
    ///
    /// Implementations perform a single attempt and never retry; the caller
    /// decides how to recover.
    async fn fetch(&mut self) -> Result<CircularSnapshot, FetchError>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}
