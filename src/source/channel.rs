//! Channel-based snapshot source.
//!
//! Receives fetch outcomes through a tokio mpsc channel. Useful when the
//! tick buffer is obtained by some other means, and for driving the poll
//! loop with scripted responses.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{CircularSnapshot, SnapshotSource};
use crate::error::FetchError;

/// Sender half paired with a [`ChannelSource`].
pub type FetchSender = mpsc::UnboundedSender<Result<CircularSnapshot, FetchError>>;

/// A snapshot source that yields whatever outcome was sent to it.
///
/// Each `fetch` waits for the next queued outcome. Once every sender has
/// been dropped and the queue is drained, `fetch` fails with
/// [`FetchError::Closed`].
///
/// # Example
///
/// ```
/// use tickwatch::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("replay");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::UnboundedReceiver<Result<CircularSnapshot, FetchError>>,
    description: String,
}

impl ChannelSource {
    /// Create a new channel source from an existing receiver.
    pub fn new(
        receiver: mpsc::UnboundedReceiver<Result<CircularSnapshot, FetchError>>,
        source_description: &str,
    ) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
        }
    }

    /// Create a channel pair.
    ///
    /// Returns (sender, source); outcomes pushed into the sender are handed
    /// out by the source in order.
    pub fn create(source_description: &str) -> (FetchSender, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(rx, source_description))
    }
}

#[async_trait]
impl SnapshotSource for ChannelSource {
    async fn fetch(&mut self) -> Result<CircularSnapshot, FetchError> {
        self.receiver.recv().await.unwrap_or(Err(FetchError::Closed))
    }

    fn description(&self) -> &str {
        &self.description
    }
}
