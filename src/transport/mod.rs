//! Pub/sub transport seam.
//!
//! The hub treats the transport as an opaque fan-out primitive: publish is
//! fire-and-forget with no acknowledgment, and every concurrent subscriber
//! to a channel receives its own copy of each frame. Nothing is persisted
//! and a subscriber never sees frames published before it subscribed.

pub mod local;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::Result;

pub use local::LocalBus;

/// Pub/sub transport used by the message broker.
///
/// Handles are shared across request tasks and must be safe for concurrent
/// use. Constructed once at startup and injected, never a hidden global.
#[async_trait]
pub trait PubSub: Send + Sync {
    /// Publish a frame on a channel. No delivery guarantee; publishing to a
    /// channel with no subscribers succeeds and the frame is dropped.
    async fn publish(&self, channel: &str, payload: String) -> Result<()>;

    /// Subscribe to a channel. The feed starts at the moment of
    /// subscription.
    async fn subscribe(&self, channel: &str) -> Subscription;

    /// Liveness probe for health checks.
    async fn ping(&self) -> Result<()>;

    /// Shut the transport down, ending all live subscriptions.
    async fn close(&self);
}

/// A live, cancellable feed of frames from one channel.
///
/// Dropping the handle cancels the subscription without affecting other
/// subscribers or the channel itself.
pub struct Subscription {
    channel: String,
    rx: broadcast::Receiver<String>,
}

impl Subscription {
    pub fn new(channel: impl Into<String>, rx: broadcast::Receiver<String>) -> Self {
        Self {
            channel: channel.into(),
            rx,
        }
    }

    /// The channel this subscription is bound to.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Wait for the next frame. Returns `None` once the transport has shut
    /// down. A slow consumer that falls behind skips the frames it lost;
    /// the transport makes no delivery guarantee.
    pub async fn recv(&mut self) -> Option<String> {
        loop {
            match self.rx.recv().await {
                Ok(frame) => return Some(frame),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(
                        channel = %self.channel,
                        skipped,
                        "subscriber lagged, frames dropped"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
