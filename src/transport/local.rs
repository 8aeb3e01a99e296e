//! In-process pub/sub over tokio broadcast channels.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::broadcast;

use super::{PubSub, Subscription};
use crate::error::Result;

/// Buffered frames per channel before slow subscribers start lagging.
const CHANNEL_CAPACITY: usize = 1024;

/// In-process transport: one broadcast channel per topic, created lazily.
pub struct LocalBus {
    topics: Mutex<HashMap<String, broadcast::Sender<String>>>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self {
            topics: Mutex::new(HashMap::new()),
        }
    }

    fn sender(&self, channel: &str) -> broadcast::Sender<String> {
        let mut topics = self.topics.lock().expect("topic map poisoned");
        topics
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PubSub for LocalBus {
    async fn publish(&self, channel: &str, payload: String) -> Result<()> {
        // send() errors only when there are no receivers, which is fine for
        // a fire-and-forget transport.
        let _ = self.sender(channel).send(payload);
        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> Subscription {
        Subscription::new(channel, self.sender(channel).subscribe())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) {
        // Dropping the senders closes every receiver.
        self.topics.lock().expect("topic map poisoned").clear();
    }
}
