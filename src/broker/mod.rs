//! Message broker: publish, history, subscriptions.
//!
//! The broker owns the send path. Delivery is at-least-once best-effort:
//! a failed publish fails the whole send (the caller must be able to see
//! that nothing went out), while history writes are a side-channel cache
//! and never fail a send. No retries happen here; retry policy belongs to
//! the caller.

pub mod channel;
pub mod history;

use std::sync::Arc;
use std::time::Duration;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::protocol::message::{Message, SendMessageRequest, BROADCAST_RECIPIENT};
use crate::storage::Store;
use crate::transport::{PubSub, Subscription};

pub use history::MessageHistory;

/// Orchestrates message passing between agents.
pub struct MessageBroker {
    bus: Arc<dyn PubSub>,
    history: MessageHistory,
    op_timeout: Duration,
}

impl MessageBroker {
    pub fn new(bus: Arc<dyn PubSub>, store: Arc<dyn Store>, settings: &Settings) -> Self {
        Self {
            bus,
            history: MessageHistory::new(store, &settings.history),
            op_timeout: settings.store.op_timeout(),
        }
    }

    /// Send a message from an agent.
    ///
    /// Constructs the canonical message, publishes it on the resolved
    /// channel, then records it into the sender's history and - unless the
    /// recipient is the broadcast sentinel - the recipient's. The returned
    /// message confirms acceptance for delivery, not delivery itself.
    pub async fn send(&self, from_agent_id: &str, req: SendMessageRequest) -> Result<Message> {
        if req.to.trim().is_empty() {
            return Err(Error::InvalidRecipient("recipient is empty".to_string()));
        }

        let message = Message::from_request(from_agent_id, req);
        let channel = channel::resolve(&message.to);
        let data = serde_json::to_string(&message)?;

        match tokio::time::timeout(self.op_timeout, self.bus.publish(&channel, data)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(Error::Publish(e.to_string())),
            Err(_) => return Err(Error::Publish("publish timed out".to_string())),
        }

        // History is best-effort from here on: the message is already out.
        self.record_history(from_agent_id, &message).await;
        if !message.is_broadcast() {
            self.record_history(&message.to, &message).await;
        }

        tracing::debug!(
            message_id = %message.id,
            from = %message.from,
            to = %message.to,
            %channel,
            "message published"
        );

        Ok(message)
    }

    async fn record_history(&self, agent_id: &str, message: &Message) {
        let result =
            tokio::time::timeout(self.op_timeout, self.history.append(agent_id, message)).await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(agent_id, message_id = %message.id, error = %e,
                    "failed to record message history");
            }
            Err(_) => {
                tracing::warn!(agent_id, message_id = %message.id,
                    "history write timed out");
            }
        }
    }

    /// An agent's recent message history, oldest first.
    pub async fn history(&self, agent_id: &str, limit: i64) -> Result<Vec<Message>> {
        match tokio::time::timeout(self.op_timeout, self.history.list(agent_id, limit)).await {
            Ok(result) => result,
            Err(_) => Err(Error::HistoryRead("history read timed out".to_string())),
        }
    }

    /// Live feed of messages addressed to an agent. The feed starts at the
    /// moment of subscription; dropping the handle cancels it.
    pub async fn subscribe(&self, agent_id: &str) -> MessageFeed {
        MessageFeed::new(self.bus.subscribe(&channel::resolve(agent_id)).await)
    }

    /// Live feed of broadcast messages.
    pub async fn subscribe_broadcast(&self) -> MessageFeed {
        MessageFeed::new(self.bus.subscribe(&channel::resolve(BROADCAST_RECIPIENT)).await)
    }
}

/// A live feed of decoded messages from one channel.
pub struct MessageFeed {
    subscription: Subscription,
}

impl MessageFeed {
    fn new(subscription: Subscription) -> Self {
        Self { subscription }
    }

    /// The transport channel this feed is bound to.
    pub fn channel(&self) -> &str {
        self.subscription.channel()
    }

    /// Wait for the next message. Frames that fail to decode are skipped;
    /// `None` once the transport has shut down.
    pub async fn recv(&mut self) -> Option<Message> {
        loop {
            let frame = self.subscription.recv().await?;
            match serde_json::from_str(&frame) {
                Ok(message) => return Some(message),
                Err(e) => {
                    tracing::debug!(
                        channel = %self.subscription.channel(),
                        error = %e,
                        "skipping malformed frame"
                    );
                }
            }
        }
    }
}
