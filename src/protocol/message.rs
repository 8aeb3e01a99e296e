//! Message envelope exchanged between agents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Reserved recipient meaning "all subscribers of the broadcast channel".
pub const BROADCAST_RECIPIENT: &str = "broadcast";

/// Message kind - a hint for the consumer, never interpreted by the hub.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Request,
    Response,
    Event,
    #[default]
    Message,
}

/// A message in flight between agents.
///
/// Constructed exactly once per send by the broker and immutable from then
/// on. `created_at` is assigned at construction, never by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID (UUID v4).
    pub id: String,
    /// Sender agent ID.
    pub from: String,
    /// Recipient agent ID, or [`BROADCAST_RECIPIENT`].
    pub to: String,
    /// Consumer hint.
    #[serde(default)]
    pub kind: MessageKind,
    /// Opaque payload, arbitrarily structured.
    #[serde(default)]
    pub payload: Value,
    /// Caller-supplied correlation ID for request/response pairing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Assigned by the broker at construction.
    pub created_at: DateTime<Utc>,
    /// TTL hint in seconds; 0 means no expiration at the transport layer.
    #[serde(default)]
    pub ttl_seconds: u64,
}

impl Message {
    /// Build a message from a send request. Fresh ID, current timestamp.
    pub fn from_request(from: impl Into<String>, req: SendMessageRequest) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            from: from.into(),
            to: req.to,
            kind: req.kind.unwrap_or_default(),
            payload: req.payload,
            correlation_id: req.correlation_id,
            created_at: Utc::now(),
            ttl_seconds: req.ttl_seconds,
        }
    }

    /// Whether this message is addressed to the broadcast channel.
    pub fn is_broadcast(&self) -> bool {
        self.to == BROADCAST_RECIPIENT
    }
}

/// Request body for sending a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub to: String,
    #[serde(default)]
    pub kind: Option<MessageKind>,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub correlation_id: Option<String>,
    #[serde(default)]
    pub ttl_seconds: u64,
}

/// Response body after a send was accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub message_id: String,
    pub created_at: DateTime<Utc>,
    pub channel: String,
}

/// A page of message history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageListResponse {
    pub messages: Vec<Message>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request_to(to: &str) -> SendMessageRequest {
        SendMessageRequest {
            to: to.to_string(),
            kind: None,
            payload: json!({"x": 1}),
            correlation_id: None,
            ttl_seconds: 0,
        }
    }

    #[test]
    fn test_from_request_defaults_kind() {
        let msg = Message::from_request("a1", request_to("b1"));
        assert_eq!(msg.kind, MessageKind::Message);
        assert_eq!(msg.from, "a1");
        assert_eq!(msg.to, "b1");
        assert!(!msg.id.is_empty());
    }

    #[test]
    fn test_unique_ids() {
        let a = Message::from_request("a1", request_to("b1"));
        let b = Message::from_request("a1", request_to("b1"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_broadcast_detection() {
        let msg = Message::from_request("a1", request_to(BROADCAST_RECIPIENT));
        assert!(msg.is_broadcast());
        assert!(!Message::from_request("a1", request_to("b1")).is_broadcast());
    }

    #[test]
    fn test_serde_round_trip() {
        let msg = Message::from_request(
            "a1",
            SendMessageRequest {
                to: "b1".to_string(),
                kind: Some(MessageKind::Request),
                payload: json!({"task": "review", "n": 3}),
                correlation_id: Some("corr-1".to_string()),
                ttl_seconds: 60,
            },
        );

        let raw = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.id, msg.id);
        assert_eq!(back.kind, MessageKind::Request);
        assert_eq!(back.payload["task"], "review");
        assert_eq!(back.correlation_id.as_deref(), Some("corr-1"));
        assert_eq!(back.ttl_seconds, 60);
    }

    #[test]
    fn test_tolerates_unknown_fields() {
        let raw = json!({
            "id": "m-1",
            "from": "a1",
            "to": "b1",
            "kind": "event",
            "payload": {},
            "created_at": "2024-01-01T00:00:00Z",
            "some_future_field": true
        });
        let msg: Message = serde_json::from_value(raw).unwrap();
        assert_eq!(msg.kind, MessageKind::Event);
        assert_eq!(msg.ttl_seconds, 0);
    }
}
