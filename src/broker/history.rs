//! Bounded per-agent message history.

use std::sync::Arc;
use std::time::Duration;

use crate::config::HistoryConfig;
use crate::error::{Error, Result};
use crate::protocol::Message;
use crate::storage::Store;

/// Key prefix for per-agent history lists.
const HISTORY_KEY_PREFIX: &str = "agent:history:";

/// Per-agent message log with count-based eviction and a retention window.
///
/// Storage is newest-first; each append atomically trims the list to the
/// configured maximum and refreshes the retention window, so an agent that
/// goes quiet for the full window loses its history as a whole. History is
/// a convenience cache, not a replay log.
pub struct MessageHistory {
    store: Arc<dyn Store>,
    max_entries: usize,
    ttl: Duration,
}

impl MessageHistory {
    pub fn new(store: Arc<dyn Store>, config: &HistoryConfig) -> Self {
        Self {
            store,
            max_entries: config.max_entries,
            ttl: config.ttl(),
        }
    }

    fn key(agent_id: &str) -> String {
        format!("{}{}", HISTORY_KEY_PREFIX, agent_id)
    }

    /// Record a message in an agent's history.
    pub async fn append(&self, agent_id: &str, message: &Message) -> Result<()> {
        let data = serde_json::to_string(message)?;
        self.store
            .push_trim(&Self::key(agent_id), data, self.max_entries, self.ttl)
            .await
            .map_err(|e| Error::HistoryWrite(e.to_string()))
    }

    /// Read an agent's recent history, oldest first.
    ///
    /// `limit` is clamped to `[1, max_entries]`; out-of-range values never
    /// error. Unknown agents read as empty. Entries that fail to parse are
    /// skipped: a best-effort read returns everything it could decode.
    pub async fn list(&self, agent_id: &str, limit: i64) -> Result<Vec<Message>> {
        let limit = if limit <= 0 || limit > self.max_entries as i64 {
            self.max_entries
        } else {
            limit as usize
        };

        let raw = self
            .store
            .range(&Self::key(agent_id), limit)
            .await
            .map_err(|e| Error::HistoryRead(e.to_string()))?;

        // Stored newest-first; return chronological.
        let mut messages = Vec::with_capacity(raw.len());
        for entry in raw.iter().rev() {
            match serde_json::from_str::<Message>(entry) {
                Ok(message) => messages.push(message),
                Err(e) => {
                    tracing::debug!(agent_id, error = %e, "skipping malformed history entry");
                }
            }
        }

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::message::SendMessageRequest;
    use crate::storage::LocalStore;
    use serde_json::json;

    fn history() -> MessageHistory {
        MessageHistory::new(Arc::new(LocalStore::new()), &HistoryConfig::default())
    }

    fn message(from: &str, to: &str, payload: serde_json::Value) -> Message {
        Message::from_request(
            from,
            SendMessageRequest {
                to: to.to_string(),
                kind: None,
                payload,
                correlation_id: None,
                ttl_seconds: 0,
            },
        )
    }

    #[tokio::test]
    async fn test_round_trip_preserves_fields() {
        let history = history();
        let msg = message("a1", "b1", json!({"x": 1}));

        history.append("a1", &msg).await.unwrap();
        let got = history.list("a1", 10).await.unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, msg.id);
        assert_eq!(got[0].payload["x"], 1);
        assert_eq!(got[0].created_at, msg.created_at);
    }

    #[tokio::test]
    async fn test_unknown_agent_reads_empty() {
        let history = history();
        assert!(history.list("never-registered", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bounded_to_max_entries() {
        let history = history();
        let max = HistoryConfig::default().max_entries;

        let mut ids = Vec::new();
        for i in 0..max + 5 {
            let msg = message("a1", "b1", json!({"seq": i}));
            ids.push(msg.id.clone());
            history.append("a1", &msg).await.unwrap();
        }

        let got = history.list("a1", max as i64).await.unwrap();
        assert_eq!(got.len(), max);
        // The 5 oldest were evicted; the rest come back oldest-first.
        let expected: Vec<&String> = ids.iter().skip(5).collect();
        let actual: Vec<&String> = got.iter().map(|m| &m.id).collect();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_limit_clamping() {
        let history = history();
        for i in 0..10 {
            history
                .append("a1", &message("a1", "b1", json!({"seq": i})))
                .await
                .unwrap();
        }

        assert_eq!(history.list("a1", 0).await.unwrap().len(), 10);
        assert_eq!(history.list("a1", -3).await.unwrap().len(), 10);
        assert_eq!(history.list("a1", 100_000).await.unwrap().len(), 10);
        assert_eq!(history.list("a1", 4).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_chronological_order() {
        let history = history();
        let first = message("a1", "b1", json!({"seq": 0}));
        let second = message("a1", "b1", json!({"seq": 1}));
        history.append("a1", &first).await.unwrap();
        history.append("a1", &second).await.unwrap();

        let got = history.list("a1", 10).await.unwrap();
        assert_eq!(got[0].id, first.id);
        assert_eq!(got[1].id, second.id);
    }

    #[tokio::test]
    async fn test_malformed_entries_are_skipped() {
        let store = Arc::new(LocalStore::new());
        let history = MessageHistory::new(Arc::clone(&store) as Arc<dyn Store>, &HistoryConfig::default());

        let msg = message("a1", "b1", json!({}));
        history.append("a1", &msg).await.unwrap();
        store
            .push_trim(
                "agent:history:a1",
                "{not json".to_string(),
                100,
                Duration::from_secs(60),
            )
            .await
            .unwrap();
        history
            .append("a1", &message("a1", "b1", json!({"seq": 2})))
            .await
            .unwrap();

        let got = history.list("a1", 10).await.unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].id, msg.id);
    }
}
