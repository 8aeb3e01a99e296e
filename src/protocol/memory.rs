//! Records exchanged with the external agent-memory service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Memory retention class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    ShortTerm,
    LongTerm,
}

/// A stored memory record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub key: String,
    pub value: Value,
    pub kind: MemoryKind,
    pub stored_at: DateTime<Utc>,
    /// TTL in seconds, short-term only. 0 means the service default.
    #[serde(default)]
    pub ttl_seconds: u64,
}

/// Request body for storing memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMemoryRequest {
    pub kind: MemoryKind,
    pub key: String,
    pub value: Value,
    #[serde(default)]
    pub ttl_seconds: u64,
}

/// Response body after storing memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMemoryResponse {
    pub key: String,
    pub stored_at: DateTime<Utc>,
}
