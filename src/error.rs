//! Error types for commhub.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport rejected or never accepted a publish. Fatal to a send.
    #[error("Publish failed: {0}")]
    Publish(String),

    /// History backing store rejected a write. Non-fatal to a send.
    #[error("History write failed: {0}")]
    HistoryWrite(String),

    /// History backing store unreachable for a read.
    #[error("History read failed: {0}")]
    HistoryRead(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Memory not found: {0}")]
    MemoryNotFound(String),

    #[error("Memory service error: {0}")]
    Memory(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Web error: {0}")]
    Web(String),

    #[error("{0}")]
    Other(String),
}
