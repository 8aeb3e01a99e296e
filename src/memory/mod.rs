//! Client for the external agent-memory service.
//!
//! Short- and long-term memory are delegated entirely to a separate
//! service reached over HTTP; the hub only namespaces keys per agent and
//! forwards requests.

use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

use crate::config::MemoryConfig;
use crate::error::{Error, Result};
use crate::protocol::memory::{MemoryKind, MemoryRecord, StoreMemoryRequest};

const SHORT_TERM_PREFIX: &str = "memory:short:";
const LONG_TERM_PREFIX: &str = "memory:long:";

/// HTTP client for the agent-memory service.
pub struct MemoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl MemoryClient {
    pub fn new(config: &MemoryConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    fn scoped_key(kind: MemoryKind, agent_id: &str, key: &str) -> String {
        let prefix = match kind {
            MemoryKind::ShortTerm => SHORT_TERM_PREFIX,
            MemoryKind::LongTerm => LONG_TERM_PREFIX,
        };
        format!("{}{}:{}", prefix, agent_id, key)
    }

    /// Store short-term memory with an expiry.
    pub async fn store_short_term(
        &self,
        agent_id: &str,
        key: &str,
        value: Value,
        ttl: Duration,
    ) -> Result<()> {
        self.store(StoreMemoryRequest {
            kind: MemoryKind::ShortTerm,
            key: Self::scoped_key(MemoryKind::ShortTerm, agent_id, key),
            value,
            ttl_seconds: ttl.as_secs(),
        })
        .await
    }

    /// Store long-term memory.
    pub async fn store_long_term(&self, agent_id: &str, key: &str, value: Value) -> Result<()> {
        self.store(StoreMemoryRequest {
            kind: MemoryKind::LongTerm,
            key: Self::scoped_key(MemoryKind::LongTerm, agent_id, key),
            value,
            ttl_seconds: 0,
        })
        .await
    }

    /// Retrieve a memory record.
    pub async fn get(&self, kind: MemoryKind, agent_id: &str, key: &str) -> Result<MemoryRecord> {
        let scoped = Self::scoped_key(kind, agent_id, key);
        let response = self
            .http
            .get(format!("{}/memory", self.base_url))
            .query(&[("key", scoped.as_str())])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::MemoryNotFound(key.to_string()));
        }
        if !response.status().is_success() {
            return Err(Error::Memory(format!(
                "memory service returned {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    /// Delete a memory record.
    pub async fn delete(&self, kind: MemoryKind, agent_id: &str, key: &str) -> Result<()> {
        let scoped = Self::scoped_key(kind, agent_id, key);
        let response = self
            .http
            .delete(format!("{}/memory", self.base_url))
            .query(&[("key", scoped.as_str())])
            .send()
            .await?;

        if !response.status().is_success() && response.status() != StatusCode::NO_CONTENT {
            return Err(Error::Memory(format!(
                "memory service returned {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn store(&self, req: StoreMemoryRequest) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/memory", self.base_url))
            .json(&req)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Memory(format!(
                "memory service returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
