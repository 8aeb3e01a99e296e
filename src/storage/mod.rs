//! Key-value + list storage seam.
//!
//! The registry and the message history both sit on this surface: plain
//! string keys, optional absolute expiry, an index set per collection, and
//! a bounded newest-first list per agent. `push_trim` is a single atomic
//! operation (push + trim + TTL refresh) so concurrent appends to the same
//! key never lose entries to a read-modify-write race.

pub mod local;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

pub use local::LocalStore;

/// Shared storage handle, safe for concurrent use by multiple callers.
/// Constructed once at startup and injected, never a hidden global.
#[async_trait]
pub trait Store: Send + Sync {
    /// Get a string value. Expired or missing keys read as `None`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a string value, optionally expiring after `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<()>;

    /// Delete a key of any type. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Add a member to a set.
    async fn set_add(&self, key: &str, member: &str) -> Result<()>;

    /// Remove a member from a set.
    async fn set_remove(&self, key: &str, member: &str) -> Result<()>;

    /// All members of a set. Missing or expired sets read as empty.
    async fn set_members(&self, key: &str) -> Result<Vec<String>>;

    /// Prepend `value` to the list at `key`, trim the list to `max_len`
    /// newest entries, and refresh the key's expiry to `ttl` from now, all
    /// atomically with respect to concurrent pushes on the same key.
    async fn push_trim(&self, key: &str, value: String, max_len: usize, ttl: Duration)
        -> Result<()>;

    /// Up to `count` list entries, newest first. Missing or expired lists
    /// read as empty.
    async fn range(&self, key: &str, count: usize) -> Result<Vec<String>>;

    /// Liveness probe for health checks.
    async fn ping(&self) -> Result<()>;

    /// Release the underlying resources.
    async fn close(&self);
}
