//! In-process store with lazy expiry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use super::Store;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
enum Value {
    Str(String),
    List(VecDeque<String>),
    Set(HashSet<String>),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Set(_) => "set",
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() >= at)
    }
}

/// In-process key-value + list store. Expiry is lazy: expired entries are
/// dropped when the key is next touched, and reads after expiry behave as
/// if the key never existed.
pub struct LocalStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Run `f` on the live (non-expired) entry map under the lock.
    fn with_entries<T>(&self, key: &str, f: impl FnOnce(&mut HashMap<String, Entry>) -> T) -> T {
        let mut entries = self.entries.lock().expect("store map poisoned");
        if entries.get(key).is_some_and(Entry::is_expired) {
            entries.remove(key);
        }
        f(&mut entries)
    }

    fn wrong_type(key: &str, found: &Value, want: &str) -> Error {
        Error::Store(format!(
            "key '{}' holds a {}, expected a {}",
            key,
            found.type_name(),
            want
        ))
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for LocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_entries(key, |entries| match entries.get(key) {
            None => Ok(None),
            Some(Entry {
                value: Value::Str(s),
                ..
            }) => Ok(Some(s.clone())),
            Some(entry) => Err(Self::wrong_type(key, &entry.value, "string")),
        })
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<()> {
        let expires_at = ttl.map(|ttl| Utc::now() + ttl);
        self.with_entries(key, |entries| {
            entries.insert(
                key.to_string(),
                Entry {
                    value: Value::Str(value),
                    expires_at,
                },
            );
        });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.with_entries(key, |entries| {
            entries.remove(key);
        });
        Ok(())
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<()> {
        self.with_entries(key, |entries| {
            let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
                value: Value::Set(HashSet::new()),
                expires_at: None,
            });
            match &mut entry.value {
                Value::Set(set) => {
                    set.insert(member.to_string());
                    Ok(())
                }
                other => Err(Self::wrong_type(key, other, "set")),
            }
        })
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<()> {
        self.with_entries(key, |entries| match entries.get_mut(key) {
            None => Ok(()),
            Some(Entry {
                value: Value::Set(set),
                ..
            }) => {
                set.remove(member);
                Ok(())
            }
            Some(entry) => Err(Self::wrong_type(key, &entry.value, "set")),
        })
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>> {
        self.with_entries(key, |entries| match entries.get(key) {
            None => Ok(Vec::new()),
            Some(Entry {
                value: Value::Set(set),
                ..
            }) => Ok(set.iter().cloned().collect()),
            Some(entry) => Err(Self::wrong_type(key, &entry.value, "set")),
        })
    }

    async fn push_trim(
        &self,
        key: &str,
        value: String,
        max_len: usize,
        ttl: Duration,
    ) -> Result<()> {
        let expires_at = Some(Utc::now() + ttl);
        self.with_entries(key, |entries| {
            let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
                value: Value::List(VecDeque::new()),
                expires_at: None,
            });
            match &mut entry.value {
                Value::List(list) => {
                    list.push_front(value);
                    list.truncate(max_len);
                    entry.expires_at = expires_at;
                    Ok(())
                }
                other => Err(Self::wrong_type(key, other, "list")),
            }
        })
    }

    async fn range(&self, key: &str, count: usize) -> Result<Vec<String>> {
        self.with_entries(key, |entries| match entries.get(key) {
            None => Ok(Vec::new()),
            Some(Entry {
                value: Value::List(list),
                ..
            }) => Ok(list.iter().take(count).cloned().collect()),
            Some(entry) => Err(Self::wrong_type(key, &entry.value, "list")),
        })
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) {
        self.entries.lock().expect("store map poisoned").clear();
    }
}
