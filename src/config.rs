//! Configuration loading for commhub.
//!
//! All settings come from environment variables with sensible defaults,
//! so the binary can start with no config file at all.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// HTTP server configuration.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

/// Backing store configuration (transport + history + registry keyspace).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StoreConfig {
    /// Timeout applied to each store/publish operation, in seconds.
    pub op_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            op_timeout_secs: default_store_op_timeout(),
        }
    }
}

fn default_store_op_timeout() -> u64 {
    5
}

impl StoreConfig {
    pub fn op_timeout(&self) -> Duration {
        Duration::from_secs(self.op_timeout_secs)
    }
}

/// Per-agent message history retention.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HistoryConfig {
    /// Maximum entries kept per agent.
    pub max_entries: usize,
    /// Retention window in seconds, refreshed on every append.
    pub ttl_secs: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_history_max(),
            ttl_secs: default_history_ttl(),
        }
    }
}

fn default_history_max() -> usize {
    100
}

fn default_history_ttl() -> u64 {
    24 * 60 * 60
}

impl HistoryConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// External agent-memory service configuration.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MemoryConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            url: default_memory_url(),
            timeout_secs: default_memory_timeout(),
        }
    }
}

fn default_memory_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_memory_timeout() -> u64 {
    10
}

impl MemoryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Logging configuration.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    /// Log directory; the platform data dir when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

/// commhub settings.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub memory: MemoryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Load settings from environment variables.
pub fn load_settings() -> Settings {
    let settings = Settings {
        server: ServerConfig {
            host: env_or("SERVER_HOST", default_server_host()),
            port: env_parse("SERVER_PORT", default_server_port()),
        },
        store: StoreConfig {
            op_timeout_secs: env_parse("STORE_OP_TIMEOUT_SECS", default_store_op_timeout()),
        },
        history: HistoryConfig {
            max_entries: env_parse("HISTORY_MAX", default_history_max()),
            ttl_secs: env_parse("HISTORY_TTL_SECS", default_history_ttl()),
        },
        memory: MemoryConfig {
            url: env_or("AGENT_MEMORY_URL", default_memory_url()),
            timeout_secs: env_parse("AGENT_MEMORY_TIMEOUT_SECS", default_memory_timeout()),
        },
        logging: LoggingConfig {
            level: env_or("LOG_LEVEL", "info".to_string()),
            dir: std::env::var("LOG_DIR").ok().map(PathBuf::from),
        },
    };

    tracing::debug!("Loaded settings from environment");
    settings
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(value) => value.parse().unwrap_or(default),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.history.max_entries, 100);
        assert_eq!(settings.history.ttl_secs, 86400);
        assert_eq!(settings.memory.url, "http://localhost:8081");
        assert_eq!(settings.logging.level, "info");
        assert!(settings.logging.dir.is_none());
    }

    #[test]
    fn test_duration_helpers() {
        let settings = Settings::default();
        assert_eq!(settings.store.op_timeout(), Duration::from_secs(5));
        assert_eq!(settings.history.ttl(), Duration::from_secs(86400));
        assert_eq!(settings.memory.timeout(), Duration::from_secs(10));
    }
}
