//! Agent directory: registration, discovery, heartbeats.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::protocol::agent::{Agent, AgentStatus, RegisterAgentRequest, UpdateAgentRequest};
use crate::storage::Store;

const AGENT_KEY_PREFIX: &str = "agent:";
const AGENT_INDEX_KEY: &str = "agents:index";
const HEARTBEAT_KEY_PREFIX: &str = "agent:heartbeat:";

/// An agent that misses heartbeats for this long is considered gone.
const HEARTBEAT_TTL: Duration = Duration::from_secs(5 * 60);

/// Key-value backed agent registry.
pub struct AgentRegistry {
    store: Arc<dyn Store>,
}

impl AgentRegistry {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    fn agent_key(agent_id: &str) -> String {
        format!("{}{}", AGENT_KEY_PREFIX, agent_id)
    }

    fn heartbeat_key(agent_id: &str) -> String {
        format!("{}{}", HEARTBEAT_KEY_PREFIX, agent_id)
    }

    /// Register a new agent under a fresh ID.
    pub async fn register(&self, req: RegisterAgentRequest) -> Result<Agent> {
        let now = Utc::now();
        let agent = Agent {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            kind: req.kind,
            capabilities: req.capabilities,
            endpoint: req.endpoint,
            status: AgentStatus::Online,
            metadata: req.metadata,
            created_at: now,
            last_seen: now,
        };

        self.save(&agent).await?;
        self.store.set_add(AGENT_INDEX_KEY, &agent.id).await?;
        self.refresh_heartbeat(&agent.id).await?;

        tracing::info!(agent_id = %agent.id, name = %agent.name, "agent registered");
        Ok(agent)
    }

    /// Look an agent up by ID.
    pub async fn get(&self, agent_id: &str) -> Result<Agent> {
        let data = self
            .store
            .get(&Self::agent_key(agent_id))
            .await?
            .ok_or_else(|| Error::AgentNotFound(agent_id.to_string()))?;

        Ok(serde_json::from_str(&data)?)
    }

    /// All registered agents. Index entries that no longer resolve are
    /// skipped rather than failing the listing.
    pub async fn list(&self) -> Result<Vec<Agent>> {
        let ids = self.store.set_members(AGENT_INDEX_KEY).await?;

        let mut agents = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get(&id).await {
                Ok(agent) => agents.push(agent),
                Err(e) => {
                    tracing::debug!(agent_id = %id, error = %e, "skipping unreadable agent");
                }
            }
        }

        Ok(agents)
    }

    /// Apply a partial update to an existing agent.
    pub async fn update(&self, agent_id: &str, req: UpdateAgentRequest) -> Result<Agent> {
        let mut agent = self.get(agent_id).await?;

        if let Some(name) = req.name {
            agent.name = name;
        }
        if let Some(kind) = req.kind {
            agent.kind = kind;
        }
        if let Some(capabilities) = req.capabilities {
            agent.capabilities = capabilities;
        }
        if let Some(endpoint) = req.endpoint {
            agent.endpoint = endpoint;
        }
        if let Some(status) = req.status {
            agent.status = status;
        }
        if let Some(metadata) = req.metadata {
            agent.metadata = metadata;
        }

        self.save(&agent).await?;
        Ok(agent)
    }

    /// Remove an agent from the registry.
    pub async fn unregister(&self, agent_id: &str) -> Result<()> {
        // Ensure it exists so the caller gets a proper not-found.
        self.get(agent_id).await?;

        self.store.set_remove(AGENT_INDEX_KEY, agent_id).await?;
        self.store.delete(&Self::agent_key(agent_id)).await?;
        self.store.delete(&Self::heartbeat_key(agent_id)).await?;

        tracing::info!(agent_id, "agent unregistered");
        Ok(())
    }

    /// Record a heartbeat: refresh the liveness key and `last_seen`.
    pub async fn heartbeat(&self, agent_id: &str) -> Result<()> {
        let mut agent = self.get(agent_id).await?;
        agent.last_seen = Utc::now();
        self.save(&agent).await?;
        self.refresh_heartbeat(agent_id).await
    }

    async fn save(&self, agent: &Agent) -> Result<()> {
        let data = serde_json::to_string(agent)?;
        self.store
            .set(&Self::agent_key(&agent.id), data, None)
            .await
    }

    async fn refresh_heartbeat(&self, agent_id: &str) -> Result<()> {
        self.store
            .set(
                &Self::heartbeat_key(agent_id),
                Utc::now().timestamp().to_string(),
                Some(HEARTBEAT_TTL),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStore;
    use std::collections::HashMap;

    fn registry_with_store() -> (AgentRegistry, Arc<LocalStore>) {
        let store = Arc::new(LocalStore::new());
        (
            AgentRegistry::new(Arc::clone(&store) as Arc<dyn Store>),
            store,
        )
    }

    fn register_request(name: &str) -> RegisterAgentRequest {
        RegisterAgentRequest {
            name: name.to_string(),
            kind: "worker".to_string(),
            capabilities: vec!["search".to_string()],
            endpoint: "http://localhost:9000".to_string(),
            metadata: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let (registry, _) = registry_with_store();
        let agent = registry.register(register_request("alpha")).await.unwrap();
        assert_eq!(agent.status, AgentStatus::Online);

        let got = registry.get(&agent.id).await.unwrap();
        assert_eq!(got.name, "alpha");
        assert_eq!(got.capabilities, vec!["search"]);
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let (registry, _) = registry_with_store();
        let err = registry.get("missing").await.unwrap_err();
        assert!(matches!(err, Error::AgentNotFound(_)));
    }

    #[tokio::test]
    async fn test_list_returns_all() {
        let (registry, _) = registry_with_store();
        registry.register(register_request("alpha")).await.unwrap();
        registry.register(register_request("beta")).await.unwrap();

        let agents = registry.list().await.unwrap();
        assert_eq!(agents.len(), 2);
    }

    #[tokio::test]
    async fn test_list_skips_dangling_index_entries() {
        let (registry, store) = registry_with_store();
        registry.register(register_request("alpha")).await.unwrap();
        store.set_add(AGENT_INDEX_KEY, "ghost").await.unwrap();

        let agents = registry.list().await.unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].name, "alpha");
    }

    #[tokio::test]
    async fn test_partial_update() {
        let (registry, _) = registry_with_store();
        let agent = registry.register(register_request("alpha")).await.unwrap();

        let updated = registry
            .update(
                &agent.id,
                UpdateAgentRequest {
                    status: Some(AgentStatus::Busy),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, AgentStatus::Busy);
        // Untouched fields survive.
        assert_eq!(updated.name, "alpha");
        assert_eq!(updated.kind, "worker");
    }

    #[tokio::test]
    async fn test_unregister_removes_agent() {
        let (registry, _) = registry_with_store();
        let agent = registry.register(register_request("alpha")).await.unwrap();

        registry.unregister(&agent.id).await.unwrap();
        assert!(matches!(
            registry.get(&agent.id).await.unwrap_err(),
            Error::AgentNotFound(_)
        ));
        assert!(registry.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_heartbeat_updates_last_seen() {
        let (registry, _) = registry_with_store();
        let agent = registry.register(register_request("alpha")).await.unwrap();

        registry.heartbeat(&agent.id).await.unwrap();
        let got = registry.get(&agent.id).await.unwrap();
        assert!(got.last_seen >= agent.last_seen);
    }

    #[tokio::test]
    async fn test_heartbeat_unknown_is_not_found() {
        let (registry, _) = registry_with_store();
        assert!(matches!(
            registry.heartbeat("missing").await.unwrap_err(),
            Error::AgentNotFound(_)
        ));
    }
}
