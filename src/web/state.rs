//! Shared application state for request handlers.

use std::sync::Arc;

use crate::broker::MessageBroker;
use crate::memory::MemoryClient;
use crate::registry::AgentRegistry;
use crate::storage::Store;
use crate::transport::PubSub;

/// Handles shared by all request tasks. Everything here is constructed
/// once at startup and injected; the handlers never reach for globals.
#[derive(Clone)]
pub struct AppState {
    pub broker: Arc<MessageBroker>,
    pub registry: Arc<AgentRegistry>,
    pub memory: Arc<MemoryClient>,
    pub bus: Arc<dyn PubSub>,
    pub store: Arc<dyn Store>,
}

impl AppState {
    /// Shut down the shared transport and store.
    pub async fn shutdown(&self) {
        self.bus.close().await;
        self.store.close().await;
    }
}
