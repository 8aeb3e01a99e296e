//! commhub library root.

pub mod broker;
pub mod config;
pub mod error;
pub mod logging;
pub mod memory;
pub mod protocol;
pub mod registry;
pub mod storage;
pub mod transport;
pub mod web;

pub use broker::{MessageBroker, MessageFeed};
pub use config::{load_settings, Settings};
pub use error::{Error, Result};
pub use memory::MemoryClient;
pub use protocol::{Message, MessageKind, SendMessageRequest};
pub use registry::AgentRegistry;
pub use storage::{LocalStore, Store};
pub use transport::{LocalBus, PubSub, Subscription};
pub use web::{run_server, AppState};
