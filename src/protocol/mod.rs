//! Wire and data models for the hub.
//!
//! Everything here is plain serde data: messages exchanged between agents,
//! registry records, and memory records. Payloads stay opaque JSON values
//! end to end; the hub never deserializes them into concrete types.

pub mod agent;
pub mod memory;
pub mod message;

pub use agent::{Agent, AgentStatus, RegisterAgentRequest, UpdateAgentRequest};
pub use memory::{MemoryKind, MemoryRecord, StoreMemoryRequest};
pub use message::{Message, MessageKind, SendMessageRequest};
