//! # A2A Mesh
//!
//! Agent-to-Agent (A2A) protocol agents built on Tower and axum.
//!
//! Each agent serves an agent card at `/.well-known/agent.json` and a
//! JSON-RPC 2.0 endpoint (`message/send`, `tasks/get`, `tasks/cancel`) at
//! `/a2a/v1/`. Agents find each other through an [`discovery::AgentRegistry`]
//! and talk over the same protocol they serve, using the Tower client stack.
//!
//! ## Layout
//!
//! - [`protocol`], [`codec`]: wire types and the JSON-RPC envelope
//! - [`transport`], [`service`], [`layer`], [`client`]: the client stack
//! - [`server`]: task store, method dispatch and the HTTP surface
//! - [`responder`], [`router`], [`profile`]: what agents answer
//! - [`discovery`], [`mesh`], [`config`]: wiring agents together
//!
//! ## Example
//!
//! ```rust,no_run
//! use a2a_mesh::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let url = "http://localhost:8004".parse()?;
//!     let mut client = A2AClientBuilder::new_http(url).build()?;
//!
//!     let card = client.discover().await?;
//!     client.use_interface(&card)?;
//!
//!     let task = client
//!         .send_message(Message::user("What's the forecast for London?"))
//!         .await?;
//!     println!("{}", task.last_agent_text().unwrap_or_default());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod discovery;
pub mod layer;
pub mod mesh;
pub mod profile;
pub mod protocol;
pub mod responder;
pub mod router;
pub mod server;
pub mod service;
pub mod transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        client::{A2AClientBuilder, AgentClient},
        config::AgentConfig,
        discovery::{AgentRegistry, PeerClient, PeerError},
        mesh::{spawn_agent, spawn_mesh, AgentHandle},
        profile::AgentKind,
        protocol::error::A2AError,
        protocol::{A2AOperation, AgentCard, Message, MessagePart, Role, Task, TaskState, TaskStatus},
        router::CoordinationMode,
    };
}
