//! Talking to a single agent: discovery, messages and task calls

pub mod agent;
pub mod builder;
pub mod config;

pub use agent::AgentClient;
pub use builder::{A2AClientBuilder, BoxA2AService};
pub use config::ClientConfig;
