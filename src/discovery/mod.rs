//! Peer discovery and agent-to-agent messaging

pub mod peer;
pub mod registry;

pub use peer::{extract_reply_text, PeerClient, PeerError, NO_RESPONSE};
pub use registry::AgentRegistry;
