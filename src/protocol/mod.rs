//! Core A2A protocol types and definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod agent;
pub mod error;
pub mod message;
pub mod operation;
pub mod task;

pub use agent::{AgentCapabilities, AgentCard, AgentInterface};
pub use error::{A2AError, JsonRpcErrorCode};
pub use message::{Message, MessagePart, Role};
pub use operation::A2AOperation;
pub use task::{Task, TaskState, TaskStatus};

/// Artifacts represent task outputs
///
/// No responder in this crate produces artifacts, but they are part of the
/// task shape and survive a store round trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Unique identifier of the Artifact
    pub artifact_id: String,

    /// A human readable name for the Artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Contents of the Artifact
    pub parts: Vec<MessagePart>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Artifact {
    /// Create an artifact from a list of parts
    pub fn new(artifact_id: impl Into<String>, parts: Vec<MessagePart>) -> Self {
        Self {
            artifact_id: artifact_id.into(),
            name: None,
            parts,
            metadata: None,
        }
    }

    /// Set the artifact name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
