//! Agent discovery and capability types

use serde::{Deserialize, Serialize};

/// Schema version advertised by every agent card
pub const SCHEMA_VERSION: &str = "0.2.0";

/// Interface type peers look for when choosing where to send JSON-RPC calls
pub const A2A_INTERFACE: &str = "a2a";

/// JSON-RPC methods served by every agent in this crate
pub const A2A_METHODS: [&str; 3] = ["message/send", "tasks/get", "tasks/cancel"];

/// Agent Card for agent discovery
///
/// The Agent Card is published at `/.well-known/agent.json` and describes the
/// agent's identity, its coarse capabilities and the endpoints it serves.
/// A card carries no timestamps, so an unchanged agent always serves the same
/// bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    /// Card schema version
    pub schema_version: String,

    /// Identity of the agent
    pub agent: AgentInfo,

    /// Coarse capability flags
    pub capabilities: AgentCapabilities,

    /// Endpoints the agent serves
    pub interfaces: Vec<AgentInterface>,

    /// Authentication requirements
    pub authentication: AuthenticationInfo,
}

impl AgentCard {
    /// Create a new agent card with no interfaces
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            agent: AgentInfo {
                name: name.into(),
                description: description.into(),
                version: "1.0.0".to_string(),
                capabilities: Vec::new(),
            },
            capabilities: AgentCapabilities::new().with_text_generation(),
            interfaces: Vec::new(),
            authentication: AuthenticationInfo::default(),
        }
    }

    /// Name of the agent
    pub fn name(&self) -> &str {
        &self.agent.name
    }

    /// Set the agent version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.agent.version = version.into();
        self
    }

    /// Add a free-form capability tag
    pub fn with_capability(mut self, tag: impl Into<String>) -> Self {
        self.agent.capabilities.push(tag.into());
        self
    }

    /// Replace the capability flags
    pub fn with_capabilities(mut self, capabilities: AgentCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Add an interface to the agent card
    pub fn with_interface(mut self, interface: AgentInterface) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// The first interface of type `a2a`, if the agent speaks the protocol
    pub fn a2a_interface(&self) -> Option<&AgentInterface> {
        self.interfaces
            .iter()
            .find(|interface| interface.interface_type == A2A_INTERFACE)
    }
}

/// Identity block of an agent card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentInfo {
    /// Name of the agent, also its registry key
    pub name: String,

    /// Human-readable description of the agent
    pub description: String,

    /// Agent version
    pub version: String,

    /// Free-form capability tags
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// Agent capabilities
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    #[serde(default)]
    pub text_generation: bool,

    #[serde(default)]
    pub image_generation: bool,

    #[serde(default)]
    pub file_processing: bool,

    #[serde(default)]
    pub real_time_interaction: bool,
}

impl AgentCapabilities {
    /// Create capabilities with default values (all false)
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable text generation
    pub fn with_text_generation(mut self) -> Self {
        self.text_generation = true;
        self
    }

    /// Enable real-time interaction
    pub fn with_real_time_interaction(mut self) -> Self {
        self.real_time_interaction = true;
        self
    }
}

/// An endpoint advertised in an agent card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentInterface {
    /// Interface type, `a2a` for the JSON-RPC endpoint
    #[serde(rename = "type")]
    pub interface_type: String,

    /// Absolute URL peers POST to
    pub url: String,

    /// Methods served at this URL
    #[serde(default)]
    pub methods: Vec<String>,
}

impl AgentInterface {
    /// Create a new interface
    pub fn new(interface_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            interface_type: interface_type.into(),
            url: url.into(),
            methods: Vec::new(),
        }
    }

    /// The standard A2A JSON-RPC interface rooted at `base_url`
    pub fn a2a(base_url: &str) -> Self {
        Self {
            interface_type: A2A_INTERFACE.to_string(),
            url: format!("{}/a2a/v1/", base_url.trim_end_matches('/')),
            methods: A2A_METHODS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Authentication block of an agent card
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthenticationInfo {
    #[serde(default)]
    pub required: bool,
}
