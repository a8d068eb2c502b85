//! Requests travelling down the client service stack

use std::time::Duration;

use crate::{
    client::ClientConfig,
    protocol::operation::{A2AOperation, RPC_PATH},
};

/// One A2A operation addressed to a specific agent
#[derive(Debug, Clone)]
pub struct A2ARequest {
    pub operation: A2AOperation,
    pub context: RequestContext,
}

impl A2ARequest {
    pub fn new(operation: A2AOperation, context: RequestContext) -> Self {
        Self { operation, context }
    }

    /// Address `operation` to the agent described by `config`
    ///
    /// Card fetches get the discovery deadline, JSON-RPC calls the send deadline.
    pub fn for_agent(operation: A2AOperation, config: &ClientConfig) -> Self {
        let context = RequestContext::new(config.agent_url.as_str())
            .with_rpc_endpoint(config.rpc_endpoint.clone())
            .with_timeout(config.timeout_for(&operation));
        Self::new(operation, context)
    }

    /// JSON-RPC method name, or `discover` for card fetches
    pub fn label(&self) -> &'static str {
        self.operation.rpc_method().unwrap_or("discover")
    }
}

/// Destination and deadline of a request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// Base URL of the target agent
    pub agent_url: String,

    /// Path or absolute URL of the agent's JSON-RPC interface
    pub rpc_endpoint: String,

    /// Deadline for the whole exchange
    pub timeout: Duration,
}

impl RequestContext {
    pub fn new(agent_url: impl Into<String>) -> Self {
        Self {
            agent_url: agent_url.into(),
            ..Self::default()
        }
    }

    pub fn with_rpc_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.rpc_endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            agent_url: String::new(),
            rpc_endpoint: RPC_PATH.to_string(),
            timeout: crate::client::config::DEFAULT_SEND_TIMEOUT,
        }
    }
}
