//! Per-agent client settings

use std::time::Duration;

use url::Url;

use crate::protocol::{
    operation::{A2AOperation, RPC_PATH},
    A2AError, AgentCard,
};

/// Default upper bound on a JSON-RPC call to a peer
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Default upper bound on fetching a peer's agent card
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where one agent lives and how long calls to it may take
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL the agent card is fetched from
    pub agent_url: Url,

    /// Path or absolute URL JSON-RPC calls are posted to
    pub rpc_endpoint: String,

    /// Deadline for `message/send`, `tasks/get` and `tasks/cancel`
    pub send_timeout: Duration,

    /// Deadline for fetching the agent card
    pub discovery_timeout: Duration,

    /// Check requests and responses against protocol invariants
    pub validate_responses: bool,
}

impl ClientConfig {
    pub fn new(agent_url: Url) -> Self {
        Self {
            agent_url,
            rpc_endpoint: RPC_PATH.to_string(),
            send_timeout: DEFAULT_SEND_TIMEOUT,
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT,
            validate_responses: true,
        }
    }

    pub fn with_rpc_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.rpc_endpoint = endpoint.into();
        self
    }

    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    pub fn with_discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self
    }

    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_responses = enabled;
        self
    }

    /// Deadline that applies to `operation`
    pub fn timeout_for(&self, operation: &A2AOperation) -> Duration {
        match operation {
            A2AOperation::DiscoverAgent => self.discovery_timeout,
            _ => self.send_timeout,
        }
    }

    /// Post JSON-RPC calls to the `a2a` interface advertised by `card`
    ///
    /// # Errors
    ///
    /// Returns a protocol error if the card has no `a2a` interface; the
    /// current endpoint is left untouched.
    pub fn use_interface(&mut self, card: &AgentCard) -> Result<(), A2AError> {
        let interface = card.a2a_interface().ok_or_else(|| {
            A2AError::Protocol(format!("{} does not expose an a2a interface", card.name()))
        })?;
        self.rpc_endpoint = interface.url.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::protocol::{agent::AgentInterface, Message};

    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::new(Url::parse("http://localhost:8003").unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.rpc_endpoint, "/a2a/v1/");
        assert_eq!(config.send_timeout, Duration::from_secs(10));
        assert_eq!(config.discovery_timeout, Duration::from_secs(5));
        assert!(config.validate_responses);
    }

    #[test]
    fn test_timeout_depends_on_operation() {
        let config = config()
            .with_send_timeout(Duration::from_secs(30))
            .with_discovery_timeout(Duration::from_secs(1));

        assert_eq!(
            config.timeout_for(&A2AOperation::DiscoverAgent),
            Duration::from_secs(1)
        );
        assert_eq!(
            config.timeout_for(&A2AOperation::send(Message::user("hi"))),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_use_interface() {
        let mut config = config();
        let card = AgentCard::new("ExpenseAgent", "Budgets")
            .with_interface(AgentInterface::a2a("http://127.0.0.1:9003"));

        config.use_interface(&card).unwrap();
        assert_eq!(config.rpc_endpoint, "http://127.0.0.1:9003/a2a/v1/");

        let bare = AgentCard::new("Other", "No protocol");
        assert!(config.use_interface(&bare).is_err());
        assert_eq!(config.rpc_endpoint, "http://127.0.0.1:9003/a2a/v1/");
    }
}
