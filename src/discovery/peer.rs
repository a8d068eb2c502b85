//! Agent-to-agent calls through the registry

use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    client::{A2AClientBuilder, AgentClient, BoxA2AService},
    protocol::{A2AError, Message, Task},
};

use super::AgentRegistry;

/// Reply text used when a task carries no agent message
pub const NO_RESPONSE: &str = "No response received";

/// Failure talking to a peer agent
///
/// Peer failures are data: callers turn them into reply text instead of
/// failing their own task.
#[derive(Debug, Error)]
pub enum PeerError {
    /// Name not registered, or its agent card could not be fetched
    #[error("Discovery failed for {agent}: {reason}")]
    DiscoveryFailed { agent: String, reason: String },

    /// The agent card lists no `a2a` interface
    #[error("{agent} does not support the A2A protocol")]
    UnsupportedProtocol { agent: String },

    /// The peer answered with a JSON-RPC error
    #[error("{agent} returned an error: {message}")]
    RemoteError { agent: String, message: String },

    /// Timeout or connection failure while sending
    #[error("Connection to {agent} failed: {reason}")]
    ConnectionFailed { agent: String, reason: String },

    /// The peer's reply could not be understood
    #[error("Invalid response from {agent}: {reason}")]
    InvalidResponse { agent: String, reason: String },
}

/// Sends messages to other agents by name
#[derive(Debug, Clone)]
pub struct PeerClient {
    registry: AgentRegistry,
    http: reqwest::Client,
    discovery_timeout: Duration,
    send_timeout: Duration,
}

impl PeerClient {
    pub fn new(registry: AgentRegistry) -> Self {
        Self {
            registry,
            http: reqwest::Client::new(),
            discovery_timeout: Duration::from_secs(5),
            send_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self
    }

    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Resolve `agent` and point a client at its `a2a` interface
    async fn connect(&self, agent: &str) -> Result<AgentClient<BoxA2AService>, PeerError> {
        let url = self
            .registry
            .discover(agent)
            .await
            .ok_or_else(|| PeerError::DiscoveryFailed {
                agent: agent.to_string(),
                reason: "not registered".to_string(),
            })?;

        let mut client = A2AClientBuilder::with_http_client(url, self.http.clone())
            .with_timeout(self.send_timeout)
            .with_discovery_timeout(self.discovery_timeout)
            .build()
            .map_err(|e| discovery_failed(agent, e))?;

        let card = client
            .discover()
            .await
            .map_err(|e| discovery_failed(agent, e))?;
        client
            .use_interface(&card)
            .map_err(|_| PeerError::UnsupportedProtocol {
                agent: agent.to_string(),
            })?;
        Ok(client)
    }

    async fn deliver(&self, agent: &str, message: Message) -> Result<Task, PeerError> {
        let mut client = self.connect(agent).await?;
        info!(peer = %agent, task_id = ?message.task_id, "sending message to peer");
        client
            .send_message(message)
            .await
            .map_err(|e| send_failed(agent, e))
    }

    /// Send `text` to the agent registered as `agent`
    ///
    /// Resolves the name, fetches the agent card, then posts `message/send`
    /// to the card's `a2a` interface. Single attempt, no retry.
    pub async fn send_to_peer(
        &self,
        agent: &str,
        text: &str,
        context_id: Option<&str>,
    ) -> Result<Task, PeerError> {
        let mut message = Message::agent(text).with_fresh_id();
        if let Some(context_id) = context_id {
            message = message.with_context_id(context_id);
        }
        self.deliver(agent, message).await
    }

    /// Answer a peer task that paused in `input-required`
    pub async fn continue_peer_task(
        &self,
        agent: &str,
        task_id: &str,
        text: &str,
        context_id: &str,
    ) -> Result<Task, PeerError> {
        let message = Message::agent(text)
            .with_fresh_id()
            .with_task_id(task_id)
            .with_context_id(context_id);
        self.deliver(agent, message).await
    }

    /// Ask a peer and return its reply text
    ///
    /// Failures come back as an `Error: ...` line.
    pub async fn ask(&self, agent: &str, text: &str, context_id: Option<&str>) -> String {
        match self.send_to_peer(agent, text, context_id).await {
            Ok(task) => extract_reply_text(&task),
            Err(e) => {
                warn!(peer = %agent, error = %e, "peer call failed");
                format!("Error: {}", e)
            }
        }
    }
}

fn discovery_failed(agent: &str, error: A2AError) -> PeerError {
    PeerError::DiscoveryFailed {
        agent: agent.to_string(),
        reason: error.to_string(),
    }
}

fn send_failed(agent: &str, error: A2AError) -> PeerError {
    let agent = agent.to_string();
    match error {
        A2AError::Rpc { message, .. } => PeerError::RemoteError { agent, message },
        A2AError::Timeout => PeerError::ConnectionFailed {
            agent,
            reason: "timed out".to_string(),
        },
        A2AError::Transport(reason) => PeerError::ConnectionFailed { agent, reason },
        other => PeerError::InvalidResponse {
            agent,
            reason: other.to_string(),
        },
    }
}

/// Text of the latest agent message in `task`, or [`NO_RESPONSE`]
pub fn extract_reply_text(task: &Task) -> String {
    task.last_agent_text()
        .unwrap_or_else(|| NO_RESPONSE.to_string())
}

#[cfg(test)]
mod tests {
    use url::Url;

    use crate::protocol::TaskState;

    use super::*;

    #[tokio::test]
    async fn test_unregistered_peer_is_discovery_failure() {
        let peers = PeerClient::new(AgentRegistry::new());
        let result = peers.send_to_peer("NobodyAgent", "hi", None).await;
        assert!(matches!(
            result,
            Err(PeerError::DiscoveryFailed { ref agent, .. }) if agent == "NobodyAgent"
        ));
    }

    #[tokio::test]
    async fn test_unreachable_peer_is_discovery_failure() {
        let registry = AgentRegistry::new();
        registry
            .register("GoneAgent", Url::parse("http://127.0.0.1:9").unwrap())
            .await;
        let peers = PeerClient::new(registry).with_discovery_timeout(Duration::from_millis(500));

        let result = peers.send_to_peer("GoneAgent", "hi", None).await;
        assert!(matches!(result, Err(PeerError::DiscoveryFailed { .. })));
    }

    #[tokio::test]
    async fn test_ask_reports_errors_as_text() {
        let peers = PeerClient::new(AgentRegistry::new());
        let reply = peers.ask("WeatherAgent", "forecast?", Some("ctx")).await;
        assert!(reply.starts_with("Error: Discovery failed for WeatherAgent"));
    }

    #[test]
    fn test_send_error_mapping() {
        assert!(matches!(
            send_failed("A", A2AError::Rpc { code: -32601, message: "nope".into() }),
            PeerError::RemoteError { message, .. } if message == "nope"
        ));
        assert!(matches!(
            send_failed("A", A2AError::Timeout),
            PeerError::ConnectionFailed { .. }
        ));
        assert!(matches!(
            send_failed("A", A2AError::Transport("refused".into())),
            PeerError::ConnectionFailed { .. }
        ));
        assert!(matches!(
            send_failed("A", A2AError::Validation("empty history".into())),
            PeerError::InvalidResponse { .. }
        ));
    }

    #[test]
    fn test_extract_reply_text() {
        let mut task = Task::new("t", "c", Message::user("hi"));
        assert_eq!(extract_reply_text(&task), NO_RESPONSE);

        task.transition(TaskState::Completed, Some(Message::agent("first")));
        task.history.push(Message::user("again"));
        task.transition(TaskState::Completed, Some(Message::agent("second")));
        assert_eq!(extract_reply_text(&task), "second");
    }
}
