//! High-level A2A agent client

use std::time::Duration;

use tower::ServiceExt;
use tower_service::Service;
use tracing::debug;

use crate::{
    client::config::ClientConfig,
    protocol::{A2AError, A2AOperation, AgentCard, Message, Task},
    service::{A2ARequest, A2AResponse},
};

/// High-level A2A client for interacting with agents
///
/// This client wraps a Tower service and provides convenient methods for common A2A operations.
/// The service is generic over any implementation that satisfies the Service trait bounds.
///
/// # Example
///
/// ```rust,no_run
/// use a2a_mesh::prelude::*;
///
/// # async fn example() -> Result<(), A2AError> {
/// let url = "http://localhost:8001".parse().unwrap();
/// let mut client = A2AClientBuilder::new_http(url).build()?;
///
/// let task = client.send_message(Message::user("Hello, agent!")).await?;
/// println!("Task {} is {:?}", task.id, task.status.state);
/// # Ok(())
/// # }
/// ```
pub struct AgentClient<S> {
    service: S,
    config: ClientConfig,
}

impl<S> AgentClient<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError>,
{
    /// Create a new agent client
    ///
    /// # Arguments
    ///
    /// * `service` - The Tower service that handles requests
    /// * `config` - Client configuration
    pub fn new(service: S, config: ClientConfig) -> Self {
        Self { service, config }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Point JSON-RPC calls at the `a2a` interface advertised by `card`
    ///
    /// # Errors
    ///
    /// Returns a protocol error if the card has no `a2a` interface
    pub fn use_interface(&mut self, card: &AgentCard) -> Result<(), A2AError> {
        self.config.use_interface(card)
    }

    async fn execute(&mut self, operation: A2AOperation) -> Result<A2AResponse, A2AError> {
        let request = A2ARequest::for_agent(operation, &self.config);
        debug!(agent = %self.config.agent_url, method = request.label(), "calling agent");
        self.service.ready().await?.call(request).await
    }

    async fn execute_for_task(&mut self, operation: A2AOperation) -> Result<Task, A2AError> {
        self.execute(operation).await?.into_task()
    }

    /// Send a message to the agent and get a task
    ///
    /// A message ID is generated when the message has none. The message's own
    /// `taskId` and `contextId`, if set, select what the agent continues.
    ///
    /// # Errors
    ///
    /// Returns an error if the message fails to send or the response is invalid
    pub async fn send_message(&mut self, message: Message) -> Result<Task, A2AError> {
        let message = if message.message_id.is_none() {
            message.with_fresh_id()
        } else {
            message
        };

        self.execute_for_task(A2AOperation::send(message)).await
    }

    /// Send a follow-up message to an existing task
    ///
    /// This is how a task paused in `input-required` is resumed.
    pub async fn continue_task(&mut self, task: &Task, message: Message) -> Result<Task, A2AError> {
        let message = message
            .with_task_id(task.id.clone())
            .with_context_id(task.context_id.clone());
        self.send_message(message).await
    }

    /// Get a task by ID
    ///
    /// # Errors
    ///
    /// Returns the agent's `-32602 Task not found` error as `A2AError::Rpc`
    /// if the task doesn't exist
    pub async fn get_task(&mut self, task_id: impl Into<String>) -> Result<Task, A2AError> {
        let operation = A2AOperation::GetTask {
            task_id: task_id.into(),
        };
        self.execute_for_task(operation).await
    }

    /// Cancel a task by ID
    ///
    /// # Returns
    ///
    /// The updated task with cancelled status
    pub async fn cancel_task(&mut self, task_id: impl Into<String>) -> Result<Task, A2AError> {
        let operation = A2AOperation::CancelTask {
            task_id: task_id.into(),
        };
        self.execute_for_task(operation).await
    }

    /// Discover agent capabilities by fetching the Agent Card
    ///
    /// This retrieves the agent's metadata from `/.well-known/agent.json`
    pub async fn discover(&mut self) -> Result<AgentCard, A2AError> {
        self.execute(A2AOperation::DiscoverAgent)
            .await?
            .into_agent_card()
    }

    /// Poll a task until it reaches a terminal state or asks for input
    ///
    /// # Arguments
    ///
    /// * `task_id` - The task ID to poll
    /// * `poll_interval_ms` - How often to poll (in milliseconds)
    /// * `max_attempts` - Maximum number of polling attempts (0 = unlimited)
    pub async fn poll_until_complete(
        &mut self,
        task_id: impl Into<String>,
        poll_interval_ms: u64,
        max_attempts: usize,
    ) -> Result<Task, A2AError> {
        let task_id = task_id.into();
        let mut attempts = 0;

        loop {
            let task = self.get_task(task_id.clone()).await?;

            if task.is_terminal() || task.requires_input() {
                return Ok(task);
            }

            attempts += 1;
            if max_attempts > 0 && attempts >= max_attempts {
                return Err(A2AError::Timeout);
            }

            tokio::time::sleep(Duration::from_millis(poll_interval_ms)).await;
        }
    }
}
