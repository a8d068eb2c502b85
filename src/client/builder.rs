//! Client builder for constructing A2A clients with composable layers

use std::{sync::Arc, time::Duration};

use tower::{util::BoxCloneService, Layer};
use url::Url;

use crate::{
    client::{AgentClient, ClientConfig},
    codec::{Codec, JsonRpcCodec},
    layer::A2AValidationLayer,
    protocol::A2AError,
    service::{A2AProtocolService, A2ARequest, A2AResponse},
    transport::{HttpTransport, Transport},
};

/// Type-erased client service stack
pub type BoxA2AService = BoxCloneService<A2ARequest, A2AResponse, A2AError>;

/// Builder for constructing A2A clients
///
/// The builder assembles the transport, the JSON-RPC codec and, unless
/// disabled, the validation layer into one boxed service.
///
/// # Example
///
/// ```rust,no_run
/// use a2a_mesh::prelude::*;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let url = "http://localhost:8004".parse().unwrap();
/// let mut client = A2AClientBuilder::new_http(url)
///     .with_timeout(Duration::from_secs(10))
///     .with_discovery_timeout(Duration::from_secs(5))
///     .build()?;
///
/// let agent_card = client.discover().await?;
/// println!("Connected to: {}", agent_card.name());
/// # Ok(())
/// # }
/// ```
pub struct A2AClientBuilder<T: Transport> {
    transport: Option<T>,
    codec: Option<Arc<dyn Codec>>,
    config: ClientConfig,
}

impl<T: Transport> A2AClientBuilder<T> {
    /// Create a builder for the agent at `agent_url`; a transport must be supplied
    pub fn new(agent_url: Url) -> Self {
        Self {
            config: ClientConfig::new(agent_url),
            transport: None,
            codec: None,
        }
    }

    /// Use a custom transport
    pub fn with_transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom codec
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Set the timeout for JSON-RPC calls
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_send_timeout(timeout);
        self
    }

    /// Set the timeout for agent card discovery
    pub fn with_discovery_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_discovery_timeout(timeout);
        self
    }

    /// Set the JSON-RPC endpoint (path or absolute URL)
    pub fn with_rpc_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config = self.config.with_rpc_endpoint(endpoint);
        self
    }

    /// Enable or disable request and response validation (default: true)
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.config = self.config.with_validation(enabled);
        self
    }

    /// Build the A2A client
    ///
    /// # Errors
    ///
    /// Returns an error if no transport has been configured
    pub fn build(self) -> Result<AgentClient<BoxA2AService>, A2AError> {
        let transport = self.transport.ok_or_else(|| {
            A2AError::Protocol(
                "Transport not configured. Use new_http() or with_transport()".into(),
            )
        })?;

        let codec = self.codec.unwrap_or_else(|| Arc::new(JsonRpcCodec));
        let service = A2AProtocolService::new(transport, codec);

        let service = if self.config.validate_responses {
            BoxCloneService::new(A2AValidationLayer::new().layer(service))
        } else {
            BoxCloneService::new(service)
        };

        tracing::trace!(agent = %self.config.agent_url, "built agent client");
        Ok(AgentClient::new(service, self.config))
    }
}

impl A2AClientBuilder<HttpTransport> {
    /// Create a new client builder with HTTP transport
    ///
    /// # Arguments
    ///
    /// * `agent_url` - The base URL of the agent (e.g., "<http://localhost:8001>")
    pub fn new_http(agent_url: Url) -> Self {
        let transport = HttpTransport::new(agent_url.clone());
        Self::new(agent_url).with_transport(transport)
    }

    /// Create a new HTTP client builder sharing an existing reqwest client
    pub fn with_http_client(agent_url: Url, client: reqwest::Client) -> Self {
        let transport = HttpTransport::with_client(agent_url.clone(), client);
        Self::new(agent_url).with_transport(transport)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use crate::{
        protocol::{Message, Task},
        transport::{mock::MockTransport, TransportResponse},
    };

    use super::*;

    fn agent_url() -> Url {
        "http://localhost:8001".parse().unwrap()
    }

    #[test]
    fn test_builder_with_http() {
        let client = A2AClientBuilder::new_http(agent_url()).build().unwrap();
        assert_eq!(client.config().rpc_endpoint, "/a2a/v1/");
        assert_eq!(client.config().send_timeout, Duration::from_secs(10));
        assert_eq!(client.config().discovery_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_builder_without_transport() {
        let result = A2AClientBuilder::<MockTransport>::new(agent_url()).build();
        assert!(matches!(result, Err(A2AError::Protocol(_))));
    }

    #[test]
    fn test_builder_all_options() {
        let client = A2AClientBuilder::new_http(agent_url())
            .with_timeout(Duration::from_secs(45))
            .with_discovery_timeout(Duration::from_secs(2))
            .with_rpc_endpoint("/a2a/v1")
            .with_validation(false)
            .build()
            .unwrap();

        assert_eq!(client.config().send_timeout, Duration::from_secs(45));
        assert_eq!(client.config().rpc_endpoint, "/a2a/v1");
        assert!(!client.config().validate_responses);
    }

    #[tokio::test]
    async fn test_validation_layer_is_applied() {
        let transport = MockTransport::new(|_req| {
            let mut task = Task::new("t", "c", Message::user("x"));
            task.history.clear();
            let body = serde_json::json!({"jsonrpc": "2.0", "id": "1", "result": task});
            TransportResponse::new(200).body(Bytes::from(serde_json::to_vec(&body).unwrap()))
        });

        let mut validated = A2AClientBuilder::new(agent_url())
            .with_transport(transport.clone())
            .build()
            .unwrap();
        let result = validated.get_task("t").await;
        assert!(matches!(result, Err(A2AError::Validation(_))));

        let mut unvalidated = A2AClientBuilder::new(agent_url())
            .with_transport(transport)
            .with_validation(false)
            .build()
            .unwrap();
        assert!(unvalidated.get_task("t").await.is_ok());
    }
}
