//! HTTP transport implementation for A2A protocol

use std::task::{Context, Poll};

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::protocol::error::A2AError;

use super::{Transport, TransportRequest, TransportResponse};

/// HTTP transport implementation using reqwest
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a new HTTP transport
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the agent (e.g., "<http://localhost:8001>")
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create a new HTTP transport with a custom reqwest client
    pub fn with_client(base_url: Url, client: reqwest::Client) -> Self {
        Self { client, base_url }
    }

    /// Resolve an endpoint against the base URL
    ///
    /// Absolute endpoints (such as an interface URL taken from an agent card)
    /// replace the base URL entirely.
    fn resolve(&self, endpoint: &str) -> Result<Url, A2AError> {
        self.base_url
            .join(endpoint)
            .map_err(|e| A2AError::Transport(format!("Invalid endpoint {}: {}", endpoint, e)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), A2AError>> {
        // HTTP client is always ready
        Poll::Ready(Ok(()))
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError> {
        let url = self.resolve(&request.endpoint)?;
        debug!(method = %request.method, %url, "sending request");

        let mut req_builder = match request.method.as_str() {
            "POST" => self.client.post(url),
            "GET" => self.client.get(url),
            _ => {
                return Err(A2AError::Transport(format!(
                    "Unsupported HTTP method: {}",
                    request.method
                )))
            }
        };

        for (key, value) in request.headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(timeout) = request.timeout {
            req_builder = req_builder.timeout(timeout);
        }

        if !request.body.is_empty() {
            req_builder = req_builder.body(request.body);
        }

        let response = req_builder.send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body = response.bytes().await?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_transport_creation() {
        let transport = HttpTransport::new(Url::parse("http://localhost:8001").unwrap());
        assert_eq!(transport.base_url().as_str(), "http://localhost:8001/");
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let transport = HttpTransport::new(Url::parse("http://localhost:8001").unwrap());

        let url = transport.resolve("/.well-known/agent.json").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8001/.well-known/agent.json");

        let url = transport.resolve("http://127.0.0.1:9000/a2a/v1/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/a2a/v1/");
    }

    #[tokio::test]
    async fn test_unreachable_peer_is_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let transport = HttpTransport::new(Url::parse("http://127.0.0.1:9").unwrap());
        let result = transport
            .execute(TransportRequest::new("/.well-known/agent.json", "GET"))
            .await;
        assert!(matches!(
            result,
            Err(A2AError::Transport(_)) | Err(A2AError::Timeout)
        ));
    }
}
