use std::{
    sync::{Arc, Mutex},
    task::{Context, Poll},
};

use async_trait::async_trait;
use url::Url;

use crate::{
    protocol::error::A2AError,
    transport::{Transport, TransportRequest, TransportResponse},
};

type Handler = dyn Fn(TransportRequest) -> TransportResponse + Send + Sync;

/// In-process stand-in for a remote agent
///
/// Answers with `handler` and keeps every request it saw, in order.
#[derive(Clone)]
pub(crate) struct MockTransport {
    handler: Arc<Handler>,
    seen: Arc<Mutex<Vec<TransportRequest>>>,
    base_url: Url,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(TransportRequest) -> TransportResponse + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            seen: Arc::default(),
            base_url: Url::parse("http://mock.agent").unwrap(),
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), A2AError>> {
        Poll::Ready(Ok(()))
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError> {
        self.seen.lock().unwrap().push(request.clone());
        Ok((self.handler)(request))
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("base_url", &self.base_url)
            .field("requests", &self.seen.lock().map(|seen| seen.len()).unwrap_or(0))
            .finish()
    }
}
