//! Protocol checks around every client call
//!
//! Outgoing requests must carry content and task ids. Answers must be
//! well-formed tasks, and a `tasks/get` or `tasks/cancel` answer must be the
//! task that was asked for.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower_layer::Layer;
use tower_service::Service;
use tracing::warn;

use crate::{
    protocol::{error::A2AError, message::MessagePart, operation::A2AOperation, TaskState},
    service::{A2ARequest, A2AResponse},
};

/// Layer that wraps a client stack in [`A2AValidationService`]
#[derive(Clone, Debug, Default)]
pub struct A2AValidationLayer;

impl A2AValidationLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for A2AValidationLayer {
    type Service = A2AValidationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        A2AValidationService { inner }
    }
}

#[derive(Clone)]
pub struct A2AValidationService<S> {
    inner: S,
}

fn invalid(reason: impl Into<String>) -> A2AError {
    A2AError::Validation(reason.into())
}

/// What the answer to a request has to satisfy beyond being a task
#[derive(Debug, Clone, PartialEq)]
enum Expectation {
    AnyTask,
    Card,
    TaskWithId(String),
    CancelledTask(String),
}

impl Expectation {
    fn of(operation: &A2AOperation) -> Self {
        match operation {
            A2AOperation::SendMessage { .. } => Expectation::AnyTask,
            A2AOperation::DiscoverAgent => Expectation::Card,
            A2AOperation::GetTask { task_id } => Expectation::TaskWithId(task_id.clone()),
            A2AOperation::CancelTask { task_id } => Expectation::CancelledTask(task_id.clone()),
        }
    }
}

impl<S> A2AValidationService<S> {
    fn validate_request(req: &A2ARequest) -> Result<(), A2AError> {
        if req.context.agent_url.is_empty() {
            return Err(invalid("Agent URL cannot be empty"));
        }

        match &req.operation {
            A2AOperation::SendMessage { message, .. } => {
                if message.parts.is_empty() {
                    return Err(invalid("Message must have at least one part"));
                }
                for part in &message.parts {
                    match part {
                        MessagePart::File { file } if file.uri.is_none() && file.bytes.is_none() => {
                            return Err(invalid("File must have either URI or bytes content"));
                        }
                        _ => {}
                    }
                }
                if message.task_id.as_deref() == Some("") {
                    return Err(invalid("Message taskId cannot be empty when present"));
                }
            }
            A2AOperation::GetTask { task_id } | A2AOperation::CancelTask { task_id } => {
                if task_id.is_empty() {
                    return Err(invalid("Task ID cannot be empty"));
                }
            }
            A2AOperation::DiscoverAgent => {}
        }

        Ok(())
    }

    fn validate_response(expected: &Expectation, resp: &A2AResponse) -> Result<(), A2AError> {
        let task = match (expected, resp) {
            (Expectation::Card, A2AResponse::AgentCard(card)) => {
                if card.name().is_empty() {
                    return Err(invalid("Agent name cannot be empty"));
                }
                return Ok(());
            }
            (Expectation::Card, A2AResponse::Task(_)) => {
                return Err(invalid("Discovery answered with a task"));
            }
            (_, A2AResponse::AgentCard(_)) => {
                return Err(invalid("JSON-RPC call answered with an agent card"));
            }
            (_, A2AResponse::Task(task)) => task,
        };

        if task.id.is_empty() {
            return Err(invalid("Task ID cannot be empty"));
        }
        if task.context_id.is_empty() {
            return Err(invalid("Task context ID cannot be empty"));
        }
        if task.history.is_empty() {
            return Err(invalid("Task history must contain the request message"));
        }

        match expected {
            Expectation::TaskWithId(id) | Expectation::CancelledTask(id) if &task.id != id => {
                Err(invalid(format!("Asked for task {}, received {}", id, task.id)))
            }
            Expectation::CancelledTask(_) if task.status.state != TaskState::Cancelled => {
                warn!(task_id = %task.id, state = ?task.status.state, "cancel was not applied");
                Err(invalid(format!(
                    "Task {} is {:?} after cancel",
                    task.id, task.status.state
                )))
            }
            _ => Ok(()),
        }
    }
}

impl<S> Service<A2ARequest> for A2AValidationService<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = A2AResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        if let Err(e) = Self::validate_request(&req) {
            return Box::pin(async move { Err(e) });
        }

        let expected = Expectation::of(&req.operation);
        let mut inner = self.inner.clone();
        Box::pin(async move {
            let response = inner.call(req).await?;
            Self::validate_response(&expected, &response)?;
            Ok(response)
        })
    }
}
