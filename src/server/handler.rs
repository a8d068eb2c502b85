//! JSON-RPC method dispatch for an agent
//!
//! Dispatches:
//! - `message/send` → create or continue a task and drive it to a reply
//! - `tasks/get`    → look up a task by ID
//! - `tasks/cancel` → mark a task cancelled

use std::{panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::{
    codec::{JsonRpcRequest, JsonRpcResponse},
    protocol::{A2AError, A2AOperation, Message, Task, TaskState},
    responder::{Responder, ResponderContext},
    server::store::TaskStore,
};

/// Executes A2A operations against one agent's task store
#[derive(Clone)]
pub struct A2AHandler {
    store: TaskStore,
    responder: Arc<dyn Responder>,
}

impl A2AHandler {
    pub fn new(store: TaskStore, responder: Arc<dyn Responder>) -> Self {
        Self { store, responder }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Answer a decoded JSON-RPC call, echoing its id
    ///
    /// Every failure ends up as an error object in the reply.
    pub async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!(method = %request.method, "dispatching JSON-RPC call");
        let id = request.id;

        match self.execute(&request.method, request.params).await {
            Ok(task) => match serde_json::to_value(&task) {
                Ok(result) => JsonRpcResponse::success(id, result),
                Err(e) => JsonRpcResponse::failure(id, &A2AError::Serialization(e)),
            },
            Err(e) => {
                debug!(error = %e, "JSON-RPC call failed");
                JsonRpcResponse::failure(id, &e)
            }
        }
    }

    /// Execute one JSON-RPC method
    pub async fn execute(&self, method: &str, params: Value) -> Result<Task, A2AError> {
        match A2AOperation::from_rpc(method, params)? {
            A2AOperation::SendMessage { message, .. } => self.send_message(message).await,
            A2AOperation::GetTask { task_id } => {
                let task = self.store.get_task(&task_id).await;
                task.ok_or(A2AError::TaskNotFound { task_id })
            }
            A2AOperation::CancelTask { task_id } => {
                let task = self
                    .store
                    .update_status(&task_id, TaskState::Cancelled, None)
                    .await?;
                info!(task_id = %task.id, "task cancelled");
                Ok(task)
            }
            A2AOperation::DiscoverAgent => Err(A2AError::MethodNotFound {
                method: method.to_string(),
            }),
        }
    }

    /// Create or continue a task and drive it through `working` to a reply
    ///
    /// A `taskId` that names no known task starts a new task instead of
    /// failing.
    pub async fn send_message(&self, message: Message) -> Result<Task, A2AError> {
        let message = message.stamped();
        let text = message.text();

        let existing = match message.task_id.clone() {
            Some(task_id) => match self.store.append_message(&task_id, message.clone()).await {
                Ok(task) => Some(task),
                Err(_) => {
                    debug!(task_id = %task_id, "unknown taskId, starting a new task");
                    None
                }
            },
            None => None,
        };

        let (task, resuming) = match existing {
            Some(task) => {
                let resuming = task.requires_input();
                (task, resuming)
            }
            None => {
                let context_id = message.context_id.clone();
                (self.store.create_task(message, context_id).await, false)
            }
        };

        let task = self.store.begin_work(&task.id).await?;
        if task.status.state == TaskState::Cancelled {
            debug!(task_id = %task.id, "task cancelled before work started");
            return Ok(task);
        }

        let context = ResponderContext {
            task_id: task.id.clone(),
            context_id: task.context_id.clone(),
            history: task.history.clone(),
            resuming,
        };

        let outcome = AssertUnwindSafe(self.responder.respond(&text, &context))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(A2AError::Responder("responder panicked".into())));

        match outcome {
            Ok(reply) => {
                let reply_message = Message::agent(reply.text())
                    .with_task_id(task.id.clone())
                    .with_context_id(task.context_id.clone())
                    .stamped();
                let task = self
                    .store
                    .settle(&task.id, reply.state(), Some(reply_message))
                    .await?;
                info!(task_id = %task.id, state = ?task.status.state, "task answered");
                Ok(task)
            }
            Err(e) => {
                error!(task_id = %task.id, error = %e, "responder failed");
                let reason = match e {
                    A2AError::Responder(reason) => reason,
                    other => other.to_string(),
                };
                let failure = Message::agent(format!("Error: {}", reason))
                    .with_task_id(task.id.clone())
                    .with_context_id(task.context_id.clone())
                    .stamped();
                if let Err(update) = self
                    .store
                    .settle(&task.id, TaskState::Failed, Some(failure))
                    .await
                {
                    warn!(error = %update, "could not record task failure");
                }
                Err(A2AError::Responder(reason))
            }
        }
    }
}
