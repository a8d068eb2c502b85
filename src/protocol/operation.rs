//! A2A protocol operations

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{error::A2AError, message::Message};

/// Path of the agent card, relative to an agent's base URL
pub const AGENT_CARD_PATH: &str = "/.well-known/agent.json";

/// Default path of the JSON-RPC endpoint, relative to an agent's base URL
pub const RPC_PATH: &str = "/a2a/v1/";

pub const METHOD_SEND_MESSAGE: &str = "message/send";
pub const METHOD_GET_TASK: &str = "tasks/get";
pub const METHOD_CANCEL_TASK: &str = "tasks/cancel";

/// A2A protocol operations
///
/// Every operation except discovery is carried as a JSON-RPC 2.0 call to the
/// agent's `a2a` interface. Discovery is a plain `GET` of the agent card.
#[derive(Debug, Clone, PartialEq)]
pub enum A2AOperation {
    /// Send a message to an agent, creating or continuing a task
    ///
    /// The message's own `taskId` and `contextId` select the task and
    /// conversation to continue.
    SendMessage {
        /// The message to send
        message: Message,

        /// Optional request metadata
        metadata: Option<Value>,
    },

    /// Get a task by ID
    GetTask {
        /// The task ID to retrieve
        task_id: String,
    },

    /// Cancel a task
    CancelTask {
        /// The task ID to cancel
        task_id: String,
    },

    /// Discover agent capabilities (fetch Agent Card)
    DiscoverAgent,
}

/// Parameters of `message/send`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendMessageParams {
    pub message: Message,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Parameters of `tasks/get` and `tasks/cancel`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskIdParams {
    pub id: String,
}

impl A2AOperation {
    /// Send a message without metadata
    pub fn send(message: Message) -> Self {
        A2AOperation::SendMessage {
            message,
            metadata: None,
        }
    }

    /// JSON-RPC method name, `None` for discovery
    pub fn rpc_method(&self) -> Option<&'static str> {
        match self {
            A2AOperation::SendMessage { .. } => Some(METHOD_SEND_MESSAGE),
            A2AOperation::GetTask { .. } => Some(METHOD_GET_TASK),
            A2AOperation::CancelTask { .. } => Some(METHOD_CANCEL_TASK),
            A2AOperation::DiscoverAgent => None,
        }
    }

    /// Get the HTTP method for this operation
    pub fn http_method(&self) -> &'static str {
        match self {
            A2AOperation::DiscoverAgent => "GET",
            _ => "POST",
        }
    }

    /// Get the HTTP endpoint for this operation
    ///
    /// `rpc_endpoint` is the path (or absolute URL) of the agent's JSON-RPC
    /// interface.
    pub fn endpoint(&self, rpc_endpoint: &str) -> String {
        match self {
            A2AOperation::DiscoverAgent => AGENT_CARD_PATH.to_string(),
            _ => rpc_endpoint.to_string(),
        }
    }

    /// JSON-RPC params object for this operation
    pub fn params(&self) -> Result<Value, A2AError> {
        let params = match self {
            A2AOperation::SendMessage { message, metadata } => {
                serde_json::to_value(SendMessageParams {
                    message: message.clone(),
                    metadata: metadata.clone(),
                })?
            }
            A2AOperation::GetTask { task_id } | A2AOperation::CancelTask { task_id } => {
                serde_json::to_value(TaskIdParams {
                    id: task_id.clone(),
                })?
            }
            A2AOperation::DiscoverAgent => Value::Null,
        };
        Ok(params)
    }

    /// Decode a JSON-RPC call into an operation
    ///
    /// # Errors
    ///
    /// `MethodNotFound` for methods other than `message/send`, `tasks/get` and
    /// `tasks/cancel`; `InvalidParams` when the params do not match the method.
    pub fn from_rpc(method: &str, params: Value) -> Result<Self, A2AError> {
        match method {
            METHOD_SEND_MESSAGE => {
                let params: SendMessageParams = serde_json::from_value(params)
                    .map_err(|e| A2AError::InvalidParams(e.to_string()))?;
                Ok(A2AOperation::SendMessage {
                    message: params.message,
                    metadata: params.metadata,
                })
            }
            METHOD_GET_TASK | METHOD_CANCEL_TASK => {
                let TaskIdParams { id } = serde_json::from_value(params)
                    .map_err(|e| A2AError::InvalidParams(e.to_string()))?;
                if method == METHOD_GET_TASK {
                    Ok(A2AOperation::GetTask { task_id: id })
                } else {
                    Ok(A2AOperation::CancelTask { task_id: id })
                }
            }
            other => Err(A2AError::MethodNotFound {
                method: other.to_string(),
            }),
        }
    }
}
