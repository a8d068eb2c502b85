//! Error types for A2A protocol operations

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Main error type for A2A protocol operations
#[derive(Debug, Error)]
pub enum A2AError {
    /// Transport-level error (network, connection, etc.)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Protocol-level error (unexpected response shape, unsupported operation, etc.)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Validation error (invalid request or response)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request timeout error
    #[error("Request timeout")]
    Timeout,

    /// Request body was not valid JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// Request was JSON but not a valid JSON-RPC 2.0 envelope
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// JSON-RPC method is not served
    #[error("Method not found: {method}")]
    MethodNotFound { method: String },

    /// Method parameters are missing or malformed
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Task not found error
    #[error("Task not found: {task_id}")]
    TaskNotFound { task_id: String },

    /// Error object returned by a remote JSON-RPC endpoint
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// A responder failed to produce a reply
    #[error("Responder error: {0}")]
    Responder(String),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

impl A2AError {
    /// JSON-RPC error code for this error
    pub fn rpc_code(&self) -> JsonRpcErrorCode {
        match self {
            A2AError::Parse(_) => JsonRpcErrorCode::ParseError,
            A2AError::InvalidRequest(_) => JsonRpcErrorCode::InvalidRequest,
            A2AError::MethodNotFound { .. } => JsonRpcErrorCode::MethodNotFound,
            A2AError::InvalidParams(_) | A2AError::TaskNotFound { .. } => {
                JsonRpcErrorCode::InvalidParams
            }
            A2AError::Rpc { code, .. } => {
                JsonRpcErrorCode::from_code(*code).unwrap_or(JsonRpcErrorCode::InternalError)
            }
            _ => JsonRpcErrorCode::InternalError,
        }
    }

    /// Convert into the JSON-RPC error object sent on the wire
    ///
    /// Remote errors keep their original code and message.
    pub fn to_rpc_error(&self) -> JsonRpcError {
        match self {
            A2AError::Rpc { code, message } => JsonRpcError::new(*code, message.clone()),
            A2AError::TaskNotFound { .. } => JsonRpcError::new(
                JsonRpcErrorCode::InvalidParams.code(),
                "Task not found",
            )
            .with_data(Value::String(self.to_string())),
            other => JsonRpcError::new(other.rpc_code().code(), other.to_string()),
        }
    }

    /// Whether the error is a JSON-RPC "task not found" reply
    pub fn is_task_not_found(&self) -> bool {
        match self {
            A2AError::TaskNotFound { .. } => true,
            A2AError::Rpc { code, message } => {
                *code == JsonRpcErrorCode::InvalidParams.code() && message.contains("Task not found")
            }
            _ => false,
        }
    }
}

/// Standard JSON-RPC 2.0 error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonRpcErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
}

impl JsonRpcErrorCode {
    /// Numeric code
    pub fn code(self) -> i64 {
        match self {
            JsonRpcErrorCode::ParseError => -32700,
            JsonRpcErrorCode::InvalidRequest => -32600,
            JsonRpcErrorCode::MethodNotFound => -32601,
            JsonRpcErrorCode::InvalidParams => -32602,
            JsonRpcErrorCode::InternalError => -32603,
        }
    }

    /// Look up a standard code
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -32700 => Some(JsonRpcErrorCode::ParseError),
            -32600 => Some(JsonRpcErrorCode::InvalidRequest),
            -32601 => Some(JsonRpcErrorCode::MethodNotFound),
            -32602 => Some(JsonRpcErrorCode::InvalidParams),
            -32603 => Some(JsonRpcErrorCode::InternalError),
            _ => None,
        }
    }
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code
    pub code: i64,

    /// Human-readable error message
    pub message: String,

    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Create a new error object
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach details to the error object
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl From<JsonRpcError> for A2AError {
    fn from(err: JsonRpcError) -> Self {
        A2AError::Rpc {
            code: err.code,
            message: err.message,
        }
    }
}

impl From<reqwest::Error> for A2AError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            A2AError::Timeout
        } else if err.is_connect() {
            A2AError::Transport(format!("Connection error: {}", err))
        } else {
            A2AError::Transport(err.to_string())
        }
    }
}

impl From<&str> for A2AError {
    fn from(s: &str) -> Self {
        A2AError::Other(s.to_string())
    }
}

impl From<String> for A2AError {
    fn from(s: String) -> Self {
        A2AError::Other(s)
    }
}
