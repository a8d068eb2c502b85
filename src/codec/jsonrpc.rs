//! JSON-RPC 2.0 codec for A2A protocol
//!
//! The client side wraps operations in JSON-RPC 2.0 envelopes and unwraps the
//! replies. The server side uses the same envelope types to decode incoming
//! calls and to build replies that echo the caller's `id`.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    codec::Codec,
    protocol::{
        agent::AgentCard,
        error::{A2AError, JsonRpcError},
        operation::A2AOperation,
        task::Task,
    },
    service::response::A2AResponse,
};

pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,

    /// Request identifier, echoed in the reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    pub method: String,

    #[serde(default)]
    pub params: Value,
}

impl JsonRpcRequest {
    /// Create a request with a fresh time-ordered id
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(Value::String(Uuid::now_v7().to_string())),
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Successful reply
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Error reply
    pub fn failure(id: Option<Value>, error: &A2AError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error.to_rpc_error()),
        }
    }

    /// Whether the reply carries an error object
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// JSON-RPC 2.0 codec that wraps A2A operations
#[derive(Debug, Clone, Default)]
pub struct JsonRpcCodec;

impl JsonRpcCodec {
    /// Create a new JSON-RPC codec
    pub fn new() -> Self {
        Self
    }

    /// Decode an incoming call
    ///
    /// On failure the returned error reply is ready to send: `-32700` when
    /// the body is not JSON, `-32600` when it is not a JSON-RPC 2.0 request.
    /// The caller's `id` is echoed whenever it could be read.
    pub fn decode_request(&self, body: &[u8]) -> Result<JsonRpcRequest, JsonRpcResponse> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| JsonRpcResponse::failure(None, &A2AError::Parse(e.to_string())))?;

        let id = value.get("id").cloned().filter(|id| !id.is_null());

        if value.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return Err(JsonRpcResponse::failure(
                id,
                &A2AError::InvalidRequest("Invalid JSON-RPC version".to_string()),
            ));
        }

        serde_json::from_value(value)
            .map_err(|e| JsonRpcResponse::failure(id, &A2AError::InvalidRequest(e.to_string())))
    }
}

impl Codec for JsonRpcCodec {
    fn encode_request(&self, operation: &A2AOperation) -> Result<Bytes, A2AError> {
        let Some(method) = operation.rpc_method() else {
            return Ok(Bytes::new());
        };

        let request = JsonRpcRequest::new(method, operation.params()?);
        let bytes = serde_json::to_vec(&request)?;
        Ok(Bytes::from(bytes))
    }

    fn decode_response(
        &self,
        body: &[u8],
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError> {
        if let A2AOperation::DiscoverAgent = operation {
            let card: AgentCard = serde_json::from_slice(body)
                .map_err(|e| A2AError::Protocol(format!("Invalid agent card: {}", e)))?;
            return Ok(A2AResponse::AgentCard(Box::new(card)));
        }

        if body.is_empty() {
            return Err(A2AError::Protocol("Empty JSON-RPC response body".to_string()));
        }

        let jsonrpc_response: JsonRpcResponse = serde_json::from_slice(body)
            .map_err(|e| A2AError::Protocol(format!("Failed to parse JSON-RPC response: {}", e)))?;

        if let Some(error) = jsonrpc_response.error {
            return Err(error.into());
        }

        let result = jsonrpc_response.result.ok_or_else(|| {
            A2AError::Protocol("JSON-RPC response missing 'result' field".to_string())
        })?;

        let task: Task = serde_json::from_value(result)
            .map_err(|e| A2AError::Protocol(format!("Invalid task in result: {}", e)))?;
        Ok(A2AResponse::Task(Box::new(task)))
    }

    fn content_type(&self) -> &str {
        "application/json"
    }
}
