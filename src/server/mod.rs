//! HTTP surface of an agent
//!
//! Serves:
//! - `GET  /.well-known/agent.json` → agent card
//! - `POST /a2a/v1/` (and `/a2a/v1`) → JSON-RPC 2.0 endpoint
//! - `GET  /health` → liveness

pub mod handler;
pub mod store;

use std::{future::Future, sync::Arc};

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::{
    codec::{JsonRpcCodec, JsonRpcResponse},
    protocol::{
        operation::{AGENT_CARD_PATH, RPC_PATH},
        A2AError, AgentCard, JsonRpcErrorCode,
    },
};

pub use handler::A2AHandler;
pub use store::TaskStore;

#[derive(Clone)]
struct ServerState {
    name: Arc<str>,
    card_json: Bytes,
    handler: A2AHandler,
}

/// One agent's card and handler, ready to be served
pub struct AgentServer {
    card: AgentCard,
    state: ServerState,
}

impl AgentServer {
    /// The card is serialized once, so every discovery returns identical bytes
    pub fn new(card: AgentCard, handler: A2AHandler) -> Result<Self, A2AError> {
        let card_json = Bytes::from(serde_json::to_vec(&card)?);
        let state = ServerState {
            name: Arc::from(card.name()),
            card_json,
            handler,
        };
        Ok(Self { card, state })
    }

    pub fn card(&self) -> &AgentCard {
        &self.card
    }

    pub fn handler(&self) -> &A2AHandler {
        &self.state.handler
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]);

        let rpc_path = RPC_PATH.trim_end_matches('/');
        Router::new()
            .route(AGENT_CARD_PATH, get(agent_card))
            .route(RPC_PATH, post(json_rpc))
            .route(rpc_path, post(json_rpc))
            .route("/health", get(health))
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Serve on `listener` until `shutdown` resolves, then drain in-flight requests
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!(agent = %self.card.name(), %addr, "agent listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!(agent = %self.card.name(), "agent stopped");
        Ok(())
    }
}

/// HTTP status for a JSON-RPC reply
///
/// Success and invalid-params (`Task not found`) answer 200, every other
/// error 400.
pub fn rpc_status(response: &JsonRpcResponse) -> StatusCode {
    match &response.error {
        None => StatusCode::OK,
        Some(error) if error.code == JsonRpcErrorCode::InvalidParams.code() => StatusCode::OK,
        Some(_) => StatusCode::BAD_REQUEST,
    }
}

async fn agent_card(State(state): State<ServerState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.card_json.clone(),
    )
}

async fn json_rpc(State(state): State<ServerState>, body: Bytes) -> Response {
    let response = match JsonRpcCodec.decode_request(&body) {
        Ok(request) => state.handler.dispatch(request).await,
        Err(rejection) => rejection,
    };
    (rpc_status(&response), Json(response)).into_response()
}

async fn health(State(state): State<ServerState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "agent": state.name.as_ref(),
        "protocol": "A2A"
    }))
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{profile::AgentKind, protocol::Task};

    use super::*;

    fn server() -> AgentServer {
        let handler = A2AHandler::new(
            TaskStore::new(),
            Arc::new(AgentKind::Simple.keyword_responder()),
        );
        AgentServer::new(AgentKind::Simple.card("http://127.0.0.1:8000"), handler).unwrap()
    }

    async fn post_rpc(router: Router, path: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_card_endpoint() {
        let router = server().router();
        let request = Request::builder()
            .uri("/.well-known/agent.json")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let card: AgentCard = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(card.name(), "SimpleA2AAgent");
    }

    #[tokio::test]
    async fn test_send_on_both_paths() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": "1",
            "method": "message/send",
            "params": {"message": {"role": "user", "parts": [{"kind": "text", "text": "hello"}], "messageId": "m1"}}
        })
        .to_string();

        for path in ["/a2a/v1/", "/a2a/v1"] {
            let (status, reply) = post_rpc(server().router(), path, &body).await;
            assert_eq!(status, StatusCode::OK);
            let task: Task = serde_json::from_value(reply["result"].clone()).unwrap();
            assert!(task.history[1].text().starts_with("Hello"));
        }
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let (status, reply) = post_rpc(server().router(), "/a2a/v1/", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply["error"]["code"], -32700);

        let (status, reply) = post_rpc(
            server().router(),
            "/a2a/v1/",
            r#"{"jsonrpc":"1.0","id":"7","method":"tasks/get","params":{"id":"x"}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply["error"]["code"], -32600);
        assert_eq!(reply["id"], "7");

        let (status, reply) = post_rpc(
            server().router(),
            "/a2a/v1/",
            r#"{"jsonrpc":"2.0","id":"8","method":"tasks/get","params":{"id":"missing"}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["error"]["code"], -32602);
        assert_eq!(reply["error"]["message"], "Task not found");
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = server().router().oneshot(request).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            health,
            json!({"status": "ok", "agent": "SimpleA2AAgent", "protocol": "A2A"})
        );
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/a2a/v1/")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap();
        let response = server().router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }
}
