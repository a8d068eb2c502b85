//! Wire-format compliance tests
//!
//! These tests pin the JSON shapes agents exchange: camelCase fields,
//! `kind`-tagged parts, kebab-case task states and the agent card layout.

use serde_json::json;

use a2a_mesh::{
    codec::{JsonRpcCodec, JsonRpcRequest, JsonRpcResponse},
    profile::AgentKind,
    protocol::{
        A2AError, A2AOperation, AgentCard, Artifact, Message, MessagePart, Role, Task, TaskState,
    },
    server::TaskStore,
};

#[test]
fn test_role_serialization() {
    let json = serde_json::to_value(Message::user("Hello")).unwrap();
    assert_eq!(json["role"], "user");

    let json = serde_json::to_value(Message::agent("Hi there")).unwrap();
    assert_eq!(json["role"], "agent");
}

#[test]
fn test_text_part_is_kind_tagged() {
    let json = serde_json::to_value(MessagePart::text("Hello, world!")).unwrap();
    assert_eq!(json, json!({"kind": "text", "text": "Hello, world!"}));
}

#[test]
fn test_message_field_naming() {
    let msg = Message::user("Test")
        .with_message_id("msg-1")
        .with_task_id("task-1")
        .with_context_id("ctx-1");
    let json = serde_json::to_value(&msg).unwrap();

    assert_eq!(json["messageId"], "msg-1");
    assert_eq!(json["taskId"], "task-1");
    assert_eq!(json["contextId"], "ctx-1");
    assert!(json.get("message_id").is_none());
    assert!(json.get("context_id").is_none());
}

#[test]
fn test_optional_fields_omitted() {
    let json = serde_json::to_value(Message::user("Test")).unwrap();

    assert!(json.get("messageId").is_none());
    assert!(json.get("taskId").is_none());
    assert!(json.get("contextId").is_none());
    assert!(json.get("metadata").is_none());
}

#[test]
fn test_task_shape() {
    let mut task = Task::new("task-123", "ctx-456", Message::user("Test"));
    task.transition(TaskState::InputRequired, Some(Message::agent("Where to?")));
    let json = serde_json::to_value(&task).unwrap();

    assert_eq!(json["id"], "task-123");
    assert_eq!(json["contextId"], "ctx-456");
    assert_eq!(json["status"]["state"], "input-required");
    assert!(json["status"]["timestamp"].is_string());
    assert_eq!(json["status"]["message"]["role"], "agent");
    assert_eq!(json["history"].as_array().unwrap().len(), 2);
    assert!(json["artifacts"].is_array());
    assert_eq!(json["kind"], "task");
}

#[test]
fn test_message_from_wire_example() {
    let wire = json!({
        "role": "user",
        "parts": [{"kind": "text", "text": "What is the weather?"}],
        "messageId": "msg-123",
        "contextId": "ctx-456"
    });

    let msg: Message = serde_json::from_value(wire).unwrap();
    assert_eq!(msg.role, Role::User);
    assert_eq!(msg.text(), "What is the weather?");
    assert_eq!(msg.message_id.as_deref(), Some("msg-123"));
    assert_eq!(msg.context_id.as_deref(), Some("ctx-456"));
}

#[tokio::test]
async fn test_stored_task_round_trip() {
    let store = TaskStore::new();
    let task = store
        .create_task(Message::user("book a trip").with_fresh_id(), None)
        .await;
    store
        .update_status(&task.id, TaskState::Working, None)
        .await
        .unwrap();
    store
        .add_artifact(
            &task.id,
            Artifact::new("plan", vec![MessagePart::text("Rome, 3 days")]).with_name("trip"),
        )
        .await
        .unwrap();
    let task = store
        .update_status(
            &task.id,
            TaskState::Completed,
            Some(Message::agent("done").with_fresh_id()),
        )
        .await
        .unwrap();

    let wire = serde_json::to_string(&task).unwrap();
    let parsed: Task = serde_json::from_str(&wire).unwrap();
    assert_eq!(parsed, task);
}

#[test]
fn test_agent_card_layout() {
    let card = AgentKind::Weather.card("http://localhost:8004");
    let json = serde_json::to_value(&card).unwrap();

    assert_eq!(json["schemaVersion"], "0.2.0");
    assert_eq!(json["agent"]["name"], "WeatherAgent");
    assert_eq!(json["agent"]["version"], "1.0.0");
    assert_eq!(json["capabilities"]["textGeneration"], true);
    assert_eq!(json["capabilities"]["realTimeInteraction"], true);
    assert_eq!(json["interfaces"][0]["type"], "a2a");
    assert_eq!(json["interfaces"][0]["url"], "http://localhost:8004/a2a/v1/");
    assert_eq!(
        json["interfaces"][0]["methods"],
        json!(["message/send", "tasks/get", "tasks/cancel"])
    );
    assert_eq!(json["authentication"]["required"], false);

    let parsed: AgentCard = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, card);
}

#[test]
fn test_request_envelope() {
    let operation = A2AOperation::send(Message::user("hello").with_message_id("m1"));
    let request = JsonRpcRequest::new(
        operation.rpc_method().unwrap(),
        operation.params().unwrap(),
    );
    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["jsonrpc"], "2.0");
    assert!(json["id"].is_string());
    assert_eq!(json["method"], "message/send");
    assert_eq!(json["params"]["message"]["messageId"], "m1");
}

#[test]
fn test_error_envelope() {
    let reply = JsonRpcResponse::failure(
        Some(json!("42")),
        &A2AError::TaskNotFound {
            task_id: "t-1".into(),
        },
    );
    let json = serde_json::to_value(&reply).unwrap();

    assert_eq!(json["jsonrpc"], "2.0");
    assert_eq!(json["id"], "42");
    assert_eq!(json["error"]["code"], -32602);
    assert_eq!(json["error"]["message"], "Task not found");
    assert!(json.get("result").is_none());
}

#[test]
fn test_malformed_requests_are_rejected() {
    let codec = JsonRpcCodec;

    let rejection = codec.decode_request(b"{oops").unwrap_err();
    assert_eq!(rejection.error.unwrap().code, -32700);

    let rejection = codec
        .decode_request(br#"{"jsonrpc":"1.0","id":3,"method":"tasks/get"}"#)
        .unwrap_err();
    assert_eq!(rejection.id, Some(json!(3)));
    assert_eq!(rejection.error.unwrap().code, -32600);
}
