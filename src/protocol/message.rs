//! A2A message types

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A message in the A2A protocol
///
/// Messages are single turns of dialogue between a user (or a calling agent)
/// and an agent. The semantic content of a message is the concatenation of
/// all of its text parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Role of the message sender
    pub role: Role,

    /// Message content parts, in order
    pub parts: Vec<MessagePart>,

    /// Message identifier, generated by the sender if absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// Task this message belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    /// Conversation this message belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    /// Creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Optional metadata for the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
}

impl Message {
    /// Create a new message with text content
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![MessagePart::text(text)],
            message_id: None,
            task_id: None,
            context_id: None,
            timestamp: None,
            metadata: None,
        }
    }

    /// Create a user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create an agent message with text content
    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Role::Agent, text)
    }

    /// Concatenate every text part of the message
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(MessagePart::as_text)
            .collect::<Vec<_>>()
            .concat()
    }

    /// Set the message ID
    pub fn with_message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = Some(id.into());
        self
    }

    /// Assign a fresh random message ID
    pub fn with_fresh_id(self) -> Self {
        self.with_message_id(Uuid::new_v4().to_string())
    }

    /// Set the context ID
    pub fn with_context_id(mut self, id: impl Into<String>) -> Self {
        self.context_id = Some(id.into());
        self
    }

    /// Set the task ID
    pub fn with_task_id(mut self, id: impl Into<String>) -> Self {
        self.task_id = Some(id.into());
        self
    }

    /// Add a message part
    pub fn with_part(mut self, part: MessagePart) -> Self {
        self.parts.push(part);
        self
    }

    /// Fill in the fields a receiving agent guarantees on stored messages:
    /// a message ID (when the sender left it out) and a timestamp.
    pub fn stamped(mut self) -> Self {
        if self.message_id.is_none() {
            self.message_id = Some(Uuid::new_v4().to_string());
        }
        self.timestamp = Some(Utc::now());
        self
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from a user
    User,

    /// Message from an agent
    Agent,
}

/// File content for file parts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileContent {
    /// MIME type of the file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Name of the file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// URI reference to the file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Base64-encoded file content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<String>,
}

/// A part of a message, discriminated by its `kind` field
///
/// Agents in this crate only produce and interpret `text` parts; `file` and
/// `data` parts are carried through history untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MessagePart {
    /// Text content
    Text {
        /// The text content
        text: String,
    },

    /// File reference
    File {
        /// File content
        file: FileContent,
    },

    /// Structured data
    Data {
        /// The structured data
        data: Value,
    },
}

impl MessagePart {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create a file part with URI reference
    pub fn file(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::File {
            file: FileContent {
                mime_type: None,
                name: Some(name.into()),
                uri: Some(uri.into()),
                bytes: None,
            },
        }
    }

    /// Create a data part
    pub fn data(data: Value) -> Self {
        Self::Data { data }
    }

    /// Borrow the text of a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessagePart::Text { text } => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Hello, agent!");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.parts.len(), 1);

        match &msg.parts[0] {
            MessagePart::Text { text } => assert_eq!(text, "Hello, agent!"),
            _ => panic!("Expected text part"),
        }
    }

    #[test]
    fn test_text_concatenates_text_parts_only() {
        let msg = Message::user("Hello, ")
            .with_part(MessagePart::data(json!({"ignored": true})))
            .with_part(MessagePart::text("world"));

        assert_eq!(msg.text(), "Hello, world");
    }

    #[test]
    fn test_text_part_carries_kind() {
        let json = serde_json::to_value(MessagePart::text("hi")).unwrap();
        assert_eq!(json, json!({"kind": "text", "text": "hi"}));
    }

    #[test]
    fn test_part_without_kind_is_rejected() {
        let result: Result<MessagePart, _> = serde_json::from_value(json!({"text": "hi"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_stamped_keeps_sender_id() {
        let msg = Message::user("Test").with_message_id("m1").stamped();
        assert_eq!(msg.message_id.as_deref(), Some("m1"));
        assert!(msg.timestamp.is_some());

        let generated = Message::user("Test").stamped();
        assert!(generated.message_id.is_some());
    }

    #[test]
    fn test_message_serialization_with_ids() {
        let msg = Message::user("Test")
            .with_message_id("msg-123")
            .with_task_id("task-456");

        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"messageId\":\"msg-123\""));
        assert!(json.contains("\"taskId\":\"task-456\""));

        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, deserialized);
    }
}
