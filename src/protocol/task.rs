//! A2A task types and lifecycle management

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    message::{Message, Role},
    Artifact,
};

fn task_kind() -> String {
    "task".to_string()
}

/// A task in the A2A protocol
///
/// A task is the unit of work and reply state for one request. Its `history`
/// is the append-only transcript of every message exchanged for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task
    pub id: String,

    /// Conversation this task belongs to
    pub context_id: String,

    /// Current status of the task
    pub status: TaskStatus,

    /// Chronological transcript of the task
    #[serde(default)]
    pub history: Vec<Message>,

    /// Task outputs
    #[serde(default)]
    pub artifacts: Vec<Artifact>,

    /// Open key-value bag
    #[serde(default)]
    pub metadata: HashMap<String, Value>,

    /// Object discriminator, always `task`
    #[serde(default = "task_kind")]
    pub kind: String,
}

impl Task {
    /// Create a new submitted task whose history starts with `message`
    pub fn new(id: impl Into<String>, context_id: impl Into<String>, message: Message) -> Self {
        Self {
            id: id.into(),
            context_id: context_id.into(),
            status: TaskStatus::new(TaskState::Submitted),
            history: vec![message],
            artifacts: Vec::new(),
            metadata: HashMap::new(),
            kind: task_kind(),
        }
    }

    /// Check if the task is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.state.is_terminal()
    }

    /// Check if the task is paused waiting for input
    pub fn requires_input(&self) -> bool {
        self.status.state.requires_action()
    }

    /// Text of the most recent agent-role message in the history
    pub fn last_agent_text(&self) -> Option<String> {
        self.history
            .iter()
            .rev()
            .find(|message| message.role == Role::Agent)
            .map(Message::text)
    }

    /// Text of the message that opened the task
    pub fn first_request_text(&self) -> Option<String> {
        self.history.first().map(Message::text)
    }

    /// Update the task status in place
    ///
    /// The new timestamp never goes backwards relative to the previous one,
    /// and a status-carrying message is appended to the history.
    pub fn transition(&mut self, state: TaskState, message: Option<Message>) {
        let timestamp = Utc::now().max(self.status.timestamp);
        if let Some(message) = &message {
            self.history.push(message.clone());
        }
        self.status = TaskStatus {
            state,
            timestamp,
            message,
        };
    }

    /// Append a message to the history
    pub fn with_history_message(mut self, message: Message) -> Self {
        self.history.push(message);
        self
    }
}

/// Current status of a task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatus {
    /// Lifecycle state
    pub state: TaskState,

    /// When the state was entered
    pub timestamp: DateTime<Utc>,

    /// Message that accompanied the transition, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

impl TaskStatus {
    /// Create a status entered now
    pub fn new(state: TaskState) -> Self {
        Self {
            state,
            timestamp: Utc::now(),
            message: None,
        }
    }
}

/// Task state in the A2A protocol lifecycle
///
/// Task lifecycle: submitted → working → completed/failed/cancelled/input-required.
/// `input-required` pauses the task until the next message for it arrives.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// Task has been received
    Submitted,

    /// Task is currently being processed
    Working,

    /// Task requires additional input from the client
    InputRequired,

    /// Task completed successfully
    Completed,

    /// Task failed with an error
    Failed,

    /// Task was cancelled by the client
    #[serde(alias = "canceled")]
    Cancelled,
}

impl TaskState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Cancelled
        )
    }

    /// Check if this state waits for client action
    pub fn requires_action(&self) -> bool {
        matches!(self, TaskState::InputRequired)
    }
}
