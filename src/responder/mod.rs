//! Pluggable reply generation
//!
//! A [`Responder`] turns the text of an incoming message into reply text.
//! The protocol handler does not care how: keyword rules, a text-generation
//! model, or calls to peer agents all sit behind the same trait.

pub mod keyword;
pub mod model;
pub mod travel;

use async_trait::async_trait;

use crate::protocol::{A2AError, Message, TaskState};

pub use keyword::{KeywordResponder, Rule};
pub use model::{ModelResponder, OllamaGenerator, TextGenerator};
pub use travel::TravelResponder;

/// What a responder knows about the task it is answering
#[derive(Debug, Clone, Default)]
pub struct ResponderContext {
    pub task_id: String,
    pub context_id: String,

    /// Transcript of the task, including the message being answered
    pub history: Vec<Message>,

    /// The task was paused in `input-required` and this message resumes it
    pub resuming: bool,
}

impl ResponderContext {
    pub fn new(task_id: impl Into<String>, context_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            context_id: context_id.into(),
            history: Vec::new(),
            resuming: false,
        }
    }
}

/// Reply produced by a responder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Final answer; the task completes
    Done(String),

    /// A question for the caller; the task pauses in `input-required`
    NeedsInput(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Done(text) | Reply::NeedsInput(text) => text,
        }
    }

    /// State the task moves to once this reply is recorded
    pub fn state(&self) -> TaskState {
        match self {
            Reply::Done(_) => TaskState::Completed,
            Reply::NeedsInput(_) => TaskState::InputRequired,
        }
    }
}

/// Produces reply text for a message
#[async_trait]
pub trait Responder: Send + Sync {
    /// Answer `text` within `context`
    ///
    /// An `Err` fails the task and is reported to the caller as a JSON-RPC
    /// internal error.
    async fn respond(&self, text: &str, context: &ResponderContext) -> Result<Reply, A2AError>;
}
