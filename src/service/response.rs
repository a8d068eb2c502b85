//! Responses coming back up the client service stack

use crate::protocol::{agent::AgentCard, error::A2AError, task::Task};

/// What an agent answered
#[derive(Debug, Clone)]
pub enum A2AResponse {
    /// `result` of `message/send`, `tasks/get` or `tasks/cancel`
    Task(Box<Task>),

    /// Body of `GET /.well-known/agent.json`
    AgentCard(Box<AgentCard>),
}

impl A2AResponse {
    fn kind(&self) -> &'static str {
        match self {
            A2AResponse::Task(_) => "task",
            A2AResponse::AgentCard(_) => "agent card",
        }
    }

    /// The task, or a protocol error naming what arrived instead
    pub fn into_task(self) -> Result<Task, A2AError> {
        match self {
            A2AResponse::Task(task) => Ok(*task),
            other => Err(A2AError::Protocol(format!(
                "Expected a task, received an {}",
                other.kind()
            ))),
        }
    }

    /// The agent card, or a protocol error naming what arrived instead
    pub fn into_agent_card(self) -> Result<AgentCard, A2AError> {
        match self {
            A2AResponse::AgentCard(card) => Ok(*card),
            other => Err(A2AError::Protocol(format!(
                "Expected an agent card, received a {}",
                other.kind()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::protocol::message::Message;

    use super::*;

    #[test]
    fn test_task_response() {
        let task = Task::new("task-123", "ctx-1", Message::user("Test"));
        let response = A2AResponse::Task(Box::new(task));

        assert_eq!(response.clone().into_task().unwrap().id, "task-123");
        let err = response.into_agent_card().unwrap_err();
        assert!(err.to_string().contains("received a task"));
    }

    #[test]
    fn test_card_response_is_not_task() {
        let response = A2AResponse::AgentCard(Box::new(AgentCard::new("A", "B")));
        assert!(matches!(
            response.clone().into_task(),
            Err(A2AError::Protocol(_))
        ));
        assert_eq!(response.into_agent_card().unwrap().name(), "A");
    }
}
