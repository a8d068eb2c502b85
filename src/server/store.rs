//! In-memory task and context store

use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::protocol::{error::A2AError, Artifact, Message, Task, TaskState};

#[derive(Debug, Default)]
struct StoreInner {
    tasks: HashMap<String, Task>,
    /// context id -> task ids, in creation order
    contexts: HashMap<String, Vec<String>>,
}

impl StoreInner {
    fn task_mut(&mut self, task_id: &str) -> Result<&mut Task, A2AError> {
        self.tasks
            .get_mut(task_id)
            .ok_or_else(|| A2AError::TaskNotFound {
                task_id: task_id.to_string(),
            })
    }
}

/// Per-agent registry of tasks and conversational contexts
///
/// One mutex guards both maps, so every mutation of a task (status overwrite
/// plus history append) is atomic with respect to concurrent requests for the
/// same task. Tasks are never removed.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a submitted task whose history starts with `message`
    ///
    /// A context is allocated when `context_id` is `None`. The stored copy of
    /// the message is tagged with the new task and context ids.
    pub async fn create_task(&self, message: Message, context_id: Option<String>) -> Task {
        let task_id = Uuid::new_v4().to_string();
        let context_id = context_id.unwrap_or_else(|| Uuid::new_v4().to_string());

        let message = message
            .with_task_id(task_id.clone())
            .with_context_id(context_id.clone());
        let task = Task::new(task_id.clone(), context_id.clone(), message);

        let mut inner = self.inner.lock().await;
        inner
            .contexts
            .entry(context_id.clone())
            .or_default()
            .push(task_id.clone());
        inner.tasks.insert(task_id.clone(), task.clone());

        debug!(task_id = %task_id, context_id = %context_id, "task created");
        task
    }

    /// Move a task to `state`, appending `message` to its history if given
    ///
    /// # Errors
    ///
    /// `TaskNotFound` if no task has this id
    pub async fn update_status(
        &self,
        task_id: &str,
        state: TaskState,
        message: Option<Message>,
    ) -> Result<Task, A2AError> {
        let mut inner = self.inner.lock().await;
        let task = inner.task_mut(task_id)?;
        task.transition(state, message);
        Ok(task.clone())
    }

    /// Like [`TaskStore::update_status`], but leaves a task that was
    /// cancelled in the meantime untouched
    pub async fn settle(
        &self,
        task_id: &str,
        state: TaskState,
        message: Option<Message>,
    ) -> Result<Task, A2AError> {
        let mut inner = self.inner.lock().await;
        let task = inner.task_mut(task_id)?;
        if task.status.state == TaskState::Cancelled {
            debug!(task_id, "task cancelled while responding; reply dropped");
        } else {
            task.transition(state, message);
        }
        Ok(task.clone())
    }

    /// Move a task to `working` unless it has been cancelled
    ///
    /// Returns the task as stored afterwards, so a cancelled task comes back
    /// still `cancelled`.
    pub async fn begin_work(&self, task_id: &str) -> Result<Task, A2AError> {
        self.settle(task_id, TaskState::Working, None).await
    }

    /// Append a follow-up message without changing the status
    pub async fn append_message(&self, task_id: &str, message: Message) -> Result<Task, A2AError> {
        let mut inner = self.inner.lock().await;
        let task = inner.task_mut(task_id)?;
        task.history.push(message);
        Ok(task.clone())
    }

    /// Attach an output artifact to a task
    pub async fn add_artifact(&self, task_id: &str, artifact: Artifact) -> Result<Task, A2AError> {
        let mut inner = self.inner.lock().await;
        let task = inner.task_mut(task_id)?;
        task.artifacts.push(artifact);
        Ok(task.clone())
    }

    /// Look up a task by id
    pub async fn get_task(&self, task_id: &str) -> Option<Task> {
        self.inner.lock().await.tasks.get(task_id).cloned()
    }

    /// Ids of the tasks in a context, in creation order
    pub async fn context_tasks(&self, context_id: &str) -> Vec<String> {
        self.inner
            .lock()
            .await
            .contexts
            .get(context_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of tasks ever created
    pub async fn len(&self) -> usize {
        self.inner.lock().await.tasks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
