//! Interface agent routing
//!
//! The router classifies a request, then either forwards it to one
//! specialist or coordinates several of them.

pub mod classifier;

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use clap::ValueEnum;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    discovery::{extract_reply_text, PeerClient, PeerError},
    protocol::{A2AError, Task},
    responder::{Reply, Responder, ResponderContext},
};

pub use classifier::{Classifier, Intent, RemoteModelClassifier, RuleBasedClassifier};

/// How a request needing several agents is handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CoordinationMode {
    /// Forward an enhanced request to the primary agent and wrap its reply
    Delegate,
    /// Ask every needed agent concurrently and join the replies
    #[default]
    FanOut,
}

/// A peer task waiting in `input-required` for the user's answer
#[derive(Debug, Clone, PartialEq)]
struct PausedPeer {
    agent: String,
    task_id: String,
}

/// Responder behind the interface agent
///
/// When a routed peer pauses in `input-required`, the router pauses too and
/// remembers the peer task under its own context id. The next message in
/// that context goes straight back to the paused peer task.
pub struct RouterResponder {
    classifier: Arc<dyn Classifier>,
    peers: PeerClient,
    mode: CoordinationMode,
    paused: Arc<Mutex<HashMap<String, PausedPeer>>>,
}

impl RouterResponder {
    pub fn new(classifier: Arc<dyn Classifier>, peers: PeerClient) -> Self {
        Self {
            classifier,
            peers,
            mode: CoordinationMode::default(),
            paused: Arc::default(),
        }
    }

    pub fn with_mode(mut self, mode: CoordinationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Route `text` and return the reply shown to the user
    ///
    /// Peer failures are reported inline, never as an error.
    pub async fn route(&self, text: &str, context_id: Option<&str>) -> Reply {
        if let Some(context_id) = context_id {
            let paused = self.paused.lock().await.remove(context_id);
            if let Some(paused) = paused {
                return self.resume(paused, text, context_id).await;
            }
        }

        let intent = self.classifier.classify(text).await;
        info!(
            intent = %intent.intent_type,
            primary = %intent.primary_agent,
            coordination = intent.requires_coordination,
            "routing request"
        );

        if !intent.requires_coordination {
            let (reply, paused) = self.forward(&intent.primary_agent, text, context_id).await;
            return self.remember(paused, context_id, reply).await;
        }

        match self.mode {
            CoordinationMode::Delegate => self.delegate(text, &intent, context_id).await,
            CoordinationMode::FanOut => self.fan_out(text, &intent, context_id).await,
        }
    }

    /// Send `text` to `agent`; the second value is set when the peer paused
    async fn forward(
        &self,
        agent: &str,
        text: &str,
        context_id: Option<&str>,
    ) -> (String, Option<PausedPeer>) {
        let result = self.peers.send_to_peer(agent, text, context_id).await;
        Self::read_peer_reply(agent, result)
    }

    fn read_peer_reply(
        agent: &str,
        result: Result<Task, PeerError>,
    ) -> (String, Option<PausedPeer>) {
        match result {
            Ok(task) => {
                let paused = task.requires_input().then(|| PausedPeer {
                    agent: agent.to_string(),
                    task_id: task.id.clone(),
                });
                (extract_reply_text(&task), paused)
            }
            Err(e) => {
                warn!(peer = %agent, error = %e, "peer call failed");
                (format!("Error: {}", e), None)
            }
        }
    }

    /// Pause with `text` when a peer is waiting for input, otherwise finish
    async fn remember(
        &self,
        paused: Option<PausedPeer>,
        context_id: Option<&str>,
        text: String,
    ) -> Reply {
        match (paused, context_id) {
            (Some(paused), Some(context_id)) => {
                debug!(peer = %paused.agent, task_id = %paused.task_id, "peer waiting for input");
                self.paused
                    .lock()
                    .await
                    .insert(context_id.to_string(), paused);
                Reply::NeedsInput(text)
            }
            _ => Reply::Done(text),
        }
    }

    async fn resume(&self, paused: PausedPeer, text: &str, context_id: &str) -> Reply {
        info!(peer = %paused.agent, task_id = %paused.task_id, "resuming paused peer task");
        let result = self
            .peers
            .continue_peer_task(&paused.agent, &paused.task_id, text, context_id)
            .await;
        let (reply, still_paused) = Self::read_peer_reply(&paused.agent, result);
        self.remember(still_paused, Some(context_id), reply).await
    }

    async fn delegate(&self, text: &str, intent: &Intent, context_id: Option<&str>) -> Reply {
        let supporting = intent.supporting_agents().join(", ");
        let enhanced = format!(
            "{}\n\nPlease coordinate with {} to complete this request.",
            text, supporting
        );
        let (reply, paused) = self
            .forward(&intent.primary_agent, &enhanced, context_id)
            .await;

        let text = format!(
            "Multi-agent coordination initiated with {} (supported by {}).\n\n{}",
            intent.primary_agent, supporting, reply
        );
        self.remember(paused, context_id, text).await
    }

    async fn fan_out(&self, text: &str, intent: &Intent, context_id: Option<&str>) -> Reply {
        let replies = join_all(
            intent
                .agents_needed
                .iter()
                .map(|agent| self.forward(agent, text, context_id)),
        )
        .await;

        let mut paused = None;
        let mut sections = Vec::with_capacity(replies.len());
        for (agent, (reply, waiting)) in intent.agents_needed.iter().zip(replies) {
            sections.push(format!("[{}]\n{}", agent, reply));
            // one follow-up answers one question; the first paused agent gets it
            paused = paused.or(waiting);
        }

        let text = format!(
            "Coordinated {} agents for your request:\n\n{}",
            sections.len(),
            sections.join("\n\n")
        );
        self.remember(paused, context_id, text).await
    }
}

#[async_trait]
impl Responder for RouterResponder {
    async fn respond(&self, text: &str, context: &ResponderContext) -> Result<Reply, A2AError> {
        let context_id = Some(context.context_id.as_str()).filter(|id| !id.is_empty());
        Ok(self.route(text, context_id).await)
    }
}
