//! Starting agents and wiring them to their peers

use std::sync::Arc;

use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tracing::{error, info};
use url::Url;

use crate::{
    config::AgentConfig,
    discovery::{AgentRegistry, PeerClient},
    profile::AgentKind,
    protocol::A2AError,
    responder::{ModelResponder, OllamaGenerator, Responder, TextGenerator, TravelResponder},
    router::{Classifier, RemoteModelClassifier, RouterResponder, RuleBasedClassifier},
    server::{A2AHandler, AgentServer, TaskStore},
};

/// Build the responder for `kind`
///
/// With a model configured, replies come from the model and fall back to the
/// profile's keyword rules.
pub fn build_responder(
    kind: AgentKind,
    config: &AgentConfig,
    registry: AgentRegistry,
) -> Result<Arc<dyn Responder>, A2AError> {
    let generator: Option<Arc<dyn TextGenerator>> = match &config.model {
        Some(model) => {
            let base_url = Url::parse(&model.base_url)
                .map_err(|e| A2AError::Validation(format!("invalid model URL: {}", e)))?;
            Some(Arc::new(
                OllamaGenerator::new(base_url, model.model.clone()).with_timeout(model.timeout()),
            ))
        }
        None => None,
    };

    let peers = PeerClient::new(registry)
        .with_discovery_timeout(config.discovery_timeout())
        .with_send_timeout(config.send_timeout());

    let local: Arc<dyn Responder> = match &generator {
        Some(generator) => Arc::new(ModelResponder::new(
            generator.clone(),
            kind.persona(),
            kind.keyword_responder(),
        )),
        None => Arc::new(kind.keyword_responder()),
    };

    let responder: Arc<dyn Responder> = match kind {
        AgentKind::Interface => {
            let classifier: Arc<dyn Classifier> = match generator {
                Some(generator) => Arc::new(RemoteModelClassifier::new(generator)),
                None => Arc::new(RuleBasedClassifier),
            };
            Arc::new(RouterResponder::new(classifier, peers).with_mode(config.coordination))
        }
        AgentKind::Travel => Arc::new(TravelResponder::new(peers, local)),
        AgentKind::Simple | AgentKind::Calendar | AgentKind::Expense | AgentKind::Weather => local,
    };
    Ok(responder)
}

/// A running agent
pub struct AgentHandle {
    pub kind: AgentKind,
    pub base_url: Url,
    store: TaskStore,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl AgentHandle {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// The agent's task store, for inspection
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Stop accepting connections and wait for in-flight requests to finish
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            error!(agent = %self.kind, error = %e, "agent task panicked");
        }
    }
}

/// Bind, register and start one agent
///
/// Port 0 binds a free port; the registry and the agent card get the real
/// address.
pub async fn spawn_agent(
    kind: AgentKind,
    config: &AgentConfig,
    registry: AgentRegistry,
) -> anyhow::Result<AgentHandle> {
    let listener = TcpListener::bind(config.bind_addr()).await?;
    let addr = listener.local_addr()?;

    let base_url = match &config.public_url {
        Some(url) => Url::parse(url)?,
        None => Url::parse(&format!("http://{}", addr))?,
    };
    let advertised = base_url.as_str().trim_end_matches('/').to_string();

    let store = TaskStore::new();
    let responder = build_responder(kind, config, registry.clone())?;
    let server = AgentServer::new(kind.card(&advertised), A2AHandler::new(store.clone(), responder))?;

    registry.register(kind.name(), base_url.clone()).await;

    let (tx, rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        let shutdown = async {
            let _ = rx.await;
        };
        if let Err(e) = server.serve(listener, shutdown).await {
            error!(agent = %kind, error = %e, "agent server failed");
        }
    });

    info!(agent = %kind, url = %advertised, "agent started");
    Ok(AgentHandle {
        kind,
        base_url,
        store,
        shutdown: Some(tx),
        task,
    })
}

/// Start every mesh agent on its own port, sharing `registry`
///
/// With `config.port == 0` every agent gets a free port, otherwise each
/// uses its profile's default port.
pub async fn spawn_mesh(
    config: &AgentConfig,
    registry: AgentRegistry,
) -> anyhow::Result<Vec<AgentHandle>> {
    let mut handles = Vec::with_capacity(AgentKind::MESH.len());
    for kind in AgentKind::MESH {
        let port = if config.port == 0 { 0 } else { kind.default_port() };
        let agent_config = AgentConfig {
            public_url: None,
            ..config.clone().with_port(port)
        };
        handles.push(spawn_agent(kind, &agent_config, registry.clone()).await?);
    }
    Ok(handles)
}
