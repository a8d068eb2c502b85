//! `a2a-agent`: run one agent, or the whole travel mesh in one process

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use a2a_mesh::{
    config::{AgentConfig, ModelConfig},
    discovery::AgentRegistry,
    mesh::{spawn_agent, spawn_mesh},
    profile::AgentKind,
    router::CoordinationMode,
};

#[derive(Debug, Parser)]
#[command(name = "a2a-agent", version, about = "Agent-to-Agent protocol agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a single agent
    Serve {
        /// Which agent to run
        #[arg(long, value_enum, env = "A2A_AGENT")]
        agent: AgentKind,

        /// Port to bind (defaults to the agent's standard port)
        #[arg(long, env = "A2A_PORT")]
        port: Option<u16>,

        /// Base URL advertised in the agent card
        #[arg(long, env = "A2A_PUBLIC_URL")]
        public_url: Option<String>,

        /// Peer agent as NAME=URL, repeatable
        #[arg(long = "peer", value_parser = parse_peer)]
        peers: Vec<(String, Url)>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Run the interface, travel, calendar, expense and weather agents together
    Mesh {
        /// Bind every agent to a free port instead of the standard ports
        #[arg(long)]
        ephemeral: bool,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Interface to bind
    #[arg(long, default_value = "127.0.0.1", env = "A2A_HOST")]
    host: String,

    /// Ollama-compatible server for model-backed replies
    #[arg(long, env = "A2A_MODEL_URL")]
    model_url: Option<String>,

    /// Model name; enables model-backed replies
    #[arg(long, env = "A2A_MODEL")]
    model: Option<String>,

    /// How the interface agent handles multi-agent requests
    #[arg(long, value_enum, default_value_t = CoordinationMode::FanOut)]
    coordination: CoordinationMode,

    /// Seconds to wait for a peer's agent card
    #[arg(long, default_value_t = 5)]
    discovery_timeout: u64,

    /// Seconds to wait for a peer's reply
    #[arg(long, default_value_t = 10)]
    send_timeout: u64,
}

impl CommonArgs {
    fn config(&self, port: u16) -> AgentConfig {
        let mut config = AgentConfig::new(self.host.clone(), port)
            .with_coordination(self.coordination);
        config.discovery_timeout_secs = self.discovery_timeout;
        config.send_timeout_secs = self.send_timeout;

        if self.model.is_some() || self.model_url.is_some() {
            let defaults = ModelConfig::default();
            config = config.with_model(ModelConfig::new(
                self.model_url.clone().unwrap_or(defaults.base_url),
                self.model.clone().unwrap_or(defaults.model),
            ));
        }
        config
    }
}

fn parse_peer(value: &str) -> Result<(String, Url), String> {
    let (name, url) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=URL, got `{}`", value))?;
    let url = Url::parse(url).map_err(|e| format!("invalid URL for {}: {}", name, e))?;
    Ok((name.to_string(), url))
}

/// Default peer locations on localhost
fn default_peers() -> impl Iterator<Item = (String, Url)> {
    AgentKind::MESH.into_iter().filter_map(|kind| {
        Url::parse(&format!("http://localhost:{}", kind.default_port()))
            .ok()
            .map(|url| (kind.name().to_string(), url))
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            agent,
            port,
            public_url,
            peers,
            common,
        } => {
            let registry = AgentRegistry::from_entries(default_peers());
            for (name, url) in peers {
                registry.register(name, url).await;
            }

            let mut config = common.config(port.unwrap_or_else(|| agent.default_port()));
            if let Some(url) = public_url {
                config = config.with_public_url(url);
            }

            let handle = spawn_agent(agent, &config, registry)
                .await
                .with_context(|| format!("failed to start {}", agent))?;
            info!(agent = %agent, url = %handle.base_url, "serving; press ctrl-c to stop");

            shutdown_signal().await;
            handle.shutdown().await;
        }
        Command::Mesh { ephemeral, common } => {
            let config = common.config(if ephemeral { 0 } else { 8000 });
            let registry = AgentRegistry::new();
            let handles = spawn_mesh(&config, registry.clone())
                .await
                .context("failed to start the agent mesh")?;

            for (name, url) in registry.list().await {
                info!(agent = %name, %url, "mesh agent ready");
            }

            shutdown_signal().await;
            for handle in handles {
                handle.shutdown().await;
            }
        }
    }

    Ok(())
}
