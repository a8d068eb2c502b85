//! Agent runtime configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::router::CoordinationMode;

/// Settings for one running agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Interface to bind
    pub host: String,

    /// Port to bind; 0 picks a free port
    pub port: u16,

    /// Base URL advertised in the agent card, when it differs from the bind address
    pub public_url: Option<String>,

    pub discovery_timeout_secs: u64,
    pub send_timeout_secs: u64,

    /// Text-generation backend; rule-based replies only when absent
    pub model: Option<ModelConfig>,

    /// Multi-agent handling for the interface agent
    pub coordination: CoordinationMode,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            public_url: None,
            discovery_timeout_secs: 5,
            send_timeout_secs: 10,
            model: None,
            coordination: CoordinationMode::default(),
        }
    }
}

impl AgentConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = Some(url.into());
        self
    }

    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_coordination(mut self, mode: CoordinationMode) -> Self {
        self.coordination = mode;
        self
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery_timeout_secs)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// An Ollama-compatible `/api/generate` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ModelConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.discovery_timeout(), Duration::from_secs(5));
        assert_eq!(config.send_timeout(), Duration::from_secs(10));
        assert_eq!(config.coordination, CoordinationMode::FanOut);
        assert!(config.model.is_none());
    }

    #[test]
    fn test_partial_json() {
        let config: AgentConfig = serde_json::from_str(
            r#"{"port": 8004, "coordination": "delegate", "model": {"model": "mistral"}}"#,
        )
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8004");
        assert_eq!(config.coordination, CoordinationMode::Delegate);
        let model = config.model.unwrap();
        assert_eq!(model.model, "mistral");
        assert_eq!(model.base_url, "http://localhost:11434");
    }
}
