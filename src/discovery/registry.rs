//! Name to URL registry of reachable agents

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::info;
use url::Url;

/// Shared service-discovery map from agent name to base URL
///
/// Cloning is cheap and every clone sees the same entries, so one registry
/// can be handed to every agent started in a process.
#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    agents: Arc<RwLock<HashMap<String, Url>>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from known `(name, url)` pairs
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Url)>) -> Self {
        Self {
            agents: Arc::new(RwLock::new(entries.into_iter().collect())),
        }
    }

    /// Register or replace an agent
    pub async fn register(&self, name: impl Into<String>, url: Url) {
        let name = name.into();
        info!(agent = %name, %url, "agent registered");
        self.agents.write().await.insert(name, url);
    }

    /// Remove an agent, returning its URL
    pub async fn unregister(&self, name: &str) -> Option<Url> {
        self.agents.write().await.remove(name)
    }

    /// Base URL of a registered agent
    pub async fn discover(&self, name: &str) -> Option<Url> {
        self.agents.read().await.get(name).cloned()
    }

    /// All registered agents, sorted by name
    pub async fn list(&self) -> Vec<(String, Url)> {
        let mut agents: Vec<_> = self
            .agents
            .read()
            .await
            .iter()
            .map(|(name, url)| (name.clone(), url.clone()))
            .collect();
        agents.sort_by(|a, b| a.0.cmp(&b.0));
        agents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(port: u16) -> Url {
        Url::parse(&format!("http://localhost:{}", port)).unwrap()
    }

    #[tokio::test]
    async fn test_register_and_discover() {
        let registry = AgentRegistry::new();
        registry.register("WeatherAgent", url(8004)).await;

        assert_eq!(registry.discover("WeatherAgent").await, Some(url(8004)));
        assert_eq!(registry.discover("Nobody").await, None);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let registry = AgentRegistry::new();
        let other = registry.clone();
        other.register("CalendarAgent", url(8002)).await;

        assert_eq!(registry.discover("CalendarAgent").await, Some(url(8002)));
        assert_eq!(registry.unregister("CalendarAgent").await, Some(url(8002)));
        assert!(other.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let registry = AgentRegistry::from_entries([
            ("WeatherAgent".to_string(), url(8004)),
            ("CalendarAgent".to_string(), url(8002)),
        ]);
        let names: Vec<_> = registry.list().await.into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["CalendarAgent", "WeatherAgent"]);
    }
}
