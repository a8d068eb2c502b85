//! Responders backed by a text-generation model

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::protocol::A2AError;

use super::{KeywordResponder, Reply, Responder, ResponderContext};

/// A text-generation backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt` under the `system` instructions
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, A2AError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for an Ollama-compatible `/api/generate` endpoint
#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: Url,
    model: String,
    timeout: Duration,
}

impl OllamaGenerator {
    pub fn new(base_url: Url, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            model: model.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, A2AError> {
        let url = self
            .base_url
            .join("/api/generate")
            .map_err(|e| A2AError::Transport(e.to_string()))?;
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
        };

        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(A2AError::Transport(format!("HTTP {}: {}", status, text)));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| A2AError::Protocol(format!("Invalid generate response: {}", e)))?;
        Ok(generated.response)
    }
}

/// Answers with a model, falling back to keyword rules when it fails
pub struct ModelResponder {
    generator: Arc<dyn TextGenerator>,
    persona: String,
    fallback: KeywordResponder,
}

impl ModelResponder {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        persona: impl Into<String>,
        fallback: KeywordResponder,
    ) -> Self {
        Self {
            generator,
            persona: persona.into(),
            fallback,
        }
    }
}

#[async_trait]
impl Responder for ModelResponder {
    async fn respond(&self, text: &str, _context: &ResponderContext) -> Result<Reply, A2AError> {
        match self.generator.generate(text, &self.persona).await {
            Ok(reply) if !reply.trim().is_empty() => Ok(Reply::Done(reply.trim().to_string())),
            Ok(_) => {
                warn!("model returned an empty reply, using keyword rules");
                Ok(Reply::Done(self.fallback.reply_for(text)))
            }
            Err(e) => {
                warn!(error = %e, "model unavailable, using keyword rules");
                Ok(Reply::Done(self.fallback.reply_for(text)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use crate::responder::Rule;

    use super::*;

    fn fallback() -> KeywordResponder {
        KeywordResponder::new(
            vec![Rule::new(&["hello"], |_| "rule reply".to_string())],
            |_| "fallback".to_string(),
        )
    }

    #[tokio::test]
    async fn test_model_reply_is_used() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .with(eq("hello"), eq("You are a weather agent."))
            .times(1)
            .returning(|_, _| Ok("  Sunny all week.\n".to_string()));

        let responder =
            ModelResponder::new(Arc::new(generator), "You are a weather agent.", fallback());
        let reply = responder
            .respond("hello", &ResponderContext::default())
            .await
            .unwrap();
        assert_eq!(reply, Reply::Done("Sunny all week.".to_string()));
    }

    #[tokio::test]
    async fn test_generator_error_falls_back() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_, _| Err(A2AError::Timeout));

        let responder = ModelResponder::new(Arc::new(generator), "persona", fallback());
        let reply = responder
            .respond("hello", &ResponderContext::default())
            .await
            .unwrap();
        assert_eq!(reply, Reply::Done("rule reply".to_string()));
    }

    #[tokio::test]
    async fn test_empty_reply_falls_back() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_, _| Ok("   ".to_string()));

        let responder = ModelResponder::new(Arc::new(generator), "persona", fallback());
        let reply = responder
            .respond("anything", &ResponderContext::default())
            .await
            .unwrap();
        assert_eq!(reply, Reply::Done("fallback".to_string()));
    }

    #[tokio::test]
    async fn test_unreachable_ollama_is_error() {
        let generator = OllamaGenerator::new(Url::parse("http://127.0.0.1:9").unwrap(), "llama3")
            .with_timeout(Duration::from_millis(500));
        assert!(generator.generate("hi", "system").await.is_err());
    }
}
