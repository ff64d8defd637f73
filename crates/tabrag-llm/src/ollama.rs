use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tabrag_core::error::{Result, TabragError};

use crate::http::{build_client, post_json};
use crate::ports::{Embedder, GenerationParams, Generator};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Ollama embedder implementation
pub struct OllamaEmbedder {
    /// Base URL for Ollama API (e.g., "http://localhost:11434")
    base_url: String,

    /// Model name to use for embeddings
    model: String,

    timeout: Duration,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client =
            build_client(timeout).map_err(|reason| TabragError::EmbeddingProvider { reason })?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout,
            client,
        })
    }

    /// Create with default localhost URL
    pub fn localhost(model: impl Into<String>) -> Result<Self> {
        Self::new("http://localhost:11434", model, DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = OllamaEmbedRequest {
            model: &self.model,
            prompt: text,
        };

        let response: OllamaEmbedResponse = post_json(
            self.client.post(format!("{}/api/embeddings", self.base_url)),
            &request,
            self.timeout,
        )
        .await
        .map_err(|reason| TabragError::EmbeddingProvider {
            reason: format!(
                "{}. Ensure Ollama is running at {} and the model '{}' is available",
                reason, self.base_url, self.model
            ),
        })?;

        if response.embedding.is_empty() {
            return Err(TabragError::EmbeddingProvider {
                reason: format!("Ollama returned an empty embedding for model '{}'", self.model),
            });
        }

        Ok(response.embedding)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Ollama text generator (non-streaming `/api/generate`)
pub struct OllamaGenerator {
    base_url: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OllamaGenerator {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client =
            build_client(timeout).map_err(|reason| TabragError::GenerationProvider { reason })?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout,
            client,
        })
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let request = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: params.temperature,
                top_p: params.top_p,
                num_predict: params.max_output_tokens,
            },
        };

        let response: OllamaGenerateResponse = post_json(
            self.client.post(format!("{}/api/generate", self.base_url)),
            &request,
            self.timeout,
        )
        .await
        .map_err(|reason| TabragError::GenerationProvider { reason })?;

        Ok(response.response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Request body for Ollama embeddings API
#[derive(Debug, Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Response from Ollama embeddings API
#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_embedder_creation() {
        let embedder = OllamaEmbedder::localhost("nomic-embed-text").unwrap();
        assert_eq!(embedder.model_name(), "nomic-embed-text");
        assert_eq!(embedder.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_ollama_generator_custom_url() {
        let generator =
            OllamaGenerator::new("http://custom:11434/", "llama3.1", Duration::from_secs(5)).unwrap();
        assert_eq!(generator.base_url, "http://custom:11434");
        assert_eq!(generator.model_name(), "llama3.1");
    }

    #[test]
    fn test_generate_request_is_non_streaming() {
        let request = OllamaGenerateRequest {
            model: "llama3.1",
            prompt: "hi",
            stream: false,
            options: OllamaOptions { temperature: 0.5, top_p: 0.5, num_predict: 64 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_predict"], 64);
    }
}
