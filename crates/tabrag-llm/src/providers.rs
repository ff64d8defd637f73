//! Provider selection from configuration

use std::sync::Arc;
use std::time::Duration;

use tabrag_core::config::{LayeredConfig, ProviderKind};
use tabrag_core::error::{Result, TabragError};

use crate::gemini::{GeminiConfig, GeminiEmbedder, GeminiGenerator};
use crate::ollama::{OllamaEmbedder, OllamaGenerator};
use crate::ports::{Embedder, GenerationParams, Generator};

/// The embedder/generator pair plus the decoding parameters to use
#[derive(Clone)]
pub struct Providers {
    pub embedder: Arc<dyn Embedder>,
    pub generator: Arc<dyn Generator>,
    pub params: GenerationParams,
}

/// Build the configured provider adapters
pub fn from_config(config: &LayeredConfig) -> Result<Providers> {
    let timeout = Duration::from_secs(config.request_timeout_secs.value);
    let base_url = config.resolved_base_url();
    let embedding_model = config.resolved_embedding_model();
    let generation_model = config.resolved_generation_model();

    let (embedder, generator): (Arc<dyn Embedder>, Arc<dyn Generator>) =
        match config.provider.value {
            ProviderKind::Gemini => {
                let api_key = config.api_key.value.clone().ok_or_else(|| {
                    TabragError::ConfigMissing { key: "api_key".to_string() }
                })?;
                let base = GeminiConfig {
                    base_url,
                    api_key,
                    model: embedding_model,
                    timeout,
                };
                let generation = GeminiConfig { model: generation_model, ..base.clone() };
                (
                    Arc::new(GeminiEmbedder::new(base)?),
                    Arc::new(GeminiGenerator::new(generation)?),
                )
            }
            ProviderKind::Ollama => (
                Arc::new(OllamaEmbedder::new(base_url.clone(), embedding_model, timeout)?),
                Arc::new(OllamaGenerator::new(base_url, generation_model, timeout)?),
            ),
        };

    tracing::info!(
        provider = ?config.provider.value,
        embedding_model = embedder.model_name(),
        generation_model = generator.model_name(),
        timeout_secs = timeout.as_secs(),
        "Initialized model providers"
    );

    Ok(Providers {
        embedder,
        generator,
        params: GenerationParams {
            temperature: config.temperature.value,
            top_p: config.top_p.value,
            max_output_tokens: config.max_output_tokens.value,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabrag_core::config::ConfigSource;

    #[test]
    fn test_gemini_requires_api_key() {
        let config = LayeredConfig::with_defaults();
        assert!(matches!(from_config(&config), Err(TabragError::ConfigMissing { .. })));
    }

    #[test]
    fn test_ollama_providers() {
        let mut config = LayeredConfig::with_defaults();
        config.provider.update(ProviderKind::Ollama, ConfigSource::Cli);
        config.temperature.update(0.1, ConfigSource::Cli);

        let providers = from_config(&config).unwrap();
        assert_eq!(providers.embedder.model_name(), "nomic-embed-text");
        assert_eq!(providers.generator.model_name(), "llama3.1");
        assert_eq!(providers.params.temperature, 0.1);
        assert_eq!(providers.params.max_output_tokens, 256);
    }
}
