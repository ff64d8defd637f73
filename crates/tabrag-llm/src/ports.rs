//! LLM port definitions

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tabrag_core::error::Result;

/// Port for embedding text into vector representations
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a document for storage in the index
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a search query
    ///
    /// Providers that distinguish documents from queries override this;
    /// the default treats both alike.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(text).await
    }

    /// Get the name/identifier of the embedding model
    fn model_name(&self) -> &str;
}

/// Port for text generation
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for a fully rendered prompt
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String>;

    /// Get the name/identifier of the generation model
    fn model_name(&self) -> &str;
}

/// Decoding parameters, fixed when the answerer is constructed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f32,
    /// Nucleus-sampling threshold
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.85,
            max_output_tokens: 256,
        }
    }
}
