//! tabrag LLM - Embedding and generation ports
//!
//! This crate defines the ports for embedding and text generation,
//! along with the Gemini and Ollama adapters.

mod http;

pub mod gemini;
pub mod ollama;
pub mod ports;
pub mod providers;

// Re-export main types
pub use gemini::{GeminiConfig, GeminiEmbedder, GeminiGenerator};
pub use ollama::{OllamaEmbedder, OllamaGenerator};
pub use ports::{Embedder, GenerationParams, Generator};
pub use providers::{from_config, Providers};
