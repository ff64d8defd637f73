#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tabrag_core::error::{Result, TabragError};
use tabrag_llm::ports::{Embedder, GenerationParams, Generator};

/// Embeds text as a small bag of character-class counts and counts calls
#[derive(Default)]
pub struct CountingEmbedder {
    pub document_calls: AtomicUsize,
    pub query_calls: AtomicUsize,
}

impl CountingEmbedder {
    pub fn document_calls(&self) -> usize {
        self.document_calls.load(Ordering::SeqCst)
    }

    fn vectorize(text: &str) -> Vec<f32> {
        let digits = text.chars().filter(|c| c.is_ascii_digit()).count() as f32;
        let letters = text.chars().filter(|c| c.is_alphabetic()).count() as f32;
        vec![digits, letters, 1.0]
    }
}

#[async_trait]
impl Embedder for CountingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::vectorize(text))
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::vectorize(text))
    }

    fn model_name(&self) -> &str {
        "counting-embedder"
    }
}

/// Fails on the n-th document (1-based)
pub struct FailingEmbedder {
    pub fail_on: usize,
    pub calls: AtomicUsize,
}

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            return Err(TabragError::EmbeddingProvider { reason: "HTTP 503: unavailable".to_string() });
        }
        Ok(vec![1.0, 0.0])
    }

    fn model_name(&self) -> &str {
        "counting-embedder"
    }
}

/// Records the last prompt and parameters, replies with a fixed text
#[derive(Default)]
pub struct RecordingGenerator {
    pub last_prompt: Mutex<Option<String>>,
    pub last_params: Mutex<Option<GenerationParams>>,
}

impl RecordingGenerator {
    pub fn prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for RecordingGenerator {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        *self.last_params.lock().unwrap() = Some(*params);
        Ok("Maximilian ranks first.".to_string())
    }

    fn model_name(&self) -> &str {
        "recording-generator"
    }
}

pub struct TimeoutGenerator;

#[async_trait]
impl Generator for TimeoutGenerator {
    async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> Result<String> {
        Err(TabragError::GenerationProvider { reason: "request timed out after 60.0s".to_string() })
    }

    fn model_name(&self) -> &str {
        "timeout-generator"
    }
}
