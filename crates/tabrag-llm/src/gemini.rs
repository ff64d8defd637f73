//! Google Gemini adapters (`embedContent` / `generateContent`)

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tabrag_core::error::{Result, TabragError};

use crate::http::{build_client, post_json};
use crate::ports::{Embedder, GenerationParams, Generator};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Connection settings shared by the Gemini embedder and generator
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL, e.g. "https://generativelanguage.googleapis.com"
    pub base_url: String,
    pub api_key: String,
    /// Model name with or without the "models/" prefix
    pub model: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    fn endpoint(&self, method: &str) -> String {
        let model = self.model.strip_prefix("models/").unwrap_or(&self.model);
        format!("{}/v1beta/models/{}:{}", self.base_url.trim_end_matches('/'), model, method)
    }

    fn model_path(&self) -> String {
        if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        }
    }
}

/// Gemini embedder
///
/// Documents are embedded with task type `RETRIEVAL_DOCUMENT`, questions
/// with `RETRIEVAL_QUERY`.
pub struct GeminiEmbedder {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiEmbedder {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = build_client(config.timeout)
            .map_err(|reason| TabragError::EmbeddingProvider { reason })?;
        Ok(Self { config, client })
    }

    async fn embed_with_task(&self, text: &str, task_type: TaskType) -> Result<Vec<f32>> {
        let model = self.config.model_path();
        let request = EmbedContentRequest {
            model: &model,
            content: Content::user(text),
            task_type,
        };

        let response: EmbedContentResponse = post_json(
            self.client
                .post(self.config.endpoint("embedContent"))
                .header(API_KEY_HEADER, &self.config.api_key),
            &request,
            self.config.timeout,
        )
        .await
        .map_err(|reason| {
            tracing::error!(model = %self.config.model, %reason, "Gemini embedContent failed");
            TabragError::EmbeddingProvider { reason }
        })?;

        if response.embedding.values.is_empty() {
            return Err(TabragError::EmbeddingProvider {
                reason: "Gemini returned an empty embedding".to_string(),
            });
        }

        Ok(response.embedding.values)
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_with_task(text, TaskType::RetrievalDocument).await
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_with_task(text, TaskType::RetrievalQuery).await
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Gemini text generator
pub struct GeminiGenerator {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = build_client(config.timeout)
            .map_err(|reason| TabragError::GenerationProvider { reason })?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                top_p: params.top_p,
                max_output_tokens: params.max_output_tokens,
            },
        };

        let response: GenerateContentResponse = post_json(
            self.client
                .post(self.config.endpoint("generateContent"))
                .header(API_KEY_HEADER, &self.config.api_key),
            &request,
            self.config.timeout,
        )
        .await
        .map_err(|reason| {
            tracing::error!(model = %self.config.model, %reason, "Gemini generateContent failed");
            TabragError::GenerationProvider { reason }
        })?;

        response.into_text()
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum TaskType {
    RetrievalDocument,
    RetrievalQuery,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

impl<'a> Content<'a> {
    fn user(text: &'a str) -> Self {
        Self { role: "user", parts: vec![Part { text }] }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
    task_type: TaskType,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(TabragError::GenerationProvider {
                reason: match block_reason {
                    Some(reason) => format!("prompt was blocked: {}", reason),
                    None => "Gemini returned no candidates".to_string(),
                },
            });
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(TabragError::GenerationProvider {
                reason: format!(
                    "Gemini returned an empty candidate (finish reason: {})",
                    candidate.finish_reason.as_deref().unwrap_or("unknown")
                ),
            });
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(model: &str) -> GeminiConfig {
        GeminiConfig {
            base_url: "https://generativelanguage.googleapis.com/".to_string(),
            api_key: "key".to_string(),
            model: model.to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_endpoint_strips_models_prefix() {
        assert_eq!(
            config("models/embedding-001").endpoint("embedContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/embedding-001:embedContent"
        );
        assert_eq!(config("embedding-001").model_path(), "models/embedding-001");
    }

    #[test]
    fn test_embed_request_shape() {
        let request = EmbedContentRequest {
            model: "models/text-embedding-004",
            content: Content::user("hello"),
            task_type: TaskType::RetrievalQuery,
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["taskType"], "RETRIEVAL_QUERY");
        assert_eq!(json["content"]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_generate_request_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content::user("prompt")],
            generation_config: GenerationConfig {
                temperature: 0.5,
                top_p: 0.85,
                max_output_tokens: 256,
            },
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["generationConfig"]["maxOutputTokens"], 256);
        assert_eq!(json["generationConfig"]["temperature"], 0.5);
        assert_eq!(json["contents"][0]["role"], "user");
    }

    #[test]
    fn test_response_parts_are_concatenated() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Anna "},{"text":"ranks first."}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "Anna ranks first.");
    }

    #[test]
    fn test_blocked_prompt_is_an_error() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();

        match response.into_text() {
            Err(TabragError::GenerationProvider { reason }) => assert!(reason.contains("SAFETY")),
            other => panic!("expected GenerationProvider error, got {:?}", other),
        }
    }
}
