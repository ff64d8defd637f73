use std::path::Path;
use std::sync::Arc;
use tabrag_core::error::{Result, TabragError};
use tabrag_core::models::{Answer, Query};
use tabrag_llm::ports::{GenerationParams, Generator};

use crate::index::EmbeddingIndex;

const CONTEXT_PLACEHOLDER: &str = "{context}";
const QUESTION_PLACEHOLDER: &str = "{question}";

/// Default number of documents retrieved per question
pub const DEFAULT_TOP_K: usize = 5;

const DEFAULT_TEMPLATE: &str = "\
You are a data assistant. You are given the summary of a CSV dataset, which you \
read and analyze carefully. Answer the user's question accurately and in detail, \
using only the data below.

Data Context:
{context}

User Question:
{question}

Answer in more than one sentence. Where possible, explain why the answer is what it is.

Your Answer:
";

/// Instruction template with `{context}` and `{question}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    /// Create a template, rejecting text that lacks either placeholder
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        for placeholder in [CONTEXT_PLACEHOLDER, QUESTION_PLACEHOLDER] {
            if !text.contains(placeholder) {
                return Err(TabragError::ConfigInvalid {
                    key: "prompt_template".to_string(),
                    reason: format!("template must contain {}", placeholder),
                });
            }
        }
        Ok(Self { text })
    }

    /// Load a template from a UTF-8 text file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| TabragError::ConfigInvalid {
            key: "prompt_template".to_string(),
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::new(text)
    }

    /// Fill both placeholders
    ///
    /// Substitution is single pass: placeholder-like text inside the context
    /// or the question is left as is.
    pub fn render(&self, context: &str, question: &str) -> String {
        self.text
            .split(CONTEXT_PLACEHOLDER)
            .map(|part| part.replace(QUESTION_PLACEHOLDER, question))
            .collect::<Vec<_>>()
            .join(context)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self { text: DEFAULT_TEMPLATE.to_string() }
    }
}

/// Answers questions from retrieved context
///
/// Decoding parameters, top-k and the template are fixed at construction.
#[derive(Clone)]
pub struct RetrievalAnswerer {
    index: EmbeddingIndex,
    generator: Arc<dyn Generator>,
    params: GenerationParams,
    top_k: usize,
    template: PromptTemplate,
}

impl RetrievalAnswerer {
    pub fn new(index: EmbeddingIndex, generator: Arc<dyn Generator>, params: GenerationParams) -> Self {
        Self {
            index,
            generator,
            params,
            top_k: DEFAULT_TOP_K,
            template: PromptTemplate::default(),
        }
    }

    /// Set the number of documents retrieved per question (minimum 1)
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn index(&self) -> &EmbeddingIndex {
        &self.index
    }

    /// Retrieve context for `query` and generate an answer
    pub async fn answer(&self, query: &Query) -> Result<Answer> {
        let count = self.index.len().await?;
        if count == 0 {
            return Err(TabragError::EmptyIndex);
        }

        let k = self.top_k.min(count);
        let documents = self.index.search(query.question(), k).await?;
        let context = documents.iter().map(|d| d.content.as_str()).collect::<Vec<_>>().join("\n\n");

        let prompt = self.template.render(&context, query.question());
        tracing::debug!(k, retrieved = documents.len(), prompt_len = prompt.len(), "Submitting prompt");

        let text = self.generator.generate(&prompt, &self.params).await?;
        Ok(Answer { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_has_placeholders() {
        let template = PromptTemplate::default();
        assert!(PromptTemplate::new(template.as_str()).is_ok());
    }

    #[test]
    fn test_template_requires_both_placeholders() {
        assert!(matches!(
            PromptTemplate::new("only {context}"),
            Err(TabragError::ConfigInvalid { .. })
        ));
        assert!(PromptTemplate::new("{question} only").is_err());
    }

    #[test]
    fn test_render_fills_placeholders() {
        let template = PromptTemplate::new("C:{context}|Q:{question}|{question}").unwrap();
        assert_eq!(template.render("ctx", "why?"), "C:ctx|Q:why?|why?");
    }

    #[test]
    fn test_render_does_not_expand_inserted_text() {
        let template = PromptTemplate::new("{context} / {question}").unwrap();
        let rendered = template.render("see {question}", "what about {context}?");
        assert_eq!(rendered, "see {question} / what about {context}?");
    }

    #[test]
    fn test_from_file_missing() {
        let err = PromptTemplate::from_file(Path::new("/nonexistent/prompt.txt")).unwrap_err();
        assert!(matches!(err, TabragError::ConfigInvalid { .. }));
    }
}
