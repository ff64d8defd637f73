mod common;

use common::{CountingEmbedder, RecordingGenerator, TimeoutGenerator};
use std::sync::Arc;
use tabrag_core::error::TabragError;
use tabrag_core::models::{Document, Query};
use tabrag_llm::ports::GenerationParams;
use tabrag_retrieval::{EmbeddingIndex, PromptTemplate, RetrievalAnswerer};
use tabrag_store::MemoryVectorStore;

async fn built_index(contents: &[&str]) -> EmbeddingIndex {
    let index = EmbeddingIndex::new(
        Arc::new(MemoryVectorStore::new()),
        Arc::new(CountingEmbedder::default()),
    );
    let docs: Vec<Document> = contents.iter().map(|c| Document::new(*c)).collect();
    index.build(&docs).await.unwrap();
    index
}

#[tokio::test]
async fn test_answer_returns_generator_text_verbatim() {
    let index = built_index(&["Maximilian 1\nBo 10"]).await;
    let generator = Arc::new(RecordingGenerator::default());
    let answerer = RetrievalAnswerer::new(index, generator.clone(), GenerationParams::default());

    let query = Query::parse(Some("Which name ranks first?")).unwrap();
    let answer = answerer.answer(&query).await.unwrap();

    assert_eq!(answer.text, "Maximilian ranks first.");
    let prompt = generator.prompt().unwrap();
    assert!(prompt.contains("Maximilian 1\nBo 10"));
    assert!(prompt.contains("Which name ranks first?"));
}

#[tokio::test]
async fn test_context_joins_documents_in_search_order() {
    let index = built_index(&["alpha", "12 beta", "3456"]).await;
    let generator = Arc::new(RecordingGenerator::default());
    let template = PromptTemplate::new("{context}|{question}").unwrap();
    let answerer = RetrievalAnswerer::new(index, generator.clone(), GenerationParams::default())
        .with_top_k(2)
        .with_template(template);

    let query = Query::parse(Some("7777")).unwrap();
    answerer.answer(&query).await.unwrap();

    assert_eq!(generator.prompt().unwrap(), "3456\n\n12 beta|7777");
}

#[tokio::test]
async fn test_params_fixed_at_construction() {
    let index = built_index(&["doc"]).await;
    let generator = Arc::new(RecordingGenerator::default());
    let params = GenerationParams { temperature: 0.2, top_p: 0.5, max_output_tokens: 64 };
    let answerer = RetrievalAnswerer::new(index, generator.clone(), params);

    answerer.answer(&Query::parse(Some("first")).unwrap()).await.unwrap();
    answerer.answer(&Query::parse(Some("second")).unwrap()).await.unwrap();

    assert_eq!(*generator.last_params.lock().unwrap(), Some(params));
}

#[tokio::test]
async fn test_empty_index_fails_without_calling_generator() {
    let index = EmbeddingIndex::new(
        Arc::new(MemoryVectorStore::new()),
        Arc::new(CountingEmbedder::default()),
    );
    let generator = Arc::new(RecordingGenerator::default());
    let answerer = RetrievalAnswerer::new(index, generator.clone(), GenerationParams::default());

    let err = answerer.answer(&Query::parse(Some("anything")).unwrap()).await.unwrap_err();
    assert!(matches!(err, TabragError::EmptyIndex));
    assert!(generator.prompt().is_none());
}

#[tokio::test]
async fn test_generation_timeout_propagates() {
    let index = built_index(&["doc"]).await;
    let answerer =
        RetrievalAnswerer::new(index, Arc::new(TimeoutGenerator), GenerationParams::default());

    let err = answerer.answer(&Query::parse(Some("q")).unwrap()).await.unwrap_err();
    assert!(matches!(err, TabragError::GenerationProvider { .. }));
    assert!(err.to_string().contains("timed out"));
}
