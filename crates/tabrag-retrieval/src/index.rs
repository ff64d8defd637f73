use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tabrag_core::error::Result;
use tabrag_core::models::{Document, EntryId, IndexEntry, ScoredDocument};
use tabrag_llm::ports::Embedder;
use tabrag_store::ports::VectorStore;

/// Progress information for index building
#[derive(Debug, Clone)]
pub struct IndexProgress {
    pub phase: IndexPhase,
    pub current: usize,
    pub total: usize,
    pub message: String,
}

/// Current phase of index building
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexPhase {
    Embedding,
    Storing,
    Finalizing,
}

/// Result of an index build operation
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexBuildResult {
    /// Number of distinct documents in the index after the build
    pub document_count: usize,

    /// Documents sent to the embedding provider
    pub embedded: usize,

    /// Documents whose persisted embedding was reused
    pub reused: usize,

    /// Stale entries dropped from the store
    pub removed: usize,

    /// Embedding dimension
    pub embedding_dim: usize,

    /// Deterministic index hash
    pub index_hash: String,
}

/// Embedding index over a vector store
///
/// Entries are keyed by [`EntryId::for_content`], so building twice from the
/// same documents leaves the store unchanged and calls the provider only for
/// content it has not seen before.
#[derive(Clone)]
pub struct EmbeddingIndex {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
}

impl EmbeddingIndex {
    /// Wrap a store; nothing is embedded until [`build`](Self::build)
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self { store, embedder }
    }

    /// Build the index from `documents`
    pub async fn build(&self, documents: &[Document]) -> Result<IndexBuildResult> {
        self.build_with_progress(documents, |_| {}).await
    }

    /// Build the index with progress reporting
    ///
    /// After a successful build the store holds exactly one entry per
    /// distinct document. If any embedding call fails the store is left
    /// untouched.
    pub async fn build_with_progress<F>(
        &self,
        documents: &[Document],
        mut progress: F,
    ) -> Result<IndexBuildResult>
    where
        F: FnMut(IndexProgress),
    {
        let model = self.embedder.model_name().to_string();
        let previous = self.store.len().await?;
        let total = documents.len();

        let mut result = IndexBuildResult::default();
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(total);

        for (idx, document) in documents.iter().enumerate() {
            let id = EntryId::for_content(&model, &document.content);
            if !seen.insert(id.clone()) {
                continue;
            }

            let vector = match self.store.get(&id).await? {
                Some(existing) => {
                    result.reused += 1;
                    existing.vector
                }
                None => {
                    let vector = self.embedder.embed(&document.content).await.map_err(|e| {
                        tracing::error!(entry = %id, error = %e, "Embedding failed, index left unchanged");
                        e
                    })?;
                    result.embedded += 1;
                    vector
                }
            };

            entries.push(IndexEntry { id, document: document.clone(), vector });

            progress(IndexProgress {
                phase: IndexPhase::Embedding,
                current: idx + 1,
                total,
                message: format!("Processed {}/{} documents", idx + 1, total),
            });
        }

        progress(IndexProgress {
            phase: IndexPhase::Storing,
            current: 0,
            total: entries.len(),
            message: "Storing entries".to_string(),
        });

        result.document_count = entries.len();
        result.removed = previous.saturating_sub(result.reused);
        result.embedding_dim = entries.first().map(|e| e.vector.len()).unwrap_or(0);

        progress(IndexProgress {
            phase: IndexPhase::Finalizing,
            current: 0,
            total: 1,
            message: "Generating index hash".to_string(),
        });
        result.index_hash = index_hash(&model, &entries);

        self.store.replace_all(entries).await?;

        tracing::info!(
            documents = result.document_count,
            embedded = result.embedded,
            reused = result.reused,
            removed = result.removed,
            hash = %result.index_hash,
            "Index built"
        );

        Ok(result)
    }

    /// Return up to `k` documents most similar to `query`, best first
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<Document>> {
        Ok(self.search_scored(query, k).await?.into_iter().map(|s| s.document).collect())
    }

    /// Like [`search`](Self::search), keeping the similarity scores
    pub async fn search_scored(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>> {
        if k == 0 || self.store.is_empty().await? {
            return Ok(Vec::new());
        }

        let vector = self.embedder.embed_query(query).await?;
        self.store.similarity_search(&vector, k).await
    }

    /// Number of indexed documents
    pub async fn len(&self) -> Result<usize> {
        self.store.len().await
    }

    pub async fn is_empty(&self) -> Result<bool> {
        self.store.is_empty().await
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }
}

/// Generate a deterministic hash over entry ids and vectors
fn index_hash(model: &str, entries: &[IndexEntry]) -> String {
    let mut sorted: Vec<&IndexEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    let mut hasher = DefaultHasher::new();
    model.hash(&mut hasher);
    for entry in sorted {
        entry.id.hash(&mut hasher);
        for &val in &entry.vector {
            val.to_bits().hash(&mut hasher);
        }
    }

    format!("{:016x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(content: &str, vector: Vec<f32>) -> IndexEntry {
        IndexEntry {
            id: EntryId::for_content("m", content),
            document: Document::new(content),
            vector,
        }
    }

    #[test]
    fn test_index_hash_ignores_entry_order() {
        let a = entry("a", vec![1.0, 0.0]);
        let b = entry("b", vec![0.0, 1.0]);

        let forward = index_hash("m", &[a.clone(), b.clone()]);
        let backward = index_hash("m", &[b, a]);
        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 16);
    }

    #[test]
    fn test_index_hash_tracks_vectors_and_model() {
        let base = index_hash("m", &[entry("a", vec![1.0])]);
        assert_ne!(base, index_hash("m", &[entry("a", vec![0.5])]));
        assert_ne!(base, index_hash("other", &[entry("a", vec![1.0])]));
    }
}
