use async_trait::async_trait;
use tabrag_core::error::Result;
use tabrag_core::models::{EntryId, IndexEntry, ScoredDocument};

/// Port for vector storage and similarity search
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Replace the whole contents of the store with `entries`
    ///
    /// Readers observe either the previous contents or the new ones, never
    /// a mix. Duplicate ids keep their first occurrence.
    async fn replace_all(&self, entries: Vec<IndexEntry>) -> Result<()>;

    /// Get an entry by ID
    async fn get(&self, id: &EntryId) -> Result<Option<IndexEntry>>;

    /// Perform similarity search
    ///
    /// Returns at most `k` documents, most similar first. When fewer than
    /// `k` entries are stored, all of them are returned.
    async fn similarity_search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredDocument>>;

    /// Number of stored entries
    async fn len(&self) -> Result<usize>;

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Get the dimensionality of stored vectors (0 when empty)
    async fn dimensions(&self) -> Result<usize>;
}
