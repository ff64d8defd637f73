//! In-memory vector store for tests and throwaway indexes.

use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};
use tabrag_core::error::Result;
use tabrag_core::models::{EntryId, IndexEntry, ScoredDocument};

use crate::ports::VectorStore;
use crate::similarity::{dedup_by_id, rank};

/// In-memory implementation of VectorStore
#[derive(Debug, Clone, Default)]
pub struct MemoryVectorStore {
    entries: Arc<RwLock<Vec<IndexEntry>>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn replace_all(&self, entries: Vec<IndexEntry>) -> Result<()> {
        let entries = dedup_by_id(entries);
        *self.entries.write().unwrap_or_else(PoisonError::into_inner) = entries;
        Ok(())
    }

    async fn get(&self, id: &EntryId) -> Result<Option<IndexEntry>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.iter().find(|e| &e.id == id).cloned())
    }

    async fn similarity_search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredDocument>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(rank(&entries, query, k))
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.read().unwrap_or_else(PoisonError::into_inner).len())
    }

    async fn dimensions(&self) -> Result<usize> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.first().map(|e| e.vector.len()).unwrap_or(0))
    }
}
