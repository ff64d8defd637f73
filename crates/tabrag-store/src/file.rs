//! Durable vector store backed by a single JSON file.
//!
//! The whole index lives in memory and is mirrored to `<dir>/index.json`.
//! Writes go to a temporary sibling file which is then renamed over the
//! previous one, so a crash mid-write leaves the old index intact.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tabrag_core::error::{Result, TabragError};
use tabrag_core::models::{EntryId, IndexEntry, ScoredDocument};
use tokio::sync::Mutex;

use crate::ports::VectorStore;
use crate::similarity::{dedup_by_id, rank};

/// File name of the persisted index inside the index directory
pub const INDEX_FILE_NAME: &str = "index.json";

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    version: u32,
    updated_at: DateTime<Utc>,
    entries: Vec<IndexEntry>,
}

/// File-backed implementation of VectorStore
#[derive(Debug, Clone)]
pub struct FileVectorStore {
    path: PathBuf,
    entries: Arc<RwLock<Vec<IndexEntry>>>,
    write_lock: Arc<Mutex<()>>,
}

impl FileVectorStore {
    /// Open (or create) the store rooted at `dir`
    ///
    /// An unreadable or incompatible index file is discarded with a warning;
    /// the next build repopulates it.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| TabragError::Storage {
            reason: format!("cannot create index directory {}: {}", dir.display(), e),
        })?;

        let path = dir.join(INDEX_FILE_NAME);
        let entries = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<IndexFile>(&bytes) {
                Ok(file) if file.version == FORMAT_VERSION => {
                    tracing::debug!(
                        path = %path.display(),
                        entries = file.entries.len(),
                        updated_at = %file.updated_at,
                        "Loaded persisted index"
                    );
                    file.entries
                }
                Ok(file) => {
                    tracing::warn!(
                        path = %path.display(),
                        version = file.version,
                        "Ignoring index file with unsupported version"
                    );
                    Vec::new()
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable index file");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(TabragError::Storage {
                    reason: format!("cannot read {}: {}", path.display(), e),
                })
            }
        };

        Ok(Self {
            path,
            entries: Arc::new(RwLock::new(entries)),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Path of the persisted index file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &[IndexEntry]) -> Result<()> {
        let file = IndexFile {
            version: FORMAT_VERSION,
            updated_at: Utc::now(),
            entries: entries.to_vec(),
        };
        let bytes = serde_json::to_vec(&file)?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await.map_err(|e| TabragError::Storage {
            reason: format!("cannot write {}: {}", tmp.display(), e),
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| TabragError::Storage {
            reason: format!("cannot replace {}: {}", self.path.display(), e),
        })?;

        Ok(())
    }
}

#[async_trait]
impl VectorStore for FileVectorStore {
    async fn replace_all(&self, entries: Vec<IndexEntry>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let entries = dedup_by_id(entries);

        self.persist(&entries).await?;
        tracing::debug!(path = %self.path.display(), entries = entries.len(), "Index persisted");

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
