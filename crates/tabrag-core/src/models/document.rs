use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// A unit of text handed to the index
///
/// Documents are immutable once created: the loader produces them, the index
/// consumes them, nothing rewrites them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Text content
    pub content: String,

    /// Descriptive properties (source, path, encoding, ...)
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    /// Create a document without metadata
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata property
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Opaque, index-local identifier of a stored entry
///
/// Derived from the embedding model and the document content, so identical
/// content embedded by the same model always maps to the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub String);

impl EntryId {
    pub fn for_content(model: &str, content: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(model.as_bytes());
        hasher.update([0u8]);
        hasher.update(content.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Document plus its embedding, as persisted by a vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: EntryId,
    pub document: Document,
    pub vector: Vec<f32>,
}

/// Search hit
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_is_stable_for_same_content() {
        let a = EntryId::for_content("text-embedding-004", "hello");
        let b = EntryId::for_content("text-embedding-004", "hello");
        assert_eq!(a, b);
        assert_eq!(a.0.len(), 64);
    }

    #[test]
    fn test_entry_id_depends_on_model_and_content() {
        let base = EntryId::for_content("model-a", "hello");
        assert_ne!(base, EntryId::for_content("model-b", "hello"));
        assert_ne!(base, EntryId::for_content("model-a", "hello!"));
    }

    #[test]
    fn test_document_metadata_builder() {
        let doc = Document::new("content")
            .with_metadata("source", "csv_summary")
            .with_metadata("rows", "3");

        assert_eq!(doc.metadata.get("source").map(String::as_str), Some("csv_summary"));
        assert_eq!(doc.metadata.len(), 2);
    }
}
