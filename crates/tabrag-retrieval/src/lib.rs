//! tabrag Retrieval - Indexing and answering use cases
//!
//! This crate orchestrates the embedding index over a vector store and the
//! retrieval-augmented answerer built on top of it.

pub mod answer;
pub mod bootstrap;
pub mod index;

pub use answer::{PromptTemplate, RetrievalAnswerer};
pub use bootstrap::{build_index, prepare, Prepared};
pub use index::{EmbeddingIndex, IndexBuildResult, IndexPhase, IndexProgress};
