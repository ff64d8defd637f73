pub mod document;
pub mod query;

pub use document::{Document, EntryId, IndexEntry, ScoredDocument};
pub use query::{Answer, Query};
