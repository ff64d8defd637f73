//! Dataset loading
//!
//! A `DatasetLoader` turns a source file into the documents that get
//! indexed. The only supported source is delimiter-separated text, see
//! [`csv::CsvLoader`].

use std::path::Path;

use crate::error::Result;
use crate::models::Document;

pub mod csv;
pub mod encoding;

pub use self::csv::{ColumnKind, ColumnProfile, CsvLoader, TabularData};
pub use self::encoding::{detect_and_decode, DecodedText};

/// Loader that turns a dataset file into documents
pub trait DatasetLoader: Send + Sync {
    /// Load the file at `path`
    ///
    /// Fails with `DatasetNotFound` when the path does not resolve to a
    /// readable file. Loading is a pure function of the file contents.
    fn load(&self, path: &Path) -> Result<Vec<Document>>;

    /// Human-readable format name
    fn format_name(&self) -> &str;
}
