//! tabrag Store - Vector storage port and adapters
//!
//! This crate defines the vector storage port and provides an in-memory
//! adapter and a durable file-backed adapter.

pub mod file;
pub mod memory;
pub mod ports;
pub mod similarity;

pub use file::FileVectorStore;
pub use memory::MemoryVectorStore;
pub use ports::VectorStore;
