//! tabrag Core - Domain models, dataset loading, and configuration
//!
//! This crate contains the core domain logic shared by the index, the
//! answerer, and the HTTP and CLI adapters.

pub mod config;
pub mod error;
pub mod formats;
pub mod models;

pub use error::{Result, TabragError};
