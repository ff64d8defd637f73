//! Error types for tabrag

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TabragError {
    // Dataset errors
    #[error("Dataset not found at {path}")]
    DatasetNotFound { path: PathBuf },

    #[error("Could not decode dataset text: {reason}")]
    EncodingDetection { reason: String },

    #[error("Failed to parse dataset {path}: {reason}")]
    DatasetParse { path: PathBuf, reason: String },

    // Provider errors
    #[error("Embedding provider error: {reason}")]
    EmbeddingProvider { reason: String },

    #[error("Generation provider error: {reason}")]
    GenerationProvider { reason: String },

    // Index errors
    #[error("Index is empty. No documents have been indexed")]
    EmptyIndex,

    #[error("Storage error: {reason}")]
    Storage { reason: String },

    // Request errors
    #[error("Invalid request: {reason}")]
    Validation { reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TabragError {
    /// Whether an external caller may reasonably retry the failed operation.
    ///
    /// Provider outages, rate limits and timeouts are transient; a missing
    /// dataset or a bad configuration is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::EmbeddingProvider { .. } | Self::GenerationProvider { .. })
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation { reason: reason.into() }
    }
}

impl From<serde_json::Error> for TabragError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TabragError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_errors_are_retryable() {
        let err = TabragError::GenerationProvider { reason: "timed out".to_string() };
        assert!(err.is_retryable());

        let err = TabragError::EmbeddingProvider { reason: "429".to_string() };
        assert!(err.is_retryable());
    }

    #[test]
    fn test_dataset_errors_are_fatal() {
        let err = TabragError::DatasetNotFound { path: PathBuf::from("/missing.csv") };
        assert!(!err.is_retryable());
        assert!(!TabragError::EmptyIndex.is_retryable());
        assert_eq!(err.to_string(), "Dataset not found at /missing.csv");
    }
}
