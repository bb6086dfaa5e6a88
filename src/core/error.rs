//! Error types and error handling for jenkins-rag.
//!
//! This module defines the error types used throughout the
//! library. The CLI adapter turns them into boxed errors and a
//! non-zero exit status.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for jenkins-rag operations
pub type Result<T> = std::result::Result<T, RagError>;

/// A log file that could not be chunked during a directory walk
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Main error type for jenkins-rag
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Chunking failed: {0}")]
    ChunkingFailed(String),

    #[error("Chunking failed for {} file(s): {}", .0.len(), summarize_failures(.0))]
    PartialFailure(Vec<FileFailure>),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Invalid collection: {0}")]
    InvalidCollection(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Task failed: {0}")]
    TaskFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

fn summarize_failures(failures: &[FileFailure]) -> String {
    const SHOWN: usize = 3;

    let mut parts: Vec<String> = failures
        .iter()
        .take(SHOWN)
        .map(|f| format!("{} ({})", f.path.display(), f.reason))
        .collect();
    if failures.len() > SHOWN {
        parts.push(format!("and {} more", failures.len() - SHOWN));
    }
    parts.join(", ")
}

impl RagError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RagError::CollectionNotFound(_) | RagError::InvalidPath(_)
        )
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            RagError::InvalidCollection(_)
                | RagError::InvalidQuestion(_)
                | RagError::ConfigError(_)
        )
    }
}
