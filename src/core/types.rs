//! Core data types for jenkins-rag.
//!
//! This module defines the records passed between the chunker, the
//! indexer and the asker, plus the statistics reported back to the
//! CLI.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stage name used for lines seen before any stage marker
pub const UNKNOWN_STAGE: &str = "unknown";

/// A contiguous run of log lines belonging to one pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Raw lines of the stage, line terminators included
    pub text: String,

    /// Stage active when these lines were emitted
    pub stage: String,

    /// Source log file
    pub source: PathBuf,

    /// Sequential chunk number within the file
    pub chunk_index: usize,

    /// Byte offset where chunk starts in original file
    pub start_offset: usize,

    /// Byte offset where chunk ends in original file
    pub end_offset: usize,
}

/// Metadata stored alongside every index entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub stage: String,
    pub source: String,
}

impl From<&Chunk> for ChunkMetadata {
    fn from(chunk: &Chunk) -> Self {
        Self {
            stage: chunk.stage.clone(),
            source: chunk.source.to_string_lossy().into_owned(),
        }
    }
}

/// Statistics from an ingestion run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestStats {
    /// Log files discovered under the root
    pub files_discovered: usize,

    /// Files chunked successfully
    pub files_chunked: usize,

    /// Files that failed to chunk (only non-zero when skipping failures)
    pub files_failed: usize,

    /// Chunks produced by the walk
    pub chunks_created: usize,

    /// Chunks embedded and upserted
    pub chunks_indexed: usize,

    /// Entries in the collection after the run
    pub collection_size: usize,

    /// Ingestion duration in milliseconds
    pub duration_ms: u64,
}

/// One retrieved chunk used as context for an answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextHit {
    pub id: String,
    pub stage: String,
    pub source: String,
    /// Cosine similarity to the question (higher = closer)
    pub score: f32,
    pub text: String,
}

/// Answer produced by the inference service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub question: String,
    pub answer: String,
    pub contexts: Vec<ContextHit>,
}
