//! Parallel chunking pipeline.
//!
//! Coordinates the chunking half of an ingestion run:
//! 1. Walk the log folder
//! 2. Chunk every file on a bounded pool of blocking tasks
//! 3. Merge each task's chunks as it completes
//!
//! Every submitted task runs to completion. Failures are collected
//! per file next to the successful chunks, and the caller decides
//! whether a failed file aborts the run.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinSet;

use crate::core::error::{FileFailure, Result, RagError};
use crate::core::indexer::{FileWalker, StageChunker};
use crate::core::types::Chunk;

/// Everything a directory walk produced
#[derive(Debug, Default)]
pub struct ChunkingOutcome {
    /// Chunks in completion order across files, line order within a file
    pub chunks: Vec<Chunk>,

    /// Files that could not be chunked
    pub failures: Vec<FileFailure>,

    /// Files discovered by the walker
    pub files_discovered: usize,

    /// Files chunked successfully
    pub files_chunked: usize,

    /// Wall-clock duration of the walk in milliseconds
    pub duration_ms: u64,
}

impl ChunkingOutcome {
    /// All chunks, or every failure if any file could not be chunked.
    pub fn into_result(self) -> Result<Vec<Chunk>> {
        if self.failures.is_empty() {
            Ok(self.chunks)
        } else {
            Err(RagError::PartialFailure(self.failures))
        }
    }
}

/// Orchestrates discovery and parallel chunking
pub struct ChunkingPipeline {
    walker: FileWalker,
    chunker: Arc<StageChunker>,
    workers: usize,
}

impl ChunkingPipeline {
    /// Create a new chunking pipeline
    ///
    /// # Arguments
    ///
    /// * `chunker` - Stage chunker shared by all tasks
    /// * `include_patterns` - Glob patterns for log files
    /// * `exclude_patterns` - Glob patterns to skip
    /// * `workers` - Maximum number of files chunked at once
    pub fn new(
        chunker: StageChunker,
        include_patterns: Vec<String>,
        exclude_patterns: Vec<String>,
        workers: usize,
    ) -> Result<Self> {
        if workers == 0 {
            return Err(RagError::ConfigError(
                "Worker count must be non-zero".to_string(),
            ));
        }

        let walker = FileWalker::new(include_patterns, exclude_patterns)?;

        Ok(Self {
            walker,
            chunker: Arc::new(chunker),
            workers,
        })
    }

    /// Number of concurrent chunking tasks
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Walk `root` and chunk every matching file.
    ///
    /// Only discovery errors (missing root, bad patterns) are
    /// returned as `Err`; per-file errors land in
    /// [`ChunkingOutcome::failures`].
    pub async fn chunk_directory(&self, root: &Path) -> Result<ChunkingOutcome> {
        let start = Instant::now();

        tracing::info!("Starting log discovery under {:?}", root);
        let files = self.walker.collect_files(root)?;
        tracing::info!(
            "Found {} log files, chunking with {} workers",
            files.len(),
            self.workers
        );

        let mut outcome = ChunkingOutcome {
            files_discovered: files.len(),
            ..Default::default()
        };

        let mut pending = files.into_iter();
        let mut tasks: JoinSet<(PathBuf, Result<Vec<Chunk>>)> = JoinSet::new();

        loop {
            // Keep the pool full before waiting on the next completion
            while tasks.len() < self.workers {
                let Some(path) = pending.next() else { break };
                let chunker = Arc::clone(&self.chunker);
                tasks.spawn_blocking(move || {
                    let result = chunker.chunk_file(&path);
                    (path, result)
                });
            }

            let Some(joined) = tasks.join_next().await else {
                break;
            };

            let (path, result) = joined.map_err(|e| {
                RagError::TaskFailed(format!("Chunking task did not complete: {e}"))
            })?;

            match result {
                Ok(chunks) => {
                    tracing::debug!("Chunked {:?} ({} chunks)", path, chunks.len());
                    outcome.files_chunked += 1;
                    outcome.chunks.extend(chunks);
                }
                Err(e) => {
                    tracing::warn!("Failed to chunk {:?}: {}", path, e);
                    outcome.failures.push(FileFailure {
                        path,
                        reason: e.to_string(),
                    });
                }
            }

            let done = outcome.files_chunked + outcome.failures.len();
            if done % 100 == 0 {
                tracing::info!("Progress: {}/{} files chunked", done, outcome.files_discovered);
            }
        }

        outcome.duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Chunking complete: {} files chunked, {} failed, \
             {} chunks created in {}ms",
            outcome.files_chunked,
            outcome.failures.len(),
            outcome.chunks.len(),
            outcome.duration_ms
        );

        Ok(outcome)
    }
}
