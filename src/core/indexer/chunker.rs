//! Stage-aware log chunking.
//!
//! Splits a Jenkins console log into one chunk per pipeline stage.
//! A new chunk starts immediately before every line matching the
//! stage marker, and the marker line becomes the first line of
//! that chunk. Lines are never dropped, trimmed or duplicated:
//! concatenating the chunk texts of a file gives back the file.
//!
//! # Example
//!
//! ```
//! use jenkins_rag::core::indexer::StageChunker;
//! use std::path::Path;
//!
//! let chunker = StageChunker::default();
//! let log = "[Pipeline] stage: Build\nok\n[Pipeline] stage: Test\nfail\n";
//! let chunks = chunker.chunk_text(log, Path::new("build.txt"));
//!
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[0].stage, "Build");
//! assert_eq!(chunks[1].text, "[Pipeline] stage: Test\nfail\n");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::core::error::{Result, RagError};
use crate::core::types::{Chunk, UNKNOWN_STAGE};

/// Marker emitted by the Jenkins pipeline plugin at the start of a stage
pub const DEFAULT_STAGE_MARKER: &str = r"\[Pipeline\] stage: (.+)";

static DEFAULT_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(DEFAULT_STAGE_MARKER).expect("default stage marker is a valid regex")
});

/// Chunks log text at stage-marker lines.
#[derive(Debug, Clone)]
pub struct StageChunker {
    /// Marker pattern; capture group 1 is the stage name
    marker: Regex,
}

impl Default for StageChunker {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER_REGEX.clone(),
        }
    }
}

impl StageChunker {
    /// Create a chunker from a marker pattern.
    ///
    /// The pattern must compile and contain exactly one capture
    /// group, which names the stage.
    pub fn new(pattern: &str) -> Result<Self> {
        let marker = Regex::new(pattern).map_err(|e| {
            RagError::ConfigError(format!("Invalid stage marker '{pattern}': {e}"))
        })?;

        // captures_len() counts the implicit whole-match group
        let groups = marker.captures_len() - 1;
        if groups != 1 {
            return Err(RagError::ConfigError(format!(
                "Stage marker '{pattern}' must have exactly one capture group, found {groups}"
            )));
        }

        Ok(Self { marker })
    }

    /// The marker pattern as written.
    pub fn pattern(&self) -> &str {
        self.marker.as_str()
    }

    /// Stage name carried by `line`, if it is a marker line.
    fn stage_of(&self, line: &str) -> Option<String> {
        self.marker.captures(line).map(|caps| {
            caps.get(1)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default()
        })
    }

    /// Chunk in-memory log text.
    ///
    /// Lines keep their terminators, so `\r\n` logs survive
    /// untouched. The trailing line may lack a terminator.
    pub fn chunk_text(&self, text: &str, source: &Path) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut current_stage = UNKNOWN_STAGE.to_string();
        let mut chunk_start = 0;
        let mut offset = 0;

        for line in text.split_inclusive('\n') {
            if let Some(stage) = self.stage_of(line) {
                if offset > chunk_start {
                    chunks.push(Chunk {
                        text: text[chunk_start..offset].to_string(),
                        stage: current_stage,
                        source: source.to_path_buf(),
                        chunk_index: chunks.len(),
                        start_offset: chunk_start,
                        end_offset: offset,
                    });
                    chunk_start = offset;
                }
                current_stage = stage;
            }
            offset += line.len();
        }

        if offset > chunk_start {
            chunks.push(Chunk {
                text: text[chunk_start..offset].to_string(),
                stage: current_stage,
                source: source.to_path_buf(),
                chunk_index: chunks.len(),
                start_offset: chunk_start,
                end_offset: offset,
            });
        }

        chunks
    }

    /// Read a log file and chunk it.
    ///
    /// Missing, unreadable and non-UTF-8 files are errors; nothing
    /// is recovered here.
    pub fn chunk_file(&self, path: &Path) -> Result<Vec<Chunk>> {
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => RagError::InvalidPath(format!("Log file not found: {path:?}")),
            ErrorKind::InvalidData => {
                RagError::ChunkingFailed(format!("Log file is not valid UTF-8: {path:?}"))
            }
            _ => RagError::ChunkingFailed(format!("Failed to read {path:?}: {e}")),
        })?;

        Ok(self.chunk_text(&contents, path))
    }
}
