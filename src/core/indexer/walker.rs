//! Log file discovery with pattern-based filtering.
//!
//! Traverses directory trees and keeps files whose name (or full
//! path) matches an include glob and no exclude glob. Walk errors
//! below the root are logged and skipped.

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{Result, RagError};

/// File system walker with pattern-based filtering
#[derive(Debug, Clone)]
pub struct FileWalker {
    /// Patterns to include (e.g., "*.txt", "*.log")
    include_patterns: Vec<Pattern>,

    /// Patterns to exclude (e.g., "**/archive/**")
    exclude_patterns: Vec<Pattern>,
}

fn compile_patterns(patterns: Vec<String>, kind: &str) -> Result<Vec<Pattern>> {
    patterns
        .into_iter()
        .map(|p| {
            Pattern::new(&p)
                .map_err(|e| RagError::ConfigError(format!("Invalid {kind} pattern '{p}': {e}")))
        })
        .collect()
}

impl FileWalker {
    /// Create a new file walker
    ///
    /// # Arguments
    ///
    /// * `include_patterns` - Glob patterns for files to include
    ///   (empty means every file)
    /// * `exclude_patterns` - Glob patterns for files and
    ///   directories to skip
    pub fn new(include_patterns: Vec<String>, exclude_patterns: Vec<String>) -> Result<Self> {
        Ok(Self {
            include_patterns: compile_patterns(include_patterns, "include")?,
            exclude_patterns: compile_patterns(exclude_patterns, "exclude")?,
        })
    }

    /// Collect all matching files under `root`, recursively.
    ///
    /// Files are returned sorted by path so that task submission
    /// order is reproducible.
    pub fn collect_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(RagError::InvalidPath(format!(
                "Log folder does not exist or is not a directory: {root:?}"
            )));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.should_descend(e, root))
        {
            match entry {
                Ok(entry) => {
                    if Self::is_log_file(&entry) && self.matches_patterns(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                }
            }
        }

        files.sort();
        Ok(files)
    }

    /// Regular files, plus symlinks whose target is a file.
    /// Symlinked directories are never entered.
    fn is_log_file(entry: &DirEntry) -> bool {
        if entry.file_type().is_file() {
            return true;
        }
        entry.path_is_symlink() && entry.path().is_file()
    }

    /// Prune excluded directories early. Never prunes the root.
    fn should_descend(&self, entry: &DirEntry, root: &Path) -> bool {
        let path = entry.path();
        if path == root || !entry.file_type().is_dir() {
            return true;
        }

        for pattern in &self.exclude_patterns {
            if pattern.matches_path(path) {
                tracing::debug!("Skipping excluded directory: {:?}", path);
                return false;
            }
        }

        true
    }

    /// Check if a file path matches the include/exclude patterns
    fn matches_patterns(&self, path: &Path) -> bool {
        let path_str = match path.to_str() {
            Some(s) => s,
            None => return false,
        };
        let file_name = path.file_name().and_then(|f| f.to_str());

        let matches_include = self.include_patterns.is_empty()
            || self
                .include_patterns
                .iter()
                .any(|p| p.matches(path_str) || file_name.map(|f| p.matches(f)).unwrap_or(false));

        matches_include
            && !self
                .exclude_patterns
                .iter()
                .any(|p| p.matches(path_str) || p.matches_path(path))
    }
}
