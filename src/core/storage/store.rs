//! Document store rooted at `persist_dir`.
//!
//! Manages named collections on disk: creation, lookup,
//! deletion and listing.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{Result, RagError};
use crate::core::storage::collection::Collection;

/// Maximum collection name length
pub const MAX_COLLECTION_NAME_LEN: usize = 64;

/// Check a collection name: 1-64 chars of letters, digits, `-`, `_`, `.`
pub fn validate_collection_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(RagError::InvalidCollection(
            "Collection name cannot be empty".to_string(),
        ));
    }
    if name.len() > MAX_COLLECTION_NAME_LEN {
        return Err(RagError::InvalidCollection(format!(
            "Collection name '{name}' is too long ({} chars). Maximum length is {MAX_COLLECTION_NAME_LEN} characters.",
            name.len()
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(RagError::InvalidCollection(format!(
            "Collection name '{name}' contains invalid characters. \
             Use only letters, numbers, hyphens, underscores and dots."
        )));
    }
    if name.starts_with('.') {
        return Err(RagError::InvalidCollection(format!(
            "Collection name '{name}' cannot start with a dot"
        )));
    }
    Ok(())
}

/// Directory-backed store of collections
#[derive(Debug, Clone)]
pub struct DocumentStore {
    /// Root directory (`persist_dir`)
    root: PathBuf,
}

impl DocumentStore {
    /// Open a store. Nothing is created until a collection is.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collections_dir(&self) -> PathBuf {
        self.root.join("collections")
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.collections_dir().join(format!("{name}.json"))
    }

    /// Check if a collection exists
    pub fn collection_exists(&self, name: &str) -> bool {
        validate_collection_name(name).is_ok() && self.collection_path(name).exists()
    }

    /// Open an existing collection
    pub fn get_collection(&self, name: &str) -> Result<Collection> {
        validate_collection_name(name)?;
        let path = self.collection_path(name);

        if !path.exists() {
            return Err(RagError::CollectionNotFound(format!(
                "'{name}' in {}",
                self.root.display()
            )));
        }

        Collection::load(path)
    }

    /// Open a collection, creating (and persisting) it when missing
    pub fn get_or_create_collection(&self, name: &str) -> Result<Collection> {
        validate_collection_name(name)?;
        let path = self.collection_path(name);

        if path.exists() {
            return Collection::load(path);
        }

        tracing::info!("Creating collection '{}' in {:?}", name, self.root);
        let collection = Collection::create(path, name);
        collection.save()?;
        Ok(collection)
    }

    /// Delete a collection
    pub fn delete_collection(&self, name: &str) -> Result<()> {
        validate_collection_name(name)?;
        let path = self.collection_path(name);

        if !path.exists() {
            return Err(RagError::CollectionNotFound(name.to_string()));
        }

        fs::remove_file(path)?;
        Ok(())
    }

    /// Names of all collections, sorted
    pub fn list_collections(&self) -> Result<Vec<String>> {
        let dir = self.collections_dir();

        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }
}
