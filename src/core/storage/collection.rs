//! Persistent document collections.
//!
//! A collection maps string identifiers to a document text, its
//! embedding and `{stage, source}` metadata, and answers
//! nearest-neighbour queries by cosine similarity. Each
//! collection lives in one JSON file that is rewritten atomically
//! on [`Collection::save`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{Result, RagError};
use crate::core::storage::similarity::{cosine_similarity, l2_norm};
use crate::core::types::ChunkMetadata;

/// On-disk format version of a collection file
pub const SCHEMA_VERSION: u32 = 1;

/// One stored chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub document: String,
    pub embedding: Vec<f32>,
    pub metadata: ChunkMetadata,
}

/// A query result, closest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryHit {
    pub id: String,
    pub document: String,
    pub metadata: ChunkMetadata,
    /// Cosine similarity to the query embedding
    pub score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CollectionFile {
    pub name: String,
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Embedding dimension, fixed by the first upsert
    pub dimension: Option<usize>,
    pub entries: BTreeMap<String, IndexEntry>,
}

/// An opened collection, held in memory until saved
#[derive(Debug)]
pub struct Collection {
    path: PathBuf,
    data: CollectionFile,
}

impl Collection {
    pub(crate) fn create(path: PathBuf, name: &str) -> Self {
        let now = Utc::now();
        Self {
            path,
            data: CollectionFile {
                name: name.to_string(),
                schema_version: SCHEMA_VERSION,
                created_at: now,
                updated_at: now,
                dimension: None,
                entries: BTreeMap::new(),
            },
        }
    }

    pub(crate) fn load(path: PathBuf) -> Result<Self> {
        let contents = fs::read_to_string(&path)?;
        let data: CollectionFile = serde_json::from_str(&contents)?;

        if data.schema_version != SCHEMA_VERSION {
            return Err(RagError::InvalidCollection(format!(
                "Collection '{}' uses schema version {} (current: v{}). \
                 Delete it and re-run ingestion.",
                data.name, data.schema_version, SCHEMA_VERSION
            )));
        }

        Ok(Self { path, data })
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored entries
    pub fn count(&self) -> usize {
        self.data.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.entries.is_empty()
    }

    /// Embedding dimension, `None` until the first upsert
    pub fn dimension(&self) -> Option<usize> {
        self.data.dimension
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.data.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.data.updated_at
    }

    pub fn get(&self, id: &str) -> Option<&IndexEntry> {
        self.data.entries.get(id)
    }

    /// Insert or replace an entry by id.
    pub fn upsert(&mut self, entry: IndexEntry) -> Result<()> {
        if entry.embedding.is_empty() {
            return Err(RagError::StorageError(format!(
                "Refusing to store empty embedding for '{}'",
                entry.id
            )));
        }
        self.check_dimension(entry.embedding.len())?;

        self.data.dimension = Some(entry.embedding.len());
        self.data.entries.insert(entry.id.clone(), entry);
        self.data.updated_at = Utc::now();
        Ok(())
    }

    /// Remove every entry. The dimension is reset as well.
    pub fn clear(&mut self) {
        self.data.entries.clear();
        self.data.dimension = None;
        self.data.updated_at = Utc::now();
    }

    /// The `n` entries closest to `embedding`, best first.
    ///
    /// Ties are broken by id so results are deterministic.
    pub fn query(&self, embedding: &[f32], n: usize) -> Result<Vec<QueryHit>> {
        if n == 0 || self.data.entries.is_empty() {
            return Ok(Vec::new());
        }
        self.check_dimension(embedding.len())?;

        let query_norm = l2_norm(embedding);
        let mut scored: Vec<(f32, &IndexEntry)> = self
            .data
            .entries
            .values()
            .map(|entry| {
                let score = cosine_similarity(
                    embedding,
                    &entry.embedding,
                    query_norm,
                    l2_norm(&entry.embedding),
                );
                (score, entry)
            })
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));

        Ok(scored
            .into_iter()
            .take(n)
            .map(|(score, entry)| QueryHit {
                id: entry.id.clone(),
                document: entry.document.clone(),
                metadata: entry.metadata.clone(),
                score,
            })
            .collect())
    }

    fn check_dimension(&self, len: usize) -> Result<()> {
        match self.data.dimension {
            Some(dim) if dim != len => Err(RagError::StorageError(format!(
                "Embedding dimension {len} does not match collection '{}' dimension {dim}",
                self.data.name
            ))),
            _ => Ok(()),
        }
    }

    /// Write the collection to disk (temp file + rename).
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_string(&self.data)?;
        fs::write(&tmp, json.as_bytes()).map_err(|e| {
            RagError::StorageError(format!("Failed to write {}: {e}", tmp.display()))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            RagError::StorageError(format!(
                "Failed to finalize {}: {e}",
                self.path.display()
            ))
        })?;

        Ok(())
    }
}
