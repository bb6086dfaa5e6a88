//! Embedding and upserting chunks into a collection.
//!
//! The indexer is the offline half after chunking: every chunk's
//! text is embedded and stored with `{stage, source}` metadata
//! under an identifier chosen by [`IdStrategy`].

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::llm::Embedder;
use crate::core::storage::{Collection, IndexEntry};
use crate::core::types::{Chunk, ChunkMetadata};

/// Prefix shared by every chunk identifier
pub const ID_PREFIX: &str = "log_chunk_";

/// How index identifiers are assigned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Hash of source, stage and ordinal within the file; stable across runs
    #[default]
    Content,
    /// Position in the processing order; depends on merge order
    Sequential,
}

impl std::str::FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "content" => Ok(Self::Content),
            "sequential" => Ok(Self::Sequential),
            other => Err(format!(
                "unknown id strategy '{other}' (expected 'content' or 'sequential')"
            )),
        }
    }
}

impl IdStrategy {
    /// Identifier for `chunk` at position `idx` of the input sequence.
    pub fn chunk_id(self, chunk: &Chunk, idx: usize) -> String {
        match self {
            IdStrategy::Sequential => format!("{ID_PREFIX}{idx}"),
            IdStrategy::Content => {
                let mut hasher = Sha256::new();
                hasher.update(chunk.source.to_string_lossy().as_bytes());
                hasher.update([0u8]);
                hasher.update(chunk.stage.as_bytes());
                hasher.update([0u8]);
                hasher.update(chunk.chunk_index.to_le_bytes());
                let digest = hex::encode(hasher.finalize());
                format!("{ID_PREFIX}{}", &digest[..16])
            }
        }
    }
}

/// Embeds chunks and writes them to a collection
#[derive(Clone)]
pub struct Indexer {
    embedder: Arc<dyn Embedder>,
    model: String,
    ids: IdStrategy,
}

impl Indexer {
    pub fn new(embedder: Arc<dyn Embedder>, model: impl Into<String>, ids: IdStrategy) -> Self {
        Self {
            embedder,
            model: model.into(),
            ids,
        }
    }

    /// Embed and upsert every chunk, then save the collection.
    ///
    /// Stops at the first embedding failure; entries upserted
    /// before it are not saved.
    pub fn index_chunks(&self, collection: &mut Collection, chunks: &[Chunk]) -> Result<usize> {
        tracing::info!(
            "Embedding {} chunks into '{}' with model '{}'",
            chunks.len(),
            collection.name(),
            self.model
        );

        for (idx, chunk) in chunks.iter().enumerate() {
            if idx % 100 == 0 && idx > 0 {
                tracing::info!("Progress: {}/{} chunks embedded", idx, chunks.len());
            }

            let embedding = self.embedder.embed(&self.model, &chunk.text)?;
            collection.upsert(IndexEntry {
                id: self.ids.chunk_id(chunk, idx),
                document: chunk.text.clone(),
                embedding,
                metadata: ChunkMetadata::from(chunk),
            })?;
        }

        collection.save()?;
        tracing::info!(
            "Indexed {} chunks, collection '{}' now holds {}",
            chunks.len(),
            collection.name(),
            collection.count()
        );

        Ok(chunks.len())
    }
}
