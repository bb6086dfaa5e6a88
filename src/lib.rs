//! jenkins-rag - Question answering over Jenkins CI logs
//!
//! Splits console logs into one chunk per pipeline stage, embeds the
//! chunks into a persistent local index and answers questions by
//! retrieving the closest stages and handing them to a local Ollama
//! model.
//!
//! # Architecture
//!
//! The codebase is organized into two main modules:
//!
//! - **core**: Domain logic
//!   - config, error, types
//!   - indexer (log walking, stage chunking)
//!   - ingest (embedding and upserting)
//!   - storage (collections, cosine search)
//!   - llm (Ollama embeddings and generate clients)
//!   - ask (retrieval and prompting)
//!   - services (unified service container)
//!
//! - **cli**: Command-line adapter (depends on core)
//!   - ingest, ask, chunk, show-config, completions

// Core domain logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use crate::core::config::Config;
pub use crate::core::error::{RagError, Result};
pub use crate::core::services::{IngestRequest, Services};
pub use crate::core::types::*;
