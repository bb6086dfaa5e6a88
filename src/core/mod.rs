//! Core domain logic (adapter-agnostic)
//!
//! This module contains all business logic that is independent
//! of the command-line front end.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **indexer**: Log discovery and stage chunking pipeline
//! - **ingest**: Embedding chunks into a collection
//! - **storage**: Persistent document index
//! - **llm**: Embedding and inference clients
//! - **ask**: Retrieval and prompt construction
//! - **services**: Unified service container

pub mod ask;
pub mod config;
pub mod error;
pub mod indexer;
pub mod ingest;
pub mod llm;
pub mod services;
pub mod storage;
pub mod types;

// Re-export key types for convenience
pub use config::Config;
pub use error::{RagError, Result};
pub use services::{IngestRequest, Services};
