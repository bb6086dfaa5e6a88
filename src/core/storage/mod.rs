//! Persistent document index.
//!
//! This module provides the storage layer for jenkins-rag: named
//! collections of embedded log chunks kept under `persist_dir`
//! and queried by cosine similarity.
//!
//! # Architecture
//!
//! - **DocumentStore**: Creates, opens, lists and deletes collections
//! - **Collection**: In-memory entries, upsert/query, atomic save
//! - **similarity**: Vector norm and cosine helpers
//!
//! # Storage Structure
//!
//! ```text
//! {persist_dir}/
//! └── collections/
//!     ├── {collection-1}.json   # metadata + entries
//!     └── {collection-2}.json
//! ```

mod collection;
pub mod similarity;
mod store;

pub use collection::{Collection, IndexEntry, QueryHit, SCHEMA_VERSION};
pub use store::{validate_collection_name, DocumentStore, MAX_COLLECTION_NAME_LEN};
