//! Indexer layer tests
//!
//! Stage chunking over files and folders, parallel merge behaviour,
//! and multi-byte log content.
