//! Log chunking module.
//!
//! Handles log discovery and stage-aware chunking for ingestion.
//! Key features:
//!
//! - One chunk per pipeline stage, split at marker lines
//! - Byte-exact chunks (terminators preserved, nothing dropped)
//! - Recursive discovery with include/exclude globs
//! - Bounded parallel fan-out with per-file failure collection

pub mod chunker;
pub mod pipeline;
pub mod walker;

pub use chunker::{StageChunker, DEFAULT_STAGE_MARKER};
pub use pipeline::{ChunkingOutcome, ChunkingPipeline};
pub use walker::FileWalker;
