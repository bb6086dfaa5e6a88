//! Embedding and inference collaborators.
//!
//! The traits are the seams between the core and the network:
//! ingestion and the asker only see `Embedder` and `Llm`, and
//! tests substitute in-process implementations.

use crate::core::error::Result;

mod ollama;

pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm, NO_RESPONSE};

/// Computes a fixed-dimension embedding for a piece of text
pub trait Embedder: Send + Sync {
    fn embed(&self, model: &str, input: &str) -> Result<Vec<f32>>;
}

/// Answers a prompt with generated text
pub trait Llm: Send + Sync {
    fn generate(&self, model: &str, prompt: &str) -> Result<String>;
}
