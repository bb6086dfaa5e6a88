//! Ollama HTTP clients.
//!
//! Both clients POST JSON to a full endpoint URL taken from the
//! configuration (`/api/embeddings` and `/api/generate` on a
//! local Ollama server by default) through one shared agent.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Embedder, Llm};
use crate::core::error::{Result, RagError};

/// Answer used when the inference service returns no `response` field
pub const NO_RESPONSE: &str = "[No response]";

/// Shared HTTP agent for Ollama endpoints
#[derive(Clone)]
pub struct OllamaClient {
    agent: ureq::Agent,
}

impl OllamaClient {
    /// Create a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent }
    }

    fn post<T: Serialize>(
        &self,
        url: &str,
        body: &T,
    ) -> std::result::Result<ureq::Response, String> {
        match self.agent.post(url).send_json(body) {
            Ok(resp) => Ok(resp),
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(format!("{url} returned status {code}: {}", error_detail(&body)))
            }
            Err(e) => Err(format!("Failed to reach {url}: {e}")),
        }
    }
}

/// Error body Ollama sends with non-2xx statuses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// The `error` field of an Ollama error body, or the trimmed raw body.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => body.trim().to_string(),
    }
}

#[derive(Debug, Clone, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbeddingsResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

/// Embeddings through Ollama's `/api/embeddings`
#[derive(Clone)]
pub struct OllamaEmbedder {
    client: OllamaClient,
    url: String,
}

impl OllamaEmbedder {
    pub fn new(client: OllamaClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl Embedder for OllamaEmbedder {
    fn embed(&self, model: &str, input: &str) -> Result<Vec<f32>> {
        let req = EmbeddingsRequest {
            model,
            prompt: input,
        };
        let resp = self
            .client
            .post(&self.url, &req)
            .map_err(RagError::EmbeddingFailed)?;

        let v: EmbeddingsResponse = resp.into_json().map_err(|e| {
            RagError::EmbeddingFailed(format!("Failed to decode embeddings response: {e}"))
        })?;
        if v.embedding.is_empty() {
            return Err(RagError::EmbeddingFailed(format!(
                "Embeddings response from model '{model}' was empty"
            )));
        }
        Ok(v.embedding)
    }
}

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Completions through Ollama's `/api/generate` (non-streaming)
#[derive(Clone)]
pub struct OllamaLlm {
    client: OllamaClient,
    url: String,
}

impl OllamaLlm {
    pub fn new(client: OllamaClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl Llm for OllamaLlm {
    fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        let req = GenerateRequest {
            model,
            prompt,
            stream: false,
        };
        let resp = self
            .client
            .post(&self.url, &req)
            .map_err(RagError::InferenceFailed)?;

        let v: GenerateResponse = resp.into_json().map_err(|e| {
            RagError::InferenceFailed(format!("Failed to decode generate response: {e}"))
        })?;
        Ok(v.response.unwrap_or_else(|| NO_RESPONSE.to_string()))
    }
}
