//! Retrieval and question answering.
//!
//! The online half: embed the question, pull the nearest chunks
//! from a collection, wrap them in the CI-log prompt and ask the
//! inference service.

use std::sync::Arc;

use crate::core::error::{Result, RagError};
use crate::core::llm::{Embedder, Llm};
use crate::core::storage::{Collection, QueryHit};
use crate::core::types::{Answer, ContextHit};

/// Separator placed between retrieved chunks in the prompt
pub const CONTEXT_SEPARATOR: &str = "\n-----------\n";

/// Build the prompt sent to the inference service.
pub fn build_prompt(contexts: &str, question: &str) -> String {
    format!(
        r#"You are a world class expert at analyzing Jenkins CI logs.
Use the logs below to answer the question.

Logs:
{contexts}

Question: {question}
"#
    )
}

/// Join retrieved documents with [`CONTEXT_SEPARATOR`].
pub fn join_contexts(hits: &[QueryHit]) -> String {
    hits.iter()
        .map(|h| h.document.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Answers questions against one collection
#[derive(Clone)]
pub struct Asker {
    embedder: Arc<dyn Embedder>,
    llm: Arc<dyn Llm>,
    embedding_model: String,
    model_name: String,
    n_results: usize,
}

impl Asker {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn Llm>,
        embedding_model: impl Into<String>,
        model_name: impl Into<String>,
        n_results: usize,
    ) -> Self {
        Self {
            embedder,
            llm,
            embedding_model: embedding_model.into(),
            model_name: model_name.into(),
            n_results,
        }
    }

    pub fn n_results(&self) -> usize {
        self.n_results
    }

    /// Nearest chunks for `question`, best first.
    pub fn retrieve(&self, collection: &Collection, question: &str) -> Result<Vec<QueryHit>> {
        let embedding = self.embedder.embed(&self.embedding_model, question)?;
        collection.query(&embedding, self.n_results)
    }

    /// Embed, retrieve, prompt and generate.
    pub fn ask(&self, collection: &Collection, question: &str) -> Result<Answer> {
        if question.trim().is_empty() {
            return Err(RagError::InvalidQuestion(
                "Question cannot be empty".to_string(),
            ));
        }

        let hits = self.retrieve(collection, question)?;
        tracing::debug!(
            "Retrieved {} chunks from '{}' for question",
            hits.len(),
            collection.name()
        );

        let prompt = build_prompt(&join_contexts(&hits), question);
        let answer = self.llm.generate(&self.model_name, &prompt)?;

        Ok(Answer {
            question: question.to_string(),
            answer,
            contexts: hits
                .into_iter()
                .map(|h| ContextHit {
                    id: h.id,
                    stage: h.metadata.stage,
                    source: h.metadata.source,
                    score: h.score,
                    text: h.document,
                })
                .collect(),
        })
    }
}
