//! Unified service container for jenkins-rag
//!
//! Provides shared access to the document store, the embedding and
//! inference clients, and the ingestion and question workflows built
//! on top of them.

use crate::core::ask::Asker;
use crate::core::config::Config;
use crate::core::error::{Result, RagError};
use crate::core::indexer::{ChunkingPipeline, StageChunker};
use crate::core::ingest::Indexer;
use crate::core::llm::{Embedder, Llm, OllamaClient, OllamaEmbedder, OllamaLlm};
use crate::core::storage::{Collection, DocumentStore};
use crate::core::types::{Answer, IngestStats};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Parameters of one ingestion run
#[derive(Debug, Clone)]
pub struct IngestRequest {
    /// Root folder searched for logs
    pub log_folder: PathBuf,

    /// Collection receiving the chunks
    pub collection_name: String,

    /// Worker override; `None` uses `indexing.no_of_threads`
    pub workers: Option<usize>,

    /// Empty the collection before indexing
    pub reset: bool,
}

/// Unified services container
#[derive(Clone)]
pub struct Services {
    /// Persistent document index
    pub store: Arc<DocumentStore>,

    /// Embedding client shared by ingestion and retrieval
    pub embedder: Arc<dyn Embedder>,

    /// Inference client
    pub llm: Arc<dyn Llm>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services backed by the configured Ollama endpoints
    pub fn new(config: Config) -> Self {
        let client = OllamaClient::new(Duration::from_secs(config.inference.request_timeout_sec));
        let embedder = Arc::new(OllamaEmbedder::new(
            client.clone(),
            config.inference.embedding_url.clone(),
        ));
        let llm = Arc::new(OllamaLlm::new(client, config.inference.ollama_url.clone()));

        Self::with_clients(config, embedder, llm)
    }

    /// Create services with caller-supplied embedding and inference clients
    pub fn with_clients(config: Config, embedder: Arc<dyn Embedder>, llm: Arc<dyn Llm>) -> Self {
        let store = Arc::new(DocumentStore::open(config.storage.persist_dir.clone()));

        Self {
            store,
            embedder,
            llm,
            config: Arc::new(config),
        }
    }

    /// Create a ChunkingPipeline from the indexing configuration
    ///
    /// `workers` overrides `indexing.no_of_threads` when given.
    pub fn create_pipeline(&self, workers: Option<usize>) -> Result<ChunkingPipeline> {
        let indexing = &self.config.indexing;
        ChunkingPipeline::new(
            StageChunker::new(&indexing.stage_marker)?,
            indexing.include_patterns.clone(),
            indexing.exclude_patterns.clone(),
            workers.unwrap_or(indexing.no_of_threads),
        )
    }

    pub fn create_indexer(&self) -> Indexer {
        Indexer::new(
            Arc::clone(&self.embedder),
            self.config.inference.embedding_model.clone(),
            self.config.indexing.id_strategy,
        )
    }

    /// Create an Asker; `n_results` overrides `inference.n_results`
    pub fn create_asker(&self, n_results: Option<usize>) -> Result<Asker> {
        let n = n_results.unwrap_or(self.config.inference.n_results);
        if n == 0 {
            return Err(RagError::InvalidQuestion(
                "Number of results must be non-zero".to_string(),
            ));
        }

        Ok(Asker::new(
            Arc::clone(&self.embedder),
            Arc::clone(&self.llm),
            self.config.inference.embedding_model.clone(),
            self.config.inference.model_name.clone(),
            n,
        ))
    }

    /// Open an existing collection
    pub async fn open_collection(&self, name: &str) -> Result<Collection> {
        let store = Arc::clone(&self.store);
        let name = name.to_string();
        tokio::task::spawn_blocking(move || store.get_collection(&name))
            .await
            .map_err(|e| RagError::TaskFailed(format!("Collection load did not complete: {e}")))?
    }

    /// Chunk a log folder and index the result
    ///
    /// Any file that fails to chunk aborts the run before the
    /// collection is touched, unless `indexing.skip_failed_files`
    /// is set.
    pub async fn ingest(&self, request: IngestRequest) -> Result<IngestStats> {
        let start = Instant::now();

        // Chunk sources feed content ids; spell the root one way only
        let log_folder = std::fs::canonicalize(&request.log_folder)
            .unwrap_or_else(|_| request.log_folder.clone());

        let pipeline = self.create_pipeline(request.workers)?;
        let outcome = pipeline.chunk_directory(&log_folder).await?;

        let files_discovered = outcome.files_discovered;
        let files_chunked = outcome.files_chunked;
        let files_failed = outcome.failures.len();

        let chunks = if self.config.indexing.skip_failed_files {
            for failure in &outcome.failures {
                tracing::warn!("Skipping {:?}: {}", failure.path, failure.reason);
            }
            outcome.chunks
        } else {
            outcome.into_result()?
        };
        let chunks_created = chunks.len();

        let store = Arc::clone(&self.store);
        let indexer = self.create_indexer();
        let name = request.collection_name.clone();
        let reset = request.reset;

        let (chunks_indexed, collection_size) = tokio::task::spawn_blocking(move || {
            let mut collection = store.get_or_create_collection(&name)?;
            if reset {
                tracing::info!("Resetting collection '{}'", name);
                collection.clear();
            }
            let n = indexer.index_chunks(&mut collection, &chunks)?;
            Ok::<_, RagError>((n, collection.count()))
        })
        .await
        .map_err(|e| RagError::TaskFailed(format!("Indexing task did not complete: {e}")))??;

        let stats = IngestStats {
            files_discovered,
            files_chunked,
            files_failed,
            chunks_created,
            chunks_indexed,
            collection_size,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        tracing::info!(
            "Ingestion complete: {} files, {} chunks indexed into '{}' in {}ms",
            stats.files_chunked,
            stats.chunks_indexed,
            request.collection_name,
            stats.duration_ms
        );

        Ok(stats)
    }

    /// Answer questions against one collection, in the order given
    ///
    /// Fails as a whole when any question fails; use [`Services::ask_each`]
    /// to keep the answers received before the failure.
    pub async fn ask(
        &self,
        collection_name: &str,
        questions: Vec<String>,
        n_results: Option<usize>,
    ) -> Result<Vec<Answer>> {
        let mut answers = Vec::with_capacity(questions.len());
        self.ask_each(collection_name, questions, n_results, |a| answers.push(a))
            .await?;
        Ok(answers)
    }

    /// Answer questions one at a time, handing each answer to
    /// `on_answer` as soon as it arrives.
    ///
    /// Stops at the first failing question; answers already handed
    /// over stay with the caller.
    pub async fn ask_each<F>(
        &self,
        collection_name: &str,
        questions: Vec<String>,
        n_results: Option<usize>,
        mut on_answer: F,
    ) -> Result<()>
    where
        F: FnMut(Answer),
    {
        let asker = self.create_asker(n_results)?;
        let collection = Arc::new(self.open_collection(collection_name).await?);

        for question in questions {
            let asker = asker.clone();
            let collection = Arc::clone(&collection);
            let answer = tokio::task::spawn_blocking(move || asker.ask(&collection, &question))
                .await
                .map_err(|e| {
                    RagError::TaskFailed(format!("Question task did not complete: {e}"))
                })??;
            on_answer(answer);
        }

        Ok(())
    }
}
