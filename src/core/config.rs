//! Configuration management for jenkins-rag.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.
//! The configuration is built once at start-up and handed to
//! [`Services`](crate::core::services::Services); nothing reads it
//! from global state.

use crate::core::error::{Result, RagError};
use crate::core::indexer::{StageChunker, DEFAULT_STAGE_MARKER};
use crate::core::ingest::IdStrategy;
use crate::core::storage::validate_collection_name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "JENKINS_RAG_CONFIG";

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "settings.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    /// Named questions for batch mode, asked in sorted key order
    #[serde(default)]
    pub questions: BTreeMap<String, String>,
}

/// Document index location
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Root directory of the persistent document index
    #[serde(default = "default_persist_dir")]
    pub persist_dir: PathBuf,

    /// Collection holding the log chunks
    #[serde(default = "default_collection_name")]
    pub collection_name: String,
}

/// Ingestion configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Root folder searched recursively for logs
    #[serde(default = "default_log_folder")]
    pub log_folder: PathBuf,

    /// Number of files chunked in parallel
    #[serde(default = "default_no_of_threads")]
    pub no_of_threads: usize,

    /// File patterns to include (glob syntax)
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    /// File patterns to exclude (glob syntax)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Stage marker regex with one capture group for the stage name
    #[serde(default = "default_stage_marker")]
    pub stage_marker: String,

    /// Index the readable files when some logs fail to chunk
    #[serde(default)]
    pub skip_failed_files: bool,

    /// Identifier scheme for index entries
    #[serde(default)]
    pub id_strategy: IdStrategy,
}

/// Embedding and inference endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InferenceConfig {
    /// Ollama generate endpoint
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Model answering questions
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Ollama embeddings endpoint
    #[serde(default = "default_embedding_url")]
    pub embedding_url: String,

    /// Model producing embeddings for chunks and questions
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Number of chunks retrieved per question
    #[serde(default = "default_n_results")]
    pub n_results: usize,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_sec: u64,
}

// Default value functions
fn default_persist_dir() -> PathBuf {
    PathBuf::from("./chroma_store")
}

fn default_collection_name() -> String {
    "jenkins_logs".to_string()
}

fn default_log_folder() -> PathBuf {
    PathBuf::from("data/logs")
}

fn default_no_of_threads() -> usize {
    4
}

fn default_include_patterns() -> Vec<String> {
    vec!["*.txt".to_string()]
}

fn default_stage_marker() -> String {
    DEFAULT_STAGE_MARKER.to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434/api/generate".to_string()
}

fn default_model_name() -> String {
    "llama3".to_string()
}

fn default_embedding_url() -> String {
    "http://localhost:11434/api/embeddings".to_string()
}

fn default_embedding_model() -> String {
    "all-minilm".to_string()
}

fn default_n_results() -> usize {
    3
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            persist_dir: default_persist_dir(),
            collection_name: default_collection_name(),
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            log_folder: default_log_folder(),
            no_of_threads: default_no_of_threads(),
            include_patterns: default_include_patterns(),
            exclude_patterns: Vec::new(),
            stage_marker: default_stage_marker(),
            skip_failed_files: false,
            id_strategy: IdStrategy::default(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            ollama_url: default_ollama_url(),
            model_name: default_model_name(),
            embedding_url: default_embedding_url(),
            embedding_model: default_embedding_model(),
            n_results: default_n_results(),
            request_timeout_sec: default_request_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            RagError::ConfigError(format!("Failed to read config file {path:?}: {e}"))
        })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults, then validate
    pub fn load() -> Result<Self> {
        let config = Self::load_from(None)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config, preferring an explicit file
    ///
    /// File priority order:
    /// 1. `explicit` (the CLI `--config` flag)
    /// 2. JENKINS_RAG_CONFIG env var
    /// 3. ./settings.toml
    /// 4. `<config dir>/jenkins-rag/settings.toml`
    /// 5. Defaults
    ///
    /// The result is not validated; callers apply their own
    /// overrides first and then call [`Config::validate`].
    pub fn load_from(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match Self::locate_file(explicit) {
            Some(path) => {
                tracing::debug!("Loading configuration from {:?}", path);
                Self::from_file(path)?
            }
            None => Self::default(),
        };

        config.merge_env();

        Ok(config)
    }

    fn locate_file(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|dir| dir.join("jenkins-rag").join(LOCAL_CONFIG_FILE))
            .filter(|path| path.exists())
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Storage configuration
        if let Ok(dir) = env::var("JENKINS_RAG_PERSIST_DIR") {
            self.storage.persist_dir = PathBuf::from(dir);
        }
        if let Ok(name) = env::var("JENKINS_RAG_COLLECTION_NAME") {
            self.storage.collection_name = name;
        }

        // Indexing configuration
        if let Ok(folder) = env::var("JENKINS_RAG_LOG_FOLDER") {
            self.indexing.log_folder = PathBuf::from(folder);
        }
        if let Ok(threads) = env::var("JENKINS_RAG_NO_OF_THREADS") {
            if let Ok(n) = threads.parse() {
                self.indexing.no_of_threads = n;
            }
        }
        if let Ok(strategy) = env::var("JENKINS_RAG_ID_STRATEGY") {
            if let Ok(s) = strategy.parse() {
                self.indexing.id_strategy = s;
            }
        }

        // Inference configuration
        if let Ok(url) = env::var("JENKINS_RAG_OLLAMA_URL") {
            self.inference.ollama_url = url;
        }
        if let Ok(model) = env::var("JENKINS_RAG_MODEL_NAME") {
            self.inference.model_name = model;
        }
        if let Ok(url) = env::var("JENKINS_RAG_EMBEDDING_URL") {
            self.inference.embedding_url = url;
        }
        if let Ok(model) = env::var("JENKINS_RAG_EMBEDDING_MODEL") {
            self.inference.embedding_model = model;
        }
        if let Ok(n_results) = env::var("JENKINS_RAG_N_RESULTS") {
            if let Ok(n) = n_results.parse() {
                self.inference.n_results = n;
            }
        }
        if let Ok(timeout) = env::var("JENKINS_RAG_REQUEST_TIMEOUT_SEC") {
            if let Ok(t) = timeout.parse() {
                self.inference.request_timeout_sec = t;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        validate_collection_name(&self.storage.collection_name)
            .map_err(|e| RagError::ConfigError(e.to_string()))?;

        if self.indexing.no_of_threads == 0 {
            return Err(RagError::ConfigError(
                "Number of threads must be non-zero".to_string(),
            ));
        }

        StageChunker::new(&self.indexing.stage_marker)?;

        for (name, url) in [
            ("ollama_url", &self.inference.ollama_url),
            ("embedding_url", &self.inference.embedding_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(RagError::ConfigError(format!(
                    "{name} must be an http(s) URL, got '{url}'"
                )));
            }
        }

        if self.inference.model_name.trim().is_empty()
            || self.inference.embedding_model.trim().is_empty()
        {
            return Err(RagError::ConfigError(
                "Model names must be non-empty".to_string(),
            ));
        }

        if self.inference.n_results == 0 {
            return Err(RagError::ConfigError(
                "n_results must be non-zero".to_string(),
            ));
        }

        if self.inference.request_timeout_sec == 0 {
            return Err(RagError::ConfigError(
                "Request timeout must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Questions in the order batch mode asks them
    pub fn sorted_questions(&self) -> Vec<(&str, &str)> {
        self.questions
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Persist dir: {:?}", self.storage.persist_dir);
        tracing::info!("  Collection: {}", self.storage.collection_name);
        tracing::info!("  Log folder: {:?}", self.indexing.log_folder);
        tracing::info!("  Threads: {}", self.indexing.no_of_threads);
        tracing::info!(
            "  Include patterns: {:?}",
            self.indexing.include_patterns
        );
        tracing::info!("  Stage marker: {}", self.indexing.stage_marker);
        tracing::info!("  Id strategy: {:?}", self.indexing.id_strategy);
        tracing::info!("  Ollama URL: {}", self.inference.ollama_url);
        tracing::info!("  Model: {}", self.inference.model_name);
        tracing::info!(
            "  Embedding model: {} ({})",
            self.inference.embedding_model,
            self.inference.embedding_url
        );
        tracing::info!("  n_results: {}", self.inference.n_results);
        tracing::info!("  Request timeout: {}s", self.inference.request_timeout_sec);
        tracing::info!("  Questions: {}", self.questions.len());
    }
}
