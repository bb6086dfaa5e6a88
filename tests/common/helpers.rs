// Test helper functions

use jenkins_rag::core::config::Config;
use jenkins_rag::core::error::Result;
use jenkins_rag::core::llm::{Embedder, Llm};
use jenkins_rag::core::services::Services;
use jenkins_rag::core::error::RagError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Keywords counted by [`KeywordEmbedder`], one dimension each
const KEYWORDS: &[&str] = &["build", "test", "fail", "success", "deploy", "error"];

/// Deterministic embedder: keyword counts plus a constant bias dimension
#[allow(dead_code)]
pub struct KeywordEmbedder;

impl Embedder for KeywordEmbedder {
    fn embed(&self, _model: &str, input: &str) -> Result<Vec<f32>> {
        let lower = input.to_lowercase();
        let mut v: Vec<f32> = KEYWORDS
            .iter()
            .map(|k| lower.matches(k).count() as f32)
            .collect();
        v.push(0.1);
        Ok(v)
    }
}

/// Llm that records prompts and answers with a fixed string
#[allow(dead_code)]
pub struct RecordingLlm {
    pub answer: String,
    pub prompts: Mutex<Vec<String>>,
    /// 1-based call number that fails; 0 never fails
    fail_on: AtomicUsize,
}

impl RecordingLlm {
    #[allow(dead_code)]
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
            fail_on: AtomicUsize::new(0),
        }
    }

    /// Make the `call`-th generate call fail
    #[allow(dead_code)]
    pub fn fail_on_call(&self, call: usize) {
        self.fail_on.store(call, Ordering::SeqCst);
    }
}

impl Llm for RecordingLlm {
    fn generate(&self, _model: &str, prompt: &str) -> Result<String> {
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(prompt.to_string());
        if prompts.len() == self.fail_on.load(Ordering::SeqCst) {
            return Err(RagError::InferenceFailed("model not loaded".to_string()));
        }
        Ok(self.answer.clone())
    }
}

/// Create test services over a temporary index with in-process clients
///
/// Keep the returned TempDir alive for the duration of the test.
#[allow(dead_code)]
pub fn create_test_services(config: Config) -> (Services, Arc<RecordingLlm>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = config;
    config.storage.persist_dir = temp_dir.path().join("index");

    let llm = Arc::new(RecordingLlm::new("Stage Test failed in AuthTest."));
    let services = Services::with_clients(config, Arc::new(KeywordEmbedder), llm.clone());
    (services, llm, temp_dir)
}
