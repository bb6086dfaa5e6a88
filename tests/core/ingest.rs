//! End-to-end ingestion and question answering through Services

use crate::common::{create_test_services, LogDir};
use jenkins_rag::core::ask::CONTEXT_SEPARATOR;
use jenkins_rag::core::error::RagError;
use jenkins_rag::core::ingest::IdStrategy;
use jenkins_rag::{Config, IngestRequest};

fn request(logs: &LogDir, workers: usize, reset: bool) -> IngestRequest {
    IngestRequest {
        log_folder: logs.path().to_path_buf(),
        collection_name: "jenkins_logs".to_string(),
        workers: Some(workers),
        reset,
    }
}

#[tokio::test]
async fn test_ingest_and_ask_single_log() {
    let (services, llm, _temp) = create_test_services(Config::default());
    let logs = LogDir::single();

    let stats = services.ingest(request(&logs, 4, false)).await.unwrap();

    assert_eq!(stats.files_discovered, 1);
    assert_eq!(stats.chunks_created, 3);
    assert_eq!(stats.collection_size, 3);

    let answers = services
        .ask(
            "jenkins_logs",
            vec!["Which test failed?".to_string()],
            Some(2),
        )
        .await
        .unwrap();

    assert_eq!(answers[0].answer, "Stage Test failed in AuthTest.");
    assert_eq!(answers[0].contexts[0].stage, "Test");

    let prompts = llm.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with("You are a world class expert at analyzing Jenkins CI logs.\n"));
    assert!(prompts[0].contains("Test failed: AuthTest.testLogin"));
    assert_eq!(prompts[0].matches(CONTEXT_SEPARATOR).count(), 1);
    assert!(prompts[0].ends_with("Question: Which test failed?\n"));
}

#[tokio::test]
async fn test_reingest_with_content_ids_does_not_duplicate() {
    let (services, _llm, _temp) = create_test_services(Config::default());
    let logs = LogDir::generated(15);

    let first = services.ingest(request(&logs, 1, false)).await.unwrap();
    let second = services.ingest(request(&logs, 16, false)).await.unwrap();

    assert_eq!(first.collection_size, first.chunks_created);
    assert_eq!(second.collection_size, first.collection_size);
}

#[tokio::test]
async fn test_reingest_through_other_spelling_of_folder() {
    let (services, _llm, _temp) = create_test_services(Config::default());
    let logs = LogDir::generated(3);

    let first = services.ingest(request(&logs, 2, false)).await.unwrap();
    let second = services
        .ingest(IngestRequest {
            log_folder: logs.path().join("."),
            ..request(&logs, 2, false)
        })
        .await
        .unwrap();

    assert_eq!(second.chunks_indexed, first.chunks_indexed);
    assert_eq!(second.collection_size, first.collection_size);
}

#[tokio::test]
async fn test_sequential_ids_follow_processing_order() {
    let mut config = Config::default();
    config.indexing.id_strategy = IdStrategy::Sequential;
    let (services, _llm, _temp) = create_test_services(config);
    let logs = LogDir::generated(5);

    let stats = services.ingest(request(&logs, 1, false)).await.unwrap();

    let collection = services.store.get_collection("jenkins_logs").unwrap();
    for idx in 0..stats.chunks_created {
        assert!(collection.get(&format!("log_chunk_{idx}")).is_some());
    }
    assert!(collection
        .get(&format!("log_chunk_{}", stats.chunks_created))
        .is_none());
}

#[tokio::test]
async fn test_reset_drops_stale_entries() {
    let (services, _llm, _temp) = create_test_services(Config::default());
    let mut logs = LogDir::generated(4);
    services.ingest(request(&logs, 2, false)).await.unwrap();

    let removed = logs.files.pop().unwrap();
    std::fs::remove_file(removed).unwrap();

    let without_reset = services.ingest(request(&logs, 2, false)).await.unwrap();
    let with_reset = services.ingest(request(&logs, 2, true)).await.unwrap();

    assert!(without_reset.collection_size > with_reset.collection_size);
    assert_eq!(with_reset.collection_size, with_reset.chunks_created);
}

#[tokio::test]
async fn test_unreadable_log_aborts_before_indexing() {
    let (services, _llm, _temp) = create_test_services(Config::default());
    let mut logs = LogDir::single();
    logs.add_bytes("job-1/corrupt.txt", &[0x80, 0x81]);

    let err = services.ingest(request(&logs, 4, false)).await.unwrap_err();

    assert!(matches!(err, RagError::PartialFailure(_)));
    assert!(err.to_string().contains("corrupt.txt"));
    assert!(!services.store.collection_exists("jenkins_logs"));
}

#[tokio::test]
async fn test_missing_log_folder() {
    let (services, _llm, temp) = create_test_services(Config::default());

    let err = services
        .ingest(IngestRequest {
            log_folder: temp.path().join("no-logs-here"),
            collection_name: "jenkins_logs".to_string(),
            workers: None,
            reset: false,
        })
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_batch_questions_answered_in_order() {
    let (services, llm, _temp) = create_test_services(Config::default());
    services
        .ingest(request(&LogDir::single(), 2, false))
        .await
        .unwrap();

    let questions = vec!["First?".to_string(), "Second?".to_string()];
    let answers = services
        .ask("jenkins_logs", questions, None)
        .await
        .unwrap();

    assert_eq!(answers.len(), 2);
    assert_eq!(answers[0].question, "First?");
    assert_eq!(answers[1].question, "Second?");
    assert_eq!(llm.prompts.lock().unwrap().len(), 2);
}
