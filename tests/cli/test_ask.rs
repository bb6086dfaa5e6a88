//! Tests for ask CLI command
//!
//! Tests the ask command handler:
//! - Single question (human and JSON)
//! - Batch mode over the [questions] table
//! - Error cases (missing collection, no question, empty question)

use crate::cli::test_helpers::{create_cli_fixture, create_cli_fixture_with, ingest_fixture};
use jenkins_rag::cli::commands::ask::{execute, AskArgs};
use jenkins_rag::cli::OutputFormat;
use jenkins_rag::Config;

fn args(question: Option<&str>) -> AskArgs {
    AskArgs {
        question: question.map(str::to_string),
        persist_dir: None,
        collection_name: None,
        n_results: None,
        show_context: false,
    }
}

#[tokio::test]
async fn test_ask_single_question_human() {
    let fixture = create_cli_fixture();
    ingest_fixture(&fixture).await;

    let result = execute(
        AskArgs {
            show_context: true,
            ..args(Some("Which test failed?"))
        },
        &fixture.services,
        OutputFormat::Human,
    )
    .await;

    assert!(result.is_ok(), "Ask should succeed: {:?}", result.err());
    let prompts = fixture.llm.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].ends_with("Question: Which test failed?\n"));
}

#[tokio::test]
async fn test_ask_single_question_json() {
    let fixture = create_cli_fixture();
    ingest_fixture(&fixture).await;

    let result = execute(
        AskArgs {
            n_results: Some(1),
            ..args(Some("What happened in Build?"))
        },
        &fixture.services,
        OutputFormat::Json,
    )
    .await;

    assert!(result.is_ok(), "Ask should succeed: {:?}", result.err());
    let prompts = fixture.llm.prompts.lock().unwrap();
    assert!(!prompts[0].contains("\n-----------\n"));
}

#[tokio::test]
async fn test_ask_batch_uses_sorted_questions() {
    let mut config = Config::default();
    config
        .questions
        .insert("q2".to_string(), "Second question?".to_string());
    config
        .questions
        .insert("q1".to_string(), "First question?".to_string());
    let fixture = create_cli_fixture_with(config);
    ingest_fixture(&fixture).await;

    let result = execute(args(None), &fixture.services, OutputFormat::Human).await;

    assert!(result.is_ok(), "Batch ask should succeed: {:?}", result.err());
    let prompts = fixture.llm.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].ends_with("Question: First question?\n"));
    assert!(prompts[1].ends_with("Question: Second question?\n"));
}

#[tokio::test]
async fn test_ask_batch_stops_at_failing_question() {
    let mut config = Config::default();
    for (key, q) in [("q1", "First?"), ("q2", "Second?"), ("q3", "Third?")] {
        config.questions.insert(key.to_string(), q.to_string());
    }
    let fixture = create_cli_fixture_with(config);
    ingest_fixture(&fixture).await;
    fixture.llm.fail_on_call(2);

    let result = execute(args(None), &fixture.services, OutputFormat::Human).await;

    let err = result.unwrap_err().to_string();
    assert!(err.contains("model not loaded"), "unexpected error: {err}");
    let prompts = fixture.llm.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].ends_with("Question: First?\n"));
}

#[tokio::test]
async fn test_ask_without_any_question() {
    let fixture = create_cli_fixture();
    ingest_fixture(&fixture).await;

    let result = execute(args(None), &fixture.services, OutputFormat::Human).await;

    let err = result.unwrap_err().to_string();
    assert!(err.contains("No question"), "unexpected error: {err}");
}

#[tokio::test]
async fn test_ask_before_ingest() {
    let fixture = create_cli_fixture();

    let result = execute(args(Some("Why?")), &fixture.services, OutputFormat::Human).await;

    let err = result.unwrap_err().to_string();
    assert!(err.contains("not found"), "unexpected error: {err}");
    assert!(fixture.llm.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_ask_blank_question_rejected() {
    let fixture = create_cli_fixture();
    ingest_fixture(&fixture).await;

    let result = execute(args(Some("   ")), &fixture.services, OutputFormat::Human).await;

    assert!(result.is_err());
    assert!(fixture.llm.prompts.lock().unwrap().is_empty());
}
