//! Ask command - answer questions from the indexed logs

use crate::cli::output::{self, colors};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::Answer;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the ask command
#[derive(Args, Debug)]
pub struct AskArgs {
    /// Question to ask; omit to run the configured [questions]
    pub question: Option<String>,

    /// Directory holding the persistent index [default: storage.persist_dir]
    #[arg(long, value_name = "DIR")]
    pub persist_dir: Option<PathBuf>,

    /// Collection to query [default: storage.collection_name]
    #[arg(long, value_name = "NAME")]
    pub collection_name: Option<String>,

    /// Number of chunks retrieved as context [default: inference.n_results]
    #[arg(long, short = 'k')]
    pub n_results: Option<usize>,

    /// Print the retrieved chunks under each answer
    #[arg(long)]
    pub show_context: bool,
}

/// Ask response
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub collection: String,
    pub model: String,
    pub answers: Vec<Answer>,
}

/// Execute the ask command
pub async fn execute(
    args: AskArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = &services.config;
    let collection = config.storage.collection_name.clone();

    let questions: Vec<String> = match args.question {
        Some(q) => vec![q],
        None => config
            .sorted_questions()
            .into_iter()
            .map(|(_, q)| q.to_string())
            .collect(),
    };

    if questions.is_empty() {
        return Err(
            "No question given. Pass a question or add a [questions] table to settings.toml."
                .into(),
        );
    }

    if !services.store.collection_exists(&collection) {
        return Err(format!(
            "Collection '{collection}' not found. Run 'jenkins-rag ingest' first."
        )
        .into());
    }

    match format {
        OutputFormat::Human => {
            // Print each answer as it arrives
            services
                .ask_each(&collection, questions, args.n_results, |answer| {
                    print_answer(&answer, args.show_context)
                })
                .await?;
        }
        OutputFormat::Json => {
            let answers = services
                .ask(&collection, questions, args.n_results)
                .await?;
            let response = AskResponse {
                collection,
                model: config.inference.model_name.clone(),
                answers,
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn print_answer(answer: &Answer, show_context: bool) {
    println!("{} {}", colors::label("Q.:"), answer.question);
    println!("{} {}", colors::success(">>ANS:"), answer.answer);

    if show_context {
        for (i, hit) in answer.contexts.iter().enumerate() {
            println!(
                "  [{}] {} {} {}",
                colors::number(&(i + 1).to_string()),
                colors::stage(&hit.stage),
                colors::file_path(&hit.source),
                colors::score(&format!("(score: {:.3})", hit.score))
            );
            output::print_excerpt(&hit.text, 5);
        }
    }
    println!();
}
