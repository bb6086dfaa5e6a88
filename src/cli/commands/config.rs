//! Config command - show current configuration

use crate::cli::output::print_header;
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use std::sync::Arc;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Include the [questions] table
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = (*services.config).clone();
    if !args.all {
        config.questions.clear();
    }

    match format {
        OutputFormat::Human => {
            print_header("Configuration:");
            println!("  storage:");
            println!("    persist_dir: {}", config.storage.persist_dir.display());
            println!("    collection_name: {}", config.storage.collection_name);
            println!("  indexing:");
            println!("    log_folder: {}", config.indexing.log_folder.display());
            println!("    no_of_threads: {}", config.indexing.no_of_threads);
            println!(
                "    include_patterns: {:?}",
                config.indexing.include_patterns
            );
            println!(
                "    exclude_patterns: {:?}",
                config.indexing.exclude_patterns
            );
            println!("    stage_marker: {}", config.indexing.stage_marker);
            println!(
                "    skip_failed_files: {}",
                config.indexing.skip_failed_files
            );
            println!("    id_strategy: {:?}", config.indexing.id_strategy);
            println!("  inference:");
            println!("    ollama_url: {}", config.inference.ollama_url);
            println!("    model_name: {}", config.inference.model_name);
            println!("    embedding_url: {}", config.inference.embedding_url);
            println!("    embedding_model: {}", config.inference.embedding_model);
            println!("    n_results: {}", config.inference.n_results);
            println!(
                "    request_timeout_sec: {}",
                config.inference.request_timeout_sec
            );
            if args.all {
                println!("  questions:");
                for (key, question) in config.sorted_questions() {
                    println!("    {key}: {question}");
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
