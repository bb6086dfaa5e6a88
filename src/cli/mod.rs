//! CLI adapter for jenkins-rag
//!
//! Provides the command-line interface over the core ingestion and
//! question-answering workflows. The adapter depends on `core/`;
//! nothing in `core/` depends on it.
//!
//! # Architecture
//!
//! ```text
//!   +------------------+
//!   |      cli/        |
//!   | (clap adapter)   |
//!   +--------+---------+
//!            |
//!            v
//!   +------------------+
//!   |     core/        |
//!   |  (domain logic)  |
//!   +------------------+
//! ```

pub mod commands;
pub mod output;

use crate::core::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// jenkins-rag - Question answering over Jenkins CI logs
///
/// Split Jenkins console logs into one chunk per pipeline stage, index
/// them with local embeddings and ask a local Ollama model about them.
#[derive(Parser, Debug)]
#[command(name = "jenkins-rag")]
#[command(author = "Mujaheed Khan")]
#[command(version)]
#[command(about = "RAG over Jenkins CI logs", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Configuration file (overrides JENKINS_RAG_CONFIG and ./settings.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chunk a log folder by stage and index it
    Ingest(commands::IngestArgs),

    /// Ask a question about the indexed logs
    ///
    /// Without a question, every entry of the [questions] table in the
    /// configuration is asked in key order.
    Ask(commands::AskArgs),

    /// Show the stage chunks of a log file or folder without indexing
    Chunk(commands::ChunkArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  jenkins-rag completions bash > ~/.local/share/bash-completion/completions/jenkins-rag
    ///   zsh:   jenkins-rag completions zsh > ~/.zfunc/_jenkins-rag
    ///   fish:  jenkins-rag completions fish > ~/.config/fish/completions/jenkins-rag.fish
    Completions(commands::CompletionsArgs),
}

impl Commands {
    /// Apply per-command flag overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        let (persist_dir, collection_name) = match self {
            Commands::Ingest(args) => {
                if let Some(folder) = &args.log_folder {
                    config.indexing.log_folder = folder.clone();
                }
                (&args.persist_dir, &args.collection_name)
            }
            Commands::Ask(args) => (&args.persist_dir, &args.collection_name),
            _ => return,
        };

        if let Some(dir) = persist_dir {
            config.storage.persist_dir = dir.clone();
        }
        if let Some(name) = collection_name {
            config.storage.collection_name = name.clone();
        }
    }
}

/// Load configuration, apply command flags, then validate the result
pub fn load_config(cli: &Cli) -> crate::core::error::Result<Config> {
    let mut config = Config::load_from(cli.config.as_deref())?;
    cli.command.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::services::Services;
    use std::sync::Arc;

    // Handle completions command early (doesn't need services)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let config = load_config(&cli)?;

    // Create services
    let services = Arc::new(Services::new(config));

    // Execute command
    match cli.command {
        Commands::Ingest(args) => commands::ingest::execute(args, &services, cli.format).await,
        Commands::Ask(args) => commands::ask::execute(args, &services, cli.format).await,
        Commands::Chunk(args) => commands::chunk::execute(args, &services, cli.format).await,
        Commands::ShowConfig(args) => commands::config::execute(args, &services, cli.format).await,
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
