//! DocChat CLI
//!
//! Main entry point for the docchat command-line tool: upload documents to a
//! namespace, index them, and ask questions with cited sources.

mod commands;

use clap::{Parser, Subcommand};
use commands::{
    AskCommand, HealthCommand, PreviewCommand, SearchCommand, SessionCommand, UploadCommand,
};
use docchat_core::{config::AppConfig, logging};
use std::path::PathBuf;
use std::process::ExitCode;

/// DocChat - question answering over your own documents
#[derive(Parser, Debug)]
#[command(name = "docchat")]
#[command(about = "Question answering over your own documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Base URL of the retrieval backend
    #[arg(long, global = true, env = "DOCCHAT_BASE_URL")]
    base_url: Option<String>,

    /// Namespace to work in (blank means "default")
    #[arg(short, long, global = true, env = "DOCCHAT_NAMESPACE")]
    namespace: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true, env = "DOCCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload documents and index them
    Upload(UploadCommand),

    /// Ask a single question
    Ask(AskCommand),

    /// Show raw retrieval results for a query
    Search(SearchCommand),

    /// Preview how a stored file is chunked
    Preview(PreviewCommand),

    /// Check that the backend is reachable
    Health(HealthCommand),

    /// Interactive upload-then-chat session
    Session(SessionCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config)?.with_overrides(
        cli.base_url,
        cli.namespace,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("DocChat CLI starting");
    tracing::debug!("Backend: {}", config.base_url);
    tracing::debug!("Namespace: {}", config.namespace);

    let command_name = match &cli.command {
        Commands::Upload(_) => "upload",
        Commands::Ask(_) => "ask",
        Commands::Search(_) => "search",
        Commands::Preview(_) => "preview",
        Commands::Health(_) => "health",
        Commands::Session(_) => "session",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Upload(cmd) => cmd.execute(&config).await.map_err(anyhow::Error::from),
        Commands::Ask(cmd) => cmd.execute(&config).await.map_err(anyhow::Error::from),
        Commands::Search(cmd) => cmd.execute(&config).await.map_err(anyhow::Error::from),
        Commands::Preview(cmd) => cmd.execute(&config).await.map_err(anyhow::Error::from),
        Commands::Health(cmd) => cmd.execute(&config).await.map_err(anyhow::Error::from),
        Commands::Session(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command finished"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
