//! Search command handler.

use clap::Args;
use docchat_api::{create_backend, SearchQuery};
use docchat_core::{config::AppConfig, AppResult};
use std::process::ExitCode;

/// Show raw retrieval results for a query
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Query text
    pub query: String,

    /// Number of results
    #[arg(short = 'k', long, default_value = "8")]
    pub k: u32,

    /// Lexical/semantic blend weight (defaults to the configured alpha)
    #[arg(long, allow_negative_numbers = true)]
    pub alpha: Option<f64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<ExitCode> {
        tracing::info!("Executing search command");

        let backend = create_backend(config)?;
        let mut query = SearchQuery::new(config.namespace.clone(), self.query.clone());
        query.k = self.k;
        query.alpha = self.alpha.unwrap_or(config.alpha);

        let response = backend.search(&query).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
            return Ok(ExitCode::SUCCESS);
        }

        if response.results.is_empty() {
            println!("No results in namespace '{}'", response.namespace);
        }

        for hit in &response.results {
            let source = hit.filename.as_deref().unwrap_or("(unknown)");
            match hit.page {
                Some(page) => println!("[{:.4}] {} (page {})", hit.score, source, page),
                None => println!("[{:.4}] {}", hit.score, source),
            }
            println!("    {}", hit.snippet.replace('\n', " "));
        }

        Ok(ExitCode::SUCCESS)
    }
}
