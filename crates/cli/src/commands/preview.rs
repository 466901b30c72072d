//! Preview command handler.

use clap::Args;
use docchat_api::{create_backend, PreviewQuery};
use docchat_core::{config::AppConfig, AppResult};
use std::process::ExitCode;

/// Preview how a stored file is chunked
#[derive(Args, Debug)]
pub struct PreviewCommand {
    /// Stored file name inside the namespace
    pub filename: String,

    /// Number of chunks to show
    #[arg(short, long, default_value = "3")]
    pub limit: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PreviewCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<ExitCode> {
        tracing::info!("Executing preview command for '{}'", self.filename);

        let backend = create_backend(config)?;
        let mut query = PreviewQuery::new(config.namespace.clone(), self.filename.clone());
        query.limit = self.limit;

        let response = backend.preview_chunks(&query).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else {
            println!(
                "{} in '{}': {} chunks",
                response.filename, response.namespace, response.total_chunks
            );
            for (i, chunk) in response.preview.iter().enumerate() {
                let page = chunk
                    .metadata
                    .page
                    .map(|p| format!(" (page {})", p))
                    .unwrap_or_default();
                println!("[{}]{} {}", i + 1, page, chunk.text);
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}
